//! Initialize project use case

use crate::error::Result;
use crate::infrastructure::ProjectRepository;
use std::fs;
use std::path::Path;

/// Initialize a new project at the specified path.
pub fn init(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }

    let repo = ProjectRepository::new(path.to_path_buf());
    let config = repo.initialize()?;

    tracing::info!("Initialized vitae project at {}", path.display());
    tracing::info!(
        "Shared configs go in {}/, applications in {}/",
        config.shared_dir,
        config.applications_dir
    );

    Ok(())
}
