//! Edit resume use case

use crate::application::render::RenderService;
use crate::error::Result;
use crate::infrastructure::renderer::TEMPLATE_SUFFIX;
use crate::infrastructure::{Application, ExternalCommand};
use std::fs;
use std::path::{Path, PathBuf};

/// Which file of an application to edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Config,
    Template,
}

/// Opens an application's config or template in the editor, then re-renders
pub struct EditService {
    renderer: RenderService,
}

impl EditService {
    pub fn new(renderer: RenderService) -> Self {
        EditService { renderer }
    }

    pub fn execute(&self, term: &str, target: EditTarget) -> Result<PathBuf> {
        let config = self.renderer.config();
        let application = self.renderer.repository().locate(config, term)?;

        let path = self.editable_path(&application, target)?;
        tracing::info!("Editing file {}", path.display());
        ExternalCommand::new(config.get_editor()).run(&path)?;

        self.renderer.create_texfile(&application)?;
        Ok(path)
    }

    /// Path of the application's own copy of the file.
    ///
    /// A file found only in the shared directory is copied into the
    /// application first; a file found nowhere starts out empty.
    pub fn editable_path(&self, application: &Application, target: EditTarget) -> Result<PathBuf> {
        let name = &self.renderer.config().template;
        let found = match target {
            EditTarget::Config => self.renderer.search_path(application).find(name).ok(),
            EditTarget::Template => self.renderer.template_path(application),
        };

        match found {
            Some(path) if path.starts_with(&application.path) => Ok(path),
            Some(shared) => {
                let local = application.path.join(file_name(&shared, name, target));
                tracing::info!("Copying {} into {}", shared.display(), application.name);
                fs::copy(&shared, &local)?;
                Ok(local)
            }
            None => {
                let local = application.path.join(file_name(Path::new(""), name, target));
                fs::write(&local, "")?;
                Ok(local)
            }
        }
    }
}

fn file_name(found: &Path, name: &str, target: EditTarget) -> String {
    if let Some(file) = found.file_name().and_then(|f| f.to_str()) {
        return file.to_string();
    }
    match target {
        EditTarget::Config => format!("{}.yaml", name),
        EditTarget::Template => format!("{}{}", name, TEMPLATE_SUFFIX),
    }
}
