//! View resume use case

use crate::application::render::RenderService;
use crate::error::Result;
use crate::infrastructure::{Application, ExternalCommand};

/// Re-renders an application and opens its PDF in the configured viewer
pub struct ViewService {
    renderer: RenderService,
}

impl ViewService {
    pub fn new(renderer: RenderService) -> Self {
        ViewService { renderer }
    }

    pub fn execute(&self, term: &str) -> Result<Application> {
        let config = self.renderer.config();
        let application = self.renderer.repository().locate(config, term)?;
        self.renderer.create_texfile(&application)?;

        let pdf = application.pdf_path();
        tracing::info!("Displaying resume PDF: {}", pdf.display());
        ExternalCommand::new(config.viewer.as_str()).run(&pdf)?;
        Ok(application)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::error::VitaeError;
    use crate::infrastructure::ProjectRepository;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_view_runs_viewer() {
        let temp = TempDir::new().unwrap();
        let repo = ProjectRepository::new(temp.path().to_path_buf());
        let mut config = repo.initialize().unwrap();
        config.viewer = "true".to_string();
        fs::write(temp.path().join("shared/resume.yaml"), "{}").unwrap();
        fs::write(temp.path().join("shared/resume.tex.j2"), "x").unwrap();
        repo.create_application(&config, "acme").unwrap();

        let service = ViewService::new(RenderService::new(repo, config));
        assert_eq!(service.execute("a").unwrap().name, "acme");
    }

    #[test]
    fn test_view_missing_viewer() {
        let temp = TempDir::new().unwrap();
        let repo = ProjectRepository::new(temp.path().to_path_buf());
        let mut config = repo.initialize().unwrap();
        config.viewer = "vitae-missing-viewer".to_string();
        fs::write(temp.path().join("shared/resume.yaml"), "{}").unwrap();
        fs::write(temp.path().join("shared/resume.tex.j2"), "x").unwrap();
        repo.create_application(&config, "acme").unwrap();

        let service = ViewService::new(RenderService::new(repo, config));
        assert!(matches!(service.execute("acme"), Err(VitaeError::Launch { .. })));
    }
}
