//! Add application use case

use crate::application::render::RenderService;
use crate::error::Result;
use crate::infrastructure::Application;

/// Creates application directories and renders their first `resume.tex`
pub struct AddService {
    renderer: RenderService,
}

impl AddService {
    pub fn new(renderer: RenderService) -> Self {
        AddService { renderer }
    }

    /// Create `applications/<name>` if it is missing, then render into it
    pub fn execute(&self, name: &str) -> Result<Application> {
        let repo = self.renderer.repository();
        let application = repo.create_application(self.renderer.config(), name)?;
        tracing::debug!("Working dir: {}", application.path.display());

        self.renderer.create_texfile(&application)?;
        Ok(application)
    }
}
