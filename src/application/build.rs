//! Build resume use case

use crate::application::render::RenderService;
use crate::error::Result;
use crate::infrastructure::{Application, ExternalCommand};
use std::path::Path;

/// Renders `resume.tex` and runs the configured compiler on it
pub struct BuildService {
    renderer: RenderService,
}

impl BuildService {
    pub fn new(renderer: RenderService) -> Self {
        BuildService { renderer }
    }

    /// Build the application selected by `term`
    pub fn execute(&self, term: &str) -> Result<Application> {
        let application = self
            .renderer
            .repository()
            .locate(self.renderer.config(), term)?;
        self.build(&application)?;
        Ok(application)
    }

    /// Build the application containing `dir`
    pub fn execute_in(&self, dir: &Path) -> Result<Application> {
        let application = self
            .renderer
            .repository()
            .application_containing(self.renderer.config(), dir)?;
        self.build(&application)?;
        Ok(application)
    }

    fn build(&self, application: &Application) -> Result<()> {
        let source = self.renderer.create_texfile(application)?;

        tracing::info!("Building resume {:?}...", application.name);
        ExternalCommand::new(self.renderer.config().compiler.as_str()).compile(&source)?;
        tracing::info!("Build successful");
        Ok(())
    }
}
