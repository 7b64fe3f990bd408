//! Render an application's `resume.tex`

use crate::domain::node::Node;
use crate::domain::resolver::Resolver;
use crate::domain::tags::TagRegistry;
use crate::error::Result;
use crate::infrastructure::renderer::TEMPLATE_SUFFIX;
use crate::infrastructure::{Application, Config, ProjectRepository, Renderer, SearchPath};
use std::path::PathBuf;

/// Resolves an application's resume config and renders it to LaTeX
pub struct RenderService {
    repository: ProjectRepository,
    config: Config,
    tags: TagRegistry,
}

impl RenderService {
    pub fn new(repository: ProjectRepository, config: Config) -> Self {
        RenderService {
            repository,
            config,
            tags: TagRegistry::builtin(),
        }
    }

    /// Use `tags` instead of the built-in registry
    pub fn with_tags(mut self, tags: TagRegistry) -> Self {
        self.tags = tags;
        self
    }

    pub fn repository(&self) -> &ProjectRepository {
        &self.repository
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn shared_dir(&self) -> PathBuf {
        self.repository.shared_dir(&self.config)
    }

    fn resolver(&self) -> Resolver {
        Resolver::new(self.tags.clone()).with_shared_dir(self.shared_dir())
    }

    /// Directories searched for the application's configs and templates
    pub fn search_path(&self, application: &Application) -> SearchPath {
        SearchPath::new(vec![application.path.clone(), self.shared_dir()])
    }

    /// The resolved resume config of `application`
    pub fn load_config(&self, application: &Application) -> Result<Node> {
        let config = self
            .resolver()
            .load_named(&self.config.template, Some(&application.path))?;
        tracing::debug!(application = %application.name, "Resolved resume config");
        Ok(config)
    }

    /// File holding the application's template, if any
    pub fn template_path(&self, application: &Application) -> Option<PathBuf> {
        let file = format!("{}{}", self.config.template, TEMPLATE_SUFFIX);
        self.search_path(application)
            .dirs()
            .iter()
            .map(|dir| dir.join(&file))
            .find(|path| path.is_file())
    }

    /// Render `resume.tex` inside the application directory
    pub fn create_texfile(&self, application: &Application) -> Result<PathBuf> {
        let config = self.load_config(application)?;
        let renderer = Renderer::new(self.search_path(application).dirs().to_vec())?;

        let dest = application.source_path();
        renderer.render_to_file(&self.config.template, &config, &dest)?;
        Ok(dest)
    }
}
