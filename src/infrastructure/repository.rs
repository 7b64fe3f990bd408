//! File system repository for a vitae project

use crate::error::{Result, VitaeError};
use crate::infrastructure::config::{Config, PROJECT_DIR};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Environment variable overriding project discovery
pub const ROOT_ENV: &str = "VITAE_ROOT";

/// Name of the rendered source inside an application directory
pub const RESUME_SOURCE: &str = "resume.tex";
pub const RESUME_PDF: &str = "resume.pdf";

/// One résumé variant under the applications directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    pub name: String,
    pub path: PathBuf,
}

impl Application {
    pub fn source_path(&self) -> PathBuf {
        self.path.join(RESUME_SOURCE)
    }

    pub fn pdf_path(&self) -> PathBuf {
        self.path.join(RESUME_PDF)
    }
}

/// A project rooted at the directory holding `.vitae/`
#[derive(Debug, Clone)]
pub struct ProjectRepository {
    pub root: PathBuf,
}

impl ProjectRepository {
    pub fn new(root: PathBuf) -> Self {
        ProjectRepository { root }
    }

    /// Find the project root: `VITAE_ROOT` first, then walk up from the
    /// current directory
    pub fn discover() -> Result<Self> {
        if let Ok(root_path) = std::env::var(ROOT_ENV) {
            let path = PathBuf::from(root_path);
            if Self::has_project_dir(&path) {
                return Ok(ProjectRepository::new(path));
            }
            return Err(VitaeError::Config(format!(
                "{} is set to '{}' but no {} directory found. \
                Run 'vitae init' in that directory or unset {}.",
                ROOT_ENV,
                path.display(),
                PROJECT_DIR,
                ROOT_ENV
            )));
        }

        let current_dir = std::env::current_dir()?;
        Self::discover_from(&current_dir)
    }

    pub fn discover_from(start: &Path) -> Result<Self> {
        start
            .ancestors()
            .find(|dir| Self::has_project_dir(dir))
            .map(|dir| ProjectRepository::new(dir.to_path_buf()))
            .ok_or_else(|| VitaeError::NotVitaeProject(start.to_path_buf()))
    }

    fn has_project_dir(path: &Path) -> bool {
        path.join(PROJECT_DIR).is_dir()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_initialized(&self) -> bool {
        Self::has_project_dir(&self.root)
    }

    /// Create `.vitae/` with a default config plus the shared and
    /// applications directories
    pub fn initialize(&self) -> Result<Config> {
        if self.is_initialized() {
            return Err(VitaeError::Config(format!(
                "Directory already initialized: {}",
                self.root.display()
            )));
        }

        fs::create_dir_all(self.root.join(PROJECT_DIR))?;
        let config = Config::new();
        self.save_config(&config)?;

        fs::create_dir_all(self.root.join(&config.shared_dir))?;
        fs::create_dir_all(self.root.join(&config.applications_dir))?;
        Ok(config)
    }

    pub fn load_config(&self) -> Result<Config> {
        Config::load_from_dir(&self.root)
    }

    pub fn save_config(&self, config: &Config) -> Result<()> {
        config.save_to_dir(&self.root)
    }

    pub fn shared_dir(&self, config: &Config) -> PathBuf {
        self.root.join(&config.shared_dir)
    }

    pub fn applications_dir(&self, config: &Config) -> PathBuf {
        self.root.join(&config.applications_dir)
    }

    /// Every application directory, sorted by name
    pub fn applications(&self, config: &Config) -> Result<Vec<Application>> {
        let dir = self.applications_dir(config);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut applications = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                VitaeError::Config(format!("Failed to read {}: {}", dir.display(), e))
            })?;
            if !entry.file_type().is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            applications.push(Application {
                name: name.to_string(),
                path: entry.path().to_path_buf(),
            });
        }

        Ok(applications)
    }

    /// Applications whose name starts with `term`, ignoring case and
    /// surrounding whitespace
    pub fn find_resumes(&self, config: &Config, term: &str) -> Result<Vec<Application>> {
        let needle = term.trim().to_lowercase();
        let found: Vec<Application> = self
            .applications(config)?
            .into_iter()
            .filter(|app| app.name.to_lowercase().starts_with(&needle))
            .collect();

        tracing::debug!(
            term,
            matches = ?found.iter().map(|a| a.name.as_str()).collect::<Vec<_>>(),
            "Searched for resume"
        );
        Ok(found)
    }

    /// The single application selected by `term`; an exact name beats
    /// longer prefix matches
    pub fn locate(&self, config: &Config, term: &str) -> Result<Application> {
        let mut found = self.find_resumes(config, term)?;

        match found.len() {
            0 => Err(VitaeError::ResumeNotFound(term.to_string())),
            1 => Ok(found.remove(0)),
            _ => {
                let needle = term.trim().to_lowercase();
                if let Some(index) = found.iter().position(|a| a.name.to_lowercase() == needle) {
                    return Ok(found.swap_remove(index));
                }
                Err(VitaeError::AmbiguousResume {
                    term: term.to_string(),
                    candidates: found.into_iter().map(|a| a.name).collect(),
                })
            }
        }
    }

    /// Application whose directory contains `dir`
    pub fn application_containing(&self, config: &Config, dir: &Path) -> Result<Application> {
        let applications_dir = self.applications_dir(config);
        let canonical_apps = fs::canonicalize(&applications_dir)?;
        let canonical_dir = fs::canonicalize(dir)?;

        let name = canonical_dir
            .strip_prefix(&canonical_apps)
            .ok()
            .and_then(|rel| rel.components().next())
            .and_then(|c| c.as_os_str().to_str())
            .ok_or_else(|| VitaeError::ResumeNotFound(dir.display().to_string()))?;

        Ok(Application {
            name: name.to_string(),
            path: applications_dir.join(name),
        })
    }

    /// Application named exactly `name`, creating its directory if needed
    pub fn create_application(&self, config: &Config, name: &str) -> Result<Application> {
        let name = name.trim();
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(VitaeError::Config(format!(
                "Invalid application name: '{}'",
                name
            )));
        }

        let path = self.applications_dir(config).join(name);
        if !path.exists() {
            tracing::info!("Creating application directory {}", path.display());
            fs::create_dir_all(&path)?;
        }

        Ok(Application {
            name: name.to_string(),
            path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project() -> (TempDir, ProjectRepository, Config) {
        let temp = TempDir::new().unwrap();
        let repo = ProjectRepository::new(temp.path().to_path_buf());
        let config = repo.initialize().unwrap();
        (temp, repo, config)
    }

    #[test]
    fn test_initialize_creates_layout() {
        let (temp, repo, _) = project();
        assert!(repo.is_initialized());
        assert!(temp.path().join(".vitae/config.toml").is_file());
        assert!(temp.path().join("shared").is_dir());
        assert!(temp.path().join("applications").is_dir());
    }

    #[test]
    fn test_initialize_twice_fails() {
        let (_temp, repo, _) = project();
        assert!(matches!(repo.initialize(), Err(VitaeError::Config(_))));
    }

    #[test]
    fn test_discover_from_subdirectory() {
        let (temp, _, _) = project();
        let subdir = temp.path().join("applications").join("acme").join("deep");
        fs::create_dir_all(&subdir).unwrap();

        let repo = ProjectRepository::discover_from(&subdir).unwrap();
        assert_eq!(repo.root, temp.path());
    }

    #[test]
    fn test_discover_fails_outside_project() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            ProjectRepository::discover_from(temp.path()),
            Err(VitaeError::NotVitaeProject(_))
        ));
    }

    #[test]
    fn test_find_resumes_by_prefix() {
        let (_temp, repo, config) = project();
        for name in ["Acme-Backend", "acme-frontend", "Globex"] {
            repo.create_application(&config, name).unwrap();
        }

        let names = |term: &str| -> Vec<String> {
            repo.find_resumes(&config, term)
                .unwrap()
                .into_iter()
                .map(|a| a.name)
                .collect()
        };
        assert_eq!(names("acme"), vec!["Acme-Backend", "acme-frontend"]);
        assert_eq!(names("  GLO "), vec!["Globex"]);
        assert!(names("initech").is_empty());
    }

    #[test]
    fn test_locate() {
        let (_temp, repo, config) = project();
        for name in ["acme", "acme-frontend", "globex"] {
            repo.create_application(&config, name).unwrap();
        }

        assert_eq!(repo.locate(&config, "glo").unwrap().name, "globex");
        assert_eq!(repo.locate(&config, "ACME").unwrap().name, "acme");
        assert!(matches!(
            repo.locate(&config, "ac"),
            Err(VitaeError::AmbiguousResume { candidates, .. }) if candidates.len() == 2
        ));
        assert!(matches!(
            repo.locate(&config, "initech"),
            Err(VitaeError::ResumeNotFound(_))
        ));
    }

    #[test]
    fn test_applications_skip_files() {
        let (temp, repo, config) = project();
        repo.create_application(&config, "acme").unwrap();
        fs::write(temp.path().join("applications/notes.txt"), "x").unwrap();

        let apps = repo.applications(&config).unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].source_path(), temp.path().join("applications/acme/resume.tex"));
    }

    #[test]
    fn test_application_containing() {
        let (temp, repo, config) = project();
        repo.create_application(&config, "acme").unwrap();
        let nested = temp.path().join("applications/acme/build");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(repo.application_containing(&config, &nested).unwrap().name, "acme");
        assert!(matches!(
            repo.application_containing(&config, temp.path()),
            Err(VitaeError::ResumeNotFound(_))
        ));
    }

    #[test]
    fn test_create_application_rejects_paths() {
        let (_temp, repo, config) = project();
        assert!(repo.create_application(&config, "a/b").is_err());
        assert!(repo.create_application(&config, "  ").is_err());
    }
}
