//! Project configuration

use crate::error::{Result, VitaeError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Directory marking a project root
pub const PROJECT_DIR: &str = ".vitae";
pub const CONFIG_FILE: &str = "config.toml";

const DEFAULT_COMPILER: &str = "pdflatex -halt-on-error";
const DEFAULT_VIEWER: &str = "zathura";
const DEFAULT_TEMPLATE: &str = "resume";
const DEFAULT_SHARED_DIR: &str = "shared";
const DEFAULT_APPLICATIONS_DIR: &str = "applications";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_compiler")]
    pub compiler: String,
    #[serde(default = "default_viewer")]
    pub viewer: String,
    #[serde(default = "default_editor")]
    pub editor: String,
    /// Name of the resume config and of its `.tex.j2` template
    #[serde(default = "default_template")]
    pub template: String,
    #[serde(default = "default_shared_dir")]
    pub shared_dir: String,
    #[serde(default = "default_applications_dir")]
    pub applications_dir: String,
    pub created: DateTime<Utc>,
}

fn default_compiler() -> String {
    DEFAULT_COMPILER.to_string()
}

fn default_viewer() -> String {
    DEFAULT_VIEWER.to_string()
}

fn default_editor() -> String {
    Config::detect_default_editor()
}

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

fn default_shared_dir() -> String {
    DEFAULT_SHARED_DIR.to_string()
}

fn default_applications_dir() -> String {
    DEFAULT_APPLICATIONS_DIR.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Config {
            compiler: default_compiler(),
            viewer: default_viewer(),
            editor: default_editor(),
            template: default_template(),
            shared_dir: default_shared_dir(),
            applications_dir: default_applications_dir(),
            created: Utc::now(),
        }
    }

    /// Load config from .vitae/config.toml in the given directory
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = path.join(PROJECT_DIR).join(CONFIG_FILE);

        let contents = fs::read_to_string(&config_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                VitaeError::NotVitaeProject(path.to_path_buf())
            } else {
                VitaeError::Io(e)
            }
        })?;

        toml::from_str(&contents)
            .map_err(|e| VitaeError::Config(format!("Failed to parse {}: {}", CONFIG_FILE, e)))
    }

    /// Save config to .vitae/config.toml in the given directory
    pub fn save_to_dir(&self, path: &Path) -> Result<()> {
        let project_dir = path.join(PROJECT_DIR);
        if !project_dir.exists() {
            fs::create_dir(&project_dir)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(project_dir.join(CONFIG_FILE), contents)?;
        Ok(())
    }

    /// Editor command; `$EDITOR` and `$VISUAL` override the stored value
    pub fn get_editor(&self) -> String {
        std::env::var("EDITOR")
            .or_else(|_| std::env::var("VISUAL"))
            .unwrap_or_else(|_| self.editor.clone())
    }

    fn detect_default_editor() -> String {
        std::env::var("EDITOR")
            .or_else(|_| std::env::var("VISUAL"))
            .unwrap_or_else(|_| "vi".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_config_defaults() {
        let config = Config::new();
        assert_eq!(config.compiler, "pdflatex -halt-on-error");
        assert_eq!(config.viewer, "zathura");
        assert_eq!(config.template, "resume");
        assert_eq!(config.shared_dir, "shared");
        assert_eq!(config.applications_dir, "applications");
        assert!(!config.editor.is_empty());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp = TempDir::new().unwrap();
        let mut config = Config::new();
        config.compiler = "true".to_string();

        config.save_to_dir(temp.path()).unwrap();
        assert!(temp.path().join(".vitae/config.toml").exists());

        let loaded = Config::load_from_dir(temp.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".vitae")).unwrap();
        fs::write(
            temp.path().join(".vitae/config.toml"),
            "viewer = \"evince\"\ncreated = \"2024-01-01T00:00:00Z\"\n",
        )
        .unwrap();

        let loaded = Config::load_from_dir(temp.path()).unwrap();
        assert_eq!(loaded.viewer, "evince");
        assert_eq!(loaded.compiler, "pdflatex -halt-on-error");
    }

    #[test]
    fn test_load_missing_config() {
        let temp = TempDir::new().unwrap();
        match Config::load_from_dir(temp.path()).unwrap_err() {
            VitaeError::NotVitaeProject(_) => {}
            other => panic!("Expected NotVitaeProject error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_config_reported() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".vitae")).unwrap();
        fs::write(temp.path().join(".vitae/config.toml"), "compiler = [").unwrap();

        assert!(matches!(
            Config::load_from_dir(temp.path()),
            Err(VitaeError::Config(_))
        ));
    }
}
