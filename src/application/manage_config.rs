//! Config management use case

use crate::error::{Result, VitaeError};
use crate::infrastructure::{Config, ProjectRepository};

/// Keys accepted by `vitae config`
pub const CONFIG_KEYS: [&str; 7] = [
    "compiler",
    "viewer",
    "editor",
    "template",
    "shared_dir",
    "applications_dir",
    "created",
];

/// Service for managing project configuration
pub struct ConfigService {
    repository: ProjectRepository,
}

impl ConfigService {
    pub fn new(repository: ProjectRepository) -> Self {
        ConfigService { repository }
    }

    /// Get a single config value
    pub fn get(&self, key: &str) -> Result<String> {
        let config = self.repository.load_config()?;
        config_value(&config, key)
    }

    /// Set a config value
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut config = self.repository.load_config()?;

        let field = match key {
            "compiler" => &mut config.compiler,
            "viewer" => &mut config.viewer,
            "editor" => &mut config.editor,
            "template" => &mut config.template,
            "shared_dir" => &mut config.shared_dir,
            "applications_dir" => &mut config.applications_dir,
            "created" => {
                return Err(VitaeError::Config(
                    "Cannot modify 'created' field (read-only)".to_string(),
                ));
            }
            _ => return Err(unknown_key(key)),
        };

        if value.trim().is_empty() {
            return Err(VitaeError::Config(format!("Value for '{}' cannot be empty", key)));
        }
        *field = value.to_string();

        self.repository.save_config(&config)?;
        tracing::debug!(key, value, "Updated config");
        Ok(())
    }

    /// Every key with its value, in display order
    pub fn list(&self) -> Result<Vec<(&'static str, String)>> {
        let config = self.repository.load_config()?;
        CONFIG_KEYS
            .iter()
            .map(|key| Ok((*key, config_value(&config, key)?)))
            .collect()
    }
}

fn config_value(config: &Config, key: &str) -> Result<String> {
    match key {
        "compiler" => Ok(config.compiler.clone()),
        "viewer" => Ok(config.viewer.clone()),
        "editor" => Ok(config.editor.clone()),
        "template" => Ok(config.template.clone()),
        "shared_dir" => Ok(config.shared_dir.clone()),
        "applications_dir" => Ok(config.applications_dir.clone()),
        "created" => Ok(config.created.to_rfc3339()),
        _ => Err(unknown_key(key)),
    }
}

fn unknown_key(key: &str) -> VitaeError {
    VitaeError::Config(format!(
        "Unknown config key: '{}'. Valid keys are: {}",
        key,
        CONFIG_KEYS.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn service() -> (TempDir, ConfigService) {
        let temp = TempDir::new().unwrap();
        let repo = ProjectRepository::new(temp.path().to_path_buf());
        repo.initialize().unwrap();
        (temp, ConfigService::new(repo))
    }

    #[test]
    fn test_get_and_set() {
        let (_temp, service) = service();
        assert_eq!(service.get("viewer").unwrap(), "zathura");

        service.set("viewer", "evince").unwrap();
        assert_eq!(service.get("viewer").unwrap(), "evince");
    }

    #[test]
    fn test_created_is_read_only() {
        let (_temp, service) = service();
        assert!(service.get("created").is_ok());
        assert!(matches!(
            service.set("created", "2020-01-01T00:00:00Z"),
            Err(VitaeError::Config(msg)) if msg.contains("read-only")
        ));
    }

    #[test]
    fn test_unknown_key() {
        let (_temp, service) = service();
        assert!(service.get("mode").is_err());
        assert!(service.set("mode", "daily").is_err());
    }

    #[test]
    fn test_empty_value_rejected() {
        let (_temp, service) = service();
        assert!(service.set("compiler", "  ").is_err());
    }

    #[test]
    fn test_list_covers_every_key() {
        let (_temp, service) = service();
        let keys: Vec<&str> = service.list().unwrap().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, CONFIG_KEYS);
    }
}
