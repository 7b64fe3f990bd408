//! Error types for vitae

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for vitae
#[derive(Debug, Error)]
pub enum VitaeError {
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Unknown tag: !{0}")]
    UnknownTag(String),

    #[error("No item template for '{macro_name}' matched item {item}")]
    UnresolvedItem { macro_name: String, item: String },

    #[error("No config file named '{name}' found in {}", format_dirs(.searched))]
    ConfigNotFound { name: String, searched: Vec<PathBuf> },

    #[error("Unknown format style: '{0}'")]
    UnknownStyle(String),

    #[error("Format key not found: '{0}'")]
    FormatKey(String),

    #[error("Invalid format string: {0}")]
    Format(String),

    #[error("Tag !{tag} expects {expected}")]
    InvalidTagValue { tag: String, expected: &'static str },

    #[error("Document nesting exceeds {0} levels")]
    NestingTooDeep(usize),

    #[error("Include cycle detected at {}", .0.display())]
    IncludeCycle(PathBuf),

    #[error("Failed to load {}: {source}", .path.display())]
    DocumentLoad {
        path: PathBuf,
        #[source]
        source: Box<VitaeError>,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Not a vitae project: {}", .0.display())]
    NotVitaeProject(PathBuf),

    #[error("Could not find resume '{0}'")]
    ResumeNotFound(String),

    #[error("Resume search term '{term}' is ambiguous: {}", .candidates.join(", "))]
    AmbiguousResume {
        term: String,
        candidates: Vec<String>,
    },

    #[error("Build of {} failed with exit code {code}", .path.display())]
    BuildFailed { path: PathBuf, code: i32 },

    #[error("Failed to launch '{program}': {reason}")]
    Launch { program: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

fn format_dirs(dirs: &[PathBuf]) -> String {
    dirs.iter()
        .map(|d| d.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl VitaeError {
    /// Get the exit code contributed by this error
    pub fn exit_code(&self) -> i32 {
        match self {
            VitaeError::AmbiguousResume { .. } => 1,
            VitaeError::ResumeNotFound(_) => 8,
            VitaeError::BuildFailed { .. } => 16,
            _ => 64,
        }
    }

    /// Wrap this error with the path of the document whose load it aborted.
    /// Already wrapped errors keep their innermost path.
    pub fn in_document(self, path: impl Into<PathBuf>) -> Self {
        match self {
            err @ VitaeError::DocumentLoad { .. } => err,
            err => VitaeError::DocumentLoad {
                path: path.into(),
                source: Box::new(err),
            },
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            VitaeError::NotVitaeProject(path) => {
                format!(
                    "Not a vitae project: {}\n\n\
                    Suggestions:\n\
                    • Run 'vitae init' in this directory to create a new project\n\
                    • Navigate to an existing vitae project\n\
                    • Set VITAE_ROOT environment variable to your project path",
                    path.display()
                )
            }
            VitaeError::ResumeNotFound(name) => {
                format!(
                    "Could not find resume '{}'\n\n\
                    Suggestions:\n\
                    • Resume names are matched by prefix (case-insensitive)\n\
                    • Run 'vitae add {}' to create it",
                    name, name
                )
            }
            VitaeError::AmbiguousResume { term, candidates } => {
                format!(
                    "Resume search term '{}' is ambiguous\n\n\
                    Matching resumes:\n{}\n\n\
                    Use a longer prefix to select one of them",
                    term,
                    candidates
                        .iter()
                        .map(|c| format!("• {}", c))
                        .collect::<Vec<_>>()
                        .join("\n")
                )
            }
            VitaeError::ConfigNotFound { name, .. } => {
                format!(
                    "{}\n\n\
                    Suggestions:\n\
                    • Create {}.yaml next to the document or in the shared directory\n\
                    • Check the spelling of the !include target (names are case-sensitive)",
                    self, name
                )
            }
            VitaeError::Launch { .. } => {
                format!(
                    "{}\n\n\
                    Suggestions:\n\
                    • Check that the program is installed and in PATH\n\
                    • Configure it: vitae config compiler 'pdflatex -halt-on-error'\n\
                    • Set EDITOR environment variable for 'vitae edit'",
                    self
                )
            }
            VitaeError::DocumentLoad { source, .. } => match source.as_ref() {
                VitaeError::UnknownTag(_) => format!(
                    "{}\n\n\
                    Known tags: !include, !bf, !it, !emph, !resume-<kind>, !tex-<macro>, \
                    !items-<single|double|computer|line>",
                    self
                ),
                _ => self.to_string(),
            },
            _ => self.to_string(),
        }
    }
}

/// Result type using VitaeError
pub type Result<T> = std::result::Result<T, VitaeError>;
