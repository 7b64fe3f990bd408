//! Config file lookup along an ordered search path

use crate::error::{Result, VitaeError};
use glob::{glob_with, MatchOptions, Pattern};
use std::path::{Path, PathBuf};

/// Extensions of config documents
const EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// Ordered list of directories searched for `<name>.yaml` / `<name>.yml`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        let mut search = SearchPath { dirs: Vec::new() };
        for dir in dirs {
            search.push(dir);
        }
        search
    }

    /// Search path of a document: its own directory first, then the shared ones
    pub fn for_document(document_dir: Option<&Path>, shared_dirs: &[PathBuf]) -> Self {
        let dirs = document_dir
            .map(Path::to_path_buf)
            .into_iter()
            .chain(shared_dirs.iter().cloned())
            .collect();
        SearchPath::new(dirs)
    }

    /// Append a directory unless it is already searched
    pub fn push(&mut self, dir: PathBuf) {
        if !self.dirs.contains(&dir) {
            self.dirs.push(dir);
        }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Every file matching `name`, in search order.
    ///
    /// Within one directory, shallower matches come first, then paths sort
    /// lexicographically.
    pub fn find_all(&self, name: &str) -> Result<Vec<PathBuf>> {
        let stem = config_stem(name);
        if stem.is_empty() {
            return Ok(Vec::new());
        }

        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };

        let mut found = Vec::new();
        for dir in &self.dirs {
            let mut matches = Vec::new();
            for extension in EXTENSIONS {
                let pattern = format!(
                    "{}/**/{}.{}",
                    Pattern::escape(&dir.to_string_lossy()),
                    Pattern::escape(stem),
                    extension
                );
                let entries = glob_with(&pattern, options).map_err(|e| {
                    VitaeError::Config(format!("Invalid config name '{}': {}", name, e))
                })?;

                for entry in entries {
                    let path = entry.map_err(|e| VitaeError::Io(e.into_error()))?;
                    if path.is_file() {
                        matches.push(path);
                    }
                }
            }
            matches.sort_by(|a, b| {
                a.components()
                    .count()
                    .cmp(&b.components().count())
                    .then_with(|| a.cmp(b))
            });

            tracing::debug!(dir = %dir.display(), name = stem, count = matches.len(), "Searched for config");
            found.extend(matches);
        }

        Ok(found)
    }

    /// First file matching `name`
    pub fn find(&self, name: &str) -> Result<PathBuf> {
        self.find_all(name)?
            .into_iter()
            .next()
            .ok_or_else(|| VitaeError::ConfigNotFound {
                name: config_stem(name).to_string(),
                searched: self.dirs.clone(),
            })
    }
}

/// Document name without a trailing `.yaml` / `.yml`
pub fn config_stem(name: &str) -> &str {
    let name = name.trim();
    name.strip_suffix(".yaml")
        .or_else(|| name.strip_suffix(".yml"))
        .unwrap_or(name)
}
