//! Tag resolution - parses YAML and applies every custom tag
//!
//! The resolver walks the parsed YAML value bottom-up: children are resolved
//! before the tag that encloses them, so `!tex-cventry [!bf A, B]` sees the
//! already styled argument. `!include` loads further documents with the same
//! resolver; an include chain may not revisit a file.

use crate::domain::node::{Mapping, Node};
use crate::domain::tags::{apply_style, tex_macro, TagAction, TagRegistry};
use crate::error::{Result, VitaeError};
use crate::infrastructure::search::SearchPath;
use serde::Deserialize;
use serde_yaml::value::TaggedValue;
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum nesting of YAML nodes and includes
pub const MAX_DEPTH: usize = 64;

/// Resolves YAML documents against a tag registry
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    tags: TagRegistry,
    shared_dirs: Vec<PathBuf>,
}

/// Include chain of the document being loaded
#[derive(Debug, Default)]
struct LoadState {
    chain: Vec<PathBuf>,
}

impl Resolver {
    pub fn new(tags: TagRegistry) -> Self {
        Resolver {
            tags,
            shared_dirs: Vec::new(),
        }
    }

    /// Add a directory searched after the document's own directory
    pub fn with_shared_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.shared_dirs.push(dir.into());
        self
    }

    pub fn tags(&self) -> &TagRegistry {
        &self.tags
    }

    pub fn tags_mut(&mut self) -> &mut TagRegistry {
        &mut self.tags
    }

    pub fn shared_dirs(&self) -> &[PathBuf] {
        &self.shared_dirs
    }

    /// Search path used for documents in `document_dir`
    pub fn search_path(&self, document_dir: Option<&Path>) -> SearchPath {
        SearchPath::for_document(document_dir, &self.shared_dirs)
    }

    /// Locate the document `name` as seen from `document_dir` and load it
    pub fn load_named(&self, name: &str, document_dir: Option<&Path>) -> Result<Node> {
        let path = self.search_path(document_dir).find(name)?;
        self.load_file(&path)
    }

    /// Load a file, merging its documents the same way `!include` does
    pub fn load_file(&self, path: &Path) -> Result<Node> {
        Ok(merge_documents(self.load_all(path)?))
    }

    /// Load every document of a file
    pub fn load_all(&self, path: &Path) -> Result<Vec<Node>> {
        let mut state = LoadState::default();
        self.load_documents(path, &mut state, 0)
    }

    /// Resolve YAML text; includes are searched from `document_dir`
    pub fn load_str(&self, text: &str, document_dir: Option<&Path>) -> Result<Node> {
        let mut state = LoadState::default();
        let documents = self.parse_documents(text, document_dir, &mut state, 0)?;
        Ok(merge_documents(documents))
    }

    fn load_documents(&self, path: &Path, state: &mut LoadState, depth: usize) -> Result<Vec<Node>> {
        let canonical = fs::canonicalize(path).map_err(|e| VitaeError::from(e).in_document(path))?;
        if state.chain.contains(&canonical) {
            return Err(VitaeError::IncludeCycle(path.to_path_buf()));
        }

        tracing::debug!(path = %path.display(), "Loading document");
        let text = fs::read_to_string(path).map_err(|e| VitaeError::from(e).in_document(path))?;

        state.chain.push(canonical);
        let result = self.parse_documents(&text, path.parent(), state, depth);
        state.chain.pop();

        result.map_err(|e| e.in_document(path))
    }

    fn parse_documents(
        &self,
        text: &str,
        document_dir: Option<&Path>,
        state: &mut LoadState,
        depth: usize,
    ) -> Result<Vec<Node>> {
        let mut documents = Vec::new();
        for document in serde_yaml::Deserializer::from_str(text) {
            let value = Value::deserialize(document)?;
            let scope = Scope {
                document_dir,
                depth,
            };
            documents.push(self.resolve(value, &scope, state, 0)?);
        }
        Ok(documents)
    }

    fn resolve(&self, value: Value, scope: &Scope<'_>, state: &mut LoadState, depth: usize) -> Result<Node> {
        if depth > MAX_DEPTH {
            return Err(VitaeError::NestingTooDeep(MAX_DEPTH));
        }

        match value {
            Value::Null => Ok(Node::Null),
            Value::Bool(b) => Ok(Node::Bool(b)),
            Value::Number(n) => Ok(Node::Number(n)),
            Value::String(s) => Ok(Node::String(s)),
            Value::Sequence(values) => values
                .into_iter()
                .map(|v| self.resolve(v, scope, state, depth + 1))
                .collect::<Result<Vec<_>>>()
                .map(Node::Sequence),
            Value::Mapping(values) => {
                let mut mapping = Mapping::new();
                for (key, value) in values {
                    let key = mapping_key(key)?;
                    mapping.insert(key, self.resolve(value, scope, state, depth + 1)?);
                }
                Ok(Node::Mapping(mapping))
            }
            Value::Tagged(tagged) => self.resolve_tagged(*tagged, scope, state, depth),
        }
    }

    fn resolve_tagged(
        &self,
        tagged: TaggedValue,
        scope: &Scope<'_>,
        state: &mut LoadState,
        depth: usize,
    ) -> Result<Node> {
        let tag = tagged.tag.to_string();
        let tag = tag.strip_prefix('!').unwrap_or(&tag);

        match self.tags.lookup(tag)? {
            TagAction::Include => {
                let name = scalar_text(tag, tagged.value)?;
                self.include(&name, scope, state)
            }
            TagAction::Style(wrapper) => {
                let text = scalar_text(tag, tagged.value)?;
                apply_style(wrapper, &text).map(Node::String)
            }
            TagAction::Tex(name) => {
                let args = match self.resolve(tagged.value, scope, state, depth + 1)? {
                    Node::Sequence(args) => args,
                    Node::Null => Vec::new(),
                    Node::Mapping(_) | Node::Record(_) => {
                        return Err(VitaeError::InvalidTagValue {
                            tag: tag.to_string(),
                            expected: "a scalar or a sequence",
                        })
                    }
                    scalar => vec![scalar],
                };
                Ok(Node::String(tex_macro(name, &args)))
            }
            TagAction::List(variant) => {
                let items = match self.resolve(tagged.value, scope, state, depth + 1)? {
                    Node::Sequence(items) => items,
                    Node::Null => Vec::new(),
                    _ => {
                        return Err(VitaeError::InvalidTagValue {
                            tag: tag.to_string(),
                            expected: "a sequence",
                        })
                    }
                };
                let lines = variant.format(items)?;
                Ok(Node::Sequence(lines.into_iter().map(Node::String).collect()))
            }
            TagAction::Record(processor) => {
                let node = self.resolve(tagged.value, scope, state, depth + 1)?;
                (*processor)(self.tags.schemas(), node).map(Node::Record)
            }
        }
    }

    fn include(&self, name: &str, scope: &Scope<'_>, state: &mut LoadState) -> Result<Node> {
        let path = self.search_path(scope.document_dir).find(name)?;
        tracing::debug!(name, path = %path.display(), "Resolved include");

        let depth = scope.depth + 1;
        if depth > MAX_DEPTH {
            return Err(VitaeError::NestingTooDeep(MAX_DEPTH));
        }
        let documents = self.load_documents(&path, state, depth)?;
        Ok(merge_documents(documents))
    }
}

/// Directory of the document being resolved and its include depth
struct Scope<'a> {
    document_dir: Option<&'a Path>,
    depth: usize,
}

/// One document is substituted as is; several sequences are concatenated in
/// file order; anything else becomes a sequence of documents.
pub fn merge_documents(mut documents: Vec<Node>) -> Node {
    if documents.len() == 1 {
        return documents.remove(0);
    }

    if documents.iter().all(|d| matches!(d, Node::Sequence(_))) {
        let items = documents
            .into_iter()
            .flat_map(|d| match d {
                Node::Sequence(items) => items,
                _ => Vec::new(),
            })
            .collect();
        return Node::Sequence(items);
    }

    Node::Sequence(documents)
}

fn scalar_text(tag: &str, value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Null => Ok(String::new()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(VitaeError::InvalidTagValue {
            tag: tag.to_string(),
            expected: "a scalar",
        }),
    }
}

fn mapping_key(key: Value) -> Result<String> {
    match key {
        Value::String(s) => Ok(s),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok("null".to_string()),
        other => Err(VitaeError::Schema(format!(
            "mapping keys must be scalars, got {:?}",
            other
        ))),
    }
}
