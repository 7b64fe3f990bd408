//! Tag registry - maps YAML tag names to their resolution
//!
//! Exact tag names (`include`, style tags, bare record tags) take precedence
//! over the prefix families `resume-`, `tex-` and `items-`. Every `register_*`
//! call replaces an earlier registration of the same name.

use crate::domain::format::FormatTemplate;
use crate::domain::listitems::ListVariant;
use crate::domain::node::{Mapping, Node};
use crate::domain::schema::{Record, RecordKind, SchemaRegistry};
use crate::error::{Result, VitaeError};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub const INCLUDE_TAG: &str = "include";
pub const RESUME_PREFIX: &str = "resume-";
pub const TEX_PREFIX: &str = "tex-";
pub const ITEMS_PREFIX: &str = "items-";

/// Builds a record from a resolved node
pub type RecordProcessor = Arc<dyn Fn(&SchemaRegistry, Node) -> Result<Record> + Send + Sync>;

/// What to do with a tagged node
pub enum TagAction<'a> {
    Include,
    Style(&'a str),
    Record(&'a RecordProcessor),
    Tex(&'a str),
    List(&'a ListVariant),
}

impl fmt::Debug for TagAction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagAction::Include => f.write_str("Include"),
            TagAction::Style(wrapper) => f.debug_tuple("Style").field(wrapper).finish(),
            TagAction::Record(_) => f.write_str("Record(..)"),
            TagAction::Tex(name) => f.debug_tuple("Tex").field(name).finish(),
            TagAction::List(variant) => f.debug_tuple("List").field(&variant.macro_name).finish(),
        }
    }
}

/// Processor that builds the record registered under `kind_tag`
pub fn schema_processor(kind_tag: impl Into<String>) -> RecordProcessor {
    let kind_tag = kind_tag.into();
    Arc::new(move |schemas: &SchemaRegistry, node: Node| match node {
        Node::Mapping(mapping) => schemas.construct(&kind_tag, mapping),
        Node::Null => schemas.construct(&kind_tag, Mapping::new()),
        _ => Err(VitaeError::InvalidTagValue {
            tag: format!("{}{}", RESUME_PREFIX, kind_tag),
            expected: "a mapping",
        }),
    })
}

/// Registry of every custom tag a resolver understands
#[derive(Clone)]
pub struct TagRegistry {
    schemas: SchemaRegistry,
    styles: HashMap<String, String>,
    records: HashMap<String, RecordProcessor>,
    record_tags: HashMap<String, RecordProcessor>,
    lists: HashMap<String, ListVariant>,
}

impl fmt::Debug for TagRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagRegistry")
            .field("schemas", &self.schemas)
            .field("styles", &self.styles)
            .field("records", &self.records.keys().collect::<Vec<_>>())
            .field("record_tags", &self.record_tags.keys().collect::<Vec<_>>())
            .field("lists", &self.lists.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for TagRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TagRegistry {
    /// Registry with no tags besides `include`
    pub fn empty() -> Self {
        TagRegistry {
            schemas: SchemaRegistry::new(),
            styles: HashMap::new(),
            records: HashMap::new(),
            record_tags: HashMap::new(),
            lists: HashMap::new(),
        }
    }

    /// Registry with the built-in styles, record kinds and list variants
    pub fn builtin() -> Self {
        let mut registry = TagRegistry::empty();
        registry.schemas = SchemaRegistry::with_builtin();

        for tag in ["bf", "textbf", "bold"] {
            registry.register_style(tag, r"\textbf{%s}");
        }
        for tag in ["it", "italic", "italics", "emph"] {
            registry.register_style(tag, r"\emph{%s}");
        }

        for kind in RecordKind::ALL {
            registry.register_record(kind.name(), schema_processor(kind.name()));
            if kind != RecordKind::Config {
                registry.register_record_tag(kind.name(), schema_processor(kind.name()));
            }
        }

        for (suffix, variant) in ListVariant::builtin() {
            registry.register_list(suffix, variant);
        }

        registry
    }

    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    pub fn schemas_mut(&mut self) -> &mut SchemaRegistry {
        &mut self.schemas
    }

    /// Register a one-scalar style tag producing `wrapper % scalar`
    pub fn register_style(&mut self, tag: &str, wrapper: &str) -> Option<String> {
        self.styles
            .insert(strip_bang(tag).to_string(), wrapper.to_string())
    }

    /// Register the processor for `!resume-<suffix>`
    pub fn register_record(
        &mut self,
        suffix: &str,
        processor: RecordProcessor,
    ) -> Option<RecordProcessor> {
        self.records.insert(suffix.to_string(), processor)
    }

    /// Register an exact record tag such as `!position`
    pub fn register_record_tag(
        &mut self,
        tag: &str,
        processor: RecordProcessor,
    ) -> Option<RecordProcessor> {
        self.record_tags
            .insert(strip_bang(tag).to_string(), processor)
    }

    /// Register the list variant for `!items-<suffix>`
    pub fn register_list(&mut self, suffix: &str, variant: ListVariant) -> Option<ListVariant> {
        self.lists.insert(suffix.to_string(), variant)
    }

    /// Decide how to resolve a node carrying `tag` (with or without `!`)
    pub fn lookup<'a>(&'a self, tag: &'a str) -> Result<TagAction<'a>> {
        let tag = strip_bang(tag);
        let unknown = || VitaeError::UnknownTag(tag.to_string());

        if tag == INCLUDE_TAG {
            return Ok(TagAction::Include);
        }
        if let Some(wrapper) = self.styles.get(tag) {
            return Ok(TagAction::Style(wrapper));
        }
        if let Some(processor) = self.record_tags.get(tag) {
            return Ok(TagAction::Record(processor));
        }

        if let Some(suffix) = tag.strip_prefix(RESUME_PREFIX) {
            return self
                .records
                .get(suffix)
                .map(TagAction::Record)
                .ok_or_else(unknown);
        }
        if let Some(suffix) = tag.strip_prefix(TEX_PREFIX) {
            if suffix.is_empty() {
                return Err(unknown());
            }
            return Ok(TagAction::Tex(suffix));
        }
        if let Some(suffix) = tag.strip_prefix(ITEMS_PREFIX) {
            return self.lists.get(suffix).map(TagAction::List).ok_or_else(unknown);
        }

        Err(unknown())
    }
}

fn strip_bang(tag: &str) -> &str {
    tag.strip_prefix('!').unwrap_or(tag)
}

/// Apply a style wrapper to one scalar
pub fn apply_style(wrapper: &str, scalar: &str) -> Result<String> {
    FormatTemplate::percent(wrapper)?.render(None, &[scalar.to_string()])
}

/// Build `\name{arg}{arg}...`
pub fn tex_macro(name: &str, args: &[Node]) -> String {
    let mut output = format!("\\{}", name);
    for arg in args {
        output.push('{');
        output.push_str(&arg.to_string());
        output.push('}');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_tags_registered() {
        let registry = TagRegistry::builtin();
        for tag in ["bf", "textbf", "bold"] {
            assert!(matches!(
                registry.lookup(tag).unwrap(),
                TagAction::Style(w) if w == r"\textbf{%s}"
            ));
        }
        for tag in ["!it", "italic", "italics", "emph"] {
            assert!(matches!(
                registry.lookup(tag).unwrap(),
                TagAction::Style(w) if w == r"\emph{%s}"
            ));
        }
    }

    #[test]
    fn test_apply_style() {
        assert_eq!(apply_style(r"\textbf{%s}", "hello").unwrap(), r"\textbf{hello}");
    }

    #[test]
    fn test_prefix_dispatch() {
        let registry = TagRegistry::builtin();
        assert!(matches!(registry.lookup("include").unwrap(), TagAction::Include));
        assert!(matches!(
            registry.lookup("tex-cventry").unwrap(),
            TagAction::Tex("cventry")
        ));
        assert!(matches!(
            registry.lookup("items-double").unwrap(),
            TagAction::List(v) if v.macro_name == "cvlistdoubleitem"
        ));
        assert!(matches!(
            registry.lookup("resume-position").unwrap(),
            TagAction::Record(_)
        ));
        assert!(matches!(
            registry.lookup("position").unwrap(),
            TagAction::Record(_)
        ));
    }

    #[test]
    fn test_unknown_suffixes() {
        let registry = TagRegistry::builtin();
        for tag in ["items-triple", "resume-nope", "tex-", "mystery"] {
            assert!(
                matches!(registry.lookup(tag), Err(VitaeError::UnknownTag(t)) if t == tag),
                "{}",
                tag
            );
        }
    }

    #[test]
    fn test_exact_tags_win_over_prefixes() {
        let mut registry = TagRegistry::builtin();
        registry.register_style("tex-custom", r"\custom{%s}");
        assert!(matches!(
            registry.lookup("tex-custom").unwrap(),
            TagAction::Style(_)
        ));
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = TagRegistry::builtin();
        let previous = registry.register_style("!bf", r"\strong{%s}");
        assert_eq!(previous.as_deref(), Some(r"\textbf{%s}"));
        assert!(matches!(
            registry.lookup("bf").unwrap(),
            TagAction::Style(w) if w == r"\strong{%s}"
        ));
    }

    #[test]
    fn test_tex_macro() {
        assert_eq!(
            tex_macro("cventry", &["2020".into(), Node::Null, "Acme".into()]),
            r"\cventry{2020}{}{Acme}"
        );
        assert_eq!(tex_macro("newpage", &[]), r"\newpage");
    }

    #[test]
    fn test_schema_processor_rejects_scalars() {
        let registry = TagRegistry::builtin();
        let processor = schema_processor("theme");
        assert!(matches!(
            (*processor)(registry.schemas(), "blue".into()),
            Err(VitaeError::InvalidTagValue { .. })
        ));
    }
}
