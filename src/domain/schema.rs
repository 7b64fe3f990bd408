//! Record kinds and the schema registry
//!
//! Every record kind declares its fields once; records are built from a
//! mapping by checking it against that declaration.

use crate::domain::format::{FormatStyle, FormatTemplate};
use crate::domain::node::{Mapping, Node};
use crate::error::{Result, VitaeError};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Field holding nested records, mappings or formatted lines
pub const ITEMS_FIELD: &str = "items";

/// Closed set of record kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Generic container with only `items`
    Config,
    Theme,
    Address,
    PersonalData,
    Position,
}

impl RecordKind {
    pub const ALL: [RecordKind; 5] = [
        RecordKind::Config,
        RecordKind::Theme,
        RecordKind::Address,
        RecordKind::PersonalData,
        RecordKind::Position,
    ];

    /// Tag name of this kind (without the `resume-` prefix)
    pub fn name(&self) -> &'static str {
        match self {
            RecordKind::Config => "config",
            RecordKind::Theme => "theme",
            RecordKind::Address => "address",
            RecordKind::PersonalData => "personal-data",
            RecordKind::Position => "position",
        }
    }

    /// Built-in field declaration for this kind
    pub fn schema(&self) -> Schema {
        let fields = match self {
            RecordKind::Config => vec![],
            RecordKind::Theme => vec![
                FieldSpec::required("color"),
                FieldSpec::required("style"),
                FieldSpec::optional("font_size", Node::from(10i64)),
            ],
            RecordKind::Address => vec![
                FieldSpec::required("street"),
                FieldSpec::required("city"),
                FieldSpec::required("state"),
                FieldSpec::required("zip"),
            ],
            RecordKind::PersonalData => vec![
                FieldSpec::required("first_name"),
                FieldSpec::required("last_name"),
                FieldSpec::required("desired_title"),
                FieldSpec::required("address").nested(RecordKind::Address),
                FieldSpec::required("mobile"),
                FieldSpec::required("email"),
            ],
            RecordKind::Position => vec![
                FieldSpec::required("start"),
                FieldSpec::required("end"),
                FieldSpec::required("title"),
                FieldSpec::required("company"),
                FieldSpec::required("location"),
                FieldSpec::required("description"),
            ],
        };
        Schema::new(*self, fields)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        RecordKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("Unknown record kind: {}", s))
    }
}

/// Whether a field must be given, and its value when it is not
#[derive(Debug, Clone, PartialEq)]
pub enum FieldDefault {
    Required,
    Value(Node),
}

/// Declaration of one record field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub default: FieldDefault,
    /// Kind a plain mapping in this field is built into
    pub nested: Option<RecordKind>,
}

impl FieldSpec {
    pub fn required(name: impl Into<String>) -> Self {
        FieldSpec {
            name: name.into(),
            default: FieldDefault::Required,
            nested: None,
        }
    }

    pub fn optional(name: impl Into<String>, default: Node) -> Self {
        FieldSpec {
            name: name.into(),
            default: FieldDefault::Value(default),
            nested: None,
        }
    }

    pub fn nested(mut self, kind: RecordKind) -> Self {
        self.nested = Some(kind);
        self
    }
}

/// Field declaration of a record kind
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub kind: RecordKind,
    pub fields: Vec<FieldSpec>,
}

impl Schema {
    /// Create a schema; an optional, empty `items` field is added unless declared
    pub fn new(kind: RecordKind, mut fields: Vec<FieldSpec>) -> Self {
        if !fields.iter().any(|f| f.name == ITEMS_FIELD) {
            fields.push(FieldSpec::optional(ITEMS_FIELD, Node::Sequence(Vec::new())));
        }
        Schema { kind, fields }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A schema-validated record. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    kind: RecordKind,
    fields: Mapping,
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Fields in declaration order, defaults filled in
    pub fn fields(&self) -> &Mapping {
        &self.fields
    }

    pub fn get(&self, field: &str) -> Option<&Node> {
        self.fields.get(field)
    }

    /// Nested items in document order
    pub fn items(&self) -> &[Node] {
        self.fields
            .get(ITEMS_FIELD)
            .and_then(Node::as_sequence)
            .unwrap_or(&[])
    }

    /// Substitute this record's fields into `template`.
    ///
    /// `style` is `"%"`/`"percent"` or `"{}"`/`"brace"`. Positional
    /// placeholders take field values in declaration order.
    ///
    /// # Examples
    ///
    /// ```
    /// use vitae::domain::schema::SchemaRegistry;
    /// use vitae::domain::node::{Mapping, Node};
    ///
    /// let registry = SchemaRegistry::with_builtin();
    /// let mapping: Mapping = [("color", Node::from("blue")), ("style", Node::from("classic"))]
    ///     .into_iter()
    ///     .collect();
    /// let theme = registry.construct("theme", mapping).unwrap();
    /// assert_eq!(theme.format("%(style)s/%(color)s", "%").unwrap(), "classic/blue");
    /// assert_eq!(theme.format("{color} at {font_size}pt", "{}").unwrap(), "blue at 10pt");
    /// ```
    pub fn format(&self, template: &str, style: &str) -> Result<String> {
        let style = FormatStyle::from_str(style)?;
        let template = FormatTemplate::parse(template, style)?;
        if let Some(key) = template.missing_key(&self.fields) {
            return Err(VitaeError::FormatKey(key.to_string()));
        }

        let positional: Vec<String> = self.fields.iter().map(|(_, v)| v.to_string()).collect();
        template.render(Some(&self.fields), &positional)
    }
}

/// Maps kind tags to field declarations.
///
/// Registering a tag that is already present replaces the earlier schema.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Schema>,
}

impl SchemaRegistry {
    /// Empty registry
    pub fn new() -> Self {
        SchemaRegistry {
            schemas: HashMap::new(),
        }
    }

    /// Registry with every built-in kind registered under its name
    pub fn with_builtin() -> Self {
        let mut registry = SchemaRegistry::new();
        for kind in RecordKind::ALL {
            registry.register(kind.name(), kind.schema());
        }
        registry
    }

    /// Register `schema` under `kind_tag`, returning the schema it replaced
    pub fn register(&mut self, kind_tag: impl Into<String>, schema: Schema) -> Option<Schema> {
        self.schemas.insert(kind_tag.into(), schema)
    }

    pub fn get(&self, kind_tag: &str) -> Option<&Schema> {
        self.schemas.get(kind_tag)
    }

    pub fn contains(&self, kind_tag: &str) -> bool {
        self.schemas.contains_key(kind_tag)
    }

    /// Build a record of the kind registered under `kind_tag`
    pub fn construct(&self, kind_tag: &str, mapping: Mapping) -> Result<Record> {
        let schema = self
            .get(kind_tag)
            .ok_or_else(|| VitaeError::UnknownTag(kind_tag.to_string()))?;
        self.build(schema, mapping)
    }

    fn build(&self, schema: &Schema, mut mapping: Mapping) -> Result<Record> {
        if let Some(unknown) = mapping.keys().find(|key| schema.field(key).is_none()) {
            return Err(VitaeError::Schema(format!(
                "unknown field '{}' for {}",
                unknown, schema.kind
            )));
        }

        let mut fields = Mapping::new();
        for spec in &schema.fields {
            let value = match (mapping.remove(&spec.name), &spec.default) {
                (Some(value), _) => value,
                (None, FieldDefault::Value(default)) => default.clone(),
                (None, FieldDefault::Required) => {
                    return Err(VitaeError::Schema(format!(
                        "missing required field '{}' for {}",
                        spec.name, schema.kind
                    )))
                }
            };

            let value = match spec.nested {
                Some(kind) => self.build_nested(schema.kind, &spec.name, kind, value)?,
                None => value,
            };
            fields.insert(spec.name.clone(), value);
        }

        Ok(Record {
            kind: schema.kind,
            fields,
        })
    }

    fn build_nested(
        &self,
        parent: RecordKind,
        field: &str,
        kind: RecordKind,
        value: Node,
    ) -> Result<Node> {
        match value {
            Node::Record(record) if record.kind == kind => Ok(Node::Record(record)),
            Node::Mapping(mapping) => {
                let record = match self.get(kind.name()) {
                    Some(schema) => self.build(schema, mapping)?,
                    None => self.build(&kind.schema(), mapping)?,
                };
                Ok(Node::Record(record))
            }
            other => Err(VitaeError::Schema(format!(
                "field '{}' of {} must be a {} mapping, got {:?}",
                field, parent, kind, other
            ))),
        }
    }
}
