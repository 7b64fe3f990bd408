//! List formatting - turns item sequences into LaTeX macro lines
//!
//! A [`ListVariant`] describes one list construct (plain list, two-column
//! list, skills table, label/value lines). Formatting walks the items in
//! order, renders each into a tuple of macro arguments, groups tuples into
//! batches of `batch_size` and emits one `\macro{..}{..}` line per batch.
//! Nested `items` of a key-value item follow the line of its batch.

use crate::domain::format::FormatTemplate;
use crate::domain::node::{Mapping, Node};
use crate::domain::schema::ITEMS_FIELD;
use crate::error::{Result, VitaeError};

/// Maximum nesting of sub-lists
pub const MAX_LIST_DEPTH: usize = 16;

/// One argument template per macro argument; `None` emits an empty argument
pub type ArgTemplates = Vec<Option<String>>;

/// Parameters of a list construct
#[derive(Debug, Clone, PartialEq)]
pub struct ListVariant {
    /// LaTeX macro emitted for every batch (without backslash)
    pub macro_name: String,
    /// Items combined into one macro invocation
    pub batch_size: usize,
    /// Candidate templates for key-value items, tried in order
    pub kv_templates: Vec<ArgTemplates>,
    /// Template for scalar items
    pub scalar_template: ArgTemplates,
}

fn args(templates: &[Option<&str>]) -> ArgTemplates {
    templates.iter().map(|t| t.map(str::to_string)).collect()
}

impl ListVariant {
    pub fn new(
        macro_name: impl Into<String>,
        batch_size: usize,
        kv_templates: &[&[Option<&str>]],
        scalar_template: &[Option<&str>],
    ) -> Self {
        ListVariant {
            macro_name: macro_name.into(),
            batch_size: batch_size.max(1),
            kv_templates: kv_templates.iter().map(|t| args(t)).collect(),
            scalar_template: args(scalar_template),
        }
    }

    /// `\cvlistitem{title: description}`, one item per line
    pub fn single() -> Self {
        ListVariant::new(
            "cvlistitem",
            1,
            &[
                &[Some("%(title)s: %(description)s")],
                &[Some("%(title)s")],
            ],
            &[Some("%s")],
        )
    }

    /// `\cvlistdoubleitem{..}{..}`, two items per line
    pub fn double() -> Self {
        ListVariant::new(
            "cvlistdoubleitem",
            2,
            &[
                &[Some("%(title)s: %(description)s")],
                &[Some("%(title)s")],
            ],
            &[Some("%s")],
        )
    }

    /// `\cvcomputer{title}{description}{title}{description}`
    pub fn computer() -> Self {
        ListVariant::new(
            "cvcomputer",
            2,
            &[&[Some("%(title)s"), Some("%(description)s")]],
            &[None, Some("%s")],
        )
    }

    /// `\cvline{title}{description}`
    pub fn line() -> Self {
        ListVariant::new(
            "cvline",
            1,
            &[
                &[Some("%(title)s"), Some("%(description)s")],
                &[Some("%(title)s"), None],
            ],
            &[Some("%s"), None],
        )
    }

    /// Built-in variants with their `items-*` suffixes
    pub fn builtin() -> Vec<(&'static str, ListVariant)> {
        vec![
            ("single", ListVariant::single()),
            ("double", ListVariant::double()),
            ("computer", ListVariant::computer()),
            ("line", ListVariant::line()),
        ]
    }

    /// Format `items` into macro lines
    pub fn format(&self, items: Vec<Node>) -> Result<Vec<String>> {
        ListFormatter::compile(self)?.format(items, 0)
    }
}

/// Compiled argument templates plus the keys they need
struct Candidate {
    args: Vec<Option<FormatTemplate>>,
}

impl Candidate {
    fn compile(templates: &ArgTemplates) -> Result<Self> {
        let args = templates
            .iter()
            .map(|t| t.as_deref().map(FormatTemplate::percent).transpose())
            .collect::<Result<Vec<_>>>()?;
        Ok(Candidate { args })
    }

    fn keys(&self) -> impl Iterator<Item = &str> {
        self.args.iter().flatten().flat_map(|t| t.keys())
    }

    fn arity(&self) -> usize {
        self.args.len()
    }
}

/// A variant with its templates compiled, ready to format sequences
struct ListFormatter<'v> {
    variant: &'v ListVariant,
    kv: Vec<Candidate>,
    scalar: Candidate,
}

/// State of one formatting pass
struct Pass {
    depth: usize,
    lines: Vec<String>,
    batch: Vec<Vec<String>>,
    subitems: Vec<Node>,
}

impl<'v> ListFormatter<'v> {
    fn compile(variant: &'v ListVariant) -> Result<Self> {
        let kv = variant
            .kv_templates
            .iter()
            .map(Candidate::compile)
            .collect::<Result<Vec<_>>>()?;
        let scalar = Candidate::compile(&variant.scalar_template)?;

        let consuming = scalar
            .args
            .iter()
            .flatten()
            .map(FormatTemplate::positional_count)
            .sum::<usize>();
        if consuming > 1 {
            return Err(VitaeError::Format(format!(
                "scalar template of '{}' consumes the item more than once",
                variant.macro_name
            )));
        }

        Ok(ListFormatter { variant, kv, scalar })
    }

    fn batch_size(&self) -> usize {
        self.variant.batch_size.max(1)
    }

    fn format(&self, items: Vec<Node>, depth: usize) -> Result<Vec<String>> {
        if depth > MAX_LIST_DEPTH {
            return Err(VitaeError::NestingTooDeep(MAX_LIST_DEPTH));
        }

        let mut pass = Pass {
            depth,
            lines: Vec::new(),
            batch: Vec::new(),
            subitems: Vec::new(),
        };
        for item in items {
            self.process_item(&mut pass, item)?;
        }

        if !pass.batch.is_empty() {
            while pass.batch.len() < self.batch_size() {
                pass.batch.push(self.empty_args());
            }
        }
        self.flush(&mut pass)?;

        Ok(pass.lines)
    }

    fn process_item(&self, pass: &mut Pass, item: Node) -> Result<()> {
        match &item {
            Node::Null => self.push(pass, self.empty_args()),
            Node::Mapping(mapping) => self.process_kv(pass, mapping),
            Node::Record(record) => self.process_kv(pass, record.fields()),
            scalar => {
                let value = [scalar.to_string()];
                let args = self
                    .scalar
                    .args
                    .iter()
                    .map(|slot| match slot {
                        Some(template) => template.render(None, &value),
                        None => Ok(String::new()),
                    })
                    .collect::<Result<Vec<_>>>()?;
                self.push(pass, args)
            }
        }
    }

    fn process_kv(&self, pass: &mut Pass, mapping: &Mapping) -> Result<()> {
        let candidate = self
            .kv
            .iter()
            .find(|c| c.keys().all(|key| mapping.contains_key(key)))
            .ok_or_else(|| VitaeError::UnresolvedItem {
                macro_name: self.variant.macro_name.clone(),
                item: mapping.to_string(),
            })?;

        let args = candidate
            .args
            .iter()
            .map(|slot| match slot {
                Some(template) => template.render(Some(mapping), &[]),
                None => Ok(String::new()),
            })
            .collect::<Result<Vec<_>>>()?;
        self.push(pass, args)?;

        match mapping.get(ITEMS_FIELD) {
            Some(Node::Sequence(subitems)) => pass.subitems.extend(subitems.iter().cloned()),
            Some(Node::Null) | None => {}
            Some(other) => pass.subitems.push(other.clone()),
        }
        Ok(())
    }

    fn empty_args(&self) -> Vec<String> {
        vec![String::new(); self.scalar.arity()]
    }

    fn push(&self, pass: &mut Pass, args: Vec<String>) -> Result<()> {
        if pass.batch.len() >= self.batch_size() {
            self.flush(pass)?;
        }
        pass.batch.push(args);
        Ok(())
    }

    fn flush(&self, pass: &mut Pass) -> Result<()> {
        if pass.batch.is_empty() {
            return Ok(());
        }

        let mut line = format!("\\{}", self.variant.macro_name);
        for arg in pass.batch.drain(..).flatten() {
            line.push('{');
            line.push_str(&arg);
            line.push('}');
        }
        pass.lines.push(line);

        let subitems = std::mem::take(&mut pass.subitems);
        let sublines = self.expand_subitems(subitems, pass.depth)?;
        pass.lines.extend(sublines);
        Ok(())
    }

    /// Scalars are already-formatted lines; runs of key-value items form a
    /// nested list of the same variant.
    fn expand_subitems(&self, subitems: Vec<Node>, depth: usize) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        let mut nested = Vec::new();

        for item in subitems {
            match item {
                Node::Mapping(_) | Node::Record(_) => nested.push(item),
                scalar => {
                    if !nested.is_empty() {
                        lines.extend(self.format(std::mem::take(&mut nested), depth + 1)?);
                    }
                    lines.push(scalar.to_string());
                }
            }
        }
        if !nested.is_empty() {
            lines.extend(self.format(nested, depth + 1)?);
        }

        Ok(lines)
    }
}
