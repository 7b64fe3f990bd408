//! Format strings used by records, style tags and list items
//!
//! Two styles are understood:
//! - percent: `%(key)s` keyword, `%s` positional, `%%` literal percent
//! - brace: `{key}` keyword, `{}` positional, `{{` / `}}` literal braces
//!
//! A template is compiled once into segments so the keys it references can be
//! checked against an item before anything is substituted.

use crate::domain::node::Mapping;
use crate::error::{Result, VitaeError};
use regex::Regex;
use std::str::FromStr;
use std::sync::OnceLock;

/// Placeholder syntax of a format string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatStyle {
    Percent,
    Brace,
}

impl FromStr for FormatStyle {
    type Err = VitaeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "%" | "percent" => Ok(FormatStyle::Percent),
            "{}" | "brace" => Ok(FormatStyle::Brace),
            other => Err(VitaeError::UnknownStyle(other.to_string())),
        }
    }
}

fn percent_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"%(?:\(([^)]*)\))?([A-Za-z%])?").unwrap())
}

fn brace_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"\{\{|\}\}|\{([A-Za-z_][A-Za-z0-9_]*)?\}|[{}]").unwrap())
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Key(String),
    Positional,
}

/// A compiled format string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatTemplate {
    segments: Vec<Segment>,
}

impl FormatTemplate {
    /// Compile a template in the given style
    pub fn parse(template: &str, style: FormatStyle) -> Result<Self> {
        let segments = match style {
            FormatStyle::Percent => parse_percent(template)?,
            FormatStyle::Brace => parse_brace(template)?,
        };
        Ok(FormatTemplate { segments })
    }

    /// Compile a percent-style template
    pub fn percent(template: &str) -> Result<Self> {
        Self::parse(template, FormatStyle::Percent)
    }

    /// Keys referenced by keyword placeholders, in template order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Key(key) => Some(key.as_str()),
            _ => None,
        })
    }

    /// Number of positional placeholders
    pub fn positional_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Positional))
            .count()
    }

    /// First referenced key that the mapping does not have
    pub fn missing_key<'a>(&'a self, mapping: &Mapping) -> Option<&'a str> {
        self.keys().find(|key| !mapping.contains_key(key))
    }

    /// Substitute keyword placeholders from `mapping` and positional
    /// placeholders from `positional`, in order.
    pub fn render(&self, mapping: Option<&Mapping>, positional: &[String]) -> Result<String> {
        let mut output = String::new();
        let mut args = positional.iter();

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::Key(key) => {
                    let value = mapping
                        .and_then(|m| m.get(key))
                        .ok_or_else(|| VitaeError::FormatKey(key.clone()))?;
                    output.push_str(&value.to_string());
                }
                Segment::Positional => {
                    let value = args.next().ok_or_else(|| {
                        VitaeError::Format("not enough arguments for format string".to_string())
                    })?;
                    output.push_str(value);
                }
            }
        }

        Ok(output)
    }
}

fn push_literal(segments: &mut Vec<Segment>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Segment::Literal(last)) = segments.last_mut() {
        last.push_str(text);
    } else {
        segments.push(Segment::Literal(text.to_string()));
    }
}

fn parse_percent(template: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut last = 0;

    for cap in percent_regex().captures_iter(template) {
        let whole = cap.get(0).map_or(0..0, |m| m.range());
        push_literal(&mut segments, &template[last..whole.start]);
        last = whole.end;

        let key = cap.get(1).map(|m| m.as_str());
        match (key, cap.get(2).map(|m| m.as_str())) {
            (None, Some("%")) => push_literal(&mut segments, "%"),
            (Some(key), Some("s" | "d" | "r")) => segments.push(Segment::Key(key.to_string())),
            (None, Some("s" | "d" | "r")) => segments.push(Segment::Positional),
            (_, Some(conversion)) => {
                return Err(VitaeError::Format(format!(
                    "unsupported conversion '%{}' in {:?}",
                    conversion, template
                )))
            }
            (_, None) => {
                return Err(VitaeError::Format(format!(
                    "incomplete format at offset {} in {:?}",
                    whole.start, template
                )))
            }
        }
    }

    push_literal(&mut segments, &template[last..]);
    Ok(segments)
}

fn parse_brace(template: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut last = 0;

    for cap in brace_regex().captures_iter(template) {
        let whole = cap.get(0).map_or(0..0, |m| m.range());
        push_literal(&mut segments, &template[last..whole.start]);
        last = whole.end;

        match &template[whole.clone()] {
            "{{" => push_literal(&mut segments, "{"),
            "}}" => push_literal(&mut segments, "}"),
            "{}" => segments.push(Segment::Positional),
            "{" | "}" => {
                return Err(VitaeError::Format(format!(
                    "single '{}' at offset {} in {:?}",
                    &template[whole.clone()],
                    whole.start,
                    template
                )))
            }
            _ => {
                if let Some(key) = cap.get(1) {
                    segments.push(Segment::Key(key.as_str().to_string()));
                }
            }
        }
    }

    push_literal(&mut segments, &template[last..]);
    Ok(segments)
}
