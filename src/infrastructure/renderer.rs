//! LaTeX rendering through minijinja
//!
//! Templates use LaTeX-friendly delimiters: `<& &>` for blocks, `<@ @>` for
//! variables and `<# #>` for comments.

use crate::domain::node::Node;
use crate::error::Result;
use minijinja::syntax::SyntaxConfig;
use minijinja::{context, Environment, State, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub const TEMPLATE_SUFFIX: &str = ".tex.j2";

/// Jinja environment loading `<name>.tex.j2` from an ordered list of directories
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    pub fn new(dirs: Vec<PathBuf>) -> Result<Self> {
        let mut env = Environment::new();
        env.set_syntax(
            SyntaxConfig::builder()
                .block_delimiters("<&", "&>")
                .variable_delimiters("<@", "@>")
                .comment_delimiters("<#", "#>")
                .build()?,
        );
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_loader(move |name| load_template(&dirs, name));
        env.add_function("format_as", format_as);

        Ok(Renderer { env })
    }

    /// Render template `name` with the resolved tree bound to `config`
    pub fn render(&self, name: &str, config: &Node) -> Result<String> {
        let template = self.env.get_template(&template_file(name))?;
        Ok(template.render(context! { config => Value::from_serialize(config) })?)
    }

    /// Render into `dest`, replacing any previous output
    pub fn render_to_file(&self, name: &str, config: &Node, dest: &Path) -> Result<()> {
        let output = self.render(name, config)?;
        if dest.exists() {
            tracing::info!("Updating source file {}", dest.display());
        } else {
            tracing::info!("Creating source file {}", dest.display());
        }
        fs::write(dest, output)?;
        Ok(())
    }
}

/// `format_as(obj, name)` renders `obj` as `data` with another template
fn format_as(state: &State, data: Value, name: &str) -> std::result::Result<String, minijinja::Error> {
    state
        .env()
        .get_template(&template_file(name))?
        .render(context! { data => data })
}

/// `resume`, `resume.tex` and `resume.tex.j2` all name `resume.tex.j2`
fn template_file(name: &str) -> String {
    let stem = name.strip_suffix(".j2").unwrap_or(name);
    let stem = stem.strip_suffix(".tex").unwrap_or(stem);
    format!("{}{}", stem, TEMPLATE_SUFFIX)
}

fn load_template(dirs: &[PathBuf], name: &str) -> std::result::Result<Option<String>, minijinja::Error> {
    for dir in dirs {
        let path = dir.join(name);
        if path.is_file() {
            tracing::debug!(path = %path.display(), "Loading template");
            return fs::read_to_string(&path).map(Some).map_err(|e| {
                minijinja::Error::new(
                    minijinja::ErrorKind::InvalidOperation,
                    format!("failed to read {}", path.display()),
                )
                .with_source(e)
            });
        }
    }
    Ok(None)
}
