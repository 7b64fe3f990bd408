//! vitae - LaTeX résumé builder
//!
//! Résumés are described in YAML extended with custom tags: `!include` pulls
//! in other documents, `!resume-*` builds schema-checked records, `!tex-*`
//! emits markup macros and `!items-*` formats lists into batches of macro
//! lines. The resolved tree is rendered through a Jinja template into
//! `resume.tex` and compiled with an external LaTeX compiler.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::{Result, VitaeError};
