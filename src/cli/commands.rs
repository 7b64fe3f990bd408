//! CLI command definitions

use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "vitae")]
#[command(about = "Build LaTeX résumés from tagged YAML configs", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Print debug output
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new project
    Init {
        /// Directory to initialize (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Add application directories and render their resumes
    Add {
        /// Names of the applications to add
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Build resumes from their configs
    Build {
        /// Applications to build, matched by prefix (default: the current directory)
        names: Vec<String>,
    },

    /// View resume PDFs
    View {
        /// Applications to view, matched by prefix
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Edit an application's config or template, then re-render it
    #[command(group(ArgGroup::new("doctype").required(true).args(["config", "template"])))]
    Edit {
        /// Edit the resume config
        #[arg(short, long)]
        config: bool,

        /// Edit the template
        #[arg(short, long)]
        template: bool,

        /// Application to edit, matched by prefix
        name: String,
    },

    /// View or modify configuration
    Config {
        /// Config key to get or set
        key: Option<String>,

        /// Value to set (if provided, sets the key)
        value: Option<String>,

        /// List all configuration
        #[arg(short, long)]
        list: bool,
    },
}
