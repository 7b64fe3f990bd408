use clap::Parser;
use tracing_subscriber::EnvFilter;
use vitae::application::{
    init, AddService, BuildService, ConfigService, EditService, EditTarget, RenderService,
    ViewService,
};
use vitae::cli::{exit_status, format_config_list, Cli, Commands};
use vitae::error::{Result, VitaeError};
use vitae::infrastructure::ProjectRepository;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let errors = run(cli.command);
    for error in &errors {
        eprintln!("Error: {}", error.display_with_suggestions());
    }
    std::process::exit(exit_status(&errors));
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

/// Run one command; every name of a multi-name command is attempted and its
/// failure collected
fn run(command: Commands) -> Vec<VitaeError> {
    match command {
        Commands::Init { path } => single(init::init(&path)),
        Commands::Config { key, value, list } => single(manage_config(key, value, list)),
        Commands::Add { names } => for_each_name(&names, |renderer, name| {
            AddService::new(renderer).execute(name).map(drop)
        }),
        Commands::Build { names } if names.is_empty() => single(build_current_dir()),
        Commands::Build { names } => for_each_name(&names, |renderer, name| {
            BuildService::new(renderer).execute(name).map(drop)
        }),
        Commands::View { names } => for_each_name(&names, |renderer, name| {
            ViewService::new(renderer).execute(name).map(drop)
        }),
        Commands::Edit {
            config,
            template: _,
            name,
        } => {
            let target = if config {
                EditTarget::Config
            } else {
                EditTarget::Template
            };
            for_each_name(std::slice::from_ref(&name), |renderer, name| {
                EditService::new(renderer).execute(name, target).map(drop)
            })
        }
    }
}

fn single(result: Result<()>) -> Vec<VitaeError> {
    result.err().into_iter().collect()
}

fn render_service() -> Result<RenderService> {
    let repo = ProjectRepository::discover()?;
    let config = repo.load_config()?;
    Ok(RenderService::new(repo, config))
}

fn for_each_name<F>(names: &[String], action: F) -> Vec<VitaeError>
where
    F: Fn(RenderService, &str) -> Result<()>,
{
    let mut errors = Vec::new();
    for name in names {
        tracing::debug!(name = %name, "Processing");
        if let Err(e) = render_service().and_then(|renderer| action(renderer, name)) {
            match &e {
                VitaeError::AmbiguousResume { .. } => {
                    tracing::warn!("Resume search term {:?} is ambiguous", name)
                }
                VitaeError::ResumeNotFound(_) => tracing::error!("Could not find resume {:?}", name),
                _ => tracing::error!("Failed to process {:?}", name),
            }
            errors.push(e);
        }
    }
    errors
}

fn build_current_dir() -> Result<()> {
    let current_dir = std::env::current_dir()?;
    BuildService::new(render_service()?)
        .execute_in(&current_dir)
        .map(drop)
}

fn manage_config(key: Option<String>, value: Option<String>, list: bool) -> Result<()> {
    let service = ConfigService::new(ProjectRepository::discover()?);

    if list {
        print!("{}", format_config_list(&service.list()?));
    } else if let Some(k) = key {
        if let Some(v) = value {
            service.set(&k, &v)?;
            println!("Set {} = {}", k, v);
        } else {
            println!("{}", service.get(&k)?);
        }
    } else {
        println!("Usage: vitae config [--list | <key> [<value>]]");
        println!(
            "Valid keys: {}",
            vitae::application::manage_config::CONFIG_KEYS.join(", ")
        );
    }
    Ok(())
}
