//! journeypack CLI
//!
//! Entry point for the `journeypack` command-line tool.

use clap::{CommandFactory, Parser, Subcommand};
use journeypack::config::DEFAULT_SETTINGS_FILE;
use journeypack::{
    compose_build_config, resolve_all, resolve_brands, write_version_file, BuildConfiguration,
    ComposeError, Dispatcher, Environment, ProjectSettings, ShellRunner,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "journeypack")]
#[command(about = "Journey and brand aware bundler configuration and task runner", version)]
struct Cli {
    /// Path to the settings file
    #[arg(long, global = true, default_value = DEFAULT_SETTINGS_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,

    /// Verb flags: -s, -b [env], -l [scope], -t [mode], -c journey~brand,
    /// -m [watch], -r, -d (long forms: --server, --build, --lint, --test,
    /// --scout, --mockServer, --checkStyle, --doc)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    verbs: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose build configurations and print them as a JSON array
    Resolve {
        /// Environment (development, production, test)
        #[arg(long)]
        env: Environment,

        /// Only this journey (default: every journey of the environment)
        #[arg(long)]
        journey: Option<String>,

        /// Only this brand of the journey
        #[arg(long, requires = "journey")]
        brand: Option<String>,

        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,

        /// Skip writing version files for production
        #[arg(long)]
        no_stamp: bool,
    },

    /// Fill content security policy placeholders in an emitted HTML file
    Secure {
        /// Environment whose security settings apply
        #[arg(long)]
        env: Environment,

        /// HTML file to process in place
        #[arg(long)]
        file: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Resolve {
            env,
            journey,
            brand,
            out,
            no_stamp,
        }) => {
            run_resolve(&cli.config, env, journey, brand, out, no_stamp);
        }
        Some(Commands::Secure { env, file }) => {
            run_secure(&cli.config, env, &file);
        }
        None if cli.verbs.is_empty() => {
            if let Err(e) = Cli::command().print_help() {
                eprintln!("Error printing help: {}", e);
                process::exit(1);
            }
        }
        None => {
            run_dispatch(&cli.config, &cli.verbs);
        }
    }
}

fn load_settings(path: &Path) -> ProjectSettings {
    match ProjectSettings::from_file(path) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error loading {}: {}", path.display(), e);
            process::exit(1);
        }
    }
}

fn compose(
    settings: &ProjectSettings,
    env: Environment,
    journey: Option<&str>,
    brand: Option<&str>,
) -> Result<Vec<BuildConfiguration>, ComposeError> {
    match (journey, brand) {
        (Some(journey), Some(brand)) => {
            Ok(compose_build_config(settings, env, journey, brand)?.into_iter().collect())
        }
        (Some(journey), None) => resolve_brands(settings, env, journey),
        (None, _) => resolve_all(settings, env),
    }
}

fn run_resolve(
    config_path: &Path,
    env: Environment,
    journey: Option<String>,
    brand: Option<String>,
    out: Option<PathBuf>,
    no_stamp: bool,
) {
    let settings = load_settings(config_path);

    let configs = match compose(&settings, env, journey.as_deref(), brand.as_deref()) {
        Ok(configs) => configs,
        Err(e) => {
            eprintln!("Composition error: {}", e);
            process::exit(1);
        }
    };
    if configs.is_empty() {
        tracing::warn!(env = %env, "no journeys resolved, nothing to build");
    }

    let json = match serde_json::to_string_pretty(&configs) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    };

    match out {
        Some(path) => {
            let written = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or(Ok(()), fs::create_dir_all)
                .and_then(|_| fs::write(&path, &json));
            if let Err(e) = written {
                eprintln!("Error writing {}: {}", path.display(), e);
                process::exit(1);
            }
            tracing::info!(path = %path.display(), configurations = configs.len(), "configurations written");
        }
        None => println!("{}", json),
    }

    if env.is_production() && !no_stamp {
        for target in configs.iter().filter_map(BuildConfiguration::version_target) {
            if let Err(e) = write_version_file(&settings.project_root, &target) {
                eprintln!("Version file error: {}", e);
                process::exit(1);
            }
        }
    }
}

fn run_secure(config_path: &Path, env: Environment, file: &Path) {
    let settings = load_settings(config_path);

    let Some(security) = settings.environment(env).and_then(|e| e.security.as_ref()) else {
        tracing::info!(env = %env, "no security settings, leaving file unchanged");
        return;
    };

    match security.apply_to_file(file) {
        Ok(true) => tracing::info!(path = %file.display(), "security policy applied"),
        Ok(false) => tracing::info!(path = %file.display(), "no policy placeholders filled"),
        Err(e) => {
            eprintln!("Security error: {}", e);
            process::exit(1);
        }
    }
}

fn run_dispatch(config_path: &Path, verbs: &[String]) {
    let settings = load_settings(config_path);

    let bin = std::env::current_exe()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| env!("CARGO_PKG_NAME").to_string());
    // children run in the project root, where the settings file is a bare name
    let settings_file = config_path
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));

    let runner = ShellRunner::new(settings.project_root.clone());
    let mut dispatcher = Dispatcher::new(&settings, runner)
        .with_bin(bin)
        .with_settings_file(&settings_file);

    match dispatcher.dispatch(verbs) {
        Ok(report) => {
            tracing::info!(tasks = report.completed, "done");
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}
