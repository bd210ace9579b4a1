//! memcaps CLI — inspect and validate runtime build configurations.

mod commands;
mod logger;
mod manifest;

use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser, Subcommand};

use manifest::Manifest;

#[derive(Parser)]
#[command(name = "memcaps", version, about = "Runtime memory capability resolution")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create memcaps.toml and a profiles/ directory here
    Init {
        /// Default build profile
        #[arg(long, default_value = "host-debug")]
        default_profile: String,
    },
    /// Manage build profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Print a resolved configuration
    Resolve {
        /// Build profile (default: memcaps.toml default-profile, else the compiled-in build)
        #[arg(long)]
        profile: Option<String>,
        /// Ignore memcaps.toml and print the compiled-in build configuration
        #[arg(long, conflicts_with = "profile")]
        build: bool,
        /// Output format (human, json, toml)
        #[arg(long)]
        format: Option<String>,
    },
    /// Print layout constants
    Layout {
        /// Output format (human, json)
        #[arg(long)]
        format: Option<String>,
    },
    /// Check whether memory offsets may use an implicit null check
    NullCheck {
        /// Offsets in decimal or 0x-prefixed hex
        #[arg(required = true)]
        offsets: Vec<String>,
    },
    /// Show the compiled-in configuration and project status
    Doctor,
}

#[derive(Subcommand)]
enum ProfileAction {
    /// List available build profiles
    List,
    /// Show the toggles of a build profile
    Describe {
        /// Profile name
        name: String,
        /// Output format (default: human-readable, "toml" or "json")
        #[arg(long)]
        format: Option<String>,
    },
    /// Validate a build profile
    Validate {
        /// Profile name
        name: String,
    },
    /// Create a new profile from a template
    New {
        /// Profile name
        name: String,
    },
}

fn main() {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Init { default_profile } => commands::init::run(&cwd, &default_profile),

        Commands::Profile { action } => {
            let (manifest, project_dir) = load_manifest_optional(&cwd)?;
            let project_dir = project_dir.unwrap_or_else(|| cwd.clone());
            match action {
                ProfileAction::List => commands::profile::list(Some(&project_dir)),
                ProfileAction::Describe { name, format } => {
                    commands::profile::describe(&name, Some(&project_dir), format.as_deref())
                }
                ProfileAction::Validate { name } => {
                    let deny_warnings = manifest.map(|m| m.profiles.deny_warnings).unwrap_or(false);
                    commands::profile::validate(&name, Some(&project_dir), deny_warnings)
                }
                ProfileAction::New { name } => commands::profile::new(&name, &project_dir),
            }
        }

        Commands::Resolve {
            profile,
            build,
            format,
        } => {
            let (manifest, project_dir) = load_manifest_optional(&cwd)?;
            let profile = if build {
                None
            } else {
                profile.or_else(|| manifest.and_then(|m| m.default_profile))
            };
            commands::resolve::run(profile.as_deref(), project_dir.as_deref(), format.as_deref())
        }

        Commands::Layout { format } => commands::layout::show(format.as_deref()),

        Commands::NullCheck { offsets } => commands::layout::null_check(&offsets),

        Commands::Doctor => commands::doctor::run(&cwd),
    }
}

/// Try to load a manifest from the current directory upward. Returns (None, None) if not found.
fn load_manifest_optional(cwd: &Path) -> anyhow::Result<(Option<Manifest>, Option<PathBuf>)> {
    match Manifest::find_and_load(cwd)? {
        Some((manifest, dir)) => Ok((Some(manifest), Some(dir))),
        None => Ok((None, None)),
    }
}
