//! transval - transition rule sets
//!
//! Loads named rule sets from configuration and checks transitions against
//! them, either as one-shot commands or in an interactive REPL.

mod commands;
mod config;
mod repl;

use clap::{Parser, Subcommand};
use colored::Colorize;
use config::{Config, RuleSource};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use transval_core::{EmptyInputPolicy, StateId};

#[derive(Parser)]
#[command(name = "transval")]
#[command(about = "Validate state transitions against named rule sets")]
#[command(version)]
struct Cli {
    /// Path to a YAML config file
    #[arg(short, long, env = "TRANSVAL_CONFIG")]
    config: Option<PathBuf>,

    /// Extra rule set as NAME=RULES (repeatable, merged after config)
    #[arg(short, long = "rules", value_name = "NAME=RULES")]
    rules: Vec<String>,

    /// Reject rule texts that contain no rules
    #[arg(long)]
    strict_empty: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start interactive REPL
    Repl,

    /// Check whether a transition is allowed (exit status 1 if not)
    Check {
        /// Rule set name
        name: String,

        /// Source state
        #[arg(allow_negative_numbers = true)]
        from: StateId,

        /// Target state
        #[arg(allow_negative_numbers = true)]
        to: StateId,
    },

    /// List the states allowed from a source state
    Allowed {
        /// Rule set name
        name: String,

        /// Source state
        #[arg(allow_negative_numbers = true)]
        from: StateId,
    },

    /// Show a rule set
    Show {
        /// Rule set name
        name: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List all rule sets
    List,

    /// Parse rules and print their canonical form
    Lint {
        /// Rule text, e.g. "1=>2,3;2=>3"
        rules: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: {}", "Error".red(), e);
            std::process::exit(1);
        }
    };

    if cli.strict_empty {
        config.empty_input = EmptyInputPolicy::Reject;
    }

    for arg in &cli.rules {
        let Some((name, rules)) = arg.split_once('=') else {
            eprintln!("{}: expected NAME=RULES, got '{}'", "Error".red(), arg);
            std::process::exit(1);
        };
        let fragments = match config.rule_sets.remove(name) {
            Some(source) => {
                let mut fragments = source.fragments().to_vec();
                fragments.push(rules.to_string());
                fragments
            }
            None => vec![rules.to_string()],
        };
        config
            .rule_sets
            .insert(name.to_string(), RuleSource::Fragments(fragments));
    }

    let mut registry = match config.build_registry() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}: {}", "Error".red(), e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Repl) | None => {
            repl::run(&mut registry, &config.history_path())?;
        }
        Some(cmd) => match commands::execute(&registry, cmd) {
            Ok(output) => {
                println!("{}", output.text);
                if !output.success {
                    std::process::exit(1);
                }
            }
            Err(e) => {
                eprintln!("{}: {}", "Error".red(), e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
