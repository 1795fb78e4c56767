//! labseed: reproducible per-session lab artifacts.
//!
//! Every command derives its output from `--seed` alone, so re-running a
//! command with the same seed reproduces the same flag, parameters, artifacts
//! and mutated binary.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use labseed::check::check_submission;
use labseed::exit_codes;
use labseed::expand::expand_to_dir;
use labseed::flag::FlagRecord;
use labseed::io::config::{DEFAULT_CONFIG_FILE, LabseedConfig, load_config};
use labseed::io::lab_store::{discover_labs, load_target};
use labseed::io::mutate::mutate_binary;
use labseed::logging;
use serde::Serialize;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "labseed",
    version,
    about = "Deterministic flags, artifacts and binaries for training labs"
)]
struct Cli {
    /// Path to the labseed TOML config (missing file means defaults).
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print `{"seed", "flag"}` for a session seed.
    Flag {
        #[arg(long)]
        seed: String,
        /// Flag label prefix (default from config, `OMNIHACK`).
        #[arg(long)]
        label: Option<String>,
    },
    /// Generate parameters and write rendered artifacts for a lab.
    Expand {
        /// Lab document (`lab.yaml`/`lab.json`) or lab directory, or a lab id
        /// with `--labs-root`.
        lab: PathBuf,
        /// Resolve `lab` as an id among the labs under this directory.
        #[arg(long)]
        labs_root: Option<PathBuf>,
        #[arg(long)]
        seed: String,
        /// Output directory for `<artifact>.txt` files.
        #[arg(long)]
        output: PathBuf,
    },
    /// Copy a binary and append the session marker block.
    Mutate {
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
        #[arg(long)]
        seed: String,
    },
    /// List labs found under a labs root directory.
    List {
        #[arg(default_value = "labs")]
        root: PathBuf,
    },
    /// Check a submission against a lab's validators.
    Check {
        /// Lab document or lab directory, or a lab id with `--labs-root`.
        lab: PathBuf,
        /// Resolve `lab` as an id among the labs under this directory.
        #[arg(long)]
        labs_root: Option<PathBuf>,
        #[arg(long)]
        seed: String,
        #[arg(long)]
        submission: String,
        /// Session staging directory for `file_exists` validators.
        #[arg(long)]
        staging: Option<PathBuf>,
    },
}

fn main() {
    logging::init();
    let code = match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_codes::for_error(&err)
        }
    };
    std::process::exit(code);
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let config = load_config(&cli.config).context("load config")?;
    match cli.command {
        Command::Flag { seed, label } => cmd_flag(&config, &seed, label.as_deref()),
        Command::Expand {
            lab,
            labs_root,
            seed,
            output,
        } => {
            let lab = load_target(&lab, labs_root.as_deref())?;
            let outcome = expand_to_dir(&lab, &seed, &output, &config)?;
            info!(output = %output.display(), "artifacts written");
            print_json(&outcome)?;
            Ok(exit_codes::OK)
        }
        Command::Mutate {
            input,
            output,
            seed,
        } => {
            mutate_binary(&input, &output, &seed)?;
            info!(output = %output.display(), "binary mutated");
            Ok(exit_codes::OK)
        }
        Command::List { root } => {
            for found in discover_labs(&root)? {
                let title = found.lab.title.as_deref().unwrap_or("");
                println!("{}\t{}", found.lab.id, title);
            }
            Ok(exit_codes::OK)
        }
        Command::Check {
            lab,
            labs_root,
            seed,
            submission,
            staging,
        } => {
            let lab = load_target(&lab, labs_root.as_deref())?;
            let outcome = check_submission(
                &lab,
                &seed,
                &submission,
                staging.as_deref(),
                &config.generate_options(),
            )?;
            print_json(&outcome)?;
            Ok(if outcome.passed {
                exit_codes::OK
            } else {
                exit_codes::CHECK_FAILED
            })
        }
    }
}

fn cmd_flag(config: &LabseedConfig, seed: &str, label: Option<&str>) -> Result<i32> {
    let label = label.unwrap_or(config.flag_label.as_str());
    if label.trim().is_empty() {
        anyhow::bail!("flag label must be non-empty");
    }
    print_json(&FlagRecord::derive(seed, label))?;
    Ok(exit_codes::OK)
}

/// Print `value` as a single line of JSON on stdout.
fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string(value).context("serialize json")?;
    println!("{payload}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_flag_with_default_label() {
        let cli = Cli::parse_from(["labseed", "flag", "--seed", "abc"]);
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_FILE));
        assert!(matches!(
            cli.command,
            Command::Flag { ref seed, label: None } if seed == "abc"
        ));
    }

    #[test]
    fn parse_expand() {
        let cli = Cli::parse_from([
            "labseed", "expand", "labs/web-sqli", "--seed", "s", "--output", "out",
        ]);
        assert!(matches!(cli.command, Command::Expand { .. }));
    }

    #[test]
    fn parse_check_by_lab_id() {
        let cli = Cli::parse_from([
            "labseed",
            "check",
            "web-sqli",
            "--labs-root",
            "labs",
            "--seed",
            "s",
            "--submission",
            "FLAG",
        ]);
        assert!(matches!(
            cli.command,
            Command::Check { labs_root: Some(ref root), .. } if root == &PathBuf::from("labs")
        ));
    }

    #[test]
    fn parse_global_config_after_subcommand() {
        let cli = Cli::parse_from([
            "labseed", "mutate", "in.bin", "--output", "out.bin", "--seed", "s", "--config",
            "other.toml",
        ]);
        assert_eq!(cli.config, PathBuf::from("other.toml"));
        assert!(matches!(cli.command, Command::Mutate { .. }));
    }

    #[test]
    fn parse_check_with_staging() {
        let cli = Cli::parse_from([
            "labseed",
            "check",
            "lab.yaml",
            "--seed",
            "s",
            "--submission",
            "FLAG",
            "--staging",
            "stage",
        ]);
        assert!(matches!(
            cli.command,
            Command::Check { staging: Some(ref staging), .. } if staging == &PathBuf::from("stage")
        ));
    }
}
