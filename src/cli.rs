//! Command-line argument parsing
//!
//! Supports:
//! - Replaying a scenario script against the in-memory host
//! - Checking panel definitions for configuration errors

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Persistent panels across workspaces
#[derive(Parser, Debug)]
#[command(name = "dockhand", version, about = "Persistent panels across workspaces")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replay a scenario script and print the resulting state
    Run {
        /// Scenario YAML file
        #[arg(value_name = "SCENARIO")]
        scenario: PathBuf,

        /// Panel definitions file (defaults to the scenario's inline panels,
        /// then ~/.config/dockhand/panels.yaml)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Print the full state dump as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compute every panel's placement on a default screen and report errors
    Check {
        /// Panel definitions file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Screen columns
        #[arg(long, default_value_t = 120)]
        columns: u32,

        /// Screen lines
        #[arg(long, default_value_t = 40)]
        lines: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_run_scenario() {
        let args = parse(&["dockhand", "run", "demo.yaml"]);
        assert_eq!(
            args.command,
            Command::Run {
                scenario: PathBuf::from("demo.yaml"),
                config: None,
                json: false,
            }
        );
    }

    #[test]
    fn test_run_with_config_and_json() {
        let args = parse(&["dockhand", "run", "demo.yaml", "-c", "panels.yaml", "--json"]);
        match args.command {
            Command::Run { config, json, .. } => {
                assert_eq!(config, Some(PathBuf::from("panels.yaml")));
                assert!(json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_check_defaults() {
        let args = parse(&["dockhand", "check"]);
        assert_eq!(
            args.command,
            Command::Check {
                config: None,
                columns: 120,
                lines: 40,
            }
        );
    }

    #[test]
    fn test_subcommand_required() {
        assert!(CliArgs::try_parse_from(["dockhand"]).is_err());
    }
}
