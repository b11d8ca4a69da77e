use crate::config::{self, ConfigKey};
use serde_json::Value;
use std::collections::HashMap;

/// Enum representing CLI commands
#[derive(Debug, PartialEq)]
pub enum Command {
    /// Fetch, scan and write the document, with settings given on the
    /// command line.
    Generate {
        overrides: HashMap<ConfigKey, Value>,
    },
    Help,
    Unknown(String),
}

pub const USAGE: &str = "\
Usage: reqdoc [generate] [options]

Writes a markdown document linking every issue labelled as a requirement
to the source lines marked `# Implements: <issue title>`.

Options:
  --repo <owner>/<repo>   Repository to read (default: $GITHUB_REPO)
  --label <label>         Issue label to list (default: requirement)
  --branch <branch>       Branch to scan (default: main)
  --ext <extension>       Suffix of the files to scan (default: .py)
  --output <path>         Document to write (default: docs/requirements.md)

Environment:
  GITHUB_TOKEN            Access token for the GitHub API (required)
  GITHUB_REPO             Repository as <owner>/<repo>";

fn option_key(flag: &str) -> Option<ConfigKey> {
    match flag {
        "--repo" => Some(ConfigKey::Repository),
        "--label" => Some(ConfigKey::Label),
        "--branch" => Some(ConfigKey::Branch),
        "--ext" => Some(ConfigKey::Extension),
        "--output" => Some(ConfigKey::Output),
        _ => None,
    }
}

fn parse_options(options: &[String]) -> Command {
    let mut overrides = HashMap::new();
    let mut iter = options.iter();

    while let Some(flag) = iter.next() {
        let Some(key) = option_key(flag) else {
            return Command::Unknown(format!("Unknown option {flag}"));
        };
        let Some(value) = iter.next().filter(|v| !v.starts_with("--")) else {
            return Command::Unknown(format!("Missing value for {flag}"));
        };
        if key == ConfigKey::Repository && !config::is_valid_repository(value) {
            return Command::Unknown(
                "Invalid repository format. Please use <owner>/<repo>.".to_string(),
            );
        }
        overrides.insert(key, Value::String(value.clone()));
    }

    Command::Generate { overrides }
}

/// Parse command line arguments and return a Command
///
/// # Arguments
/// * `args` - Command line arguments (including program name)
///
/// # Returns
/// * `Command` - The parsed command
pub fn parse_args(args: &[String]) -> Command {
    let Some(first) = args.get(1) else {
        return Command::Generate {
            overrides: HashMap::new(),
        };
    };

    match first.as_str() {
        "help" | "--help" | "-h" if args.len() == 2 => Command::Help,
        "generate" => parse_options(&args[2..]),
        flag if flag.starts_with("--") => parse_options(&args[1..]),
        cmd => Command::Unknown(format!("Unknown command {cmd}")),
    }
}
