use crate::cli;
use crate::config::{self, Config};
use crate::github::client::GitHubClient;
use crate::github::{Tracker, issues};
use crate::output;
use crate::report;
use crate::scanner;
use anyhow::Context;

pub async fn run(
    args: Vec<String>,
    mut stdout_additional: Option<&mut dyn std::io::Write>,
) -> anyhow::Result<()> {
    match cli::parser::parse_args(&args) {
        cli::parser::Command::Generate { overrides } => {
            let config = config::load_config(&overrides)?;
            let client = GitHubClient::new(&config)?;
            generate(&config, &client, &mut stdout_additional).await?;
        }
        cli::parser::Command::Help => {
            output::println(cli::parser::USAGE, &mut stdout_additional)?;
        }
        cli::parser::Command::Unknown(message) => {
            return Err(anyhow::anyhow!("{message}\nRun `reqdoc help` for usage."));
        }
    }
    Ok(())
}

/// Lists the requirement issues, scans the source tree and writes the
/// document.
///
/// Nothing is written when listing issues or the source tree fails.
pub async fn generate<T: Tracker>(
    config: &Config,
    tracker: &T,
    stdout_additional: &mut Option<&mut dyn std::io::Write>,
) -> anyhow::Result<()> {
    let requirement_issues = issues::fetch_requirement_issues(tracker, &config.label)
        .await
        .context("Failed to list requirement issues")?;
    let titles: Vec<String> = requirement_issues
        .iter()
        .map(|issue| issue.title.clone())
        .collect();

    let scan = scanner::find_implementations(tracker, config, &titles)
        .await
        .context("Failed to list source files")?;
    for skipped in &scan.skipped {
        output::println(
            &format!(
                "Warning: could not fetch {} ({}); treating it as empty",
                skipped.path, skipped.reason
            ),
            stdout_additional,
        )?;
    }

    let links = report::LinkBase {
        repository: &config.repository,
        branch: &config.branch,
    };
    let document = report::render_document(&requirement_issues, &scan.implementations, &links);
    report::write_document(&config.output, &document)?;

    let implemented = requirement_issues
        .iter()
        .filter(|issue| {
            scan.implementations
                .get(&issue.title)
                .is_some_and(|references| !references.is_empty())
        })
        .count();
    tracing::info!(
        requirements = requirement_issues.len(),
        implemented,
        "document written"
    );

    output::println(
        &format!("✓ Documentation updated in {}", config.output.display()),
        stdout_additional,
    )?;
    Ok(())
}
