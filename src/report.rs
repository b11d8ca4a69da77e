//! Markdown rendering of the requirements document.

use crate::github::issues::Issue;
use crate::github::url_with_path;
use crate::scanner::{Implementations, Reference};
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::Path;
use std::sync::LazyLock;

static WEB_BASE: LazyLock<reqwest::Url> =
    LazyLock::new(|| reqwest::Url::parse("https://github.com").expect("web base url is valid"));

/// An issue joined with the source lines that implement it.
#[derive(Debug, PartialEq)]
pub struct RequirementRecord<'a> {
    pub issue: &'a Issue,
    pub references: &'a [Reference],
}

/// Where reference links point: the hosted file view of one branch.
#[derive(Debug, Clone)]
pub struct LinkBase<'a> {
    pub repository: &'a str,
    pub branch: &'a str,
}

impl LinkBase<'_> {
    pub fn url(&self, reference: &Reference) -> String {
        let mut url = url_with_path(
            &WEB_BASE,
            &[self.repository, "blob", self.branch, reference.path.as_str()],
        );
        url.set_fragment(Some(&format!("L{}", reference.line)));
        url.into()
    }
}

/// Pairs every issue with its references, in issue order.
pub fn join_requirements<'a>(
    issues: &'a [Issue],
    implementations: &'a Implementations,
) -> Vec<RequirementRecord<'a>> {
    issues
        .iter()
        .map(|issue| RequirementRecord {
            issue,
            references: implementations
                .get(&issue.title)
                .map(Vec::as_slice)
                .unwrap_or_default(),
        })
        .collect()
}

/// Renders the whole document. The output depends only on the arguments.
pub fn render_document(
    issues: &[Issue],
    implementations: &Implementations,
    links: &LinkBase<'_>,
) -> String {
    let mut document = String::from("# Requirements\n\n");
    for record in join_requirements(issues, implementations) {
        render_section(&mut document, &record, links);
    }
    document
}

fn render_section(document: &mut String, record: &RequirementRecord<'_>, links: &LinkBase<'_>) {
    let issue = record.issue;
    // Writing into a String cannot fail.
    let _ = writeln!(document, "## {}", issue.title);
    let _ = writeln!(document, "{}\n", issue.body);
    let _ = writeln!(
        document,
        "*Author: @{} | Status: {}*\n",
        issue.author_login, issue.state
    );

    if record.references.is_empty() {
        document.push_str("_Not yet implemented._\n\n");
        return;
    }

    document.push_str("**Implemented in:**\n");
    for reference in record.references {
        let _ = writeln!(document, "- [`{reference}`]({})", links.url(reference));
    }
    document.push('\n');
}

/// Writes `content` to `path`, creating parent directories and replacing any
/// existing file.
pub fn write_document(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
