//! Source scanning: finds `# Implements: <title>` markers in the files of a
//! branch and maps each known requirement title to the lines that carry it.

use crate::config::Config;
use crate::github::{RequestError, Tracker, tree};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"#\s*Implements:\s*(.+)").expect("marker pattern is valid")
});

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r\n|\r|\n").expect("line break pattern is valid"));

/// A line in the source tree that implements a requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub path: String,
    /// 1-based.
    pub line: usize,
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path, self.line)
    }
}

/// Requirement title to its references in scan order.
pub type Implementations = HashMap<String, Vec<Reference>>;

/// A file whose content could not be fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

/// Outcome of fetching one source file.
#[derive(Debug, Clone, PartialEq)]
pub enum FileFetch {
    Loaded(String),
    Skipped(SkippedFile),
}

impl FileFetch {
    pub fn from_result(path: &str, result: Result<String, RequestError>) -> Self {
        match result {
            Ok(content) => FileFetch::Loaded(content),
            Err(err) => FileFetch::Skipped(SkippedFile {
                path: path.to_string(),
                reason: err.to_string(),
            }),
        }
    }

    /// The fetched text; a skipped file reads as empty.
    pub fn content(&self) -> &str {
        match self {
            FileFetch::Loaded(content) => content,
            FileFetch::Skipped(_) => "",
        }
    }
}

#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub implementations: Implementations,
    pub skipped: Vec<SkippedFile>,
}

/// Returns the trimmed text following an implementation marker, if `line`
/// has one.
pub fn extract_marker(line: &str) -> Option<&str> {
    MARKER
        .captures(line)
        .and_then(|captures| captures.get(1))
        .map(|text| text.as_str().trim())
}

/// Seeds an empty reference list for every title.
pub fn empty_implementations(titles: &[String]) -> Implementations {
    titles
        .iter()
        .map(|title| (title.clone(), Vec::new()))
        .collect()
}

/// Appends a reference for every marker in `content` naming a known title.
///
/// Lines end at `\r\n`, `\n` or a lone `\r`.
pub fn scan_content(path: &str, content: &str, implementations: &mut Implementations) {
    for (index, line) in LINE_BREAK.split(content).enumerate() {
        let Some(title) = extract_marker(line) else {
            continue;
        };
        if let Some(references) = implementations.get_mut(title) {
            references.push(Reference {
                path: path.to_string(),
                line: index + 1,
            });
        }
    }
}

/// Scans every source file of the configured branch for markers naming one
/// of `titles`.
///
/// Fails only when the tree listing fails. Files that cannot be fetched are
/// scanned as empty and reported in `ScanOutcome::skipped`.
pub async fn find_implementations<T: Tracker>(
    tracker: &T,
    config: &Config,
    titles: &[String],
) -> Result<ScanOutcome, RequestError> {
    let paths = tree::fetch_source_paths(tracker, &config.branch, &config.extension).await?;
    let mut outcome = ScanOutcome {
        implementations: empty_implementations(titles),
        skipped: Vec::new(),
    };

    for path in &paths {
        let fetch = FileFetch::from_result(path, tracker.raw_file(&config.branch, path).await);
        scan_content(path, fetch.content(), &mut outcome.implementations);
        if let FileFetch::Skipped(skipped) = fetch {
            tracing::debug!(path = %skipped.path, reason = %skipped.reason, "source file skipped");
            outcome.skipped.push(skipped);
        }
    }

    Ok(outcome)
}
