use super::{RequestError, Tracker};
use std::fmt;

/// Page size requested from the issues endpoint.
pub const PER_PAGE: u32 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    /// Only read by diagnostics, so an entry without one is still kept.
    pub number: Option<u64>,
    pub title: String,
    pub body: String,
    pub author_login: String,
    pub state: IssueState,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IssueState {
    Open,
    Closed,
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueState::Open => f.write_str("open"),
            IssueState::Closed => f.write_str("closed"),
        }
    }
}

/// Converts raw issue objects into `Issue`s, keeping tracker order.
///
/// Pull requests are skipped. Entries with an unknown state or missing
/// `title`, `state` or `user.login` are dropped with a warning. A `null`
/// body becomes an empty string.
pub fn parse_requirement_issues(issues_json: &[serde_json::Value]) -> Vec<Issue> {
    issues_json
        .iter()
        .filter_map(|issue| {
            let number = issue["number"].as_u64();
            if !issue["pull_request"].is_null() {
                tracing::debug!(number, "skipping pull request");
                return None;
            }
            let (Some(title), Some(state), Some(login)) = (
                issue["title"].as_str(),
                issue["state"].as_str(),
                issue["user"]["login"].as_str(),
            ) else {
                tracing::warn!(number, "dropping issue without title, state or author");
                return None;
            };
            let state = match state {
                "open" => IssueState::Open,
                "closed" => IssueState::Closed,
                other => {
                    tracing::warn!(
                        number,
                        title,
                        state = other,
                        "dropping issue with unknown state"
                    );
                    return None;
                }
            };

            Some(Issue {
                number,
                title: title.to_string(),
                body: issue["body"].as_str().unwrap_or_default().to_string(),
                author_login: login.to_string(),
                state,
            })
        })
        .collect()
}

/// Lists every issue carrying `label`, following pages until a short one.
pub async fn fetch_requirement_issues<T: Tracker>(
    tracker: &T,
    label: &str,
) -> Result<Vec<Issue>, RequestError> {
    let mut all_issues = Vec::new();
    let mut page = 1;

    loop {
        let issues_json = tracker.list_issues(label, page, PER_PAGE).await?;
        let page_len = issues_json.len();
        all_issues.extend(parse_requirement_issues(&issues_json));
        tracing::debug!(page, entries = page_len, "fetched issue page");

        if page_len < PER_PAGE as usize {
            break;
        }
        page += 1;
    }

    tracing::info!(count = all_issues.len(), label, "listed requirement issues");
    Ok(all_issues)
}
