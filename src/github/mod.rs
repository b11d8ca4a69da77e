pub mod client;
pub mod issues;
pub mod tree;

#[cfg(test)]
pub(crate) mod fake;

/// Failure talking to the issue tracker.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// The tracker answered with a non-success status.
    #[error("request to {url} failed: HTTP {status}")]
    Status { url: String, status: u16 },

    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not have the expected shape.
    #[error("unexpected response from {url}: {reason}")]
    Malformed { url: String, reason: String },
}

/// Appends `parts` to the path of `base` as percent-encoded segments. A `/`
/// inside a part separates segments.
pub fn url_with_path(base: &reqwest::Url, parts: &[&str]) -> reqwest::Url {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty();
        for part in parts {
            segments.extend(part.split('/'));
        }
    }
    url
}

/// Read-only access to one repository on the issue tracker.
///
/// `GitHubClient` talks to the real API; tests provide in-memory
/// implementations.
#[allow(async_fn_in_trait)]
pub trait Tracker {
    /// Returns one page of issues carrying `label`, open and closed alike.
    async fn list_issues(
        &self,
        label: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<serde_json::Value>, RequestError>;

    /// Returns the recursive tree listing of `branch`.
    async fn repository_tree(&self, branch: &str) -> Result<serde_json::Value, RequestError>;

    /// Returns the raw text of `path` on `branch`.
    async fn raw_file(&self, branch: &str, path: &str) -> Result<String, RequestError>;
}
