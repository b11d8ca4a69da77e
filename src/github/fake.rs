use super::{RequestError, Tracker};
use serde_json::{Value, json};

/// In-memory tracker for unit tests.
#[derive(Debug, Default)]
pub struct FakeTracker {
    pub issues: Vec<Value>,
    /// Source files in listing order; `None` content makes the raw fetch fail.
    pub files: Vec<(String, Option<String>)>,
    pub issues_status: Option<u16>,
    pub tree_status: Option<u16>,
}

impl FakeTracker {
    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.push((path.to_string(), Some(content.to_string())));
        self
    }

    pub fn with_broken_file(mut self, path: &str) -> Self {
        self.files.push((path.to_string(), None));
        self
    }
}

impl Tracker for FakeTracker {
    async fn list_issues(
        &self,
        _label: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Value>, RequestError> {
        if let Some(status) = self.issues_status {
            return Err(RequestError::Status {
                url: format!("issues?page={page}"),
                status,
            });
        }
        let skip = ((page - 1) * per_page) as usize;
        Ok(self
            .issues
            .iter()
            .skip(skip)
            .take(per_page as usize)
            .cloned()
            .collect())
    }

    async fn repository_tree(&self, branch: &str) -> Result<Value, RequestError> {
        if let Some(status) = self.tree_status {
            return Err(RequestError::Status {
                url: format!("tree/{branch}"),
                status,
            });
        }
        let entries: Vec<Value> = self
            .files
            .iter()
            .map(|(path, _)| json!({ "path": path, "type": "blob" }))
            .collect();
        Ok(json!({ "tree": entries, "truncated": false }))
    }

    async fn raw_file(&self, branch: &str, path: &str) -> Result<String, RequestError> {
        match self.files.iter().find(|(p, _)| p == path) {
            Some((_, Some(content))) => Ok(content.clone()),
            _ => Err(RequestError::Status {
                url: format!("raw/{branch}/{path}"),
                status: 404,
            }),
        }
    }
}
