use reqdoc::github::{RequestError, Tracker};
use serde_json::{Value, json};

/// Tracker serving issues and files from memory.
#[derive(Debug, Default)]
pub struct InMemoryTracker {
    pub issues: Vec<Value>,
    /// Source files in listing order; `None` content fails the raw fetch.
    pub files: Vec<(String, Option<String>)>,
    pub issues_unavailable: bool,
    pub tree_unavailable: bool,
}

impl InMemoryTracker {
    pub fn add_issue(&mut self, title: &str, author: &str, state: &str) {
        let number = self.issues.len() as u64 + 1;
        self.issues.push(json!({
            "number": number,
            "title": title,
            "body": format!("Description of {title}."),
            "user": { "login": author },
            "state": state,
            "labels": [{ "name": "requirement" }]
        }));
    }

    pub fn put_line(&mut self, path: &str, line: usize, text: &str) {
        let position = match self.files.iter().position(|(p, _)| p == path) {
            Some(position) => position,
            None => {
                self.files.push((path.to_string(), Some(String::new())));
                self.files.len() - 1
            }
        };
        let content = self.files[position].1.get_or_insert_with(String::new);
        let mut lines: Vec<String> = content.lines().map(String::from).collect();
        if lines.len() < line {
            lines.resize(line, "pass".to_string());
        }
        lines[line - 1] = text.to_string();
        *content = lines.join("\n") + "\n";
    }

    pub fn break_file(&mut self, path: &str) {
        self.files.push((path.to_string(), None));
    }
}

impl Tracker for InMemoryTracker {
    async fn list_issues(
        &self,
        _label: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Value>, RequestError> {
        if self.issues_unavailable {
            return Err(RequestError::Status {
                url: "https://api.github.com/repos/owner/repo/issues".to_string(),
                status: 502,
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
        if self.tree_unavailable {
            return Err(RequestError::Status {
                url: format!("https://api.github.com/repos/owner/repo/git/trees/{branch}"),
                status: 404,
            });
        }
        let entries: Vec<Value> = self
            .files
            .iter()
            .map(|(path, _)| json!({ "path": path, "mode": "100644", "type": "blob" }))
            .collect();
        Ok(json!({ "sha": "0000", "tree": entries, "truncated": false }))
    }

    async fn raw_file(&self, branch: &str, path: &str) -> Result<String, RequestError> {
        match self.files.iter().find(|(p, _)| p == path) {
            Some((_, Some(content))) => Ok(content.clone()),
            _ => Err(RequestError::Status {
                url: format!("https://raw.githubusercontent.com/owner/repo/{branch}/{path}"),
                status: 404,
            }),
        }
    }
}
