use super::{RequestError, Tracker};
use serde::Deserialize;

/// Response of the recursive git tree endpoint.
#[derive(Deserialize, Debug)]
pub struct TreeResponse {
    pub tree: Vec<TreeEntry>,
    #[serde(default)]
    pub truncated: bool,
}

#[derive(Deserialize, Debug)]
pub struct TreeEntry {
    pub path: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Paths of the blobs in `response` whose path ends with `extension`, in
/// listing order.
pub fn source_paths(response: &TreeResponse, extension: &str) -> Vec<String> {
    response
        .tree
        .iter()
        .filter(|entry| entry.kind == "blob" && entry.path.ends_with(extension))
        .map(|entry| entry.path.clone())
        .collect()
}

/// Lists the source files of `branch` that end with `extension`.
pub async fn fetch_source_paths<T: Tracker>(
    tracker: &T,
    branch: &str,
    extension: &str,
) -> Result<Vec<String>, RequestError> {
    let raw = tracker.repository_tree(branch).await?;
    let response: TreeResponse =
        serde_json::from_value(raw).map_err(|e| RequestError::Malformed {
            url: format!("git/trees/{branch}"),
            reason: e.to_string(),
        })?;

    if response.truncated {
        tracing::warn!(branch, "tree listing was truncated by the tracker; some files are not scanned");
    }

    let paths = source_paths(&response, extension);
    tracing::info!(count = paths.len(), branch, extension, "listed source files");
    Ok(paths)
}
