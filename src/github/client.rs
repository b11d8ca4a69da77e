use super::{RequestError, Tracker, url_with_path};
use crate::config::Config;
use anyhow::Context;

/// GitHub endpoints
mod endpoints {
    pub const API: &str = "https://api.github.com";
    pub const RAW: &str = "https://raw.githubusercontent.com";
}

const USER_AGENT: &str = "reqdoc-cli";
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// `Tracker` backed by the GitHub REST API and raw content host.
pub struct GitHubClient {
    http: reqwest::Client,
    token: String,
    repository: String,
}

impl GitHubClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(GitHubClient {
            http,
            token: config.token.clone(),
            repository: config.repository.clone(),
        })
    }

    async fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<reqwest::Response, RequestError> {
        tracing::debug!(url, "GET");
        let response = self
            .http
            .get(url)
            .query(query)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

impl Tracker for GitHubClient {
    async fn list_issues(
        &self,
        label: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<serde_json::Value>, RequestError> {
        let url = format!("{}/repos/{}/issues", endpoints::API, self.repository);
        let page = page.to_string();
        let per_page = per_page.to_string();
        let response = self
            .get(
                &url,
                &[
                    ("state", "all"),
                    ("labels", label),
                    ("per_page", per_page.as_str()),
                    ("page", page.as_str()),
                ],
            )
            .await?;
        Ok(response.json::<Vec<serde_json::Value>>().await?)
    }

    async fn repository_tree(&self, branch: &str) -> Result<serde_json::Value, RequestError> {
        let url = format!(
            "{}/repos/{}/git/trees/{}",
            endpoints::API,
            self.repository,
            branch
        );
        let response = self.get(&url, &[("recursive", "1")]).await?;
        Ok(response.json::<serde_json::Value>().await?)
    }

    async fn raw_file(&self, branch: &str, path: &str) -> Result<String, RequestError> {
        let base = reqwest::Url::parse(endpoints::RAW).map_err(|e| RequestError::Malformed {
            url: endpoints::RAW.to_string(),
            reason: e.to_string(),
        })?;
        let url = url_with_path(&base, &[self.repository.as_str(), branch, path]);
        let response = self.get(url.as_str(), &[]).await?;
        Ok(response.text().await?)
    }
}
