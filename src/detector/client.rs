//! Repository hosting API client
//!
//! Two unauthenticated reads against the public REST API:
//! - root directory listing (`/repos/{owner}/{repo}/contents`)
//! - language byte counts (`/repos/{owner}/{repo}/languages`)

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::metadata::USER_AGENT;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// One entry of a repository's root listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepoEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl RepoEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: "file".to_string(),
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == "file"
    }
}

/// Read access to a hosted repository. Errors are plain strings because the
/// detector collapses every failure into one generic analysis error.
pub trait RepositoryApi {
    fn root_listing(&self, owner: &str, repo: &str) -> Result<Vec<RepoEntry>, String>;

    /// Language names with byte counts, in the order the API returned them.
    fn languages(&self, owner: &str, repo: &str) -> Result<Vec<(String, u64)>, String>;
}

pub struct GitHubClient {
    base_url: String,
}

impl GitHubClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, String> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "GET");

        let response = ureq::get(&url)
            .set("Accept", "application/vnd.github+json")
            .set("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| format!("request to {url} failed: {e}"))?;

        if response.status() < 200 || response.status() >= 300 {
            return Err(format!("{url} returned HTTP {}", response.status()));
        }

        response
            .into_json::<T>()
            .map_err(|e| format!("failed to decode {url}: {e}"))
    }
}

impl Default for GitHubClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

impl RepositoryApi for GitHubClient {
    fn root_listing(&self, owner: &str, repo: &str) -> Result<Vec<RepoEntry>, String> {
        self.get_json(&format!("/repos/{owner}/{repo}/contents"))
    }

    fn languages(&self, owner: &str, repo: &str) -> Result<Vec<(String, u64)>, String> {
        let map: Map<String, Value> = self.get_json(&format!("/repos/{owner}/{repo}/languages"))?;
        Ok(map
            .into_iter()
            .map(|(name, bytes)| (name, bytes.as_u64().unwrap_or(0)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_trims_trailing_slash() {
        let client = GitHubClient::new("http://localhost:3000/");
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(GitHubClient::default().base_url(), DEFAULT_API_BASE);
    }

    #[test]
    fn listing_entries_decode_type_field() {
        let entries: Vec<RepoEntry> = serde_json::from_str(
            r#"[{"name":"src","type":"dir","size":0},{"name":"index.html","type":"file"}]"#,
        )
        .unwrap();
        assert!(!entries[0].is_file());
        assert_eq!(entries[1], RepoEntry::file("index.html"));
    }
}
