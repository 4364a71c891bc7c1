//! Repository skill detection.
//!
//! Parses a repository URL, reads the root listing and the language
//! breakdown, and turns both into fresh [`Skill`] records through the
//! static template table.

pub mod client;
pub mod templates;

use thiserror::Error;
use url::Url;

use crate::types::Skill;

pub use client::{GitHubClient, RepoEntry, RepositoryApi};

pub const REPOSITORY_HOST: &str = "github.com";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DetectError {
    #[error("Please enter a valid GitHub repository URL: {0}")]
    InvalidUrl(String),
    #[error("Failed to analyze repository. Please check the URL and try again.")]
    RepositoryAnalysis,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

/// Accepts `http(s)://github.com/<owner>/<repo>[/...]`.
pub fn parse_repo_url(input: &str) -> Result<RepoRef, DetectError> {
    let invalid = || DetectError::InvalidUrl(input.to_string());
    let url = Url::parse(input.trim()).map_err(|_| invalid())?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str() != Some(REPOSITORY_HOST) {
        return Err(invalid());
    }

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|p| !p.is_empty()).collect())
        .unwrap_or_default();
    match segments.as_slice() {
        [owner, repo, ..] => Ok(RepoRef {
            owner: (*owner).to_string(),
            repo: repo.trim_end_matches(".git").to_string(),
        }),
        _ => Err(invalid()),
    }
}

/// Detects skills for `repo_url`. All or nothing: any fetch failure yields
/// [`DetectError::RepositoryAnalysis`] and no partial result.
pub fn detect_skills(api: &dyn RepositoryApi, repo_url: &str) -> Result<Vec<Skill>, DetectError> {
    let RepoRef { owner, repo } = parse_repo_url(repo_url)?;
    tracing::info!(%owner, %repo, "analyzing repository");

    let listing = api.root_listing(&owner, &repo).map_err(|reason| {
        tracing::warn!(%owner, %repo, %reason, "root listing failed");
        DetectError::RepositoryAnalysis
    })?;
    let languages = api.languages(&owner, &repo).map_err(|reason| {
        tracing::warn!(%owner, %repo, %reason, "language breakdown failed");
        DetectError::RepositoryAnalysis
    })?;

    let from_files = listing
        .iter()
        .filter(|entry| entry.is_file())
        .filter_map(|entry| templates::by_file_name(&entry.name));
    let from_languages = languages
        .iter()
        .filter_map(|(language, _)| templates::by_language(language));

    let mut detected: Vec<Skill> = Vec::new();
    for template in from_files.chain(from_languages) {
        if detected.iter().any(|s| s.is_named(template.name)) {
            continue;
        }
        detected.push(template.instantiate());
    }

    tracing::info!(%owner, %repo, count = detected.len(), "repository analyzed");
    Ok(detected)
}

/// Runs [`detect_skills`] on the blocking pool so the sequential HTTP reads
/// never stall the async runtime.
pub async fn detect_skills_async<A>(api: A, repo_url: String) -> Result<Vec<Skill>, DetectError>
where
    A: RepositoryApi + Send + 'static,
{
    // Validate before handing off so URL errors never reach the network path.
    parse_repo_url(&repo_url)?;
    tokio::task::spawn_blocking(move || detect_skills(&api, &repo_url))
        .await
        .map_err(|e| {
            tracing::error!("repository analysis task failed: {e}");
            DetectError::RepositoryAnalysis
        })?
}
