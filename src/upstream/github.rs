//! GitHub releases and tags provider
//!
//! Recognises `github.com/<owner>/<repo>` URLs.
//! API endpoints:
//! - https://api.github.com/repos/{owner}/{repo}/releases
//! - https://api.github.com/repos/{owner}/{repo}/tags

use super::{first_valid_version, release_or_tag, HttpClient, ProviderKey, ProviderKind, VersionProvider};
use crate::domain::Version;
use crate::error::UpstreamError;
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

/// GitHub API base URL
const GITHUB_API_URL: &str = "https://api.github.com";

static GITHUB_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"github\.com/([^/#?]+)/([^/#?]+)").expect("valid regex"));

/// GitHub provider
pub struct GitHubProvider {
    client: HttpClient,
    base_url: String,
    owner: String,
    repo: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReleaseResponse {
    #[serde(default)]
    name: Option<String>,
    tag_name: String,
    #[serde(default)]
    prerelease: bool,
    #[serde(default)]
    draft: bool,
}

#[derive(Debug, Deserialize)]
struct TagResponse {
    name: String,
}

impl GitHubProvider {
    /// Create a provider for the repository in `url`, if it is a GitHub URL
    pub fn from_url(url: &str, client: HttpClient) -> Option<Self> {
        let captures = GITHUB_URL_RE.captures(url)?;
        let repo = &captures[2];
        Some(Self {
            client,
            base_url: GITHUB_API_URL.to_string(),
            owner: captures[1].to_string(),
            repo: repo.strip_suffix(".git").unwrap_or(repo).to_string(),
            api_key: None,
        })
    }

    /// Authenticate requests with the given token
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Send requests to another API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn releases_url(&self) -> String {
        format!("{}/repos/{}/{}/releases", self.base_url, self.owner, self.repo)
    }

    fn tags_url(&self) -> String {
        format!("{}/repos/{}/{}/tags", self.base_url, self.owner, self.repo)
    }

    async fn latest_release_version(&self) -> Result<Version, UpstreamError> {
        let url = self.releases_url();
        let releases: Vec<ReleaseResponse> =
            self.client.get_json(&url, self.api_key.as_deref()).await?;

        releases
            .iter()
            .filter(|release| !release.draft && !release.prerelease)
            .find_map(|release| {
                first_valid_version(
                    std::iter::once(release.tag_name.as_str()).chain(release.name.as_deref()),
                )
            })
            .ok_or_else(|| UpstreamError::not_found(format!("no valid release in {}", url)))
    }

    async fn latest_tag_version(&self) -> Result<Version, UpstreamError> {
        let url = self.tags_url();
        let tags: Vec<TagResponse> = self.client.get_json(&url, self.api_key.as_deref()).await?;

        first_valid_version(tags.iter().map(|tag| tag.name.as_str()))
            .ok_or_else(|| UpstreamError::not_found(format!("no valid tag in {}", url)))
    }
}

#[async_trait]
impl VersionProvider for GitHubProvider {
    fn key(&self) -> ProviderKey {
        ProviderKey::new(ProviderKind::GitHub, &self.owner, &self.repo)
    }

    async fn latest_version(&self) -> Result<Version, UpstreamError> {
        release_or_tag(self.latest_release_version(), self.latest_tag_version()).await
    }
}
