//! GitLab releases and tags provider
//!
//! Recognises URLs whose host contains `git` (gitlab.com as well as self
//! hosted instances such as gitlab.gnome.org). Projects are addressed by
//! their URL-encoded path.
//! API endpoints:
//! - https://{host}/api/v4/projects/{owner%2Frepo}/releases
//! - https://{host}/api/v4/projects/{owner%2Frepo}/repository/tags

use super::{first_valid_version, release_or_tag, HttpClient, ProviderKey, ProviderKind, VersionProvider};
use crate::domain::Version;
use crate::error::UpstreamError;
use async_trait::async_trait;
use regex::Regex;
use reqwest::Url;
use serde::Deserialize;
use std::sync::LazyLock;

static GITLAB_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([^/#?]*git[^/#?]*)/([^/#?]+)/([^#?]+?)(/-/.*)?$").expect("valid regex")
});

/// GitLab provider
pub struct GitLabProvider {
    client: HttpClient,
    api_url: String,
    host: String,
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
    upcoming_release: bool,
}

#[derive(Debug, Deserialize)]
struct TagResponse {
    name: String,
}

impl GitLabProvider {
    /// Create a provider for the project in `url`, if it looks like a GitLab URL
    pub fn from_url(url: &str, client: HttpClient) -> Option<Self> {
        let captures = GITLAB_URL_RE.captures(url)?;
        let host = captures[1].to_string();
        let repo = &captures[3];
        Some(Self {
            client,
            api_url: format!("https://{}/api/v4", host),
            host,
            owner: captures[2].to_string(),
            repo: repo.strip_suffix(".git").unwrap_or(repo).to_string(),
            api_key: None,
        })
    }

    /// Host the project lives on, used to look up its API key
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Authenticate requests with the given token
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Send requests to another API root
    pub fn with_base_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// `{api}/projects/{owner%2Frepo}/{endpoint...}`
    fn project_url(&self, endpoint: &[&str]) -> Result<String, UpstreamError> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| UpstreamError::request(&self.api_url, e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| UpstreamError::request(&self.api_url, "invalid API base URL"))?
            .pop_if_empty()
            .push("projects")
            .push(&format!("{}/{}", self.owner, self.repo))
            .extend(endpoint);
        Ok(url.to_string())
    }

    async fn latest_release_version(&self) -> Result<Version, UpstreamError> {
        let url = self.project_url(&["releases"])?;
        let releases: Vec<ReleaseResponse> =
            self.client.get_json(&url, self.api_key.as_deref()).await?;

        releases
            .iter()
            .filter(|release| !release.upcoming_release)
            .find_map(|release| {
                first_valid_version(
                    std::iter::once(release.tag_name.as_str()).chain(release.name.as_deref()),
                )
            })
            .ok_or_else(|| UpstreamError::not_found(format!("no valid release in {}", url)))
    }

    async fn latest_tag_version(&self) -> Result<Version, UpstreamError> {
        let url = self.project_url(&["repository", "tags"])?;
        let tags: Vec<TagResponse> = self.client.get_json(&url, self.api_key.as_deref()).await?;

        first_valid_version(tags.iter().map(|tag| tag.name.as_str()))
            .ok_or_else(|| UpstreamError::not_found(format!("no valid tag in {}", url)))
    }
}

#[async_trait]
impl VersionProvider for GitLabProvider {
    fn key(&self) -> ProviderKey {
        ProviderKey::new(
            ProviderKind::GitLab,
            format!("{}/{}", self.host, self.owner),
            &self.repo,
        )
    }

    async fn latest_version(&self) -> Result<Version, UpstreamError> {
        release_or_tag(self.latest_release_version(), self.latest_tag_version()).await
    }
}
