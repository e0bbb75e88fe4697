//! Upstream version providers
//!
//! This module provides:
//! - The `VersionProvider` trait implemented by every upstream source
//! - `ProviderKey` used to recognise two providers targeting the same project
//! - `ProviderFactory` mapping a URL to at most one provider
//! - GitHub, GitLab and PyPI providers sharing one HTTP client

mod client;
#[cfg(test)]
pub(crate) mod fake;
mod github;
mod gitlab;
mod pypi;

pub use client::HttpClient;
pub use github::GitHubProvider;
pub use gitlab::GitLabProvider;
pub use pypi::PyPIProvider;

use crate::config::ProvidersConfig;
use crate::domain::Version;
use crate::error::UpstreamError;
use async_trait::async_trait;
use std::fmt;
use std::future::Future;

/// Kind of upstream provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    GitHub,
    GitLab,
    PyPI,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderKind::GitHub => "GitHub",
            ProviderKind::GitLab => "GitLab",
            ProviderKind::PyPI => "PyPI",
        };
        f.write_str(name)
    }
}

/// Identity of the project a provider queries.
///
/// Two providers with the same key would issue the same query, so only one
/// of them is ever asked. Credentials are not part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProviderKey {
    pub kind: ProviderKind,
    pub namespace: String,
    pub project: String,
}

impl ProviderKey {
    /// Create a new ProviderKey
    pub fn new(kind: ProviderKind, namespace: impl Into<String>, project: impl Into<String>) -> Self {
        Self {
            kind,
            namespace: namespace.into(),
            project: project.into(),
        }
    }
}

impl fmt::Display for ProviderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{} {}", self.kind, self.project)
        } else {
            write!(f, "{} {}/{}", self.kind, self.namespace, self.project)
        }
    }
}

/// A source able to report the latest released version of one project
#[async_trait]
pub trait VersionProvider: Send + Sync {
    /// Project this provider queries
    fn key(&self) -> ProviderKey;

    /// Fetch the latest version
    async fn latest_version(&self) -> Result<Version, UpstreamError>;
}

/// Builds a provider for a URL, if any provider recognises it
pub trait ProviderFactory: Send + Sync {
    fn create(&self, url: &str) -> Option<Box<dyn VersionProvider>>;
}

impl<F> ProviderFactory for F
where
    F: Fn(&str) -> Option<Box<dyn VersionProvider>> + Send + Sync,
{
    fn create(&self, url: &str) -> Option<Box<dyn VersionProvider>> {
        self(url)
    }
}

/// The real provider set: GitHub, then GitLab, then PyPI
pub struct UpstreamProviders {
    client: HttpClient,
    config: ProvidersConfig,
}

impl UpstreamProviders {
    /// Create a new provider factory
    pub fn new(client: HttpClient, config: ProvidersConfig) -> Self {
        Self { client, config }
    }
}

impl ProviderFactory for UpstreamProviders {
    fn create(&self, url: &str) -> Option<Box<dyn VersionProvider>> {
        if let Some(provider) = GitHubProvider::from_url(url, self.client.clone()) {
            let provider = provider.with_api_key(self.config.github.api_key.clone());
            return Some(Box::new(provider));
        }
        if let Some(provider) = GitLabProvider::from_url(url, self.client.clone()) {
            let api_key = self.config.gitlab.api_keys.get(provider.host()).cloned();
            return Some(Box::new(provider.with_api_key(api_key)));
        }
        if let Some(provider) = PyPIProvider::from_url(url, self.client.clone()) {
            return Some(Box::new(provider));
        }
        None
    }
}

/// Try the release listing first and fall back to tags when no release
/// carries a usable version. Both causes are kept if the tags fail too.
pub(crate) async fn release_or_tag<R, T>(release: R, tag: T) -> Result<Version, UpstreamError>
where
    R: Future<Output = Result<Version, UpstreamError>>,
    T: Future<Output = Result<Version, UpstreamError>>,
{
    match release.await {
        Ok(version) => Ok(version),
        Err(release_err) if release_err.is_not_found() => match tag.await {
            Ok(version) => Ok(version),
            Err(tag_err) => Err(UpstreamError::Joined(vec![release_err, tag_err])),
        },
        Err(release_err) => Err(release_err),
    }
}

/// First candidate that parses as an upstream version
pub(crate) fn first_valid_version<'a>(
    candidates: impl IntoIterator<Item = &'a str>,
) -> Option<Version> {
    candidates.into_iter().find_map(Version::parse)
}
