//! PyPI JSON API provider
//!
//! Recognises source tarball URLs such as
//! `https://files.pythonhosted.org/packages/source/r/requests/requests-2.31.0.tar.gz`.
//! API endpoint: https://pypi.org/pypi/{package}/json

use super::{HttpClient, ProviderKey, ProviderKind, VersionProvider};
use crate::domain::Version;
use crate::error::UpstreamError;
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

/// PyPI API base URL
const PYPI_API_URL: &str = "https://pypi.org";

static PYPI_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(files\.pythonhosted\.org|pypi\.python\.org|pypi\.org|pypi\.io)/packages/source/[a-z]/([^/#?]+)/",
    )
    .expect("valid regex")
});

/// PyPI provider
pub struct PyPIProvider {
    client: HttpClient,
    base_url: String,
    package: String,
}

/// PyPI package metadata response
#[derive(Debug, Deserialize)]
struct PyPIResponse {
    info: PackageInfo,
}

#[derive(Debug, Deserialize)]
struct PackageInfo {
    version: String,
}

impl PyPIProvider {
    /// Create a provider for the package in `url`, if it is a PyPI source URL
    pub fn from_url(url: &str, client: HttpClient) -> Option<Self> {
        let captures = PYPI_URL_RE.captures(url)?;
        Some(Self {
            client,
            base_url: PYPI_API_URL.to_string(),
            package: captures[2].to_string(),
        })
    }

    /// Send requests to another API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build the URL for the package
    fn build_url(&self) -> String {
        format!("{}/pypi/{}/json", self.base_url, self.package)
    }
}

#[async_trait]
impl VersionProvider for PyPIProvider {
    fn key(&self) -> ProviderKey {
        ProviderKey::new(ProviderKind::PyPI, "", &self.package)
    }

    async fn latest_version(&self) -> Result<Version, UpstreamError> {
        let url = self.build_url();
        let response: PyPIResponse = self.client.get_json(&url, None).await?;

        Version::parse(&response.info.version).ok_or_else(|| {
            UpstreamError::not_found(format!(
                "invalid version '{}' in {}",
                response.info.version, url
            ))
        })
    }
}
