//! Scripted providers for unit tests

use super::{ProviderFactory, ProviderKey, ProviderKind, VersionProvider};
use crate::domain::Version;
use crate::error::UpstreamError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Provider answering with a fixed version, or not found when `None`
pub(crate) struct FakeProvider {
    key: ProviderKey,
    version: Option<&'static str>,
    queries: Arc<Mutex<Vec<ProviderKey>>>,
}

#[async_trait]
impl VersionProvider for FakeProvider {
    fn key(&self) -> ProviderKey {
        self.key.clone()
    }

    async fn latest_version(&self) -> Result<Version, UpstreamError> {
        self.queries.lock().unwrap().push(self.key.clone());
        self.version
            .map(Version::new)
            .ok_or_else(|| UpstreamError::not_found(format!("{} has no releases", self.key)))
    }
}

/// Factory mapping known URLs to fake providers and recording every query
#[derive(Clone, Default)]
pub(crate) struct FakeProviders {
    responses: HashMap<String, (String, Option<&'static str>)>,
    queries: Arc<Mutex<Vec<ProviderKey>>>,
}

impl FakeProviders {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Map `url` to the fake project `project` answering with `version`
    pub(crate) fn with(mut self, url: &str, project: &str, version: Option<&'static str>) -> Self {
        self.responses
            .insert(url.to_string(), (project.to_string(), version));
        self
    }

    /// Keys of every provider queried so far, in order
    pub(crate) fn queries(&self) -> Vec<ProviderKey> {
        self.queries.lock().unwrap().clone()
    }
}

impl ProviderFactory for FakeProviders {
    fn create(&self, url: &str) -> Option<Box<dyn VersionProvider>> {
        let (project, version) = self.responses.get(url)?;
        Some(Box::new(FakeProvider {
            key: ProviderKey::new(ProviderKind::GitHub, "fake", project),
            version: *version,
            queries: Arc::clone(&self.queries),
        }))
    }
}
