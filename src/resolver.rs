//! Upstream version resolution
//!
//! For one package the resolver:
//! 1. Skips VCS packages entirely
//! 2. Uses a configured override for the package, if there is one
//! 3. Builds a provider for every candidate URL, dropping duplicates
//! 4. Queries the providers in order and returns the first version found

use crate::domain::{Package, Version};
use crate::error::ResolveError;
use crate::upstream::{ProviderFactory, VersionProvider};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Resolves the latest upstream version of packages
pub struct VersionResolver {
    factory: Box<dyn ProviderFactory>,
    overrides: HashMap<String, String>,
}

impl VersionResolver {
    /// Create a resolver using the given provider factory
    pub fn new(factory: impl ProviderFactory + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            overrides: HashMap::new(),
        }
    }

    /// Use these versions instead of querying providers, keyed by pkgbase
    pub fn with_overrides(mut self, overrides: HashMap<String, String>) -> Self {
        self.overrides = overrides;
        self
    }

    /// Find the latest upstream version of the package.
    ///
    /// Returns `Ok(None)` for VCS packages, which have no comparable version.
    pub async fn resolve(&self, pkg: &Package) -> Result<Option<Version>, ResolveError> {
        if pkg.is_vcs {
            debug!("{}: VCS package, not resolving", pkg.name());
            return Ok(None);
        }

        if let Some(raw) = self.overrides.get(pkg.name()) {
            return match Version::parse(raw) {
                Some(version) => {
                    info!("{}: using version override {}", pkg.name(), version);
                    Ok(Some(version))
                }
                None => Err(ResolveError::InvalidOverride {
                    package: pkg.name().to_string(),
                    value: raw.clone(),
                }),
            };
        }

        let providers = self.providers_for(pkg);
        if providers.is_empty() {
            return Err(ResolveError::NoProvider);
        }

        let mut errors = Vec::new();
        for provider in &providers {
            match provider.latest_version().await {
                Ok(version) => {
                    info!("{}: {} reports {}", pkg.name(), provider.key(), version);
                    return Ok(Some(version));
                }
                Err(e) => {
                    warn!("{}: {} failed: {}", pkg.name(), provider.key(), e);
                    errors.push(e);
                }
            }
        }

        Err(ResolveError::AllFailed(errors))
    }

    /// Resolve the upstream version and record it on the package.
    ///
    /// Returns how the upstream version orders against the current one, or
    /// `None` when nothing was compared.
    pub async fn check(&self, pkg: &mut Package) -> Result<Option<Ordering>, ResolveError> {
        let Some(upstream) = self.resolve(pkg).await? else {
            return Ok(None);
        };

        let ordering = upstream.cmp_version(&pkg.pkgver);
        pkg.is_outdated = ordering == Ordering::Greater;
        pkg.upstream_version = Some(upstream);
        Ok(Some(ordering))
    }

    /// One provider per distinct project, in candidate URL order
    fn providers_for(&self, pkg: &Package) -> Vec<Box<dyn VersionProvider>> {
        let mut seen = HashSet::new();
        pkg.candidate_urls()
            .into_iter()
            .filter_map(|url| self.factory.create(url))
            .filter(|provider| seen.insert(provider.key()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UpstreamError;
    use crate::upstream::fake::FakeProviders;

    fn package(url: &str, sources: &[&str]) -> Package {
        Package {
            pkgbase: "foo".to_string(),
            pkgver: Version::new("1.0.0"),
            url: url.to_string(),
            sources: sources.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_later_sources() {
        let providers = FakeProviders::new()
            .with("https://one", "one", None)
            .with("https://two", "two", None)
            .with("https://three", "three", Some("2.0.0"));
        let resolver = VersionResolver::new(providers.clone());
        let pkg = package("https://one", &["https://two", "https://three"]);

        let version = resolver.resolve(&pkg).await.unwrap();

        assert_eq!(version, Some(Version::new("2.0.0")));
        assert_eq!(providers.queries().len(), 3);
    }

    #[tokio::test]
    async fn test_resolve_stops_at_first_success() {
        let providers = FakeProviders::new()
            .with("https://one", "one", Some("1.5"))
            .with("https://two", "two", Some("9.9"));
        let resolver = VersionResolver::new(providers.clone());
        let pkg = package("https://one", &["https://two"]);

        let version = resolver.resolve(&pkg).await.unwrap();

        assert_eq!(version, Some(Version::new("1.5")));
        assert_eq!(providers.queries().len(), 1);
    }

    #[tokio::test]
    async fn test_resolve_all_failed_keeps_every_error() {
        let providers = FakeProviders::new()
            .with("https://one", "one", None)
            .with("https://two", "two", None)
            .with("https://three", "three", None);
        let resolver = VersionResolver::new(providers);
        let pkg = package("https://one", &["https://two", "https://three"]);

        let err = resolver.resolve(&pkg).await.unwrap_err();

        match err {
            ResolveError::AllFailed(errors) => {
                assert_eq!(errors.len(), 3);
                assert!(errors.iter().all(UpstreamError::is_not_found));
            }
            other => panic!("expected AllFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_resolve_deduplicates_equal_sources() {
        let providers = FakeProviders::new()
            .with("https://one", "same", None)
            .with("https://two", "same", None);
        let resolver = VersionResolver::new(providers.clone());
        let pkg = package("https://one", &["label::https://two"]);

        let err = resolver.resolve(&pkg).await.unwrap_err();

        assert_eq!(providers.queries().len(), 1);
        assert!(matches!(err, ResolveError::AllFailed(ref errors) if errors.len() == 1));
    }

    #[tokio::test]
    async fn test_resolve_no_provider() {
        let resolver = VersionResolver::new(FakeProviders::new());
        let pkg = package("https://unknown", &[]);

        let err = resolver.resolve(&pkg).await.unwrap_err();

        assert!(matches!(err, ResolveError::NoProvider));
    }

    #[tokio::test]
    async fn test_resolve_override_bypasses_providers() {
        let providers = FakeProviders::new().with("https://one", "one", Some("2.0.0"));
        let overrides = HashMap::from([("foo".to_string(), "v3.1".to_string())]);
        let resolver = VersionResolver::new(providers.clone()).with_overrides(overrides);

        let version = resolver.resolve(&package("https://one", &[])).await.unwrap();

        assert_eq!(version, Some(Version::new("3.1")));
        assert!(providers.queries().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_invalid_override_is_an_error() {
        let providers = FakeProviders::new().with("https://one", "one", Some("2.0.0"));
        let overrides = HashMap::from([("foo".to_string(), "not-a-version".to_string())]);
        let resolver = VersionResolver::new(providers.clone()).with_overrides(overrides);

        let err = resolver.resolve(&package("https://one", &[])).await.unwrap_err();

        assert!(matches!(err, ResolveError::InvalidOverride { ref value, .. } if value == "not-a-version"));
        assert!(providers.queries().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_skips_vcs_packages() {
        let providers = FakeProviders::new().with("https://one", "one", Some("2.0.0"));
        let resolver = VersionResolver::new(providers.clone());
        let mut pkg = package("https://one", &[]);
        pkg.is_vcs = true;

        assert_eq!(resolver.check(&mut pkg).await.unwrap(), None);
        assert_eq!(pkg.upstream_version, None);
        assert!(!pkg.is_outdated);
        assert!(providers.queries().is_empty());
    }

    #[tokio::test]
    async fn test_check_marks_outdated_from_second_source() {
        let providers = FakeProviders::new()
            .with("https://one", "one", None)
            .with("https://two", "two", Some("2.0.0"));
        let resolver = VersionResolver::new(providers);
        let mut pkg = package("https://one", &["https://two"]);

        let ordering = resolver.check(&mut pkg).await.unwrap();

        assert_eq!(ordering, Some(Ordering::Greater));
        assert_eq!(pkg.upstream_version, Some(Version::new("2.0.0")));
        assert!(pkg.is_outdated);
    }

    #[tokio::test]
    async fn test_check_up_to_date_and_older_upstream() {
        let providers = FakeProviders::new()
            .with("https://same", "same", Some("1.0.0"))
            .with("https://older", "older", Some("0.9"));
        let resolver = VersionResolver::new(providers);

        let mut pkg = package("https://same", &[]);
        assert_eq!(resolver.check(&mut pkg).await.unwrap(), Some(Ordering::Equal));
        assert!(!pkg.is_outdated);

        let mut pkg = package("https://older", &[]);
        assert_eq!(resolver.check(&mut pkg).await.unwrap(), Some(Ordering::Less));
        assert!(!pkg.is_outdated);
    }
}
