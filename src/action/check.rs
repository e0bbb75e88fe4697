//! Upstream version check step

use super::{Action, ActionResult};
use crate::domain::Package;
use crate::resolver::VersionResolver;
use async_trait::async_trait;
use std::cmp::Ordering;

/// Resolves the upstream version and marks the package as outdated or not
pub struct CheckAction {
    resolver: VersionResolver,
}

impl CheckAction {
    pub fn new(resolver: VersionResolver) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl Action for CheckAction {
    async fn execute(&self, pkg: &mut Package) -> ActionResult {
        let ordering = match self.resolver.check(pkg).await {
            Ok(Some(ordering)) => ordering,
            Ok(None) => return ActionResult::skipped(pkg.pkgver.as_str()),
            Err(e) => return ActionResult::failed(e, "?"),
        };

        let current = &pkg.pkgver;
        let upstream = pkg.upstream_version.as_ref().unwrap_or(current);
        let detail = match ordering {
            Ordering::Greater => format!("{} → {}", current, upstream),
            Ordering::Equal => current.to_string(),
            Ordering::Less => format!("{} < {} !", upstream, current),
        };
        ActionResult::success(detail)
    }
}
