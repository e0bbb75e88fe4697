//! Version bump step
//!
//! Rewrites the PKGBUILD to the upstream version, refreshes the checksums
//! with `updpkgsums` and regenerates .SRCINFO with `makepkg --printsrcinfo`.

use super::{Action, ActionResult, CommandRunner};
use crate::domain::{Package, Version};
use crate::error::{ActionError, StepError};
use crate::manifest::bump_pkgbuild;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

pub struct BumpAction {
    runner: Arc<dyn CommandRunner>,
}

impl BumpAction {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    async fn rewrite_pkgbuild(&self, pkg: &Package, upstream: &Version) -> Result<(), StepError> {
        let path = pkg.pkgbuild_path();
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| StepError::io("PKGBUILD reading", e))?;

        let bumped = bump_pkgbuild(&content, &pkg.pkgver, upstream, &pkg.pkgrel);

        tokio::fs::write(&path, bumped)
            .await
            .map_err(|e| StepError::io("PKGBUILD writing", e))
    }

    async fn updpkgsums(&self, pkg: &Package) -> Result<(), StepError> {
        self.runner.run(&pkg.path, "updpkgsums", &[]).await?;
        Ok(())
    }

    async fn regenerate_srcinfo(&self, pkg: &Package) -> Result<(), StepError> {
        let srcinfo = self
            .runner
            .run(&pkg.path, "makepkg", &["--printsrcinfo"])
            .await?;
        tokio::fs::write(pkg.srcinfo_path(), srcinfo)
            .await
            .map_err(|e| StepError::io(".SRCINFO writing", e))
    }
}

#[async_trait]
impl Action for BumpAction {
    async fn execute(&self, pkg: &mut Package) -> ActionResult {
        let upstream = match (&pkg.upstream_version, pkg.is_outdated) {
            (Some(upstream), true) => upstream.clone(),
            _ => return ActionResult::skipped(""),
        };

        if let Err(e) = self.rewrite_pkgbuild(pkg, &upstream).await {
            return ActionResult::failed(ActionError::Bump(e), "bump failed");
        }
        if let Err(e) = self.updpkgsums(pkg).await {
            return ActionResult::failed(ActionError::Bump(e), "updpkgsums failed");
        }
        if let Err(e) = self.regenerate_srcinfo(pkg).await {
            return ActionResult::failed(ActionError::Bump(e), "makepkg failed");
        }

        info!("{}: bumped to {}", pkg.name(), upstream);
        ActionResult::success("bumped")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::command::fake::FakeCommandRunner;
    use crate::action::ActionStatus;
    use std::fs;
    use tempfile::TempDir;

    const PKGBUILD: &str = "pkgname=foo\npkgver=1.0.0\npkgrel=3\nsource=(\"https://x/foo-1.0.0.tar.gz\")\n";

    fn outdated_package(dir: &TempDir) -> Package {
        fs::write(dir.path().join("PKGBUILD"), PKGBUILD).unwrap();
        fs::write(dir.path().join(".SRCINFO"), "old").unwrap();
        Package {
            path: dir.path().to_path_buf(),
            pkgbase: "foo".to_string(),
            pkgver: Version::new("1.0.0"),
            pkgrel: "3".to_string(),
            upstream_version: Some(Version::new("1.1.0")),
            is_outdated: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_bump_rewrites_files_and_runs_tools() {
        let dir = tempfile::tempdir().unwrap();
        let mut pkg = outdated_package(&dir);
        let runner = Arc::new(
            FakeCommandRunner::new()
                .with_output("")
                .with_output("pkgbase = foo\n\tpkgver = 1.1.0\n"),
        );

        let result = BumpAction::new(runner.clone()).execute(&mut pkg).await;

        assert_eq!(result.status(), ActionStatus::Success);
        assert_eq!(result.detail(), "bumped");
        assert_eq!(
            runner.commands(),
            vec!["updpkgsums", "makepkg --printsrcinfo"]
        );
        assert!(runner.dirs().iter().all(|d| d == dir.path()));

        let pkgbuild = fs::read_to_string(dir.path().join("PKGBUILD")).unwrap();
        assert_eq!(
            pkgbuild,
            "pkgname=foo\npkgver=1.1.0\npkgrel=1\nsource=(\"https://x/foo-1.1.0.tar.gz\")\n"
        );
        let srcinfo = fs::read_to_string(dir.path().join(".SRCINFO")).unwrap();
        assert_eq!(srcinfo, "pkgbase = foo\n\tpkgver = 1.1.0\n");
    }

    #[tokio::test]
    async fn test_bump_skipped_when_not_outdated() {
        let dir = tempfile::tempdir().unwrap();
        let mut pkg = outdated_package(&dir);
        pkg.is_outdated = false;
        let runner = Arc::new(FakeCommandRunner::new());

        let result = BumpAction::new(runner.clone()).execute(&mut pkg).await;

        assert_eq!(result.status(), ActionStatus::Skipped);
        assert!(runner.commands().is_empty());
        assert_eq!(
            fs::read_to_string(dir.path().join("PKGBUILD")).unwrap(),
            PKGBUILD
        );
    }

    #[tokio::test]
    async fn test_bump_missing_pkgbuild() {
        let dir = tempfile::tempdir().unwrap();
        let mut pkg = outdated_package(&dir);
        fs::remove_file(dir.path().join("PKGBUILD")).unwrap();
        let runner = Arc::new(FakeCommandRunner::new());

        let result = BumpAction::new(runner.clone()).execute(&mut pkg).await;

        assert_eq!(result.status(), ActionStatus::Failed);
        assert_eq!(result.detail(), "bump failed");
        assert!(runner.commands().is_empty());
    }

    #[tokio::test]
    async fn test_bump_updpkgsums_failure_stops_before_makepkg() {
        let dir = tempfile::tempdir().unwrap();
        let mut pkg = outdated_package(&dir);
        let runner = Arc::new(FakeCommandRunner::new().with_failure("updpkgsums", "no network"));

        let result = BumpAction::new(runner.clone()).execute(&mut pkg).await;

        assert_eq!(result.status(), ActionStatus::Failed);
        assert_eq!(result.detail(), "updpkgsums failed");
        let message = result.error().unwrap().to_string();
        assert!(message.starts_with("bump action error"));
        assert!(message.contains("no network"));
        assert_eq!(runner.commands(), vec!["updpkgsums"]);
    }

    #[tokio::test]
    async fn test_bump_makepkg_failure_keeps_srcinfo() {
        let dir = tempfile::tempdir().unwrap();
        let mut pkg = outdated_package(&dir);
        let runner = Arc::new(
            FakeCommandRunner::new()
                .with_output("")
                .with_failure("makepkg --printsrcinfo", "bad PKGBUILD"),
        );

        let result = BumpAction::new(runner).execute(&mut pkg).await;

        assert_eq!(result.detail(), "makepkg failed");
        assert_eq!(
            fs::read_to_string(dir.path().join(".SRCINFO")).unwrap(),
            "old"
        );
    }
}
