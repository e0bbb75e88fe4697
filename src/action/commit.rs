//! Git commit step
//!
//! Commits the bumped PKGBUILD and .SRCINFO, refusing to do so when the
//! working tree contains any other tracked change.

use super::{Action, ActionResult, CommandRunner};
use crate::domain::{Package, PKGBUILD, SRCINFO};
use crate::error::{ActionError, StepError};
use async_trait::async_trait;
use std::sync::Arc;

/// `git status --porcelain --null` output after a clean bump
const EXPECTED_GIT_STATUS: &str = " M .SRCINFO\0 M PKGBUILD\0";

pub struct CommitAction {
    runner: Arc<dyn CommandRunner>,
    author: Option<String>,
}

impl CommitAction {
    pub fn new(runner: Arc<dyn CommandRunner>, author: Option<String>) -> Self {
        Self { runner, author }
    }

    /// Whether the bump left exactly the expected changes behind
    async fn has_changes(&self, pkg: &Package) -> Result<bool, StepError> {
        let status = self
            .runner
            .run(
                &pkg.path,
                "git",
                &["status", "--porcelain", "--null", "--untracked-files=no"],
            )
            .await?;

        if status.is_empty() {
            return Ok(false);
        }
        if status != EXPECTED_GIT_STATUS.as_bytes() {
            return Err(StepError::UnexpectedChanges);
        }
        Ok(true)
    }

    async fn commit(&self, pkg: &Package) -> Result<(), StepError> {
        self.runner
            .run(&pkg.path, "git", &["add", PKGBUILD, SRCINFO])
            .await?;

        let version = pkg
            .upstream_version
            .as_ref()
            .map(|v| v.as_str())
            .unwrap_or_default();
        let message = format!("Bump version to {}", version);
        let mut args = vec!["commit", "--message", message.as_str()];
        if let Some(author) = self.author.as_deref().filter(|a| !a.is_empty()) {
            args.extend(["--author", author]);
        }

        self.runner.run(&pkg.path, "git", &args).await?;
        Ok(())
    }
}

#[async_trait]
impl Action for CommitAction {
    async fn execute(&self, pkg: &mut Package) -> ActionResult {
        if !pkg.is_outdated {
            return ActionResult::skipped("");
        }

        match self.has_changes(pkg).await {
            Ok(true) => {}
            Ok(false) => return ActionResult::skipped(""),
            Err(e) => return ActionResult::failed(ActionError::Commit(e), "commit failed"),
        }

        match self.commit(pkg).await {
            Ok(()) => ActionResult::success("committed"),
            Err(e) => ActionResult::failed(ActionError::Commit(e), "commit failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::command::fake::FakeCommandRunner;
    use crate::action::ActionStatus;
    use crate::domain::Version;

    const GIT_STATUS: &str = "git status --porcelain --null --untracked-files=no";

    fn outdated() -> Package {
        Package {
            path: "/pkgs/foo".into(),
            upstream_version: Some(Version::new("2.0.0")),
            is_outdated: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_commit() {
        let runner = Arc::new(FakeCommandRunner::new().with_output(EXPECTED_GIT_STATUS));
        let result = CommitAction::new(runner.clone(), None)
            .execute(&mut outdated())
            .await;

        assert_eq!(result.status(), ActionStatus::Success);
        assert_eq!(result.detail(), "committed");
        assert_eq!(
            runner.commands(),
            vec![
                GIT_STATUS,
                "git add PKGBUILD .SRCINFO",
                "git commit --message Bump version to 2.0.0",
            ]
        );
    }

    #[tokio::test]
    async fn test_commit_with_author() {
        let runner = Arc::new(FakeCommandRunner::new().with_output(EXPECTED_GIT_STATUS));
        let author = Some("John Doe <john@example.com>".to_string());
        CommitAction::new(runner.clone(), author)
            .execute(&mut outdated())
            .await;

        assert_eq!(
            runner.commands().last().unwrap(),
            "git commit --message Bump version to 2.0.0 --author John Doe <john@example.com>"
        );
    }

    #[tokio::test]
    async fn test_commit_skipped_without_changes() {
        let runner = Arc::new(FakeCommandRunner::new().with_output(""));
        let result = CommitAction::new(runner.clone(), None)
            .execute(&mut outdated())
            .await;

        assert_eq!(result.status(), ActionStatus::Skipped);
        assert_eq!(runner.commands(), vec![GIT_STATUS]);
    }

    #[tokio::test]
    async fn test_commit_unexpected_changes() {
        let runner = Arc::new(
            FakeCommandRunner::new().with_output(" M .SRCINFO\0 M PKGBUILD\0 M other.patch\0"),
        );
        let result = CommitAction::new(runner.clone(), None)
            .execute(&mut outdated())
            .await;

        assert_eq!(result.status(), ActionStatus::Failed);
        assert_eq!(result.detail(), "commit failed");
        assert_eq!(
            result.error().unwrap().to_string(),
            "commit action error: unexpected changes in the repository"
        );
        assert_eq!(runner.commands().len(), 1);
    }

    #[tokio::test]
    async fn test_commit_git_failure() {
        let runner = Arc::new(
            FakeCommandRunner::new()
                .with_output(EXPECTED_GIT_STATUS)
                .with_output("")
                .with_failure("git commit", "nothing to commit"),
        );
        let result = CommitAction::new(runner, None).execute(&mut outdated()).await;

        assert_eq!(result.status(), ActionStatus::Failed);
        assert!(result
            .error()
            .unwrap()
            .to_string()
            .contains("nothing to commit"));
    }

    #[tokio::test]
    async fn test_commit_skipped_when_not_outdated() {
        let runner = Arc::new(FakeCommandRunner::new());
        let result = CommitAction::new(runner.clone(), None)
            .execute(&mut Package::default())
            .await;

        assert_eq!(result.status(), ActionStatus::Skipped);
        assert!(runner.commands().is_empty());
    }
}
