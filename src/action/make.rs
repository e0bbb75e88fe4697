//! Package build step

use super::{Action, ActionResult, CommandRunner};
use crate::domain::Package;
use crate::error::{ActionError, StepError};
use async_trait::async_trait;
use std::sync::Arc;

/// Builds the package with `makepkg --force --clean`
pub struct MakeAction {
    runner: Arc<dyn CommandRunner>,
}

impl MakeAction {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl Action for MakeAction {
    async fn execute(&self, pkg: &mut Package) -> ActionResult {
        if !pkg.is_outdated {
            return ActionResult::skipped("");
        }

        match self
            .runner
            .run(&pkg.path, "makepkg", &["--force", "--clean"])
            .await
        {
            Ok(_) => ActionResult::success("built"),
            Err(e) => ActionResult::failed(ActionError::Make(StepError::from(e)), "build failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::command::fake::FakeCommandRunner;
    use crate::action::ActionStatus;

    fn outdated() -> Package {
        Package {
            path: "/pkgs/foo".into(),
            is_outdated: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_make_runs_makepkg() {
        let runner = Arc::new(FakeCommandRunner::new());
        let result = MakeAction::new(runner.clone()).execute(&mut outdated()).await;

        assert_eq!(result.status(), ActionStatus::Success);
        assert_eq!(result.detail(), "built");
        assert_eq!(runner.commands(), vec!["makepkg --force --clean"]);
        assert_eq!(runner.dirs(), vec![std::path::PathBuf::from("/pkgs/foo")]);
    }

    #[tokio::test]
    async fn test_make_failure() {
        let runner = Arc::new(
            FakeCommandRunner::new().with_failure("makepkg --force --clean", "compile error"),
        );
        let result = MakeAction::new(runner).execute(&mut outdated()).await;

        assert_eq!(result.status(), ActionStatus::Failed);
        assert_eq!(result.detail(), "build failed");
        assert!(result
            .error()
            .unwrap()
            .to_string()
            .contains("compile error"));
    }

    #[tokio::test]
    async fn test_make_skipped_when_not_outdated() {
        let runner = Arc::new(FakeCommandRunner::new());
        let result = MakeAction::new(runner.clone())
            .execute(&mut Package::default())
            .await;

        assert_eq!(result.status(), ActionStatus::Skipped);
        assert!(runner.commands().is_empty());
    }
}
