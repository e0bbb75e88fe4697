//! Git push step
//!
//! Pushes only from the master branch and only when it is ahead of origin.

use super::{Action, ActionResult, CommandRunner};
use crate::domain::Package;
use crate::error::{ActionError, StepError};
use async_trait::async_trait;
use std::sync::Arc;

/// The only branch AUR accepts pushes to
const MASTER_BRANCH: &str = "master";

/// Revision range comparing local master with its remote counterpart
const DIFF_TARGET: &str = "master...origin/master";

pub struct PushAction {
    runner: Arc<dyn CommandRunner>,
}

impl PushAction {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    async fn ensure_on_master(&self, pkg: &Package) -> Result<(), StepError> {
        let branch = self
            .runner
            .run(&pkg.path, "git", &["branch", "--show-current"])
            .await?;

        if String::from_utf8_lossy(&branch).trim() != MASTER_BRANCH {
            return Err(StepError::WrongBranch {
                expected: MASTER_BRANCH.to_string(),
            });
        }
        Ok(())
    }

    /// Whether local master has commits origin does not
    async fn is_ahead_of_origin(&self, pkg: &Package) -> Result<bool, StepError> {
        let output = self
            .runner
            .run(
                &pkg.path,
                "git",
                &["rev-list", "--left-right", "--count", DIFF_TARGET],
            )
            .await?;

        let output = String::from_utf8_lossy(&output);
        let ahead = output
            .split_whitespace()
            .next()
            .ok_or_else(|| StepError::UnexpectedOutput {
                command: "git rev-list".to_string(),
                output: output.to_string(),
            })?;

        Ok(ahead != "0")
    }
}

#[async_trait]
impl Action for PushAction {
    async fn execute(&self, pkg: &mut Package) -> ActionResult {
        if !pkg.is_outdated {
            return ActionResult::skipped("");
        }

        if let Err(e) = self.ensure_on_master(pkg).await {
            return ActionResult::failed(ActionError::Push(e), "push failed");
        }

        match self.is_ahead_of_origin(pkg).await {
            Ok(true) => {}
            Ok(false) => return ActionResult::skipped(""),
            Err(e) => return ActionResult::failed(ActionError::Push(e), "push failed"),
        }

        match self.runner.run(&pkg.path, "git", &["push"]).await {
            Ok(_) => ActionResult::success("pushed"),
            Err(e) => ActionResult::failed(ActionError::Push(StepError::from(e)), "push failed"),
        }
    }
}
