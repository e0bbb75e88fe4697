//! Pipeline steps
//!
//! This module provides:
//! - The `Action` trait implemented by every step
//! - `ActionResult`, the outcome a step reports
//! - The check, bump, make, commit and push steps
//! - `CommandRunner` for steps running external programs

mod bump;
mod check;
pub mod command;
mod commit;
mod make;
mod push;

pub use bump::BumpAction;
pub use check::CheckAction;
pub use command::{CommandRunner, SystemCommandRunner};
pub use commit::CommitAction;
pub use make::MakeAction;
pub use push::PushAction;

use crate::domain::Package;
use crate::error::ActionError;
use async_trait::async_trait;
use std::fmt;

/// Terminal status of one step execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    Success,
    Skipped,
    Failed,
}

/// Outcome of one step execution.
///
/// A failed result always carries an error and a skipped one never does.
#[derive(Debug)]
pub struct ActionResult {
    status: ActionStatus,
    detail: String,
    error: Option<ActionError>,
}

impl ActionResult {
    /// The step did its work
    pub fn success(detail: impl Into<String>) -> Self {
        Self {
            status: ActionStatus::Success,
            detail: detail.into(),
            error: None,
        }
    }

    /// The step had nothing to do
    pub fn skipped(detail: impl Into<String>) -> Self {
        Self {
            status: ActionStatus::Skipped,
            detail: detail.into(),
            error: None,
        }
    }

    /// The step failed with `error`
    pub fn failed(error: impl Into<ActionError>, detail: impl Into<String>) -> Self {
        Self {
            status: ActionStatus::Failed,
            detail: detail.into(),
            error: Some(error.into()),
        }
    }

    pub fn status(&self) -> ActionStatus {
        self.status
    }

    /// Short human readable summary, possibly empty
    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn error(&self) -> Option<&ActionError> {
        self.error.as_ref()
    }

    pub fn is_success(&self) -> bool {
        self.status == ActionStatus::Success
    }
}

impl fmt::Display for ActionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.detail)
    }
}

/// One step of a package pipeline
#[async_trait]
pub trait Action: Send + Sync {
    /// Run the step against the package. Only the package itself may be
    /// mutated; everything else the step does happens outside the process.
    async fn execute(&self, pkg: &mut Package) -> ActionResult;
}

#[cfg(test)]
pub(crate) mod stub {
    use super::*;
    use crate::error::StepError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Step reporting a fixed status and counting its executions
    pub(crate) struct StubAction {
        status: ActionStatus,
        label: &'static str,
        runs: Arc<AtomicUsize>,
    }

    impl StubAction {
        pub(crate) fn new(status: ActionStatus, label: &'static str) -> Self {
            Self {
                status,
                label,
                runs: Arc::new(AtomicUsize::new(0)),
            }
        }

        /// Shared execution counter
        pub(crate) fn counter(&self) -> Arc<AtomicUsize> {
            Arc::clone(&self.runs)
        }
    }

    #[async_trait]
    impl Action for StubAction {
        async fn execute(&self, _pkg: &mut Package) -> ActionResult {
            self.runs.fetch_add(1, Ordering::SeqCst);
            // Let other pipelines make progress in between.
            tokio::task::yield_now().await;
            match self.status {
                ActionStatus::Success => ActionResult::success(self.label),
                ActionStatus::Skipped => ActionResult::skipped(self.label),
                ActionStatus::Failed => {
                    ActionResult::failed(ActionError::Make(StepError::UnexpectedChanges), self.label)
                }
            }
        }
    }
}
