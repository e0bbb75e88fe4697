//! Run orchestration across packages
//!
//! This module provides:
//! - Step selection from the run options and configuration
//! - Concurrent execution of one pipeline per package
//! - Fan-in of every pipeline's events to a single observer, in per-package order

use crate::action::{
    Action, ActionResult, BumpAction, CheckAction, CommandRunner, CommitAction, MakeAction,
    PushAction,
};
use crate::cli::RunOptions;
use crate::config::Config;
use crate::domain::Package;
use crate::pipeline::run_pipeline;
use crate::resolver::VersionResolver;
use crate::upstream::{HttpClient, UpstreamProviders};
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// Receives the events of a run.
///
/// Events of one package arrive in pipeline order, the finished event last.
/// Events of different packages may interleave.
pub trait RunObserver {
    /// A step of package `index` produced a result
    fn on_result(&mut self, index: usize, result: ActionResult);

    /// The pipeline of package `index` completed
    fn on_finished(&mut self, index: usize);
}

/// Event sent from a pipeline to the observer
enum Event {
    Result(usize, ActionResult),
    Finished(usize),
}

/// Build the list of steps selected by the options, in execution order
pub fn build_actions(
    options: RunOptions,
    config: &Config,
    client: HttpClient,
    runner: Arc<dyn CommandRunner>,
) -> Vec<Box<dyn Action>> {
    let providers = UpstreamProviders::new(client, config.check.providers.clone());
    let resolver =
        VersionResolver::new(providers).with_overrides(config.check.version_overrides.clone());

    let mut actions: Vec<Box<dyn Action>> = vec![Box::new(CheckAction::new(resolver))];
    if options.bump {
        actions.push(Box::new(BumpAction::new(Arc::clone(&runner))));
    }
    if options.make {
        actions.push(Box::new(MakeAction::new(Arc::clone(&runner))));
    }
    if options.commit {
        actions.push(Box::new(CommitAction::new(
            Arc::clone(&runner),
            config.commit.author.clone(),
        )));
    }
    if options.push {
        actions.push(Box::new(PushAction::new(runner)));
    }
    actions
}

/// Run every package's pipeline concurrently and report to `observer`.
///
/// Returns once all pipelines have finished and every event was delivered.
pub async fn run<O: RunObserver>(
    packages: &mut [Package],
    actions: &[Box<dyn Action>],
    observer: &mut O,
) {
    debug!(
        "running {} steps for {} packages",
        actions.len(),
        packages.len()
    );
    let (tx, mut rx) = mpsc::unbounded_channel();

    let pipelines = join_all(packages.iter_mut().enumerate().map(|(index, pkg)| {
        let tx = tx.clone();
        async move {
            run_pipeline(pkg, actions, |result| {
                // The receiver outlives every pipeline.
                let _ = tx.send(Event::Result(index, result));
            })
            .await;
            let _ = tx.send(Event::Finished(index));
        }
    }));
    // Only the pipelines hold senders now, so the channel closes with the last one.
    drop(tx);

    let deliver = async {
        while let Some(event) = rx.recv().await {
            match event {
                Event::Result(index, result) => observer.on_result(index, result),
                Event::Finished(index) => observer.on_finished(index),
            }
        }
    };

    tokio::join!(pipelines, deliver);
}

/// Observer built from a pair of closures
struct Handlers<R, F> {
    on_result: R,
    on_finished: F,
}

impl<R, F> RunObserver for Handlers<R, F>
where
    R: FnMut(usize, ActionResult),
    F: FnMut(usize),
{
    fn on_result(&mut self, index: usize, result: ActionResult) {
        (self.on_result)(index, result)
    }

    fn on_finished(&mut self, index: usize) {
        (self.on_finished)(index)
    }
}

/// [`run`] with plain callbacks instead of an observer
pub async fn run_with_handlers<R, F>(
    packages: &mut [Package],
    actions: &[Box<dyn Action>],
    on_result: R,
    on_finished: F,
) where
    R: FnMut(usize, ActionResult),
    F: FnMut(usize),
{
    let mut handlers = Handlers {
        on_result,
        on_finished,
    };
    run(packages, actions, &mut handlers).await;
}
