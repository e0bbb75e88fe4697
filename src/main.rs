//! bumper - bump AUR packages to their latest upstream versions
//!
//! Exit codes:
//! - 0: every package finished without a failure
//! - 1: fatal error before any package was processed
//! - 2: at least one package failed

use bumper::action::{CommandRunner, SystemCommandRunner};
use bumper::cli::{CliArgs, RunOptions};
use bumper::config::Config;
use bumper::logging;
use bumper::manifest::collect_packages;
use bumper::orchestrator::{build_actions, run};
use bumper::progress::ProgressDisplay;
use bumper::upstream::HttpClient;
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    logging::init(args.verbose);

    match run_bumper(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run_bumper(args: CliArgs) -> anyhow::Result<ExitCode> {
    let options = RunOptions::from(&args);
    let config = Config::load(args.config.as_deref())?.with_overrides(args.overrides.clone());

    let mut packages = collect_packages(&args.path, args.depth)?;
    debug!(
        "found {} packages in {}",
        packages.len(),
        args.path.display()
    );

    let client = HttpClient::new()?;
    let runner: Arc<dyn CommandRunner> = Arc::new(SystemCommandRunner::new());
    let actions = build_actions(options, &config, client, runner);

    let names = packages.iter().map(|pkg| pkg.name().to_string());
    let mut display = ProgressDisplay::new(names, !args.quiet);
    run(&mut packages, &actions, &mut display).await;

    if display.has_failures() {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
