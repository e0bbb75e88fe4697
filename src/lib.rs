//! bumper - keep AUR packages up to date with their upstream releases
//!
//! For every package found the library:
//! - Resolves the latest upstream version (GitHub, GitLab, PyPI)
//! - Compares it with the packaged version using pacman's ordering
//! - Bumps, builds, commits and pushes outdated packages
//!
//! Packages are processed concurrently, each through its own step pipeline.

pub mod action;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod orchestrator;
pub mod pipeline;
pub mod progress;
pub mod resolver;
pub mod upstream;
