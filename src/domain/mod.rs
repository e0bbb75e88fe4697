//! Core domain models for bumper
//!
//! This module contains the fundamental types used throughout the application:
//! - Version strings and their pacman-style ordering
//! - The package record that pipeline steps work on

mod package;
mod version;

pub use package::{pkgbuild_path, srcinfo_path, Package, PKGBUILD, SRCINFO};
pub use version::{vercmp, Version};
