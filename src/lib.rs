//! drupal-security-advisories - composer metapackage builder library
//!
//! This library provides the core functionality for turning drupal.org
//! release histories into composer `conflict` rules:
//! - Version normalization and ordering (`domain`)
//! - Branch resolution and constraint derivation (`derivation`)
//! - drupal.org clients with an on-disk response cache (`registry`)
//! - Loading and writing `composer-*.json` (`manifest`)

pub mod cli;
pub mod derivation;
pub mod domain;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod registry;
