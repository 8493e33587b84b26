//! ccview - ClearCase adapter for source indexers
//!
//! Extracts history, per-line authorship and historical file content from
//! ClearCase views, and keeps snapshot views up to date.
//!
//! This library provides:
//! - [`cleartool`]: cleartool command execution and parsing
//! - [`config`]: Repository configuration
//! - [`model`]: Domain models
//! - [`repository`]: Repository detection and access
//! - [`revision`]: Temp-file backed historical content
//! - [`vob`]: VOB registry

pub mod cleartool;
pub mod config;
pub mod model;
pub mod repository;
pub mod revision;
pub mod vob;

pub use cleartool::ClearCaseError;
pub use config::Config;
pub use repository::{ClearCaseRepository, Dispatcher, Repository, RepositoryKind, SyncOutcome};
