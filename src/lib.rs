//! Magpie library crate: review bot comment export for GitHub pull requests.
//!
//! The library fetches the four comment streams attached to a pull request
//! (inline review comments, issue comments, review submissions, and GraphQL
//! review threads), reconciles the two identifier schemes the APIs use for
//! the same comments, classifies severity from body markers, evaluates a
//! strict resolution policy, and writes a deterministic numbered file tree
//! plus a summary index.

pub mod config;
pub mod export;
pub mod github;
pub mod logging;

pub use config::{ExportTarget, MagpieConfig};
pub use export::{ExportOptions, ExportReport, run_export};
pub use github::{
    ExportError, OctocrabExportGateway, PersonalAccessToken, PullRequestLocator, RepositoryLocator,
};
