//! GitHub transport, comment stream fetchers, and wire models.
//!
//! This module wraps Octocrab to parse pull request coordinates, fetch the
//! four comment streams (inline review comments, issue comments, review
//! submissions, and GraphQL review threads), and surface friendly errors so
//! that callers never see Octocrab internals.

pub mod error;
pub mod gateway;
pub mod locator;
pub mod models;
pub mod rate_limit;

pub use error::ExportError;
pub use gateway::{
    CommentSourceGateway, OctocrabExportGateway, PullRequestSelectionGateway, RetryPolicy,
    ThreadGateway, select_latest_open,
};
pub use locator::{
    PersonalAccessToken, PullRequestLocator, PullRequestNumber, RepositoryLocator, RepositoryName,
    RepositoryOwner,
};
pub use models::{
    IssueComment, PullRequestSummary, ReviewComment, ReviewSummary, ReviewThread, ThreadMessage,
};

#[cfg(test)]
pub use gateway::{MockCommentSourceGateway, MockPullRequestSelectionGateway, MockThreadGateway};
