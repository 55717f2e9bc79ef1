//! Gateways for fetching pull request comment streams through Octocrab.
//!
//! The trait-based design enables mocking in tests while the Octocrab
//! implementation handles real HTTP requests, pagination, and the bounded
//! retry/backoff policy.

mod client;
mod error_mapping;
mod pull_request;
mod rest;
mod retry;
mod threads;

pub use pull_request::select_latest_open;
pub use retry::RetryPolicy;

use async_trait::async_trait;
use octocrab::Octocrab;

use crate::github::error::ExportError;
use crate::github::locator::{PersonalAccessToken, PullRequestLocator, RepositoryLocator};
use crate::github::models::{
    IssueComment, PullRequestSummary, ReviewComment, ReviewSummary, ReviewThread,
};
use crate::github::rate_limit::{RateLimitInfo, RateLimitKind};

use client::build_octocrab_client;

/// Gateway for the three REST comment streams on a pull request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentSourceGateway: Send + Sync {
    /// Fetch all inline review comments, following pagination.
    async fn list_review_comments(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<Vec<ReviewComment>, ExportError>;

    /// Fetch all general issue comments, following pagination.
    async fn list_issue_comments(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<Vec<IssueComment>, ExportError>;

    /// Fetch all PR-level review submissions, following pagination.
    async fn list_reviews(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<Vec<ReviewSummary>, ExportError>;
}

/// Gateway for the GraphQL review thread stream.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ThreadGateway: Send + Sync {
    /// Fetch review threads with their nested messages.
    ///
    /// Bounded to the first 100 threads with 100 messages each; anything
    /// beyond that bound is a documented limitation, not an error.
    async fn list_review_threads(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<Vec<ReviewThread>, ExportError>;
}

/// Gateway for selecting a pull request when no number was supplied.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PullRequestSelectionGateway: Send + Sync {
    /// Returns the most recently updated open pull request, if any.
    async fn latest_open_pull_request(
        &self,
        locator: &RepositoryLocator,
    ) -> Result<Option<PullRequestSummary>, ExportError>;
}

/// Octocrab-backed implementation of every export gateway trait.
pub struct OctocrabExportGateway {
    client: Octocrab,
    retry: RetryPolicy,
}

impl OctocrabExportGateway {
    /// Creates a gateway from an existing Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    /// Builds an authenticated gateway for the given token and API base URL.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::InvalidUrl` when the base URI cannot be parsed
    /// or `ExportError::Api` when Octocrab fails to construct a client.
    pub fn for_token(token: &PersonalAccessToken, api_base: &str) -> Result<Self, ExportError> {
        let client = build_octocrab_client(token, api_base)?;
        Ok(Self::new(client, RetryPolicy::default()))
    }

    pub(super) const fn client(&self) -> &Octocrab {
        &self.client
    }

    pub(super) const fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Maps an Octocrab failure into an [`ExportError`], attaching live
    /// quota data to primary rate-limit errors so the retry layer can wait
    /// for the server-provided reset instead of guessing.
    pub(super) async fn map_error_with_rate_limit(
        &self,
        operation: &str,
        error: &octocrab::Error,
    ) -> ExportError {
        match error {
            octocrab::Error::GitHub { source, .. }
                if error_mapping::is_rate_limit_error(source) =>
            {
                let kind = error_mapping::rate_limit_kind(source);
                // Secondary limits throttle the very lookup we would make;
                // only the primary quota endpoint is worth querying.
                let rate_limit = match kind {
                    RateLimitKind::Primary => self.fetch_rate_limit_info().await,
                    RateLimitKind::Secondary => None,
                };
                let base_message =
                    format!("{operation} failed: {message}", message = source.message);
                let message = match &rate_limit {
                    Some(info) => format!(
                        "{base_message} (resets at {reset})",
                        reset = info.reset_at()
                    ),
                    None => base_message,
                };

                ExportError::RateLimitExceeded {
                    kind,
                    rate_limit,
                    message,
                }
            }
            _ => error_mapping::map_octocrab_error(operation, error),
        }
    }

    /// Fetches current rate limit information from the GitHub API.
    async fn fetch_rate_limit_info(&self) -> Option<RateLimitInfo> {
        let rate = self.client.ratelimit().get().await.ok()?.rate;
        let Ok(limit) = u32::try_from(rate.limit) else {
            return None;
        };
        let Ok(remaining) = u32::try_from(rate.remaining) else {
            return None;
        };
        Some(RateLimitInfo::new(limit, remaining, rate.reset))
    }
}
