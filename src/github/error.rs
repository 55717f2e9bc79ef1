//! Error types exposed by the GitHub export layer.

use thiserror::Error;

use super::rate_limit::{RateLimitInfo, RateLimitKind};

/// Errors surfaced while parsing input or communicating with GitHub.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExportError {
    /// The provided URL could not be parsed.
    #[error("pull request URL is invalid: {0}")]
    InvalidUrl(String),

    /// The pull request path is incomplete.
    #[error("pull request URL must match /owner/repo/pull/<number>")]
    MissingPathSegments,

    /// The pull request number is not a valid integer.
    #[error("pull request number must be a positive integer")]
    InvalidPullRequestNumber,

    /// No open pull request could be selected automatically.
    #[error("no open pull request found for {owner}/{repo}")]
    NoOpenPullRequest {
        /// Repository owner.
        owner: String,
        /// Repository name.
        repo: String,
    },

    /// The authentication token was missing.
    #[error("personal access token is required")]
    MissingToken,

    /// The authentication token was rejected by GitHub.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// GitHub returned a non-authentication API error.
    #[error("GitHub API error: {message}")]
    Api {
        /// Response body from GitHub describing the failure.
        message: String,
    },

    /// Networking failed while calling GitHub.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// A GraphQL response did not have the expected shape.
    #[error("unexpected GraphQL response: {message}")]
    GraphQl {
        /// Description of the malformed response section.
        message: String,
    },

    /// GitHub returned a 5xx response.
    #[error("GitHub server error ({status}): {message}")]
    Server {
        /// HTTP status code as text.
        status: String,
        /// Response body from GitHub describing the failure.
        message: String,
    },

    /// A primary or secondary rate limit response.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimitExceeded {
        /// Which throttle produced the response.
        kind: RateLimitKind,
        /// Rate limit info if available from the API.
        rate_limit: Option<RateLimitInfo>,
        /// Error message from GitHub.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// Output template could not be rendered.
    #[error("template error: {message}")]
    Template {
        /// Details from the template engine.
        message: String,
    },

    /// Configuration could not be loaded or is incomplete.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },
}

impl ExportError {
    /// True when the failure is worth retrying at the transport layer.
    ///
    /// Network errors, 5xx responses, and rate limits are transient;
    /// everything else is either a caller mistake or a definitive API answer.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::Server { .. } | Self::RateLimitExceeded { .. }
        )
    }
}
