//! Error mapping helpers for the Octocrab export gateway.

use http::StatusCode;

use crate::github::error::ExportError;
use crate::github::rate_limit::RateLimitKind;

/// Checks if a GitHub error status indicates an authentication failure.
pub(super) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Checks if an octocrab error represents a network/transport issue.
pub(super) const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// Checks whether the GitHub error represents a rate limit error based on the
/// HTTP status and message / documentation URL content.
pub(super) fn is_rate_limit_error(source: &octocrab::GitHubError) -> bool {
    let is_rate_limit_status = matches!(
        source.status_code,
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    );

    let message_indicates_rate_limit = source.message.to_lowercase().contains("rate limit")
        || source
            .documentation_url
            .as_deref()
            .is_some_and(|url| url.contains("rate-limit"));

    is_rate_limit_status && message_indicates_rate_limit
}

/// Distinguishes secondary (abuse-detection) rate limits from the primary
/// quota. GitHub signals the secondary limit with HTTP 429 or a message
/// mentioning it explicitly.
pub(super) fn rate_limit_kind(source: &octocrab::GitHubError) -> RateLimitKind {
    let message = source.message.to_lowercase();
    if source.status_code == StatusCode::TOO_MANY_REQUESTS
        || message.contains("secondary")
        || message.contains("abuse")
    {
        RateLimitKind::Secondary
    } else {
        RateLimitKind::Primary
    }
}

/// Maps a non-rate-limit octocrab error into an [`ExportError`].
///
/// Rate limit responses are handled by the gateway's async wrapper, which
/// enriches them with live quota data before this fallback is consulted.
pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> ExportError {
    if let octocrab::Error::GitHub { source, .. } = error {
        return if source.status_code.is_server_error() {
            ExportError::Server {
                status: source.status_code.to_string(),
                message: format!("{operation} failed: {message}", message = source.message),
            }
        } else if is_auth_failure(source.status_code) {
            ExportError::Authentication {
                message: format!(
                    "{operation} failed: GitHub returned {status} {message}",
                    status = source.status_code,
                    message = source.message
                ),
            }
        } else {
            ExportError::Api {
                message: format!(
                    "{operation} failed with status {status}: {message}",
                    status = source.status_code,
                    message = source.message
                ),
            }
        };
    }

    if is_network_error(error) {
        return ExportError::Network {
            message: format!("{operation} failed: {error}"),
        };
    }

    ExportError::Api {
        message: format!("{operation} failed: {error}"),
    }
}
