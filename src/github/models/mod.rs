//! Data models for pull request comment streams and review threads.
//!
//! Types prefixed with `Api` are internal deserialisation targets for the
//! REST API that convert into public domain types. Review threads are only
//! available through the GraphQL API and are parsed by the thread gateway.

use serde::Deserialize;

/// An inline review comment anchored to a file and line in the diff.
///
/// The REST API identifies the comment twice: by a numeric `id` and by a
/// `node_id` string. The GraphQL API uses its own pair (database id and
/// global id) for the same logical comment, which is what the reconciler
/// matches against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewComment {
    /// Numeric REST identifier.
    pub id: u64,
    /// GraphQL-compatible node identifier, when the response includes one.
    pub node_id: Option<String>,
    /// Comment body.
    pub body: Option<String>,
    /// Author login.
    pub author: Option<String>,
    /// File path the comment is attached to.
    pub file_path: Option<String>,
    /// Line number in the diff the comment refers to.
    pub line_number: Option<u32>,
    /// Creation timestamp (ISO 8601 format).
    pub created_at: Option<String>,
}

/// A comment on the pull request as a whole, not anchored to a line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueComment {
    /// Comment identifier.
    pub id: u64,
    /// Comment body.
    pub body: Option<String>,
    /// Author login.
    pub author: Option<String>,
    /// Creation timestamp (ISO 8601 format).
    pub created_at: Option<String>,
}

/// The top-level body attached to a formal review submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewSummary {
    /// Review identifier.
    pub id: u64,
    /// Review body text.
    pub body: Option<String>,
    /// Author login.
    pub author: Option<String>,
    /// Review state (e.g. APPROVED, COMMENTED, CHANGES_REQUESTED).
    pub state: Option<String>,
    /// Submission timestamp (ISO 8601 format).
    pub submitted_at: Option<String>,
}

/// Lightweight pull request summary used for automatic selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestSummary {
    /// Pull request number.
    pub number: u64,
    /// Title of the pull request.
    pub title: Option<String>,
    /// State (e.g. open, closed).
    pub state: Option<String>,
    /// Last update timestamp (ISO 8601 format).
    pub updated_at: Option<String>,
}

/// A single message inside a review thread, as returned by GraphQL.
///
/// Carries both identifier schemes so the reconciler can match REST
/// comments by either key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadMessage {
    /// Numeric database identifier; equals the REST comment id.
    pub database_id: Option<u64>,
    /// Opaque global identifier; equals the REST comment node id.
    pub global_id: Option<String>,
    /// Message body.
    pub body: Option<String>,
    /// Author login.
    pub author: Option<String>,
}

/// A resolvable conversation grouping one or more inline comments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewThread {
    /// Opaque thread identifier used by the resolve mutation.
    pub id: String,
    /// GitHub's native resolved flag. Necessary but not sufficient for the
    /// export's own resolution policy.
    pub is_resolved: bool,
    /// Messages in thread order.
    pub messages: Vec<ThreadMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiUser {
    pub(crate) login: Option<String>,
}

/// API response type for PR review comments.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiReviewComment {
    pub(crate) id: u64,
    pub(crate) node_id: Option<String>,
    pub(crate) body: Option<String>,
    pub(crate) user: Option<ApiUser>,
    pub(crate) path: Option<String>,
    pub(crate) line: Option<u32>,
    pub(crate) created_at: Option<String>,
}

/// API response type for PR issue comments.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiIssueComment {
    pub(crate) id: u64,
    pub(crate) body: Option<String>,
    pub(crate) user: Option<ApiUser>,
    pub(crate) created_at: Option<String>,
}

/// API response type for PR reviews.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiReview {
    pub(crate) id: u64,
    pub(crate) body: Option<String>,
    pub(crate) user: Option<ApiUser>,
    pub(crate) state: Option<String>,
    pub(crate) submitted_at: Option<String>,
}

/// API response type for PR listing.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPullRequestSummary {
    pub(crate) number: u64,
    pub(crate) title: Option<String>,
    pub(crate) state: Option<String>,
    pub(crate) updated_at: Option<String>,
}

impl From<ApiReviewComment> for ReviewComment {
    fn from(value: ApiReviewComment) -> Self {
        Self {
            id: value.id,
            node_id: value.node_id,
            body: value.body,
            author: value.user.and_then(|user| user.login),
            file_path: value.path,
            line_number: value.line,
            created_at: value.created_at,
        }
    }
}

impl From<ApiIssueComment> for IssueComment {
    fn from(value: ApiIssueComment) -> Self {
        Self {
            id: value.id,
            body: value.body,
            author: value.user.and_then(|user| user.login),
            created_at: value.created_at,
        }
    }
}

impl From<ApiReview> for ReviewSummary {
    fn from(value: ApiReview) -> Self {
        Self {
            id: value.id,
            body: value.body,
            author: value.user.and_then(|user| user.login),
            state: value.state,
            submitted_at: value.submitted_at,
        }
    }
}

impl From<ApiPullRequestSummary> for PullRequestSummary {
    fn from(value: ApiPullRequestSummary) -> Self {
        Self {
            number: value.number,
            title: value.title,
            state: value.state,
            updated_at: value.updated_at,
        }
    }
}
