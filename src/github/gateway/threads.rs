//! GraphQL review thread fetcher for the export gateway.
//!
//! Review threads and their resolution state are only exposed through the
//! GraphQL API. A single query retrieves up to 100 threads with up to 100
//! messages each; pull requests beyond that bound are a documented
//! limitation of the exporter, not an error.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::github::error::ExportError;
use crate::github::locator::PullRequestLocator;
use crate::github::models::{ReviewThread, ThreadMessage};

use super::{OctocrabExportGateway, ThreadGateway};

const REVIEW_THREADS_QUERY: &str = "\
query($owner: String!, $name: String!, $number: Int!) {
  repository(owner: $owner, name: $name) {
    pullRequest(number: $number) {
      reviewThreads(first: 100) {
        nodes {
          id
          isResolved
          comments(first: 100) {
            nodes {
              id
              databaseId
              body
              author { login }
            }
          }
        }
      }
    }
  }
}";

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<GraphQlData>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GraphQlData {
    repository: Option<GraphQlRepository>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlRepository {
    pull_request: Option<GraphQlPullRequest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlPullRequest {
    review_threads: GraphQlNodes<GraphQlThread>,
}

#[derive(Debug, Deserialize)]
struct GraphQlNodes<T> {
    nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlThread {
    id: String,
    is_resolved: bool,
    comments: GraphQlNodes<GraphQlThreadComment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlThreadComment {
    id: Option<String>,
    database_id: Option<u64>,
    body: Option<String>,
    author: Option<GraphQlAuthor>,
}

#[derive(Debug, Deserialize)]
struct GraphQlAuthor {
    login: Option<String>,
}

/// Parses the raw GraphQL response body into domain threads.
///
/// A missing repository or pull request section is treated as malformed
/// rather than empty: the caller asked about a PR it already resolved, so
/// GitHub not echoing it back indicates a query problem worth surfacing.
fn parse_review_threads(raw: serde_json::Value) -> Result<Vec<ReviewThread>, ExportError> {
    let response: GraphQlResponse =
        serde_json::from_value(raw).map_err(|error| ExportError::GraphQl {
            message: format!("response did not match review threads schema: {error}"),
        })?;

    if let Some(errors) = response.errors
        && let Some(first) = errors.first()
    {
        return Err(ExportError::GraphQl {
            message: format!("query failed: {}", first.message),
        });
    }

    let pull_request = response
        .data
        .and_then(|data| data.repository)
        .and_then(|repository| repository.pull_request)
        .ok_or_else(|| ExportError::GraphQl {
            message: "response is missing repository.pullRequest".to_owned(),
        })?;

    Ok(pull_request
        .review_threads
        .nodes
        .into_iter()
        .map(|thread| ReviewThread {
            id: thread.id,
            is_resolved: thread.is_resolved,
            messages: thread
                .comments
                .nodes
                .into_iter()
                .map(|comment| ThreadMessage {
                    database_id: comment.database_id,
                    global_id: comment.id,
                    body: comment.body,
                    author: comment.author.and_then(|author| author.login),
                })
                .collect(),
        })
        .collect())
}

#[async_trait]
impl ThreadGateway for OctocrabExportGateway {
    async fn list_review_threads(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<Vec<ReviewThread>, ExportError> {
        let payload = json!({
            "query": REVIEW_THREADS_QUERY,
            "variables": {
                "owner": locator.owner().as_str(),
                "name": locator.repository().as_str(),
                "number": locator.number().get(),
            },
        });

        let gateway = self;
        let body = &payload;
        let raw: serde_json::Value = self
            .retry()
            .execute("review threads", move || async move {
                match gateway.client().graphql(body).await {
                    Ok(raw) => Ok(raw),
                    Err(error) => Err(gateway
                        .map_error_with_rate_limit("review threads", &error)
                        .await),
                }
            })
            .await?;

        let threads = parse_review_threads(raw)?;
        debug!(count = threads.len(), "fetched review threads");
        Ok(threads)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use crate::github::error::ExportError;

    use super::parse_review_threads;

    fn sample_response() -> serde_json::Value {
        json!({
            "data": {
                "repository": {
                    "pullRequest": {
                        "reviewThreads": {
                            "nodes": [
                                {
                                    "id": "PRRT_abc",
                                    "isResolved": true,
                                    "comments": {
                                        "nodes": [
                                            {
                                                "id": "PRRC_one",
                                                "databaseId": 101,
                                                "body": "⚠️ Potential issue",
                                                "author": { "login": "coderabbitai[bot]" }
                                            },
                                            {
                                                "id": "PRRC_two",
                                                "databaseId": 102,
                                                "body": "✅ Addressed in commit abc123",
                                                "author": { "login": "octocat" }
                                            }
                                        ]
                                    }
                                }
                            ]
                        }
                    }
                }
            }
        })
    }

    #[rstest]
    fn parses_threads_with_both_identifier_schemes() {
        let threads = parse_review_threads(sample_response()).expect("should parse response");

        assert_eq!(threads.len(), 1);
        let thread = threads.first().expect("one thread");
        assert_eq!(thread.id, "PRRT_abc");
        assert!(thread.is_resolved);
        assert_eq!(thread.messages.len(), 2);
        let first = thread.messages.first().expect("first message");
        assert_eq!(first.database_id, Some(101));
        assert_eq!(first.global_id.as_deref(), Some("PRRC_one"));
    }

    #[rstest]
    fn tolerates_null_database_ids_and_authors() {
        let raw = json!({
            "data": {
                "repository": {
                    "pullRequest": {
                        "reviewThreads": {
                            "nodes": [
                                {
                                    "id": "PRRT_min",
                                    "isResolved": false,
                                    "comments": {
                                        "nodes": [
                                            { "id": null, "databaseId": null, "body": null, "author": null }
                                        ]
                                    }
                                }
                            ]
                        }
                    }
                }
            }
        });

        let threads = parse_review_threads(raw).expect("should parse sparse response");
        let message = threads
            .first()
            .and_then(|thread| thread.messages.first())
            .expect("one sparse message");
        assert!(message.database_id.is_none());
        assert!(message.global_id.is_none());
    }

    #[rstest]
    fn surfaces_graphql_errors() {
        let raw = json!({
            "data": null,
            "errors": [ { "message": "Could not resolve to a PullRequest" } ]
        });

        let result = parse_review_threads(raw);
        assert!(matches!(result, Err(ExportError::GraphQl { .. })));
    }

    #[rstest]
    fn missing_pull_request_section_is_malformed() {
        let raw = json!({ "data": { "repository": null } });
        let result = parse_review_threads(raw);
        assert!(matches!(result, Err(ExportError::GraphQl { .. })));
    }
}
