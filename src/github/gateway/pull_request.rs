//! Automatic pull request selection for the export gateway.
//!
//! When the caller supplies repository coordinates without a pull request
//! number, the exporter falls back to the most recently updated open pull
//! request.

use async_trait::async_trait;
use octocrab::Page;
use tracing::{debug, info};

use crate::github::error::ExportError;
use crate::github::locator::{PullRequestLocator, RepositoryLocator};
use crate::github::models::{ApiPullRequestSummary, PullRequestSummary};

use super::{OctocrabExportGateway, PullRequestSelectionGateway};

#[async_trait]
impl PullRequestSelectionGateway for OctocrabExportGateway {
    async fn latest_open_pull_request(
        &self,
        locator: &RepositoryLocator,
    ) -> Result<Option<PullRequestSummary>, ExportError> {
        let gateway = self;
        let path = locator.pulls_path();
        let route = path.as_str();
        let page: Page<ApiPullRequestSummary> = self
            .retry()
            .execute("list pulls", move || async move {
                match gateway
                    .client()
                    .get(
                        route,
                        Some(&[
                            ("state", "open"),
                            ("sort", "updated"),
                            ("direction", "desc"),
                            ("per_page", "1"),
                        ]),
                    )
                    .await
                {
                    Ok(page) => Ok(page),
                    Err(error) => {
                        Err(gateway.map_error_with_rate_limit("list pulls", &error).await)
                    }
                }
            })
            .await?;

        let selected = page.items.into_iter().next().map(PullRequestSummary::from);
        debug!(
            selected = selected.as_ref().map(|summary| summary.number),
            "auto-selected pull request"
        );
        Ok(selected)
    }
}

/// Resolves a repository target to its most recently updated open pull
/// request.
///
/// # Errors
///
/// Returns [`ExportError::NoOpenPullRequest`] when the repository has no
/// open pull requests, or any gateway error from the listing call.
pub async fn select_latest_open<G>(
    gateway: &G,
    repository: &RepositoryLocator,
) -> Result<PullRequestLocator, ExportError>
where
    G: PullRequestSelectionGateway + ?Sized,
{
    let summary = gateway
        .latest_open_pull_request(repository)
        .await?
        .ok_or_else(|| ExportError::NoOpenPullRequest {
            owner: repository.owner().as_str().to_owned(),
            repo: repository.repository().as_str().to_owned(),
        })?;

    info!(
        number = summary.number,
        title = summary.title.as_deref().unwrap_or(""),
        "auto-selected most recently updated open pull request"
    );
    repository.with_number(summary.number)
}

#[cfg(test)]
mod tests {
    use crate::github::error::ExportError;
    use crate::github::gateway::MockPullRequestSelectionGateway;
    use crate::github::locator::RepositoryLocator;
    use crate::github::models::PullRequestSummary;

    use super::select_latest_open;

    fn repository() -> RepositoryLocator {
        RepositoryLocator::from_owner_repo("octo", "widgets")
            .expect("should build repository locator")
    }

    #[tokio::test]
    async fn selects_most_recently_updated_open_pull_request() {
        let mut gateway = MockPullRequestSelectionGateway::new();
        gateway.expect_latest_open_pull_request().returning(|_| {
            Ok(Some(PullRequestSummary {
                number: 17,
                title: Some("Fix overflow".to_owned()),
                state: Some("open".to_owned()),
                updated_at: Some("2025-02-01T08:00:00Z".to_owned()),
            }))
        });

        let locator = select_latest_open(&gateway, &repository())
            .await
            .expect("should select a pull request");

        assert_eq!(locator.number().get(), 17);
        assert_eq!(locator.owner().as_str(), "octo");
        assert_eq!(locator.repository().as_str(), "widgets");
    }

    #[tokio::test]
    async fn no_open_pull_request_is_an_error() {
        let mut gateway = MockPullRequestSelectionGateway::new();
        gateway
            .expect_latest_open_pull_request()
            .returning(|_| Ok(None));

        let result = select_latest_open(&gateway, &repository()).await;

        assert!(matches!(
            result,
            Err(ExportError::NoOpenPullRequest { owner, repo })
                if owner == "octo" && repo == "widgets"
        ));
    }

    #[tokio::test]
    async fn gateway_failures_propagate() {
        let mut gateway = MockPullRequestSelectionGateway::new();
        gateway.expect_latest_open_pull_request().returning(|_| {
            Err(ExportError::Authentication {
                message: "bad credentials".to_owned(),
            })
        });

        let result = select_latest_open(&gateway, &repository()).await;
        assert!(matches!(result, Err(ExportError::Authentication { .. })));
    }
}
