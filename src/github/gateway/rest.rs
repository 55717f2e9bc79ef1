//! REST comment stream fetchers for the export gateway.
//!
//! All three streams share the same shape: a paginated GET returning an
//! `Api*` wire type that converts into a domain type. Pagination is handled
//! by Octocrab's `all_pages`, so API-provided order is preserved.

use async_trait::async_trait;
use octocrab::Page;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::github::error::ExportError;
use crate::github::locator::PullRequestLocator;
use crate::github::models::{
    ApiIssueComment, ApiReview, ApiReviewComment, IssueComment, ReviewComment, ReviewSummary,
};

use super::{CommentSourceGateway, OctocrabExportGateway};

impl OctocrabExportGateway {
    /// Fetches every page of `path`, converting wire items into domain items.
    async fn fetch_paginated<Api, Domain>(
        &self,
        operation: &'static str,
        path: String,
    ) -> Result<Vec<Domain>, ExportError>
    where
        Api: DeserializeOwned + Clone + Send + 'static,
        Domain: From<Api>,
    {
        let gateway = self;
        let route = path.as_str();
        let items: Vec<Api> = self
            .retry()
            .execute(operation, move || async move {
                let page: Page<Api> = match gateway.client().get(route, None::<&()>).await {
                    Ok(page) => page,
                    Err(error) => {
                        return Err(gateway.map_error_with_rate_limit(operation, &error).await);
                    }
                };

                match gateway.client().all_pages(page).await {
                    Ok(items) => Ok(items),
                    Err(error) => Err(gateway.map_error_with_rate_limit(operation, &error).await),
                }
            })
            .await?;

        debug!(operation, count = items.len(), "fetched REST stream");
        Ok(items.into_iter().map(Domain::from).collect())
    }
}

#[async_trait]
impl CommentSourceGateway for OctocrabExportGateway {
    async fn list_review_comments(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<Vec<ReviewComment>, ExportError> {
        self.fetch_paginated::<ApiReviewComment, _>(
            "review comments",
            locator.review_comments_path(),
        )
        .await
    }

    async fn list_issue_comments(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<Vec<IssueComment>, ExportError> {
        self.fetch_paginated::<ApiIssueComment, _>("issue comments", locator.issue_comments_path())
            .await
    }

    async fn list_reviews(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<Vec<ReviewSummary>, ExportError> {
        self.fetch_paginated::<ApiReview, _>("reviews", locator.reviews_path())
            .await
    }
}
