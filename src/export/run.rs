//! Export orchestration: fetch, assemble, and write.
//!
//! The four source fetchers run sequentially, each independently tolerant
//! of its own failure: a fetcher that fails after retries degrades to an
//! empty stream with a logged warning, so partial upstream outages still
//! yield a best-effort export. Only setup failures (bad coordinates, bad
//! token) abort the run, and those happen before any fetch.

use camino::Utf8PathBuf;
use tracing::{info, warn};

use crate::github::error::ExportError;
use crate::github::gateway::{CommentSourceGateway, ThreadGateway};
use crate::github::locator::PullRequestLocator;
use crate::github::models::{IssueComment, ReviewComment, ReviewSummary, ReviewThread};

use super::classify::classify;
use super::model::{Discussion, DiscussionKind, ExportCounts, ExportReport, ReviewIssue};
use super::ordering::sort_chronologically;
use super::reconcile::ThreadIndex;
use super::render::Renderer;
use super::resolution::is_confirmed_resolved;
use super::writer::ExportWriter;

/// Options controlling one export run.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Account login whose comments are exported.
    pub bot_login: String,
    /// Directory under which the per-PR tree is written.
    pub output_root: Utf8PathBuf,
}

/// The four fetched streams plus a record of which ones degraded.
///
/// An empty stream and a failed stream are deliberately distinguishable:
/// failures appear in `degraded` and in the logs, never silently.
#[derive(Debug, Default)]
pub struct SourceStreams {
    /// Inline review comments from REST.
    pub review_comments: Vec<ReviewComment>,
    /// General issue comments from REST.
    pub issue_comments: Vec<IssueComment>,
    /// Review submissions from REST.
    pub reviews: Vec<ReviewSummary>,
    /// Review threads from GraphQL.
    pub threads: Vec<ReviewThread>,
    /// Names of streams that failed and were treated as empty.
    pub degraded: Vec<String>,
}

impl SourceStreams {
    fn collect<T>(&mut self, stream: &str, outcome: Result<Vec<T>, ExportError>) -> Vec<T> {
        match outcome {
            Ok(items) => {
                info!(stream, count = items.len(), "fetched stream");
                items
            }
            Err(error) => {
                warn!(stream, error = %error, "stream failed; continuing with empty result");
                self.degraded.push(stream.to_owned());
                Vec::new()
            }
        }
    }
}

/// Fetches all four streams sequentially with per-stream fault tolerance.
pub async fn fetch_streams<C, T>(
    comments: &C,
    threads: &T,
    locator: &PullRequestLocator,
) -> SourceStreams
where
    C: CommentSourceGateway + ?Sized,
    T: ThreadGateway + ?Sized,
{
    let mut streams = SourceStreams::default();
    streams.review_comments = streams.collect(
        "review comments",
        comments.list_review_comments(locator).await,
    );
    streams.issue_comments = streams.collect(
        "issue comments",
        comments.list_issue_comments(locator).await,
    );
    streams.reviews = streams.collect("reviews", comments.list_reviews(locator).await);
    streams.threads = streams.collect("review threads", threads.list_review_threads(locator).await);
    streams
}

/// Assembled, numbered entities ready for rendering.
#[derive(Debug, Default)]
pub struct ExportBundle {
    /// Inline issues in chronological sequence order.
    pub issues: Vec<ReviewIssue>,
    /// Discussions in their own chronological sequence order.
    pub discussions: Vec<Discussion>,
    /// Aggregated counts.
    pub counts: ExportCounts,
    /// Degraded stream names carried over from fetching.
    pub degraded: Vec<String>,
}

fn is_authored_by(author: Option<&str>, bot_login: &str) -> bool {
    author == Some(bot_login)
}

/// Filters, reconciles, classifies, and numbers the fetched streams.
///
/// Pure with respect to I/O, which keeps the pipeline testable without a
/// network or filesystem.
#[must_use]
pub fn assemble(streams: SourceStreams, bot_login: &str) -> ExportBundle {
    let SourceStreams {
        review_comments,
        issue_comments,
        reviews,
        threads,
        degraded,
    } = streams;

    let mut inline: Vec<ReviewComment> = review_comments
        .into_iter()
        .filter(|comment| is_authored_by(comment.author.as_deref(), bot_login))
        .collect();
    sort_chronologically(&mut inline, |comment| comment.created_at.as_deref());

    let index = ThreadIndex::build(threads);
    let mut counts = ExportCounts::default();

    let issues: Vec<ReviewIssue> = inline
        .into_iter()
        .enumerate()
        .map(|(position, comment)| {
            let thread = index.find(&comment);
            let severity = classify(comment.body.as_deref().unwrap_or(""));
            let resolved = is_confirmed_resolved(thread);
            counts.record_issue(severity, resolved);
            ReviewIssue {
                sequence: position + 1,
                severity,
                resolved,
                thread_id: thread.map(|t| t.id.clone()),
                comment,
            }
        })
        .collect();

    let mut discussions: Vec<Discussion> = issue_comments
        .into_iter()
        .filter(|comment| is_authored_by(comment.author.as_deref(), bot_login))
        .map(|comment| Discussion {
            sequence: 0,
            kind: DiscussionKind::Comment,
            author: comment.author,
            body: comment.body,
            created_at: comment.created_at,
            state: None,
        })
        .chain(
            reviews
                .into_iter()
                .filter(|review| is_authored_by(review.author.as_deref(), bot_login))
                // Approvals without commentary are noise.
                .filter(|review| {
                    review
                        .body
                        .as_deref()
                        .is_some_and(|body| !body.trim().is_empty())
                })
                .map(|review| Discussion {
                    sequence: 0,
                    kind: DiscussionKind::Review,
                    author: review.author,
                    body: review.body,
                    created_at: review.submitted_at,
                    state: review.state,
                }),
        )
        .collect();
    sort_chronologically(&mut discussions, |discussion| {
        discussion.created_at.as_deref()
    });
    for (position, discussion) in discussions.iter_mut().enumerate() {
        discussion.sequence = position + 1;
    }
    counts.discussions = discussions.len();

    ExportBundle {
        issues,
        discussions,
        counts,
        degraded,
    }
}

/// Renders and writes an assembled bundle, returning the final report.
///
/// A bundle with no entities writes nothing: the output tree is only
/// created once there is at least one file to put in it.
///
/// # Errors
///
/// Returns `ExportError::Template` or `ExportError::Io` when rendering or
/// writing fails.
pub fn write_bundle(
    bundle: &ExportBundle,
    locator: &PullRequestLocator,
    options: &ExportOptions,
) -> Result<ExportReport, ExportError> {
    let mut report = ExportReport {
        counts: bundle.counts,
        output_root: None,
        degraded_streams: bundle.degraded.clone(),
    };

    if bundle.issues.is_empty() && bundle.discussions.is_empty() {
        info!(
            bot = options.bot_login,
            "no review bot comments found; nothing to write"
        );
        return Ok(report);
    }

    let renderer = Renderer::new()?;
    let writer = ExportWriter::new(&options.output_root, locator.number().get());
    writer.prepare()?;

    for issue in &bundle.issues {
        writer.write_issue(&issue.file_name(), &renderer.render_issue(issue)?)?;
    }
    for discussion in &bundle.discussions {
        writer.write_discussion(
            &discussion.file_name(),
            &renderer.render_discussion(discussion)?,
        )?;
    }

    let summary = renderer.render_summary(
        locator.owner().as_str(),
        locator.repository().as_str(),
        locator.number().get(),
        &bundle.counts,
        &bundle.issues,
        &bundle.discussions,
        &bundle.degraded,
    )?;
    writer.write_summary(&summary)?;

    info!(
        root = %writer.pr_root(),
        issues = bundle.issues.len(),
        discussions = bundle.discussions.len(),
        "export written"
    );
    report.output_root = Some(writer.pr_root().to_owned());
    Ok(report)
}

/// Runs the whole export against the given gateways.
///
/// # Errors
///
/// Returns an error only for rendering or filesystem failures; fetch
/// failures degrade per stream and never abort the run.
pub async fn run_export<C, T>(
    comments: &C,
    threads: &T,
    locator: &PullRequestLocator,
    options: &ExportOptions,
) -> Result<ExportReport, ExportError>
where
    C: CommentSourceGateway + ?Sized,
    T: ThreadGateway + ?Sized,
{
    let streams = fetch_streams(comments, threads, locator).await;
    let bundle = assemble(streams, &options.bot_login);
    write_bundle(&bundle, locator, options)
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
