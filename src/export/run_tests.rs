//! Orchestrator tests covering partial failure, zero-result short-circuit,
//! and end-to-end determinism.

use camino::Utf8PathBuf;
use rstest::rstest;

use crate::github::error::ExportError;
use crate::github::gateway::{MockCommentSourceGateway, MockThreadGateway};
use crate::github::locator::PullRequestLocator;
use crate::github::models::{
    IssueComment, ReviewComment, ReviewSummary, ReviewThread, ThreadMessage,
};

use super::super::classify::Severity;
use super::{ExportOptions, SourceStreams, assemble, run_export, write_bundle};

const BOT: &str = "coderabbitai[bot]";

fn locator() -> PullRequestLocator {
    PullRequestLocator::from_parts("octo", "widgets", 42).expect("should build locator")
}

fn options(dir: &tempfile::TempDir) -> ExportOptions {
    ExportOptions {
        bot_login: BOT.to_owned(),
        output_root: Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .expect("temp dir should be UTF-8"),
    }
}

fn bot_review_comment(id: u64, body: &str, created_at: &str) -> ReviewComment {
    ReviewComment {
        id,
        node_id: Some(format!("PRRC_{id}")),
        body: Some(body.to_owned()),
        author: Some(BOT.to_owned()),
        file_path: Some("src/lib.rs".to_owned()),
        line_number: Some(10),
        created_at: Some(created_at.to_owned()),
    }
}

fn resolved_thread(id: &str, database_id: u64) -> ReviewThread {
    ReviewThread {
        id: id.to_owned(),
        is_resolved: true,
        messages: vec![
            ThreadMessage {
                database_id: Some(database_id),
                global_id: None,
                body: Some("⚠️ Potential issue".to_owned()),
                author: Some(BOT.to_owned()),
            },
            ThreadMessage {
                database_id: None,
                global_id: None,
                body: Some("✅ Addressed in commit abc123".to_owned()),
                author: Some("octocat".to_owned()),
            },
        ],
    }
}

fn sample_streams() -> SourceStreams {
    SourceStreams {
        review_comments: vec![
            bot_review_comment(2, "🧹 Nitpick: typo", "2025-01-02T00:00:00Z"),
            bot_review_comment(1, "⚠️ Potential issue: overflow", "2025-01-01T00:00:00Z"),
            // Human comments are filtered out.
            ReviewComment {
                author: Some("octocat".to_owned()),
                ..bot_review_comment(3, "human reply", "2025-01-03T00:00:00Z")
            },
        ],
        issue_comments: vec![IssueComment {
            id: 10,
            body: Some("Walkthrough".to_owned()),
            author: Some(BOT.to_owned()),
            created_at: Some("2025-01-01T12:00:00Z".to_owned()),
        }],
        reviews: vec![
            ReviewSummary {
                id: 20,
                body: Some("Overall assessment".to_owned()),
                author: Some(BOT.to_owned()),
                state: Some("COMMENTED".to_owned()),
                submitted_at: Some("2025-01-02T12:00:00Z".to_owned()),
            },
            // Empty-bodied approvals are noise.
            ReviewSummary {
                id: 21,
                body: Some("   ".to_owned()),
                author: Some(BOT.to_owned()),
                state: Some("APPROVED".to_owned()),
                submitted_at: Some("2025-01-03T12:00:00Z".to_owned()),
            },
        ],
        threads: vec![resolved_thread("PRRT_one", 1)],
        degraded: Vec::new(),
    }
}

#[rstest]
fn assemble_numbers_chronologically_and_applies_policy() {
    let bundle = assemble(sample_streams(), BOT);

    assert_eq!(bundle.issues.len(), 2);
    let first = bundle.issues.first().expect("first issue");
    let second = bundle.issues.get(1).expect("second issue");

    // The older critical comment gets sequence 1 despite later fetch order.
    assert_eq!(first.sequence, 1);
    assert_eq!(first.comment.id, 1);
    assert_eq!(first.severity, Severity::Critical);
    assert!(first.resolved, "flag plus confirmation marker resolves");
    assert_eq!(first.thread_id.as_deref(), Some("PRRT_one"));

    assert_eq!(second.sequence, 2);
    assert_eq!(second.severity, Severity::Trivial);
    assert!(!second.resolved, "no matching thread means unresolved");
    assert!(second.thread_id.is_none());

    // One comment plus one non-empty review; the blank approval is dropped.
    assert_eq!(bundle.discussions.len(), 2);
    assert_eq!(bundle.counts.discussions, 2);
}

#[rstest]
fn assemble_with_resolved_thread_but_no_marker_stays_unresolved() {
    let mut streams = sample_streams();
    streams.threads = vec![ReviewThread {
        id: "PRRT_one".to_owned(),
        is_resolved: true,
        messages: vec![ThreadMessage {
            database_id: Some(1),
            global_id: None,
            body: Some("fix pushed".to_owned()),
            author: Some("octocat".to_owned()),
        }],
    }];

    let bundle = assemble(streams, BOT);
    let first = bundle.issues.first().expect("first issue");
    assert!(!first.resolved);
}

#[rstest]
fn write_bundle_short_circuits_on_zero_results() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let opts = options(&dir);
    let bundle = assemble(SourceStreams::default(), BOT);

    let report = write_bundle(&bundle, &locator(), &opts).expect("should succeed");

    assert!(report.is_empty());
    assert!(report.output_root.is_none());
    assert!(
        !opts.output_root.join("PR-42").exists(),
        "no tree should be created for a zero-result run"
    );
}

#[rstest]
fn write_bundle_is_idempotent_for_unchanged_input() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let opts = options(&dir);
    let first_bundle = assemble(sample_streams(), BOT);
    let second_bundle = assemble(sample_streams(), BOT);

    let report = write_bundle(&first_bundle, &locator(), &opts).expect("first write");
    let root = report.output_root.expect("tree should be written");
    let summary_path = root.join("SUMMARY.md");
    let first_summary = std::fs::read_to_string(&summary_path).expect("first summary");
    let first_issue = std::fs::read_to_string(root.join("issues/001-critical-resolved.md"))
        .expect("first issue file");

    write_bundle(&second_bundle, &locator(), &opts).expect("second write");
    let second_summary = std::fs::read_to_string(&summary_path).expect("second summary");
    let second_issue = std::fs::read_to_string(root.join("issues/001-critical-resolved.md"))
        .expect("second issue file");

    assert_eq!(first_summary, second_summary);
    assert_eq!(first_issue, second_issue);
}

#[tokio::test]
async fn thread_fetch_failure_degrades_but_export_completes() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let opts = options(&dir);

    let mut comments = MockCommentSourceGateway::new();
    comments
        .expect_list_review_comments()
        .returning(|_| Ok(vec![bot_review_comment(1, "⚠️ Potential issue", "2025-01-01T00:00:00Z")]));
    comments
        .expect_list_issue_comments()
        .returning(|_| Ok(Vec::new()));
    comments.expect_list_reviews().returning(|_| Ok(Vec::new()));

    let mut threads = MockThreadGateway::new();
    threads.expect_list_review_threads().returning(|_| {
        Err(ExportError::Network {
            message: "connection reset".to_owned(),
        })
    });

    let report = run_export(&comments, &threads, &locator(), &opts)
        .await
        .expect("run should complete despite thread failure");

    assert_eq!(report.degraded_streams, vec!["review threads".to_owned()]);
    assert_eq!(report.counts.total_issues(), 1);
    assert_eq!(report.counts.total_resolved(), 0);

    let root = report.output_root.expect("tree should be written");
    let issue = std::fs::read_to_string(root.join("issues/001-critical-unresolved.md"))
        .expect("issue rendered without thread data");
    assert!(issue.contains("(not found)"));

    let summary = std::fs::read_to_string(root.join("SUMMARY.md")).expect("summary");
    assert!(summary.contains("review threads"));
}

#[tokio::test]
async fn full_run_writes_expected_tree() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let opts = options(&dir);

    let mut comments = MockCommentSourceGateway::new();
    comments.expect_list_review_comments().returning(|_| {
        Ok(vec![
            bot_review_comment(1, "⚠️ Potential issue: overflow", "2025-01-01T00:00:00Z"),
        ])
    });
    comments.expect_list_issue_comments().returning(|_| {
        Ok(vec![IssueComment {
            id: 10,
            body: Some("Walkthrough".to_owned()),
            author: Some(BOT.to_owned()),
            created_at: Some("2025-01-01T12:00:00Z".to_owned()),
        }])
    });
    comments.expect_list_reviews().returning(|_| Ok(Vec::new()));

    let mut threads = MockThreadGateway::new();
    threads
        .expect_list_review_threads()
        .returning(|_| Ok(vec![resolved_thread("PRRT_one", 1)]));

    let report = run_export(&comments, &threads, &locator(), &opts)
        .await
        .expect("run should succeed");

    let root = report.output_root.expect("tree should be written");
    assert!(root.join("issues/001-critical-resolved.md").exists());
    assert!(root.join("discussions/001.md").exists());
    assert!(root.join("SUMMARY.md").exists());
    assert!(report.degraded_streams.is_empty());
}
