//! Resolution policy for reconciled review threads.
//!
//! GitHub's native resolved flag can be set without any remediation, for
//! example by an accidental dismissal. The exporter therefore requires
//! corroborating evidence: a thread counts as resolved only when the native
//! flag is set AND some message in the thread carries the confirmation
//! marker left by the remediation tooling.

use crate::github::models::ReviewThread;

/// Marker written into a thread reply when an issue has actually been fixed.
pub const CONFIRMATION_MARKER: &str = "✅ Addressed in commit";

/// Evaluates the conjunctive resolution policy for a matched thread.
///
/// Callers pass `None` when reconciliation found no thread; that always
/// evaluates to unresolved.
#[must_use]
pub fn is_confirmed_resolved(thread: Option<&ReviewThread>) -> bool {
    thread.is_some_and(|thread| {
        thread.is_resolved
            && thread.messages.iter().any(|message| {
                message
                    .body
                    .as_deref()
                    .is_some_and(|body| body.contains(CONFIRMATION_MARKER))
            })
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::github::models::{ReviewThread, ThreadMessage};

    use super::is_confirmed_resolved;

    fn thread(is_resolved: bool, bodies: &[&str]) -> ReviewThread {
        ReviewThread {
            id: "PRRT_x".to_owned(),
            is_resolved,
            messages: bodies
                .iter()
                .map(|body| ThreadMessage {
                    body: Some((*body).to_owned()),
                    ..ThreadMessage::default()
                })
                .collect(),
        }
    }

    #[rstest]
    fn resolved_flag_alone_is_not_enough() {
        let t = thread(true, &["fix pushed"]);
        assert!(!is_confirmed_resolved(Some(&t)));
    }

    #[rstest]
    fn confirmation_marker_alone_is_not_enough() {
        let t = thread(false, &["✅ Addressed in commit abc123"]);
        assert!(!is_confirmed_resolved(Some(&t)));
    }

    #[rstest]
    fn conjunction_of_flag_and_marker_resolves() {
        let t = thread(true, &["looks wrong", "✅ Addressed in commit abc123"]);
        assert!(is_confirmed_resolved(Some(&t)));
    }

    #[rstest]
    fn missing_thread_is_unresolved() {
        assert!(!is_confirmed_resolved(None));
    }

    #[rstest]
    fn messages_without_bodies_are_ignored() {
        let mut t = thread(true, &[]);
        t.messages.push(ThreadMessage::default());
        assert!(!is_confirmed_resolved(Some(&t)));
    }
}
