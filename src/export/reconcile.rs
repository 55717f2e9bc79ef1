//! Reconciliation of REST comment identifiers against GraphQL threads.
//!
//! The REST and GraphQL APIs describe the same inline comment with two
//! unrelated identifier schemes: a numeric id plus a node-id string on the
//! REST side, and a database id plus a global id per thread message on the
//! GraphQL side. The index is built in a single pass over the threads in
//! fetch order, keyed by both schemes; a comment matches when either key
//! matches. Insertion keeps the first owner, preserving first-match-wins
//! should a key ever appear in two threads.

use std::collections::HashMap;

use crate::github::models::{ReviewComment, ReviewThread};

/// Dual-key lookup from comment identifiers to their owning thread.
#[derive(Debug, Default)]
pub struct ThreadIndex {
    threads: Vec<ReviewThread>,
    by_database_id: HashMap<u64, usize>,
    by_global_id: HashMap<String, usize>,
}

impl ThreadIndex {
    /// Builds the index from threads in fetch order.
    #[must_use]
    pub fn build(threads: Vec<ReviewThread>) -> Self {
        let mut by_database_id = HashMap::new();
        let mut by_global_id = HashMap::new();

        for (slot, thread) in threads.iter().enumerate() {
            for message in &thread.messages {
                if let Some(database_id) = message.database_id {
                    by_database_id.entry(database_id).or_insert(slot);
                }
                if let Some(global_id) = &message.global_id {
                    by_global_id.entry(global_id.clone()).or_insert(slot);
                }
            }
        }

        Self {
            threads,
            by_database_id,
            by_global_id,
        }
    }

    /// Number of indexed threads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.threads.len()
    }

    /// True when no threads were fetched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    /// Finds the thread containing the given inline comment.
    ///
    /// Matches by numeric database id first, then by node-id string. Either
    /// key suffices: responses can omit one of the two, and each key space
    /// is globally unique on its own.
    #[must_use]
    pub fn find(&self, comment: &ReviewComment) -> Option<&ReviewThread> {
        let slot = self
            .by_database_id
            .get(&comment.id)
            .or_else(|| {
                comment
                    .node_id
                    .as_ref()
                    .and_then(|node_id| self.by_global_id.get(node_id))
            })
            .copied()?;

        self.threads.get(slot)
    }
}
