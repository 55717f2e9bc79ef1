//! Chronological ordering for export numbering.
//!
//! Sequence numbers are recomputed on every run from creation timestamps,
//! so identical upstream state always yields identical numbering. The sort
//! is stable: entries whose timestamps are missing or unparseable keep
//! their fetch order and sort before everything dated.

use chrono::{DateTime, FixedOffset};

/// Sortable key derived from an ISO 8601 timestamp.
///
/// `None` (missing or unparseable) orders before any parsed timestamp.
#[must_use]
pub fn chronological_key(created_at: Option<&str>) -> Option<DateTime<FixedOffset>> {
    created_at.and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
}

/// Stable ascending sort of `items` by their creation timestamp.
pub fn sort_chronologically<T>(items: &mut [T], created_at: impl Fn(&T) -> Option<&str>) {
    items.sort_by_key(|item| chronological_key(created_at(item)));
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{chronological_key, sort_chronologically};

    #[derive(Debug, PartialEq, Eq)]
    struct Entry {
        name: &'static str,
        created_at: Option<&'static str>,
    }

    const fn entry(name: &'static str, created_at: Option<&'static str>) -> Entry {
        Entry { name, created_at }
    }

    #[rstest]
    fn sorts_ascending_by_timestamp() {
        let mut entries = vec![
            entry("b", Some("2025-01-02T00:00:00Z")),
            entry("a", Some("2025-01-01T00:00:00Z")),
            entry("c", Some("2025-01-03T00:00:00Z")),
        ];

        sort_chronologically(&mut entries, |e| e.created_at);

        let names: Vec<_> = entries.iter().map(|e| e.name).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[rstest]
    fn sort_is_stable_and_deterministic() {
        let build = || {
            vec![
                entry("x", Some("2025-01-01T00:00:00Z")),
                entry("y", Some("2025-01-01T00:00:00Z")),
                entry("z", Some("2024-12-31T23:00:00Z")),
            ]
        };

        let mut first = build();
        let mut second = build();
        sort_chronologically(&mut first, |e| e.created_at);
        sort_chronologically(&mut second, |e| e.created_at);

        assert_eq!(first, second);
        let names: Vec<_> = first.iter().map(|e| e.name).collect();
        // x and y tie on timestamp and keep their fetch order.
        assert_eq!(names, ["z", "x", "y"]);
    }

    #[rstest]
    fn undated_entries_sort_first() {
        let mut entries = vec![
            entry("dated", Some("2025-01-01T00:00:00Z")),
            entry("undated", None),
        ];

        sort_chronologically(&mut entries, |e| e.created_at);

        assert_eq!(entries.first().map(|e| e.name), Some("undated"));
    }

    #[rstest]
    fn unparseable_timestamps_are_treated_as_undated() {
        assert!(chronological_key(Some("not-a-date")).is_none());
        assert!(chronological_key(Some("2025-01-01T00:00:00Z")).is_some());
    }

    #[rstest]
    fn offsets_are_compared_on_the_timeline() {
        let mut entries = vec![
            entry("later", Some("2025-01-01T02:00:00+02:00")),
            entry("earlier", Some("2024-12-31T23:30:00Z")),
        ];

        sort_chronologically(&mut entries, |e| e.created_at);

        assert_eq!(entries.first().map(|e| e.name), Some("earlier"));
    }
}
