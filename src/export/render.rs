//! Template rendering for exported files.
//!
//! Every generated file comes from an embedded `minijinja` template so the
//! output structure lives in one place. Rendered content carries no
//! generation timestamp: reruns against unchanged remote state must produce
//! byte-identical files.

use minijinja::{Environment, context};
use serde::Serialize;

use crate::github::error::ExportError;

use super::classify::Severity;
use super::model::{Discussion, ExportCounts, ReviewIssue};

const ISSUE_TEMPLATE: &str = "\
# Issue {{ sequence }}: {{ severity }} ({{ state }})

- **File:** {{ location }}
- **Reviewer:** {{ reviewer }}
- **Created:** {{ created }}
- **Thread:** {{ thread }}

## Comment

{{ body }}
{%- if thread_found %}

## Resolving this thread

Once the issue is fixed, reply with `✅ Addressed in commit <sha>` and mark
the thread resolved with the GraphQL mutation below.

```graphql
mutation {
  resolveReviewThread(input: { threadId: \"{{ thread }}\" }) {
    thread { id isResolved }
  }
}
```

Equivalent command line:

```sh
gh api graphql -f query='mutation { resolveReviewThread(input: { threadId: \"{{ thread }}\" }) { thread { id isResolved } } }'
```
{%- endif %}
";

const DISCUSSION_TEMPLATE: &str = "\
# Discussion {{ sequence }} ({{ kind }})

- **Author:** {{ author }}
- **Created:** {{ created }}
{%- if state %}
- **Review state:** {{ state }}
{%- endif %}

{{ body }}
";

const SUMMARY_TEMPLATE: &str = "\
# Review export: {{ owner }}/{{ repo }}#{{ number }}

| Severity | Resolved | Unresolved | Total |
|---|---|---|---|
{%- for row in severity_rows %}
| {{ row.label }} | {{ row.resolved }} | {{ row.unresolved }} | {{ row.total }} |
{%- endfor %}
| **All issues** | {{ total_resolved }} | {{ total_unresolved }} | {{ total_issues }} |

Discussions: {{ discussions_total }}
{% if degraded_streams %}
> Partial export: the following streams failed and were treated as empty:
{%- for stream in degraded_streams %}
> - {{ stream }}
{%- endfor %}
{% endif %}
## Issues
{% for group in issue_groups %}
### {{ group.label | title }}
{% for entry in group.entries %}
- [{% if entry.resolved %}x{% else %} {% endif %}] [{{ entry.file_name }}](issues/{{ entry.file_name }}) — {{ entry.location }}
{%- endfor %}
{% endfor %}
## Discussions
{% for entry in discussions %}
- [{{ entry.file_name }}](discussions/{{ entry.file_name }}) — {{ entry.kind }} by {{ entry.author }}
{%- endfor %}
";

/// Placeholder rendered when reconciliation found no owning thread.
pub const THREAD_NOT_FOUND: &str = "(not found)";

#[derive(Debug, Serialize)]
struct SeverityRow {
    label: &'static str,
    resolved: usize,
    unresolved: usize,
    total: usize,
}

#[derive(Debug, Serialize)]
struct IssueEntry {
    file_name: String,
    location: String,
    resolved: bool,
}

#[derive(Debug, Serialize)]
struct IssueGroup {
    label: &'static str,
    entries: Vec<IssueEntry>,
}

#[derive(Debug, Serialize)]
struct DiscussionEntry {
    file_name: String,
    kind: String,
    author: String,
}

fn issue_location(issue: &ReviewIssue) -> String {
    match (&issue.comment.file_path, issue.comment.line_number) {
        (Some(path), Some(line)) => format!("{path}:{line}"),
        (Some(path), None) => path.clone(),
        (None, _) => "(unknown location)".to_owned(),
    }
}

/// Renders issue, discussion, and summary files from embedded templates.
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    /// Builds the environment and compiles the embedded templates.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Template` if a template fails to compile,
    /// which would indicate a packaging defect.
    pub fn new() -> Result<Self, ExportError> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| minijinja::AutoEscape::None);

        for (name, source) in [
            ("issue", ISSUE_TEMPLATE),
            ("discussion", DISCUSSION_TEMPLATE),
            ("summary", SUMMARY_TEMPLATE),
        ] {
            env.add_template(name, source)
                .map_err(|error| ExportError::Template {
                    message: format!("template '{name}' failed to compile: {error}"),
                })?;
        }

        Ok(Self { env })
    }

    fn render(&self, name: &str, ctx: minijinja::Value) -> Result<String, ExportError> {
        let template = self
            .env
            .get_template(name)
            .map_err(|error| ExportError::Template {
                message: format!("template '{name}' missing: {error}"),
            })?;

        template.render(ctx).map_err(|error| ExportError::Template {
            message: format!("rendering '{name}' failed: {error}"),
        })
    }

    /// Renders one resolvable issue file.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Template` when rendering fails.
    pub fn render_issue(&self, issue: &ReviewIssue) -> Result<String, ExportError> {
        let ctx = context! {
            sequence => issue.sequence,
            severity => issue.severity.label(),
            state => if issue.resolved { "resolved" } else { "unresolved" },
            location => issue_location(issue),
            reviewer => issue.comment.author.as_deref().unwrap_or("(unknown)"),
            created => issue.comment.created_at.as_deref().unwrap_or("(unknown)"),
            thread => issue.thread_id.as_deref().unwrap_or(THREAD_NOT_FOUND),
            thread_found => issue.thread_id.is_some(),
            body => issue.comment.body.as_deref().unwrap_or(""),
        };
        self.render("issue", ctx)
    }

    /// Renders one non-resolvable discussion file.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Template` when rendering fails.
    pub fn render_discussion(&self, discussion: &Discussion) -> Result<String, ExportError> {
        let ctx = context! {
            sequence => discussion.sequence,
            kind => discussion.kind.to_string(),
            author => discussion.author.as_deref().unwrap_or("(unknown)"),
            created => discussion.created_at.as_deref().unwrap_or("(unknown)"),
            state => discussion.state.as_deref(),
            body => discussion.body.as_deref().unwrap_or(""),
        };
        self.render("discussion", ctx)
    }

    /// Renders the aggregate summary index.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Template` when rendering fails.
    pub fn render_summary(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        counts: &ExportCounts,
        issues: &[ReviewIssue],
        discussions: &[Discussion],
        degraded_streams: &[String],
    ) -> Result<String, ExportError> {
        let severity_rows: Vec<SeverityRow> = Severity::ALL
            .into_iter()
            .map(|severity| {
                let (resolved, unresolved) = counts.by_severity(severity);
                SeverityRow {
                    label: severity.label(),
                    resolved,
                    unresolved,
                    total: resolved + unresolved,
                }
            })
            .collect();

        // Grouped by severity; within a group the chronological sequence
        // order is preserved.
        let issue_groups: Vec<IssueGroup> = Severity::ALL
            .into_iter()
            .map(|severity| IssueGroup {
                label: severity.label(),
                entries: issues
                    .iter()
                    .filter(|issue| issue.severity == severity)
                    .map(|issue| IssueEntry {
                        file_name: issue.file_name(),
                        location: issue_location(issue),
                        resolved: issue.resolved,
                    })
                    .collect(),
            })
            .collect();

        let discussion_entries: Vec<DiscussionEntry> = discussions
            .iter()
            .map(|discussion| DiscussionEntry {
                file_name: discussion.file_name(),
                kind: discussion.kind.to_string(),
                author: discussion
                    .author
                    .clone()
                    .unwrap_or_else(|| "(unknown)".to_owned()),
            })
            .collect();

        let ctx = context! {
            owner => owner,
            repo => repo,
            number => number,
            severity_rows => severity_rows,
            total_resolved => counts.total_resolved(),
            total_unresolved => counts.total_issues() - counts.total_resolved(),
            total_issues => counts.total_issues(),
            discussions_total => counts.discussions,
            degraded_streams => degraded_streams,
            issue_groups => issue_groups,
            discussions => discussion_entries,
        };
        self.render("summary", ctx)
    }
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
