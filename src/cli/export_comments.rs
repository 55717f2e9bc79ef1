//! Comment export operation: resolve the target, fetch, and write the tree.

use std::io::{self, Write};

use magpie::config::{ExportTarget, MagpieConfig};
use magpie::export::{ExportOptions, ExportReport, run_export};
use magpie::github::{
    ExportError, OctocrabExportGateway, PersonalAccessToken, PullRequestLocator,
    select_latest_open,
};

/// Exports review bot comments for the configured pull request.
///
/// # Errors
///
/// Returns an error if:
/// - No target or token is configured
/// - The pull request cannot be resolved (bad URL, no open PR)
/// - Rendering or writing the output tree fails
///
/// Fetch failures do not error: each stream degrades to an empty result
/// with a logged warning.
pub async fn run(config: &MagpieConfig) -> Result<(), ExportError> {
    let token = PersonalAccessToken::new(config.resolve_token()?)?;
    let target = config.resolve_target()?;

    let (gateway, locator) = match target {
        ExportTarget::PullRequest(locator) => {
            let gateway = OctocrabExportGateway::for_token(&token, locator.api_base().as_str())?;
            (gateway, locator)
        }
        ExportTarget::Repository(repository) => {
            let gateway =
                OctocrabExportGateway::for_token(&token, repository.api_base().as_str())?;
            let locator = select_latest_open(&gateway, &repository).await?;
            (gateway, locator)
        }
    };

    let options = ExportOptions {
        bot_login: config.bot_login().to_owned(),
        output_root: config.output_root(),
    };

    let report = run_export(&gateway, &gateway, &locator, &options).await?;
    write_status(&report, &locator, &options)
}

fn write_status(
    report: &ExportReport,
    locator: &PullRequestLocator,
    options: &ExportOptions,
) -> Result<(), ExportError> {
    let mut stdout = io::stdout().lock();
    let message = if report.is_empty() {
        format!(
            "No comments by {bot} found on {owner}/{repo}#{number}; nothing exported.",
            bot = options.bot_login,
            owner = locator.owner().as_str(),
            repo = locator.repository().as_str(),
            number = locator.number().get()
        )
    } else {
        let root = report
            .output_root
            .as_ref()
            .map_or_else(String::new, ToString::to_string);
        format!(
            "Exported {issues} issues ({resolved} resolved) and {discussions} discussions to {root}",
            issues = report.counts.total_issues(),
            resolved = report.counts.total_resolved(),
            discussions = report.counts.discussions,
        )
    };

    writeln!(stdout, "{message}").map_err(|error| ExportError::Io {
        message: error.to_string(),
    })
}
