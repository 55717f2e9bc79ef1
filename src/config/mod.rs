//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.magpie.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `MAGPIE_PR_URL`, `MAGPIE_TOKEN`, or legacy
//!    `GITHUB_TOKEN`
//! 4. **Command-line arguments** – `--pr-url`/`-u`, `--token`/`-t`, etc.
//!
//! # Configuration File
//!
//! Place `.magpie.toml` in the current directory, home directory, or
//! XDG config directory with:
//!
//! ```toml
//! pr_url = "https://github.com/owner/repo/pull/123"
//! token = "ghp_example"
//! owner = "octocat"
//! repo = "hello-world"
//! output_dir = "reviews"
//! bot_login = "coderabbitai[bot]"
//! ```

use std::env;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::github::error::ExportError;
use crate::github::locator::{PullRequestLocator, RepositoryLocator};

/// Default directory for the exported file tree.
const DEFAULT_OUTPUT_DIR: &str = "reviews";
/// Default directory for the combined and error-only log files.
const DEFAULT_LOG_DIR: &str = "logs";
/// Default review bot account whose comments are exported.
const DEFAULT_BOT_LOGIN: &str = "coderabbitai[bot]";

/// Export target resolved from configuration.
///
/// When no pull request number is available the exporter auto-selects the
/// most recently updated open pull request, which needs a repository-level
/// gateway call and therefore stays a distinct variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTarget {
    /// Fully specified pull request.
    PullRequest(PullRequestLocator),
    /// Repository whose latest open pull request should be selected.
    Repository(RepositoryLocator),
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `MAGPIE_PR_URL` or `--pr-url`: Pull request URL
/// - `MAGPIE_TOKEN`, `GITHUB_TOKEN`, or `--token`: Authentication token
/// - `MAGPIE_OWNER` or `--owner`: Repository owner
/// - `MAGPIE_REPO` or `--repo`: Repository name
/// - `MAGPIE_NUMBER` or `--number`: Pull request number
/// - `MAGPIE_OUTPUT_DIR` or `--output-dir`: Export tree root
/// - `MAGPIE_BOT_LOGIN` or `--bot-login`: Review bot account login
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "MAGPIE",
    discovery(
        dotfile_name = ".magpie.toml",
        config_file_name = "magpie.toml",
        app_name = "magpie"
    )
)]
pub struct MagpieConfig {
    /// GitHub pull request URL to export.
    ///
    /// Can be provided via:
    /// - CLI: `--pr-url <URL>` or `-u <URL>`
    /// - Environment: `MAGPIE_PR_URL`
    /// - Config file: `pr_url = "..."`
    #[ortho_config(cli_short = 'u')]
    pub pr_url: Option<String>,

    /// Personal access token for GitHub API authentication.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `MAGPIE_TOKEN` or `GITHUB_TOKEN` (legacy)
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Repository owner (e.g., "octocat").
    ///
    /// Can be provided via:
    /// - CLI: `--owner <OWNER>` or `-o <OWNER>`
    /// - Environment: `MAGPIE_OWNER`
    /// - Config file: `owner = "..."`
    #[ortho_config(cli_short = 'o')]
    pub owner: Option<String>,

    /// Repository name (e.g., "hello-world").
    ///
    /// Can be provided via:
    /// - CLI: `--repo <REPO>` or `-r <REPO>`
    /// - Environment: `MAGPIE_REPO`
    /// - Config file: `repo = "..."`
    #[ortho_config(cli_short = 'r')]
    pub repo: Option<String>,

    /// Pull request number.
    ///
    /// When omitted alongside owner/repo, the most recently updated open
    /// pull request is selected automatically.
    ///
    /// Can be provided via:
    /// - CLI: `--number <N>` or `-n <N>`
    /// - Environment: `MAGPIE_NUMBER`
    /// - Config file: `number = 123`
    #[ortho_config(cli_short = 'n')]
    pub number: Option<u64>,

    /// Root directory for the exported file tree.
    ///
    /// Defaults to `reviews` relative to the working directory.
    #[ortho_config()]
    pub output_dir: Option<String>,

    /// Directory for the combined and error-only log files.
    ///
    /// Defaults to `logs` relative to the working directory.
    #[ortho_config()]
    pub log_dir: Option<String>,

    /// Review bot account login whose comments are exported.
    ///
    /// Defaults to `coderabbitai[bot]`.
    #[ortho_config()]
    pub bot_login: Option<String>,

    /// Log verbosity filter (e.g. `info`, `magpie=debug`).
    #[ortho_config()]
    pub log_level: Option<String>,
}

impl Default for MagpieConfig {
    fn default() -> Self {
        Self {
            pr_url: None,
            token: None,
            owner: None,
            repo: None,
            number: None,
            output_dir: None,
            log_dir: None,
            bot_login: None,
            log_level: None,
        }
    }
}

impl MagpieConfig {
    /// Resolves the token from configuration or the legacy `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::MissingToken`] when no token source provides a
    /// value.
    pub fn resolve_token(&self) -> Result<String, ExportError> {
        self.token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .ok_or(ExportError::MissingToken)
    }

    /// Resolves the export target from the URL or owner/repo coordinates.
    ///
    /// A `pr_url` takes precedence. Otherwise owner and repo are required,
    /// with the number optional (auto-selection applies when absent).
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Configuration`] when neither a URL nor
    /// owner/repo coordinates are configured, or a parse/validation error
    /// from the locator layer.
    pub fn resolve_target(&self) -> Result<ExportTarget, ExportError> {
        if let Some(pr_url) = self.pr_url.as_deref() {
            return Ok(ExportTarget::PullRequest(PullRequestLocator::parse(
                pr_url,
            )?));
        }

        match (self.owner.as_deref(), self.repo.as_deref()) {
            (Some(owner), Some(repo)) => {
                let repository = RepositoryLocator::from_owner_repo(owner, repo)?;
                match self.number {
                    Some(number) => Ok(ExportTarget::PullRequest(
                        repository.with_number(number)?,
                    )),
                    None => Ok(ExportTarget::Repository(repository)),
                }
            }
            _ => Err(ExportError::Configuration {
                message:
                    "a pull request target is required (use --pr-url, or --owner with --repo)"
                        .to_owned(),
            }),
        }
    }

    /// Export tree root, defaulting to `reviews`.
    #[must_use]
    pub fn output_root(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(self.output_dir.as_deref().unwrap_or(DEFAULT_OUTPUT_DIR))
    }

    /// Log directory, defaulting to `logs`.
    #[must_use]
    pub fn log_root(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(self.log_dir.as_deref().unwrap_or(DEFAULT_LOG_DIR))
    }

    /// Review bot login, defaulting to `coderabbitai[bot]`.
    #[must_use]
    pub fn bot_login(&self) -> &str {
        self.bot_login.as_deref().unwrap_or(DEFAULT_BOT_LOGIN)
    }
}
