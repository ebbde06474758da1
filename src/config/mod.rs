//! Run configuration
//!
//! Parsed once from CLI input at startup and never mutated afterwards.
//! Ambient state the run depends on (the clock for default commit messages)
//! is captured here, not re-read mid-run.

use chrono::{DateTime, Local};
use thiserror::Error;

/// Default module list when `--modules` is not given
pub const DEFAULT_MODULES: &str = "prompts";

/// Default target branch when `--branch` is not given
pub const DEFAULT_BRANCH: &str = "main";

/// Errors building a run configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No modules configured. Pass --modules with at least one submodule path.")]
    NoModules,

    #[error("Branch name must not be empty.")]
    EmptyBranch,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration for one publish run
#[derive(Debug, Clone)]
pub struct PublishConfig {
    /// Submodule paths to process, in order
    pub modules: Vec<String>,

    /// Branch to publish, applied to every module
    pub branch: String,

    /// Caller-supplied submodule commit message; a timestamped default
    /// applies when unset
    pub submsg: Option<String>,

    /// Caller-supplied superproject commit message; a timestamped default
    /// applies when unset
    pub supermsg: Option<String>,

    /// Run `git submodule update --remote --merge` before processing
    pub remote_update: bool,

    /// Tokens preserved verbatim for the delegate helper; the native path
    /// ignores them
    pub passthrough: Vec<String>,

    /// Startup clock, captured once; default messages derive from it
    now: DateTime<Local>,
}

impl PublishConfig {
    /// Build a configuration from raw CLI values.
    ///
    /// `now` is the captured startup clock used for default commit messages.
    pub fn new(
        modules: &str,
        branch: &str,
        submsg: Option<String>,
        supermsg: Option<String>,
        remote_update: bool,
        passthrough: Vec<String>,
        now: DateTime<Local>,
    ) -> ConfigResult<Self> {
        let branch = branch.trim();
        if branch.is_empty() {
            return Err(ConfigError::EmptyBranch);
        }

        let modules = parse_modules(modules);
        if modules.is_empty() {
            return Err(ConfigError::NoModules);
        }

        Ok(Self {
            modules,
            branch: branch.to_string(),
            submsg,
            supermsg,
            remote_update,
            passthrough,
            now,
        })
    }

    /// Message for submodule commits
    pub fn submodule_message(&self) -> String {
        self.submsg
            .clone()
            .unwrap_or_else(|| default_submodule_message(self.now))
    }

    /// Message for the superproject pointer commit
    pub fn superproject_message(&self) -> String {
        self.supermsg
            .clone()
            .unwrap_or_else(|| default_superproject_message(self.now))
    }
}

/// Split a comma-delimited module list, trimming entries and discarding
/// empty ones. Order is preserved.
pub fn parse_modules(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Default submodule commit message, second-resolution timestamp
pub fn default_submodule_message(now: DateTime<Local>) -> String {
    format!("Update submodule content ({})", now.format("%Y-%m-%d %H:%M:%S"))
}

/// Default superproject commit message, second-resolution timestamp
pub fn default_superproject_message(now: DateTime<Local>) -> String {
    format!(
        "Update submodule pointers ({})",
        now.format("%Y-%m-%d %H:%M:%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 5, 14, 30, 57).unwrap()
    }

    #[test]
    fn test_parse_modules_trims_and_drops_empties() {
        assert_eq!(
            parse_modules(" prompts , docs ,, ,assets"),
            vec!["prompts", "docs", "assets"]
        );
        assert!(parse_modules("").is_empty());
        assert!(parse_modules(" , ,").is_empty());
    }

    #[test]
    fn test_parse_modules_preserves_order() {
        assert_eq!(parse_modules("b,a,c"), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_default_messages_have_second_resolution_timestamp() {
        let message = default_submodule_message(fixed_now());
        assert!(message.contains("2024-03-05 14:30:57"));
        assert!(!message.is_empty());

        let message = default_superproject_message(fixed_now());
        assert!(message.contains("2024-03-05 14:30:57"));
        assert!(!message.is_empty());
    }

    #[test]
    fn test_config_defaults() {
        let config = PublishConfig::new(
            DEFAULT_MODULES,
            DEFAULT_BRANCH,
            None,
            None,
            false,
            Vec::new(),
            fixed_now(),
        )
        .unwrap();

        assert_eq!(config.modules, vec!["prompts"]);
        assert_eq!(config.branch, "main");
        assert!(!config.remote_update);
        assert!(config
            .submodule_message()
            .contains("2024-03-05 14:30:57"));
        assert!(config
            .superproject_message()
            .contains("2024-03-05 14:30:57"));
    }

    #[test]
    fn test_config_explicit_messages_win() {
        let config = PublishConfig::new(
            "prompts",
            "main",
            Some("custom sub".to_string()),
            Some("custom super".to_string()),
            true,
            vec!["--no-merge".to_string()],
            fixed_now(),
        )
        .unwrap();

        assert_eq!(config.submodule_message(), "custom sub");
        assert_eq!(config.superproject_message(), "custom super");
        assert!(config.remote_update);
        assert_eq!(config.passthrough, vec!["--no-merge"]);
    }

    #[test]
    fn test_config_rejects_empty_branch() {
        let result =
            PublishConfig::new("prompts", "  ", None, None, false, Vec::new(), fixed_now());
        assert!(matches!(result, Err(ConfigError::EmptyBranch)));
    }

    #[test]
    fn test_config_rejects_empty_modules() {
        let result = PublishConfig::new(" , ", "main", None, None, false, Vec::new(), fixed_now());
        assert!(matches!(result, Err(ConfigError::NoModules)));
    }
}
