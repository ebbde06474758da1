//! Publish command - Commit and push submodules, then the superproject
//!
//! `subpub --modules prompts --branch main`
//!
//! This command, for each configured submodule:
//! 1. Optionally merges the tracked remote branch (`--remote-update`)
//! 2. Ensures the target branch is checked out and current (best-effort sync)
//! 3. Commits local changes if the work tree is dirty
//! 4. Pushes the branch to origin (fatal on failure)
//! 5. Stages the submodule pointer in the superproject
//!
//! After the loop, a staged pointer change in the superproject is committed
//! and pushed on the ambient current branch.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::PublishConfig;
use crate::git::{Git, GitError};

/// Errors that can occur during publish
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Not a git repository: {path}")]
    NotAGitRepo { path: String },

    #[error("Not a registered submodule: {name}")]
    NotASubmodule { name: String },

    #[error("Submodule work tree not checked out: {path}")]
    MissingWorkTree { path: String },

    #[error("Git error: {0}")]
    GitError(#[from] GitError),
}

pub type PublishResult<T> = Result<T, PublishError>;

/// A validated submodule to publish
#[derive(Debug, Clone)]
struct SubmoduleTarget {
    /// Path relative to the superproject root, as configured
    name: String,

    /// Absolute path of the checked-out work tree
    path: PathBuf,
}

/// Result of publishing a single submodule
#[derive(Debug, Clone)]
pub struct ModulePublishResult {
    /// Submodule path relative to the superproject root
    pub module: String,

    /// Whether a new commit was created in the submodule
    pub committed: bool,
}

/// Overall publish report
#[derive(Debug)]
pub struct PublishReport {
    /// Path to the superproject root
    pub repo_root: String,

    /// Branch that was published
    pub branch: String,

    /// Results for each submodule, in configured order
    pub modules: Vec<ModulePublishResult>,

    /// Whether a superproject pointer commit was made and pushed
    pub superproject_committed: bool,

    /// Whether anything changed: a submodule commit or a staged pointer
    pub updated: bool,
}

impl PublishReport {
    /// One-line outcome for the final log
    pub fn summary(&self) -> &'static str {
        if self.updated {
            "Completed with updates"
        } else {
            "Nothing to update"
        }
    }

    /// Format as human-readable string
    pub fn format(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Publishing {} from {}", self.branch, self.repo_root));
        lines.push(String::new());

        for result in &self.modules {
            let status = if result.committed {
                "committed and pushed"
            } else {
                "clean, pushed"
            };
            lines.push(format!("  ✓ {}: {}", result.module, status));
        }

        lines.push(String::new());
        if self.superproject_committed {
            lines.push("Superproject pointer commit pushed.".to_string());
        } else {
            lines.push("No superproject pointer changes.".to_string());
        }
        lines.push(format!("{}.", self.summary()));

        lines.join("\n")
    }
}

/// Publish the configured submodules and the superproject pointers.
///
/// # Arguments
/// * `repo_root` - Superproject top-level working tree
/// * `config` - Parsed run configuration
///
/// # Behavior
/// All modules are validated before any mutation. Fetch/pull sync failures
/// are tolerated (logged at warn); commit and push failures abort the run.
/// A failure on module N leaves earlier modules fully published and N's
/// local commit, if made, intact but unpushed.
pub fn publish(repo_root: &Path, config: &PublishConfig) -> PublishResult<PublishReport> {
    let targets = validate(repo_root, config)?;

    let mut updated = false;
    let mut modules = Vec::new();

    for target in &targets {
        if config.remote_update {
            remote_update(repo_root, target);
        }

        sync_branch(target, &config.branch)?;

        let committed = if Git::is_dirty(&target.path)? {
            Git::add_all(&target.path)?;
            Git::commit(&target.path, &config.submodule_message())?;
            tracing::info!("{}: committed local changes", target.name);
            updated = true;
            true
        } else {
            tracing::info!("{}: work tree clean, nothing to commit", target.name);
            false
        };

        // Fatal: an unpushed commit behind a pointer update would leave the
        // superproject referencing a commit origin cannot reach.
        Git::push(&target.path, "origin", Some(&config.branch))?;
        tracing::info!("{}: pushed {} to origin", target.name, config.branch);

        // Stage the pointer even without a new commit; it may have moved
        // through the pull above.
        Git::add(repo_root, &target.name)?;

        modules.push(ModulePublishResult {
            module: target.name.clone(),
            committed,
        });
    }

    let superproject_committed = if Git::has_staged_changes(repo_root)? {
        Git::commit(repo_root, &config.superproject_message())?;
        Git::push(repo_root, "origin", None)?;
        tracing::info!("superproject: pointer commit pushed");
        updated = true;
        true
    } else {
        tracing::info!("superproject: no staged pointer changes");
        false
    };

    Ok(PublishReport {
        repo_root: repo_root.display().to_string(),
        branch: config.branch.clone(),
        modules,
        superproject_committed,
        updated,
    })
}

/// Check every precondition before touching anything.
///
/// Fail-fast: a single unregistered module aborts the whole run with no
/// mutation attempted for any module.
fn validate(repo_root: &Path, config: &PublishConfig) -> PublishResult<Vec<SubmoduleTarget>> {
    if !Git::is_work_tree(repo_root) {
        return Err(PublishError::NotAGitRepo {
            path: repo_root.display().to_string(),
        });
    }

    let registered = Git::submodule_paths(repo_root)?;

    let mut targets = Vec::new();
    for name in &config.modules {
        if !registered.iter().any(|path| path == name) {
            return Err(PublishError::NotASubmodule { name: name.clone() });
        }

        let path = repo_root.join(name);
        // A checked-out submodule carries a .git directory or gitfile.
        if !path.join(".git").exists() {
            return Err(PublishError::MissingWorkTree {
                path: path.display().to_string(),
            });
        }

        targets.push(SubmoduleTarget {
            name: name.clone(),
            path,
        });
    }

    Ok(targets)
}

/// Best-effort `git submodule update --remote --merge` for one module.
fn remote_update(repo_root: &Path, target: &SubmoduleTarget) {
    match Git::submodule_update_remote_merge(repo_root, &target.name) {
        Ok(()) => tracing::info!("{}: merged tracked remote branch", target.name),
        Err(e) => tracing::warn!("{}: skipped remote update: {e}", target.name),
    }
}

/// Bring `branch` current in the submodule before committing on top of it.
///
/// Fetch and fast-forward pull are tolerated failures (offline runs and
/// missing remote branches proceed on local state); a failed checkout is
/// fatal because the wrong branch would be committed and pushed.
fn sync_branch(target: &SubmoduleTarget, branch: &str) -> PublishResult<()> {
    if let Err(e) = Git::fetch(&target.path, "origin", branch) {
        tracing::warn!("{}: skipped fetch: {e}", target.name);
    }

    let current = Git::current_branch(&target.path)?;
    if current != branch {
        tracing::info!("{}: switching {current} -> {branch}", target.name);
        Git::checkout(&target.path, branch)?;
    }

    match Git::pull_ff_only(&target.path, "origin", branch) {
        Ok(()) => tracing::info!("{}: synced with origin/{branch}", target.name),
        Err(e) => tracing::warn!("{}: skipped sync: {e}", target.name),
    }

    Ok(())
}
