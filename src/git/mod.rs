//! Git operations via subprocess
//!
//! Every operation shells out to the `git` binary and treats its exit status
//! and captured output as the whole contract. Remote-touching calls (fetch,
//! pull, push) block until git returns; there is no timeout here.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use thiserror::Error;

/// Errors from invoking git
#[derive(Debug, Error)]
pub enum GitError {
    #[error("git command failed: {message}")]
    CommandFailed { message: String },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type GitResult<T> = Result<T, GitError>;

/// Build a one-line error message from a failed git invocation.
///
/// Prefers stderr, falls back to stdout, then to the bare exit status.
pub fn command_error_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stdout = stdout.trim();
    if !stdout.is_empty() {
        return stdout.to_string();
    }

    format!("exited with {}", output.status)
}

/// Thin namespace over the `git` command line
pub struct Git;

impl Git {
    /// Run git with `args` in `dir`, capturing output.
    fn run(dir: &Path, args: &[&str]) -> GitResult<Output> {
        let output = Command::new("git").args(args).current_dir(dir).output()?;
        Ok(output)
    }

    /// Run git and require a zero exit status.
    fn run_checked(dir: &Path, args: &[&str]) -> GitResult<Output> {
        let output = Self::run(dir, args)?;
        if !output.status.success() {
            return Err(GitError::CommandFailed {
                message: command_error_message(&output),
            });
        }
        Ok(output)
    }

    /// Run git, require success, and return trimmed stdout.
    fn run_stdout(dir: &Path, args: &[&str]) -> GitResult<String> {
        let output = Self::run_checked(dir, args)?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Whether `path` is inside a git work tree
    pub fn is_work_tree(path: &Path) -> bool {
        Self::run_stdout(path, &["rev-parse", "--is-inside-work-tree"])
            .is_ok_and(|out| out == "true")
    }

    /// Absolute path of the top-level working tree containing `path`
    pub fn top_level(path: &Path) -> GitResult<PathBuf> {
        let out = Self::run_stdout(path, &["rev-parse", "--show-toplevel"])?;
        Ok(PathBuf::from(out))
    }

    /// Name of the currently checked-out branch (`HEAD` when detached)
    pub fn current_branch(path: &Path) -> GitResult<String> {
        Self::run_stdout(path, &["rev-parse", "--abbrev-ref", "HEAD"])
    }

    /// Relative paths of all registered submodules, in `git submodule status`
    /// order. Each status line is ` <sha> <path> (<ref>)` with a one-character
    /// state prefix; the path is the second whitespace-separated field.
    pub fn submodule_paths(path: &Path) -> GitResult<Vec<String>> {
        let out = Self::run_stdout(path, &["submodule", "status"])?;
        Ok(out
            .lines()
            .filter_map(|line| line.split_whitespace().nth(1))
            .map(ToString::to_string)
            .collect())
    }

    /// `git submodule update --remote --merge -- <module>` from the
    /// superproject root
    pub fn submodule_update_remote_merge(path: &Path, module: &str) -> GitResult<()> {
        Self::run_checked(
            path,
            &["submodule", "update", "--remote", "--merge", "--", module],
        )?;
        Ok(())
    }

    /// `git fetch <remote> <branch>`
    pub fn fetch(path: &Path, remote: &str, branch: &str) -> GitResult<()> {
        Self::run_checked(path, &["fetch", remote, branch])?;
        Ok(())
    }

    /// `git checkout <branch>`
    pub fn checkout(path: &Path, branch: &str) -> GitResult<()> {
        Self::run_checked(path, &["checkout", branch])?;
        Ok(())
    }

    /// `git pull --ff-only <remote> <branch>`
    pub fn pull_ff_only(path: &Path, remote: &str, branch: &str) -> GitResult<()> {
        Self::run_checked(path, &["pull", "--ff-only", remote, branch])?;
        Ok(())
    }

    /// Porcelain status lines for the working tree (empty when clean)
    pub fn status_porcelain(path: &Path) -> GitResult<String> {
        Self::run_stdout(path, &["status", "--porcelain"])
    }

    /// Whether the working tree has any untracked, modified, or staged change
    pub fn is_dirty(path: &Path) -> GitResult<bool> {
        Ok(!Self::status_porcelain(path)?.is_empty())
    }

    /// Whether the index has staged-but-uncommitted changes.
    ///
    /// A porcelain line's first column is the index status; ' ' means the
    /// index matches HEAD and '?' marks an untracked file, anything else is a
    /// staged change.
    pub fn has_staged_changes(path: &Path) -> GitResult<bool> {
        let out = Self::status_porcelain(path)?;
        Ok(out
            .lines()
            .any(|line| !matches!(line.chars().next(), None | Some(' ' | '?'))))
    }

    /// `git add -A`
    pub fn add_all(path: &Path) -> GitResult<()> {
        Self::run_checked(path, &["add", "-A"])?;
        Ok(())
    }

    /// `git add -- <pathspec>`
    pub fn add(path: &Path, pathspec: &str) -> GitResult<()> {
        Self::run_checked(path, &["add", "--", pathspec])?;
        Ok(())
    }

    /// `git commit -m <message>`
    pub fn commit(path: &Path, message: &str) -> GitResult<()> {
        Self::run_checked(path, &["commit", "-m", message])?;
        Ok(())
    }

    /// Push to `remote`. With a branch, pushes that explicit refspec;
    /// without, pushes the ambient current branch.
    pub fn push(path: &Path, remote: &str, branch: Option<&str>) -> GitResult<()> {
        match branch {
            Some(branch) => Self::run_checked(path, &["push", remote, branch])?,
            None => Self::run_checked(path, &["push"])?,
        };
        Ok(())
    }

    /// `git init`
    pub fn init(path: &Path) -> GitResult<()> {
        Self::run_checked(path, &["init"])?;
        Ok(())
    }

    /// `git config <key> <value>`
    pub fn config_set(path: &Path, key: &str, value: &str) -> GitResult<()> {
        Self::run_checked(path, &["config", key, value])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup_repo() -> TempDir {
        let temp = TempDir::new().unwrap();
        Git::init(temp.path()).unwrap();
        Git::config_set(temp.path(), "user.email", "test@test.com").unwrap();
        Git::config_set(temp.path(), "user.name", "Test").unwrap();
        temp
    }

    fn checkout_new(path: &Path, branch: &str) {
        Git::run_checked(path, &["checkout", "-b", branch]).unwrap();
    }

    #[test]
    fn test_is_work_tree() {
        let temp = setup_repo();
        assert!(Git::is_work_tree(temp.path()));

        let plain = TempDir::new().unwrap();
        assert!(!Git::is_work_tree(plain.path()));
    }

    #[test]
    fn test_top_level() {
        let temp = setup_repo();
        let nested = temp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let root = Git::top_level(&nested).unwrap();
        assert_eq!(
            root.canonicalize().unwrap(),
            temp.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_dirty_and_staged() {
        let temp = setup_repo();
        assert!(!Git::is_dirty(temp.path()).unwrap());

        fs::write(temp.path().join("file.txt"), "content").unwrap();
        assert!(Git::is_dirty(temp.path()).unwrap());
        // Untracked only: nothing staged yet
        assert!(!Git::has_staged_changes(temp.path()).unwrap());

        Git::add_all(temp.path()).unwrap();
        assert!(Git::has_staged_changes(temp.path()).unwrap());

        Git::commit(temp.path(), "add file").unwrap();
        assert!(!Git::is_dirty(temp.path()).unwrap());
        assert!(!Git::has_staged_changes(temp.path()).unwrap());
    }

    #[test]
    fn test_current_branch() {
        let temp = setup_repo();
        fs::write(temp.path().join("file.txt"), "content").unwrap();
        Git::add_all(temp.path()).unwrap();
        Git::commit(temp.path(), "initial").unwrap();

        checkout_new(temp.path(), "feature");
        assert_eq!(Git::current_branch(temp.path()).unwrap(), "feature");
    }

    #[test]
    fn test_commit_without_changes_fails() {
        let temp = setup_repo();
        fs::write(temp.path().join("file.txt"), "content").unwrap();
        Git::add_all(temp.path()).unwrap();
        Git::commit(temp.path(), "initial").unwrap();

        let result = Git::commit(temp.path(), "empty");
        assert!(matches!(result, Err(GitError::CommandFailed { .. })));
    }

    #[test]
    fn test_submodule_paths_empty() {
        let temp = setup_repo();
        assert!(Git::submodule_paths(temp.path()).unwrap().is_empty());
    }

    #[test]
    fn test_command_error_message_prefers_stderr() {
        let output = Command::new("git")
            .arg("not-a-real-subcommand")
            .output()
            .unwrap();
        assert!(!output.status.success());
        let message = command_error_message(&output);
        assert!(!message.is_empty());
    }
}
