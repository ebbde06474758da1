//! Delegate command - Hand the whole run to a richer helper when present
//!
//! A helper executable named `subpub-helper` sitting at the superproject root
//! takes precedence over the native publisher. When found, the normalized
//! flags plus all pass-through tokens are handed to it via process
//! replacement, so its exit status becomes ours. The probe happens once at
//! startup, before any git mutation, and the two paths never interleave.

use std::os::unix::fs::PermissionsExt;
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::PublishConfig;

/// Helper executable probed for at the superproject root
pub const HELPER_NAME: &str = "subpub-helper";

/// Locate the helper at `repo_root`, requiring an executable regular file.
pub fn helper_path(repo_root: &Path) -> Option<PathBuf> {
    let path = repo_root.join(HELPER_NAME);
    let metadata = std::fs::metadata(&path).ok()?;
    if metadata.is_file() && metadata.permissions().mode() & 0o111 != 0 {
        Some(path)
    } else {
        None
    }
}

/// Normalized argument vector for the helper.
///
/// `--modules <M> --branch <B> [--submsg <S>] [--supermsg <S>]
/// [--remote-update]` followed by every pass-through token verbatim.
pub fn helper_args(config: &PublishConfig) -> Vec<String> {
    let mut args = vec![
        "--modules".to_string(),
        config.modules.join(","),
        "--branch".to_string(),
        config.branch.clone(),
    ];
    if let Some(submsg) = &config.submsg {
        args.push("--submsg".to_string());
        args.push(submsg.clone());
    }
    if let Some(supermsg) = &config.supermsg {
        args.push("--supermsg".to_string());
        args.push(supermsg.clone());
    }
    if config.remote_update {
        args.push("--remote-update".to_string());
    }
    args.extend(config.passthrough.iter().cloned());
    args
}

/// Replace the current process with the helper (does not return on success).
pub fn exec_helper(helper: &Path, config: &PublishConfig) -> ! {
    let err = Command::new(helper).args(helper_args(config)).exec();

    // exec() only returns on error
    eprintln!("subpub: failed to exec {}: {err}", helper.display());
    std::process::exit(1);
}
