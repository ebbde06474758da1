//! Subpub - Submodule publish automation
//!
//! Subpub commits and pushes changes inside configured git submodules, then
//! stages, commits, and pushes the superproject's recorded pointers to them,
//! using git as an external subprocess throughout.

pub mod commands;
pub mod config;
pub mod git;

// Re-exports for convenience
pub use commands::{publish, PublishError, PublishReport, PublishResult};
pub use config::{ConfigError, PublishConfig};
pub use git::{Git, GitError};
