//! Subpub commands
//!
//! This module contains the implementation of subpub CLI commands.

pub mod delegate;
pub mod publish;

pub use delegate::{exec_helper, helper_args, helper_path, HELPER_NAME};
pub use publish::{publish, ModulePublishResult, PublishError, PublishReport, PublishResult};
