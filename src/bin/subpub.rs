use clap::Parser;
use subpub::commands::{delegate, publish};
use subpub::config::{PublishConfig, DEFAULT_BRANCH, DEFAULT_MODULES};
use subpub::git::Git;

/// CLI arguments for subpub
#[derive(Parser, Debug)]
#[command(name = "subpub")]
#[command(about = "Commit and push submodule changes, then publish the superproject pointers")]
struct Args {
    /// Comma-separated submodule paths to publish, in order
    #[arg(long, default_value = DEFAULT_MODULES)]
    modules: String,

    /// Branch to publish in every submodule
    #[arg(long, default_value = DEFAULT_BRANCH)]
    branch: String,

    /// Commit message for submodule commits (default: timestamped)
    #[arg(long)]
    submsg: Option<String>,

    /// Commit message for the superproject pointer commit (default: timestamped)
    #[arg(long)]
    supermsg: Option<String>,

    /// Merge tracked remote branches into submodules before processing
    #[arg(long)]
    remote_update: bool,

    /// Accepted for the delegate helper; the native path ignores it
    #[arg(long)]
    no_merge: bool,

    /// Extra tokens forwarded verbatim to the delegate helper
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    passthrough: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize tracing with filtering
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("subpub=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Ambient state is captured once: the clock for default messages here,
    // the repository root below. Nothing re-reads either mid-run.
    let now = chrono::Local::now();

    let mut passthrough = args.passthrough;
    if args.no_merge {
        passthrough.insert(0, "--no-merge".to_string());
    }

    let config = PublishConfig::new(
        &args.modules,
        &args.branch,
        args.submsg,
        args.supermsg,
        args.remote_update,
        passthrough,
        now,
    )?;

    let cwd = std::env::current_dir()?;
    if !Git::is_work_tree(&cwd) {
        anyhow::bail!("not inside a git work tree: {}", cwd.display());
    }
    let repo_root = Git::top_level(&cwd)?;

    // A helper at the root takes over the whole run; native logic never
    // executes alongside it.
    if let Some(helper) = delegate::helper_path(&repo_root) {
        tracing::info!("delegating to {}", helper.display());
        delegate::exec_helper(&helper, &config);
    }

    let report = publish(&repo_root, &config)?;
    tracing::info!("{}", report.summary());
    println!("{}", report.format());

    Ok(())
}
