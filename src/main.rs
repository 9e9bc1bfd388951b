use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use release_flow_version::cli::{run_version_workflow, VersionWorkflowArgs};
use release_flow_version::ui;

#[derive(clap::Parser)]
#[command(
    name = "release-flow-version",
    version,
    about = "Derive a semantic version for the checked-out commit from release-flow branches"
)]
struct Args {
    #[arg(short, long, default_value = ".", help = "Path to the git repository")]
    path: PathBuf,

    #[arg(short, long, help = "Branch to version instead of the checked-out one")]
    branch: Option<String>,

    #[arg(short, long, help = "Exact name of the main branch")]
    main_branch: Option<String>,

    #[arg(short, long, help = "Remote whose branches are considered")]
    remote: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(long, help = "Count commits along first parents only")]
    first_parent: bool,

    #[arg(
        long,
        conflicts_with = "branch",
        help = "Take the branch from the CI build agent environment"
    )]
    build_server: bool,

    #[arg(long = "final", help = "Print major.minor.patch only")]
    final_only: bool,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    verbose: u8,

    #[arg(short, long, conflicts_with = "verbose", help = "Only log errors")]
    quiet: bool,
}

impl Args {
    fn workflow_args(&self) -> VersionWorkflowArgs {
        VersionWorkflowArgs {
            path: self.path.clone(),
            config_path: self.config.clone(),
            branch: self.branch.clone(),
            main_branch: self.main_branch.clone(),
            remote: self.remote.clone(),
            first_parent: self.first_parent,
            build_server: self.build_server,
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let log_level = match verbose {
        0 if quiet => Level::ERROR,
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    // stdout carries the version only
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose, args.quiet);

    let result = run_version_workflow(&args.workflow_args())
        .with_context(|| format!("cannot derive version for {}", args.path.display()));

    match result {
        Ok(result) => {
            ui::display_version(&result.version, args.final_only);
            Ok(())
        }
        Err(e) => {
            ui::display_error(&e);
            std::process::exit(1);
        }
    }
}
