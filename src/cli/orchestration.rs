//! Version workflow orchestration
//!
//! Connects configuration, repository access, branch selection and the version
//! engine. Kept free of clap so the workflow can be driven programmatically.

use std::path::PathBuf;

use semver::Version;

use crate::analyzer::VersionEngine;
use crate::build_agent::{self, BuildAgent};
use crate::config::{load_config, Config, NamingConfig};
use crate::domain::{Branch, BranchType};
use crate::error::{ReleaseFlowError, Result};
use crate::git::{Git2Repository, HistoryMode, Repository};

/// Arguments for the version workflow
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VersionWorkflowArgs {
    /// Path inside the repository
    pub path: PathBuf,

    /// Path to custom config file
    pub config_path: Option<PathBuf>,

    /// Branch to version instead of HEAD
    pub branch: Option<String>,

    /// Exact main branch name replacing the configured pattern
    pub main_branch: Option<String>,

    /// Remote replacing the configured remote
    pub remote: Option<String>,

    /// Count commits along first parents only
    pub first_parent: bool,

    /// Take the branch from the detected CI build agent
    pub build_server: bool,
}

impl VersionWorkflowArgs {
    /// Apply command line overrides on top of a loaded configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(main_branch) = &self.main_branch {
            config.override_main_branch(main_branch);
        }
        if let Some(remote) = &self.remote {
            config.naming.remote_name = remote.clone();
        }
        if self.first_parent {
            config.history.first_parent = true;
        }
    }
}

/// Where the branch to version comes from
#[derive(Debug, Clone, PartialEq)]
pub enum BranchSelection {
    /// The checked-out branch
    Head,
    /// A branch named by the user or the build agent
    Named(String),
}

/// Result of a successful version workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// The branch that was versioned
    pub branch: Branch,

    /// Its classification
    pub branch_type: BranchType,

    /// The derived version
    pub version: Version,
}

/// Main version workflow
///
/// 1. Open the repository at `args.path`
/// 2. Load configuration and apply overrides
/// 3. Select the branch (HEAD, `--branch`, or build agent)
/// 4. Derive its version
pub fn run_version_workflow(args: &VersionWorkflowArgs) -> Result<WorkflowResult> {
    let git = git2::Repository::discover(&args.path)?;
    let repo_dir = git.workdir().unwrap_or_else(|| git.path()).to_path_buf();

    let mut config = load_config(args.config_path.as_deref(), &repo_dir)?;
    args.apply_overrides(&mut config);
    let naming = config.compile()?;

    let repo = Git2Repository::from_git2(git, naming.remote_name.clone())
        .with_history_mode(HistoryMode::from_first_parent(config.history.first_parent));

    let selection = branch_selection(args)?;
    derive_version(&repo, &naming, &selection)
}

/// Decide which branch to version from the arguments and environment
pub fn branch_selection(args: &VersionWorkflowArgs) -> Result<BranchSelection> {
    if let Some(branch) = &args.branch {
        return Ok(BranchSelection::Named(branch.clone()));
    }

    if args.build_server {
        let agent = build_agent::resolve()
            .ok_or_else(|| ReleaseFlowError::config("no build agent detected in environment"))?;
        return branch_from_agent(agent.as_ref()).map(BranchSelection::Named);
    }

    Ok(BranchSelection::Head)
}

fn branch_from_agent(agent: &dyn BuildAgent) -> Result<String> {
    let branch = agent.branch_name()?;
    tracing::info!(agent = agent.name(), branch = %branch, "using branch from build agent");
    Ok(branch)
}

/// Derive the version of the selected branch in `repo`
pub fn derive_version<R: Repository>(
    repo: &R,
    naming: &NamingConfig,
    selection: &BranchSelection,
) -> Result<WorkflowResult> {
    let branch = match selection {
        BranchSelection::Head => repo.current_branch()?,
        BranchSelection::Named(name) => repo.find_branch(name, naming)?,
    };

    let version = VersionEngine::new(repo, naming).version_for(&branch)?;

    Ok(WorkflowResult {
        branch_type: branch.classify(naming),
        branch,
        version,
    })
}
