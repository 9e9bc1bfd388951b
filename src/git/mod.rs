//! Repository access layer
//!
//! The version engine never talks to git directly. It consumes the [Repository]
//! trait, which exposes the handful of reference and commit-graph queries the
//! release-flow rules need.
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory commit graph for tests
//!
//! ```rust
//! # use release_flow_version::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> release_flow_version::Result<()> {
//! let base = repo.merge_base("refs/heads/main", "refs/heads/release/1.2.0")?;
//! let ahead = repo.commits_since(base, "refs/heads/main")?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::config::NamingConfig;
use crate::domain::{trim_ref_prefix, Branch, BranchType};
use crate::error::{ReleaseFlowError, Result};
use git2::Oid;

/// How commit distances are counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryMode {
    /// Every commit reachable from the tip, merged side branches included
    #[default]
    FullAncestry,
    /// Only the first-parent chain of the tip
    ///
    /// Counting stops at the first commit of that chain contained in the base's
    /// history, so a base reachable only through a merged side branch (a release
    /// branch merged back into main) still yields a count.
    FirstParent,
}

impl HistoryMode {
    pub fn from_first_parent(first_parent: bool) -> Self {
        if first_parent {
            HistoryMode::FirstParent
        } else {
            HistoryMode::FullAncestry
        }
    }
}

/// Read-only view of a repository's branches and commit graph
///
/// Reference arguments are fully-qualified names such as `refs/heads/main` or
/// `refs/remotes/origin/release/1.2.0`, as carried by [Branch::raw_name].
/// Implementations never modify the repository.
pub trait Repository {
    /// Resolve the checked-out branch.
    ///
    /// # Returns
    /// * `Ok(Branch)` - The local branch HEAD points to
    /// * `Err(DetachedOrUnresolvable)` - HEAD is detached or unborn
    fn current_branch(&self) -> Result<Branch>;

    /// Every local branch plus every branch of the configured remote.
    ///
    /// Remote-tracking branches carry the remote name; local ones carry none.
    fn all_branches(&self) -> Result<Vec<Branch>>;

    /// Nearest common ancestor of two references.
    ///
    /// # Returns
    /// * `Ok(Oid)` - The merge-base commit
    /// * `Err(UnknownReference)` - Either reference cannot be resolved
    /// * `Err(NoCommonAncestor)` - The histories are unrelated
    fn merge_base(&self, left: &str, right: &str) -> Result<Oid>;

    /// Number of commits reachable from `tip` and not from `base`.
    ///
    /// `base` must be `tip` itself or one of its ancestors; otherwise
    /// [ReleaseFlowError::HistoryTraversal] is returned. In first-parent mode only
    /// the first-parent chain of `tip` is counted, up to the first commit already
    /// contained in `base`'s history.
    fn commits_since(&self, base: Oid, tip: &str) -> Result<usize>;

    /// Total number of commits reachable from `tip`
    fn commit_count_from_root(&self, tip: &str) -> Result<usize>;

    /// The branch classified as main.
    ///
    /// The main pattern is tested against the short name, so a topic branch such as
    /// `feature/main` classifies as main too. A top-level branch (logical name equal
    /// to its short name) is preferred over such nested ones; within each group a
    /// local branch wins over a remote-tracking one.
    fn main_branch(&self, naming: &NamingConfig) -> Result<Branch> {
        let (top_level, nested): (Vec<Branch>, Vec<Branch>) = self
            .all_branches()?
            .into_iter()
            .filter(|b| b.classify(naming) == BranchType::Main)
            .partition(|b| b.logical_name(&naming.remote_name) == b.short_name());

        prefer_local(top_level)
            .or_else(|| prefer_local(nested))
            .ok_or_else(|| ReleaseFlowError::MainBranchNotFound(naming.remote_name.clone()))
    }

    /// Find a branch by a user supplied name.
    ///
    /// `name` may be bare (`feature/login`), local (`refs/heads/feature/login`) or
    /// qualified with the configured remote (`refs/remotes/origin/feature/login`).
    fn find_branch(&self, name: &str, naming: &NamingConfig) -> Result<Branch> {
        let wanted = trim_ref_prefix(name, &naming.remote_name);
        let matches: Vec<Branch> = self
            .all_branches()?
            .into_iter()
            .filter(|b| b.logical_name(&naming.remote_name) == wanted)
            .collect();

        prefer_local(matches).ok_or_else(|| ReleaseFlowError::unknown_reference(name))
    }
}

fn prefer_local(branches: Vec<Branch>) -> Option<Branch> {
    let fallback = branches.first().cloned();
    branches.into_iter().find(Branch::is_local).or(fallback)
}
