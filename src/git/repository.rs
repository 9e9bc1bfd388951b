use crate::domain::branch::{Branch, LOCAL_BRANCH_PREFIX, REMOTE_BRANCH_PREFIX};
use crate::error::{ReleaseFlowError, Result};
use crate::git::HistoryMode;
use git2::{ErrorCode, Oid, Repository as Git2Repo, Revwalk};
use std::path::Path;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
    remote_name: String,
    history_mode: HistoryMode,
}

impl Git2Repository {
    /// Open or discover a git repository
    ///
    /// `remote_name` selects which remote-tracking branches are part of the
    /// branch snapshot.
    pub fn open<P: AsRef<Path>>(path: P, remote_name: impl Into<String>) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository::from_git2(repo, remote_name))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo, remote_name: impl Into<String>) -> Self {
        Git2Repository {
            repo,
            remote_name: remote_name.into(),
            history_mode: HistoryMode::default(),
        }
    }

    pub fn with_history_mode(mut self, history_mode: HistoryMode) -> Self {
        self.history_mode = history_mode;
        self
    }

    /// Working directory of the repository, or its git directory when bare
    pub fn workdir(&self) -> &Path {
        self.repo.workdir().unwrap_or_else(|| self.repo.path())
    }

    fn resolve(&self, reference: &str) -> Result<Oid> {
        self.repo
            .revparse_single(reference)
            .and_then(|object| object.peel_to_commit())
            .map(|commit| commit.id())
            .map_err(|e| {
                tracing::debug!(reference, error = %e, "cannot resolve reference");
                ReleaseFlowError::unknown_reference(reference)
            })
    }

    fn walk_from(&self, tip: Oid) -> Result<Revwalk<'_>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(tip)?;
        if self.history_mode == HistoryMode::FirstParent {
            revwalk.simplify_first_parent()?;
        }
        Ok(revwalk)
    }
}

impl super::Repository for Git2Repository {
    fn current_branch(&self) -> Result<Branch> {
        let head = self.repo.head().map_err(|e| {
            ReleaseFlowError::DetachedOrUnresolvable(format!("HEAD ({})", e.message()))
        })?;

        if !head.is_branch() {
            let target = head
                .target()
                .map(|oid| oid.to_string())
                .unwrap_or_else(|| "HEAD".to_string());
            return Err(ReleaseFlowError::DetachedOrUnresolvable(target));
        }

        let name = head
            .name()
            .ok_or_else(|| ReleaseFlowError::DetachedOrUnresolvable("HEAD".to_string()))?;

        Ok(Branch::new(name, ""))
    }

    fn all_branches(&self) -> Result<Vec<Branch>> {
        let remote_prefix = format!("{}{}/", REMOTE_BRANCH_PREFIX, self.remote_name);
        let mut branches = Vec::new();

        for reference in self.repo.references()? {
            let reference = reference?;
            let Some(name) = reference.name() else {
                continue;
            };

            if name.starts_with(LOCAL_BRANCH_PREFIX) {
                branches.push(Branch::new(name, ""));
            } else if let Some(rest) = name.strip_prefix(remote_prefix.as_str()) {
                // refs/remotes/<remote>/HEAD is a symbolic pointer, not a branch
                if rest == "HEAD" {
                    continue;
                }
                branches.push(Branch::new(name, self.remote_name.as_str()));
            }
        }

        branches.sort_by(|a, b| a.raw_name().cmp(b.raw_name()));
        tracing::debug!(count = branches.len(), "enumerated branches");
        Ok(branches)
    }

    fn merge_base(&self, left: &str, right: &str) -> Result<Oid> {
        let left_oid = self.resolve(left)?;
        let right_oid = self.resolve(right)?;

        match self.repo.merge_base(left_oid, right_oid) {
            Ok(oid) => {
                tracing::debug!(left, right, merge_base = %oid, "found merge base");
                Ok(oid)
            }
            Err(e) if e.code() == ErrorCode::NotFound => {
                Err(ReleaseFlowError::no_common_ancestor(left, right))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn commits_since(&self, base: Oid, tip: &str) -> Result<usize> {
        let tip_oid = self.resolve(tip)?;

        if tip_oid != base && !self.repo.graph_descendant_of(tip_oid, base)? {
            return Err(ReleaseFlowError::history_traversal(base, tip));
        }

        let count = match self.history_mode {
            HistoryMode::FullAncestry => {
                let mut revwalk = self.walk_from(tip_oid)?;
                revwalk.hide(base)?;
                let mut count = 0;
                for oid in revwalk {
                    oid?;
                    count += 1;
                }
                count
            }
            HistoryMode::FirstParent => {
                // Stop at the first commit already contained in base's history;
                // base itself may sit on a merged side branch.
                let mut count = 0;
                for oid in self.walk_from(tip_oid)? {
                    let oid = oid?;
                    if oid == base || self.repo.graph_descendant_of(base, oid)? {
                        break;
                    }
                    count += 1;
                }
                count
            }
        };

        tracing::debug!(tip, base = %base, count, "counted commits since base");
        Ok(count)
    }

    fn commit_count_from_root(&self, tip: &str) -> Result<usize> {
        let tip_oid = self.resolve(tip)?;

        let mut count = 0;
        for oid in self.walk_from(tip_oid)? {
            oid?;
            count += 1;
        }

        tracing::debug!(tip, count, "counted commits from root");
        Ok(count)
    }
}
