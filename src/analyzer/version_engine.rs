use semver::Version;

use crate::config::NamingConfig;
use crate::domain::version::{
    bump_minor, bump_patch_times, counter_prerelease, sanitize_identifier, with_prerelease,
};
use crate::domain::{latest, releases, Branch, BranchType, Release};
use crate::error::{ReleaseFlowError, Result};
use crate::git::Repository;

/// Derives the version of a branch from the repository's release-flow topology
pub struct VersionEngine<'a, R: Repository> {
    repo: &'a R,
    naming: &'a NamingConfig,
}

impl<'a, R: Repository> VersionEngine<'a, R> {
    /// Create a new version engine
    pub fn new(repo: &'a R, naming: &'a NamingConfig) -> Self {
        VersionEngine { repo, naming }
    }

    /// Version of the checked-out branch
    pub fn current_version(&self) -> Result<Version> {
        let branch = self.repo.current_branch()?;
        self.version_for(&branch)
    }

    /// Version of `branch`, according to its classification.
    ///
    /// - main: next minor after the latest release, `-<label>.<commits on main>`
    /// - release: the branch's own version plus one patch per commit since main
    /// - feature/hotfix: next minor after the latest release, `-<name>.<commits>`
    pub fn version_for(&self, branch: &Branch) -> Result<Version> {
        let branch_type = branch.classify(self.naming);
        tracing::debug!(branch = branch.raw_name(), %branch_type, "classified branch");

        let version = match branch_type {
            BranchType::Main => self.main_version(branch)?,
            BranchType::Release => self.release_version(branch)?,
            BranchType::Feature | BranchType::Hotfix => self.topic_version(branch)?,
            BranchType::Unsupported => {
                return Err(ReleaseFlowError::UnsupportedBranch(
                    branch.raw_name().to_string(),
                ))
            }
        };

        tracing::info!(branch = branch.raw_name(), %version, "derived version");
        Ok(version)
    }

    fn latest_release(&self) -> Result<Option<Release>> {
        let branches = self.repo.all_branches()?;
        let releases = releases(&branches, self.naming)?;
        Ok(latest(&releases).cloned())
    }

    /// Commits on `tip` since main diverged from `other`
    fn commits_since_divergence(&self, main: &Branch, other: &Branch, tip: &Branch) -> Result<usize> {
        let base = self.repo.merge_base(main.raw_name(), other.raw_name())?;
        self.repo.commits_since(base, tip.raw_name())
    }

    fn main_version(&self, branch: &Branch) -> Result<Version> {
        let label = &self.naming.prerelease_label;

        let Some(release) = self.latest_release()? else {
            let count = self.repo.commit_count_from_root(branch.raw_name())?;
            tracing::debug!(count, "no release yet, counting from root");
            return self.stamp(&self.naming.default_version, label, count, branch);
        };

        let main = self.repo.main_branch(self.naming)?;
        let count = self.commits_since_divergence(&main, &release.branch, &main)?;
        tracing::debug!(release = %release.version, count, "main ahead of latest release");
        self.stamp(&bump_minor(&release.version), label, count, branch)
    }

    fn release_version(&self, branch: &Branch) -> Result<Version> {
        let release = Release::from_branch(branch.clone(), self.naming)?;
        let main = self.repo.main_branch(self.naming)?;
        let count = self.commits_since_divergence(&main, branch, branch)?;
        tracing::debug!(release = %release.version, count, "commits on release branch");
        Ok(bump_patch_times(&release.version, count))
    }

    fn topic_version(&self, branch: &Branch) -> Result<Version> {
        let release = self.latest_release()?.ok_or(ReleaseFlowError::NoReleaseFound)?;
        let main = self.repo.main_branch(self.naming)?;
        let count = self.commits_since_divergence(&main, &release.branch, branch)?;
        tracing::debug!(release = %release.version, count, "commits since release divergence");

        let tag = sanitize_identifier(branch.short_name());
        self.stamp(&bump_minor(&release.version), &tag, count, branch)
    }

    fn stamp(&self, base: &Version, tag: &str, count: usize, branch: &Branch) -> Result<Version> {
        let pre = counter_prerelease(tag, count).ok_or_else(|| ReleaseFlowError::InvalidPrerelease {
            branch: branch.raw_name().to_string(),
            identifier: tag.to_string(),
        })?;
        Ok(with_prerelease(base, pre))
    }
}
