use std::cmp::Ordering;

use semver::Version;

use crate::config::NamingConfig;
use crate::domain::branch::{Branch, BranchType};
use crate::domain::version::parse_release_version;
use crate::error::{ReleaseFlowError, Result};

/// A release line, backed by the release branch it was discovered on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub name: String,
    pub version: Version,
    pub branch: Branch,
}

impl Release {
    /// Build a release from a branch already classified as a release branch.
    ///
    /// The version text is the branch's logical name without the release prefix,
    /// which for `release/1.2.0` is its short name.
    pub fn from_branch(branch: Branch, naming: &NamingConfig) -> Result<Self> {
        let logical = branch.logical_name(&naming.remote_name);
        let name = logical
            .strip_prefix(naming.release_prefix.as_str())
            .unwrap_or(logical)
            .to_string();

        let version = match parse_release_version(&name) {
            Ok(Some(version)) => version,
            Ok(None) => {
                return Err(ReleaseFlowError::InvalidReleaseName {
                    branch: branch.raw_name().to_string(),
                    source: None,
                })
            }
            Err(e) => {
                return Err(ReleaseFlowError::InvalidReleaseName {
                    branch: branch.raw_name().to_string(),
                    source: Some(e),
                })
            }
        };

        Ok(Release {
            name,
            version,
            branch,
        })
    }
}

/// Collect every release branch in `branches`.
///
/// A release branch whose name is not a plain `major.minor.patch` fails the whole
/// collection with [ReleaseFlowError::InvalidReleaseName].
pub fn releases(branches: &[Branch], naming: &NamingConfig) -> Result<Vec<Release>> {
    branches
        .iter()
        .filter(|b| b.classify(naming) == BranchType::Release)
        .map(|b| Release::from_branch(b.clone(), naming))
        .collect()
}

/// The release with the highest version, or `None` if there are no releases.
///
/// Several branches can carry the same version, typically a local release branch
/// and its remote-tracking copy. Among those the local branch wins, then the
/// lexically smallest raw name.
pub fn latest(releases: &[Release]) -> Option<&Release> {
    releases.iter().max_by(|a, b| compare_releases(a, b))
}

fn compare_releases(a: &Release, b: &Release) -> Ordering {
    a.version
        .cmp(&b.version)
        .then_with(|| a.branch.is_local().cmp(&b.branch.is_local()))
        .then_with(|| b.branch.raw_name().cmp(a.branch.raw_name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn naming() -> NamingConfig {
        Config::default().compile().unwrap()
    }

    fn release(branch: Branch) -> Release {
        Release::from_branch(branch, &naming()).unwrap()
    }

    #[test]
    fn test_releases_filters_release_branches() {
        let branches = vec![
            Branch::local("main"),
            Branch::local("release/1.2.0"),
            Branch::local("feature/login"),
            Branch::remote_tracking("origin", "release/1.3.0"),
        ];

        let found = releases(&branches, &naming()).unwrap();
        let names: Vec<&str> = found.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["1.2.0", "1.3.0"]);
        assert_eq!(found[1].branch.remote(), "origin");
    }

    #[test]
    fn test_releases_rejects_malformed_release_branch() {
        let branches = vec![
            Branch::local("release/1.2.0"),
            Branch::local("release/01.2.0"),
        ];

        match releases(&branches, &naming()) {
            Err(ReleaseFlowError::InvalidReleaseName { branch, source }) => {
                assert_eq!(branch, "refs/heads/release/01.2.0");
                assert!(source.is_some());
            }
            other => panic!("expected InvalidReleaseName, got {:?}", other),
        }
    }

    #[test]
    fn test_releases_rejects_prerelease_release_branch() {
        let branches = vec![Branch::local("release/1.2.0-rc.1")];
        assert!(matches!(
            releases(&branches, &naming()),
            Err(ReleaseFlowError::InvalidReleaseName { source: None, .. })
        ));
    }

    #[test]
    fn test_latest_empty() {
        assert!(latest(&[]).is_none());
    }

    #[test]
    fn test_latest_uses_semver_precedence() {
        let all = vec![
            release(Branch::local("release/1.10.0")),
            release(Branch::local("release/1.9.0")),
            release(Branch::local("release/1.2.0")),
        ];

        let best = latest(&all).unwrap();
        assert_eq!(best.name, "1.10.0");
        assert!(all.iter().all(|r| r.version <= best.version));
    }

    #[test]
    fn test_latest_prefers_local_copy() {
        let all = vec![
            release(Branch::remote_tracking("origin", "release/2.0.0")),
            release(Branch::local("release/2.0.0")),
            release(Branch::local("release/1.0.0")),
        ];

        let best = latest(&all).unwrap();
        assert!(best.branch.is_local());
        assert_eq!(best.branch.raw_name(), "refs/heads/release/2.0.0");
    }

    #[test]
    fn test_equal_versions_share_a_name() {
        let local = release(Branch::local("release/2.1.0"));
        let remote = release(Branch::remote_tracking("origin", "release/2.1.0"));
        assert_eq!(local.version, remote.version);
        assert_eq!(local.name, remote.name);
        assert_ne!(local.branch, remote.branch);
    }

    #[test]
    fn test_latest_tie_break_is_order_independent() {
        let a = release(Branch::remote_tracking("origin", "release/3.0.0"));
        let b = release(Branch::local("release/3.0.0"));

        let forward = vec![a.clone(), b.clone()];
        let backward = vec![b, a];
        assert_eq!(
            latest(&forward).unwrap().branch,
            latest(&backward).unwrap().branch
        );
    }

    #[test]
    fn test_release_name_uses_configured_prefix() {
        let mut config = Config::default();
        config.naming.release_prefix = "rel-".to_string();
        let naming = config.compile().unwrap();

        let r = Release::from_branch(Branch::local("rel-4.1.0"), &naming).unwrap();
        assert_eq!(r.name, "4.1.0");
        assert_eq!(r.version, Version::new(4, 1, 0));
    }
}
