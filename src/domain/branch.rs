use std::fmt;

use crate::config::NamingConfig;

/// Namespace of local branch heads
pub const LOCAL_BRANCH_PREFIX: &str = "refs/heads/";

/// Namespace of remote-tracking branches
pub const REMOTE_BRANCH_PREFIX: &str = "refs/remotes/";

/// Role of a branch in the release-flow convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchType {
    Main,
    Release,
    Feature,
    Hotfix,
    Unsupported,
}

impl fmt::Display for BranchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BranchType::Main => "main",
            BranchType::Release => "release",
            BranchType::Feature => "feature",
            BranchType::Hotfix => "hotfix",
            BranchType::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}

/// A branch reference as read from the repository.
///
/// Branches are snapshots: they are built whenever references are enumerated and
/// never change afterwards. Classification is recomputed from the naming config on
/// every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    raw_name: String,
    remote: String,
}

impl Branch {
    /// Create a branch from its fully-qualified reference name.
    ///
    /// `remote` is empty for local branches.
    pub fn new(raw_name: impl Into<String>, remote: impl Into<String>) -> Self {
        Branch {
            raw_name: raw_name.into(),
            remote: remote.into(),
        }
    }

    /// Create a local branch, qualifying a bare name with `refs/heads/`
    pub fn local(name: &str) -> Self {
        if name.starts_with(LOCAL_BRANCH_PREFIX) {
            Branch::new(name, "")
        } else {
            Branch::new(format!("{}{}", LOCAL_BRANCH_PREFIX, name), "")
        }
    }

    /// Create a remote-tracking branch `refs/remotes/<remote>/<name>`
    pub fn remote_tracking(remote: &str, name: &str) -> Self {
        Branch::new(format!("{}{}/{}", REMOTE_BRANCH_PREFIX, remote, name), remote)
    }

    pub fn raw_name(&self) -> &str {
        &self.raw_name
    }

    pub fn remote(&self) -> &str {
        &self.remote
    }

    pub fn is_local(&self) -> bool {
        self.remote.is_empty()
    }

    /// Last path segment of the raw name (`refs/heads/feature/login` -> `login`)
    pub fn short_name(&self) -> &str {
        match self.raw_name.rfind('/') {
            Some(i) => &self.raw_name[i + 1..],
            None => &self.raw_name,
        }
    }

    /// Raw name without its `refs/heads/` or `refs/remotes/<remote>/` namespace
    pub fn logical_name(&self, remote_name: &str) -> &str {
        trim_ref_prefix(&self.raw_name, remote_name)
    }

    /// Classify this branch against the naming convention.
    ///
    /// The first matching rule wins: main, release, feature, hotfix. Release is
    /// checked before feature and hotfix because their prefixes accept any suffix.
    pub fn classify(&self, naming: &NamingConfig) -> BranchType {
        let logical = self.logical_name(&naming.remote_name);

        if naming.is_main(self.short_name()) {
            BranchType::Main
        } else if naming.is_release(logical) {
            BranchType::Release
        } else if naming.is_feature(logical) {
            BranchType::Feature
        } else if naming.is_hotfix(logical) {
            BranchType::Hotfix
        } else {
            BranchType::Unsupported
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw_name)
    }
}

/// Strip the local-heads namespace, or else the namespace of `remote_name`.
///
/// Names in other namespaces are returned unchanged.
pub fn trim_ref_prefix<'a>(name: &'a str, remote_name: &str) -> &'a str {
    if let Some(rest) = name.strip_prefix(LOCAL_BRANCH_PREFIX) {
        return rest;
    }

    name.strip_prefix(REMOTE_BRANCH_PREFIX)
        .and_then(|rest| rest.strip_prefix(remote_name))
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(name)
}
