use thiserror::Error;

/// Unified error type for version derivation
#[derive(Error, Debug)]
pub enum ReleaseFlowError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("HEAD is detached or cannot be resolved to a branch: {0}")]
    DetachedOrUnresolvable(String),

    #[error("Main branch not found among branches of remote '{0}' or local heads")]
    MainBranchNotFound(String),

    #[error("Unknown reference: {0}")]
    UnknownReference(String),

    #[error("No common ancestor between '{left}' and '{right}'")]
    NoCommonAncestor { left: String, right: String },

    #[error("Commit {base} is not in the history of '{tip}'")]
    HistoryTraversal { base: String, tip: String },

    #[error("Release branch '{branch}' is not named after a major.minor.patch version")]
    InvalidReleaseName {
        branch: String,
        #[source]
        source: Option<semver::Error>,
    },

    #[error("Branch '{branch}' yields an invalid prerelease identifier '{identifier}'")]
    InvalidPrerelease { branch: String, identifier: String },

    #[error("No release branch found")]
    NoReleaseFound,

    #[error("Unsupported branch: {0}")]
    UnsupportedBranch(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in release-flow-version
pub type Result<T> = std::result::Result<T, ReleaseFlowError>;

impl ReleaseFlowError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseFlowError::Configuration(msg.into())
    }

    /// Create an unknown reference error
    pub fn unknown_reference(name: impl Into<String>) -> Self {
        ReleaseFlowError::UnknownReference(name.into())
    }

    /// Create a commit-graph error for two unrelated histories
    pub fn no_common_ancestor(left: impl Into<String>, right: impl Into<String>) -> Self {
        ReleaseFlowError::NoCommonAncestor {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Create a commit-graph error for a base commit the walk never reached
    pub fn history_traversal(base: impl ToString, tip: impl Into<String>) -> Self {
        ReleaseFlowError::HistoryTraversal {
            base: base.to_string(),
            tip: tip.into(),
        }
    }
}
