//! Detection of CI build agents that check out a commit without a branch
//!
//! Build agents usually leave HEAD detached and publish the branch being built in
//! an environment variable instead.

use std::env;

use crate::error::{ReleaseFlowError, Result};

/// A CI system able to report the branch it is building
pub trait BuildAgent {
    /// Human readable name of the agent
    fn name(&self) -> &'static str;

    /// Whether the current process runs on this agent
    fn detected(&self) -> bool;

    /// Branch being built, usually fully qualified (`refs/heads/main`)
    fn branch_name(&self) -> Result<String>;
}

/// Azure DevOps Pipelines
#[derive(Debug, Default, Clone, Copy)]
pub struct AzureDevOps;

impl AzureDevOps {
    pub const AGENT_VARIABLE: &'static str = "TF_BUILD";
    pub const BRANCH_VARIABLE: &'static str = "BUILD_SOURCEBRANCH";
}

impl BuildAgent for AzureDevOps {
    fn name(&self) -> &'static str {
        "Azure DevOps"
    }

    fn detected(&self) -> bool {
        non_empty_var(Self::AGENT_VARIABLE).is_some()
    }

    fn branch_name(&self) -> Result<String> {
        non_empty_var(Self::BRANCH_VARIABLE).ok_or_else(|| {
            ReleaseFlowError::config(format!(
                "environment variable {} is not set",
                Self::BRANCH_VARIABLE
            ))
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

/// Every supported build agent, in detection order
pub fn known_agents() -> Vec<Box<dyn BuildAgent>> {
    vec![Box::new(AzureDevOps)]
}

/// The first build agent detected in the current environment
pub fn resolve() -> Option<Box<dyn BuildAgent>> {
    let agent = known_agents().into_iter().find(|agent| agent.detected());
    if let Some(agent) = &agent {
        tracing::debug!(agent = agent.name(), "detected build agent");
    }
    agent
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_agents() {
        let names: Vec<&str> = known_agents().iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["Azure DevOps"]);
    }
}
