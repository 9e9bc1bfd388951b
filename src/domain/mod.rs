//! Domain logic - pure branch and release rules independent of git operations

pub mod branch;
pub mod release;
pub mod version;

pub use branch::{trim_ref_prefix, Branch, BranchType};
pub use release::{latest, releases, Release};
