pub mod analyzer;
pub mod build_agent;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod ui;

pub use analyzer::VersionEngine;
pub use error::{ReleaseFlowError, Result};
