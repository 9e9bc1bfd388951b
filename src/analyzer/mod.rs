//! Version engine turning branch topology into a semantic version

pub mod version_engine;

pub use version_engine::VersionEngine;
