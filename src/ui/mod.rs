//! User interface module - output of versions and errors.

pub mod formatter;

pub use formatter::{display_error, display_version, format_error, format_version};
