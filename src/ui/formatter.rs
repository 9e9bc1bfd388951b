//! Pure formatting functions for UI output.
//!
//! Standard output carries the version and nothing else; everything meant for a
//! human goes to standard error.

use console::style;
use semver::Version;

/// Render a version either in full or as `major.minor.patch` only.
pub fn format_version(version: &Version, final_only: bool) -> String {
    if final_only {
        format!("{}.{}.{}", version.major, version.minor, version.patch)
    } else {
        version.to_string()
    }
}

/// Render an error with its whole cause chain on one line.
pub fn format_error(error: &anyhow::Error) -> String {
    format!("{:#}", error)
}

/// Print the version on standard output.
pub fn display_version(version: &Version, final_only: bool) {
    println!("{}", format_version(version, final_only));
}

/// Format and print an error message in red on standard error.
pub fn display_error(error: &anyhow::Error) {
    eprintln!("{} {}", style("ERROR:").red().bold(), format_error(error));
}
