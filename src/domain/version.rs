//! Semantic version arithmetic used by the version engine.
//!
//! Versions are plain [semver::Version] values; their `Ord` implementation already
//! follows semver precedence, including prerelease comparison.

use semver::{BuildMetadata, Prerelease, Version};

/// Increment minor, reset patch and drop any prerelease or build metadata
pub fn bump_minor(version: &Version) -> Version {
    Version::new(version.major, version.minor + 1, 0)
}

/// Increment patch and drop any prerelease or build metadata
pub fn bump_patch(version: &Version) -> Version {
    Version::new(version.major, version.minor, version.patch + 1)
}

/// Apply `count` successive patch increments
pub fn bump_patch_times(version: &Version, count: usize) -> Version {
    (0..count).fold(
        Version::new(version.major, version.minor, version.patch),
        |v, _| bump_patch(&v),
    )
}

/// Parse a release name, which must be a bare `major.minor.patch`.
///
/// # Returns
/// * `Ok(Some(version))` - The release version
/// * `Ok(None)` - The name is valid semver but carries prerelease or build data
/// * `Err` - The name is not a semantic version at all
pub fn parse_release_version(name: &str) -> Result<Option<Version>, semver::Error> {
    let version = Version::parse(name)?;
    if version.pre.is_empty() && version.build.is_empty() {
        Ok(Some(version))
    } else {
        Ok(None)
    }
}

/// Build `<tag>.<counter>` as a prerelease, or `None` if it is not valid semver
pub fn counter_prerelease(tag: &str, counter: usize) -> Option<Prerelease> {
    if tag.is_empty() {
        return None;
    }
    Prerelease::new(&format!("{}.{}", tag, counter)).ok()
}

/// Return `version` carrying `pre` as its prerelease
pub fn with_prerelease(version: &Version, pre: Prerelease) -> Version {
    Version {
        pre,
        build: BuildMetadata::EMPTY,
        ..version.clone()
    }
}

/// Replace characters that cannot appear in a prerelease identifier with `-`
pub fn sanitize_identifier(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' })
        .collect()
}
