//! Schema versioning for persisted records.
//!
//! Versions are `MAJOR.MINOR.PATCH`. Every record written by this crate carries
//! [`FORMAT_VERSION`]. Records from another major version are still read, but
//! no migration is attempted.

/// Current schema version of asset metadata and project records.
pub const FORMAT_VERSION: &str = "0.1.0";

/// Major version number for compatibility checking.
pub const VERSION_MAJOR: u32 = 0;

/// Parse a version string into (major, minor, patch) components.
///
/// Returns None if the version string is invalid.
pub fn parse_version(version: &str) -> Option<(u32, u32, u32)> {
    let parts: Vec<&str> = version.split('.').collect();
    if parts.len() != 3 {
        return None;
    }
    let major = parts[0].parse().ok()?;
    let minor = parts[1].parse().ok()?;
    let patch = parts[2].parse().ok()?;
    Some((major, minor, patch))
}

/// Check if a record version shares the current major version.
pub fn is_version_compatible(version: &str) -> bool {
    matches!(parse_version(version), Some((major, _, _)) if major == VERSION_MAJOR)
}

/// Log a warning when a record was written with an incompatible schema.
pub(crate) fn warn_if_incompatible(kind: &str, version: &str) {
    if !is_version_compatible(version) {
        log::warn!(
            "{} version mismatch: expected {}.x.x, got {:?}; reading without migration",
            kind,
            VERSION_MAJOR,
            version
        );
    }
}

pub(crate) fn current_version() -> String {
    FORMAT_VERSION.to_string()
}
