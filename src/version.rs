//! Version information with embedded git metadata.

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git branch at build time, or "unknown" if unavailable.
pub const GIT_BRANCH: &str = match option_env!("VERGEN_GIT_BRANCH") {
    Some(branch) => branch,
    None => "unknown",
};

/// Git commit SHA at build time, or "unknown" if unavailable.
pub const GIT_SHA: &str = match option_env!("VERGEN_GIT_SHA") {
    Some(sha) => sha,
    None => "unknown",
};

/// Whether the working tree was dirty at build time.
pub fn git_dirty() -> bool {
    option_env!("VERGEN_GIT_DIRTY") == Some("true")
}

/// Full version string: `{version}+{branch}.{sha}` or `{version}+{branch}.{sha}.dirty`.
///
/// Examples:
/// - `0.1.0+main.abc1234`
/// - `0.1.0+unknown.unknown` (built outside a git checkout)
pub fn version_string() -> String {
    let dirty_suffix = if git_dirty() { ".dirty" } else { "" };
    format!(
        "{PKG_VERSION}+{GIT_BRANCH}.{}{dirty_suffix}",
        &GIT_SHA[..7.min(GIT_SHA.len())]
    )
}
