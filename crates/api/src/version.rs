//! Version identity of the read API.

/// Commit the binary was built from, injected at build time.
const GIT_COMMIT: &str = match option_env!("GIT_COMMIT") {
    Some(commit) => commit,
    None => "unknown",
};

/// The version string reported by `/eth/v1/node/version`.
pub fn version_string() -> String {
    format!("Blob Archiver API/{GIT_COMMIT}")
}
