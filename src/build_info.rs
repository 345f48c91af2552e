//! Compile-time build information.

include!(concat!(env!("OUT_DIR"), "/fitquest_build_info.rs"));

/// One-line version banner, e.g. `fitquest 0.1.0 (abc1234, 2026-10-15)`.
pub fn version_line() -> String {
    format!(
        "fitquest {} ({}, {})",
        BUILD_VERSION, BUILD_COMMIT, BUILD_DATE
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_commit_format() {
        // 7-char short hash or the "unknown" placeholder
        assert!(BUILD_COMMIT == "unknown" || BUILD_COMMIT.len() == 7);
    }

    #[test]
    fn test_version_line_mentions_package_version() {
        let line = version_line();
        assert!(line.starts_with("fitquest "));
        assert!(line.contains(BUILD_VERSION));
        assert!(line.contains(BUILD_DATE));
    }
}
