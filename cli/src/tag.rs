//! Release tag parsing for the build script.
//!
//! Included by `build.rs` through `#[path]`, so this file only depends on
//! `std`. The library compiles it for its tests only.

use std::path::{Path, PathBuf};

/// Extracts the version from a git tag such as `v1.4.0` or `v1.4.0-rc.1`.
///
/// Returns `None` unless the tag is `v` followed by a dotted
/// `MAJOR.MINOR.PATCH` triple, optionally with a `-suffix`.
pub fn version_from_tag(tag: &str) -> Option<String> {
    let version = tag.trim().strip_prefix('v')?;
    let core = version.split('-').next()?;
    if !is_version_triple(core) {
        return None;
    }
    Some(version.to_string())
}

/// Returns `true` for tags of the exact form `v{MAJOR}.{MINOR}.{PATCH}`.
pub fn is_release_tag(tag: &str) -> bool {
    tag.strip_prefix('v').is_some_and(is_version_triple)
}

/// Build warning for a latest tag that is not a plain release tag.
pub fn release_tag_warning(tag: &str) -> Option<String> {
    if is_release_tag(tag) {
        return None;
    }
    Some(format!(
        "Latest tag {} is not a v{{MAJOR}}.{{MINOR}}.{{PATCH}} release tag",
        tag
    ))
}

/// Files under `git_dir` whose changes can move the latest tag.
pub fn watched_git_paths(git_dir: &Path) -> [PathBuf; 3] {
    [
        git_dir.join("HEAD"),
        git_dir.join("refs").join("tags"),
        git_dir.join("packed-refs"),
    ]
}

fn is_version_triple(s: &str) -> bool {
    let parts: Vec<&str> = s.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_from_release_tag() {
        assert_eq!(version_from_tag("v1.2.3"), Some("1.2.3".to_string()));
        assert_eq!(version_from_tag("v0.10.0\n"), Some("0.10.0".to_string()));
    }

    #[test]
    fn test_version_from_prerelease_tag() {
        assert_eq!(version_from_tag("v2.0.0-rc.1"), Some("2.0.0-rc.1".to_string()));
    }

    #[test]
    fn test_version_from_malformed_tag() {
        assert_eq!(version_from_tag("1.2.3"), None);
        assert_eq!(version_from_tag("v1.2"), None);
        assert_eq!(version_from_tag("vnext"), None);
        assert_eq!(version_from_tag(""), None);
    }

    #[test]
    fn test_release_tag_validation() {
        assert!(is_release_tag("v0.0.1"));
        assert!(is_release_tag("v10.20.30"));
        assert!(!is_release_tag("v1.2.3-rc.1"));
        assert!(!is_release_tag("1.2.3"));
        assert!(!is_release_tag("v1..3"));
        assert!(!is_release_tag(" v1.2.3"));
    }

    #[test]
    fn test_release_tag_warning() {
        assert_eq!(release_tag_warning("v1.2.3"), None);

        let warning = release_tag_warning("v1.2.3-rc.1").unwrap();
        assert!(warning.contains("v1.2.3-rc.1"));
        assert!(release_tag_warning("nightly").is_some());
    }

    #[test]
    fn test_watched_git_paths_cover_new_tags() {
        let paths = watched_git_paths(Path::new("/repo/.git"));
        assert!(paths.contains(&PathBuf::from("/repo/.git/HEAD")));
        assert!(paths.contains(&PathBuf::from("/repo/.git/refs/tags")));
        assert!(paths.contains(&PathBuf::from("/repo/.git/packed-refs")));
    }
}
