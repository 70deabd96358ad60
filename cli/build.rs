//! Derives the package version from the latest git tag.

use std::path::PathBuf;
use std::process::Command;

#[path = "src/tag.rs"]
mod tag;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src/tag.rs");
    watch_git_refs();

    let version = latest_tag_version().unwrap_or_else(|| {
        println!("cargo:warning=Could not determine package version");
        env!("CARGO_PKG_VERSION").to_string()
    });

    println!("cargo:rustc-env=EVALSYS_VERSION={}", version);
}

/// Re-runs this script when a tag is added or the checkout moves.
fn watch_git_refs() {
    let Some(git_dir) = git(&["rev-parse", "--absolute-git-dir"]) else {
        return;
    };
    let git_dir = PathBuf::from(git_dir.trim());

    for path in tag::watched_git_paths(&git_dir) {
        // A missing path would make cargo rebuild every time.
        if path.exists() {
            println!("cargo:rerun-if-changed={}", path.display());
        }
    }
}

fn latest_tag_version() -> Option<String> {
    let latest = git(&["describe", "--tags", "--abbrev=0"])?;
    let latest = latest.trim();

    if let Some(warning) = tag::release_tag_warning(latest) {
        println!("cargo:warning={}", warning);
    }

    tag::version_from_tag(latest)
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout).ok()
}
