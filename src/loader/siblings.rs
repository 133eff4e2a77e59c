//! Sibling artifact discovery.
//!
//! Some drivers need dependency artifacts that ship next to the main artifact
//! but are not listed in the driver path. When enabled, every artifact in the
//! directory containing a driver path segment joins the classpath.

use std::path::{Path, PathBuf};

use super::classpath::Classpath;
use super::manifest::is_artifact;

/// Artifacts co-located with the segments of `driver_path`.
///
/// Directories that cannot be read contribute nothing.
pub fn sibling_artifacts(driver_path: &str) -> Classpath {
    let mut classpath = Classpath::new();

    for segment in std::env::split_paths(driver_path) {
        if segment.as_os_str().is_empty() {
            continue;
        }
        let dir = containing_dir(&segment);
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!("Unable to scan {} for sibling artifacts: {}", dir.display(), e);
                continue;
            }
        };

        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.is_file() && is_artifact(&path) {
                classpath.insert_path(&path);
            }
        }
    }

    tracing::debug!("Found {} sibling artifact(s) for '{}'", classpath.len(), driver_path);
    classpath
}

fn containing_dir(segment: &Path) -> PathBuf {
    if segment.is_dir() {
        return segment.to_path_buf();
    }
    match segment.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
