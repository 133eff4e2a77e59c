//! Classpath resolution.
//!
//! A driver path is a list of filesystem locations joined with the platform
//! path separator (`:` on Unix, `;` on Windows). Only the locations that
//! actually exist make it onto the [`Classpath`].

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use url::Url;

/// Deduplicated set of artifact locations as `file://` URLs.
///
/// Iteration order is sorted, which keeps diagnostics stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classpath {
    entries: BTreeSet<Url>,
}

impl Classpath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand a separator-joined path list, keeping the entries that exist.
    pub fn from_path_list(path: impl AsRef<OsStr>) -> Self {
        let mut classpath = Self::new();
        for segment in std::env::split_paths(&path) {
            if segment.as_os_str().is_empty() || !segment.exists() {
                continue;
            }
            classpath.insert_path(&segment);
        }
        classpath
    }

    /// Add a filesystem location, made absolute.
    ///
    /// Returns `false` when the location cannot be expressed as a file URL.
    pub fn insert_path(&mut self, path: &Path) -> bool {
        let Ok(absolute) = std::path::absolute(path) else {
            return false;
        };
        match Url::from_file_path(&absolute) {
            Ok(url) => {
                self.entries.insert(url);
                true
            }
            Err(()) => false,
        }
    }

    pub fn insert(&mut self, url: Url) -> bool {
        self.entries.insert(url)
    }

    /// Union `other` into this classpath.
    pub fn extend(&mut self, other: Classpath) {
        self.entries.extend(other.entries);
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.entries.contains(url)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Url> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Url> for Classpath {
    fn from_iter<I: IntoIterator<Item = Url>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Segments of `path` that do not exist on disk.
pub fn missing_segments(path: &str) -> Vec<String> {
    std::env::split_paths(path)
        .filter(|segment| !segment.as_os_str().is_empty() && !segment.exists())
        .map(|segment| segment.display().to_string())
        .collect()
}

/// Looks up resources shipped alongside the running program.
pub trait ResourceLocator: Send + Sync {
    /// Location of the bundled resource at `relative`, if there is one.
    fn locate(&self, relative: &str) -> Option<PathBuf>;
}

/// Resources found under a root directory, by default the directory of the
/// running executable.
#[derive(Debug, Clone, Default)]
pub struct BundledResources {
    root: Option<PathBuf>,
}

impl BundledResources {
    /// Resources next to the current executable.
    pub fn current_exe() -> Self {
        let root = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        Self { root }
    }

    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// Locator that never finds anything.
    pub fn none() -> Self {
        Self { root: None }
    }
}

impl ResourceLocator for BundledResources {
    fn locate(&self, relative: &str) -> Option<PathBuf> {
        let root = self.root.as_ref()?;
        let relative = relative.trim_start_matches('/');
        if relative.is_empty() {
            return None;
        }
        let candidate = root.join(relative);
        candidate.exists().then_some(candidate)
    }
}

/// Classpath for `driver_path`, falling back to a bundled resource of the same
/// name when nothing on disk matches.
pub fn resolve_classpath(driver_path: &str, resources: &dyn ResourceLocator) -> Classpath {
    let classpath = Classpath::from_path_list(driver_path);
    if !classpath.is_empty() {
        return classpath;
    }

    match resources.locate(driver_path) {
        Some(location) => {
            tracing::debug!(
                "Driver path '{}' resolved to bundled resource {}",
                driver_path,
                location.display()
            );
            Classpath::from_path_list(location.as_os_str())
        }
        None => classpath,
    }
}
