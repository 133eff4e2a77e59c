//! Driver artifact manifests.
//!
//! A driver artifact is a JSON manifest naming the driver classes it provides
//! and the native libraries those drivers link against:
//!
//! ```json
//! { "name": "acme-driver", "drivers": ["org.acme.Driver"], "native_libraries": ["libacme.so"] }
//! ```
//!
//! A classpath entry may also be a directory, in which case every manifest
//! directly inside it is read.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// File extension of driver artifacts.
pub const ARTIFACT_EXTENSION: &str = "json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverManifest {
    #[serde(default)]
    pub name: Option<String>,
    /// Fully-qualified driver class names provided by this artifact.
    #[serde(default)]
    pub drivers: Vec<String>,
    /// Native libraries required at instantiation, relative to the manifest.
    #[serde(default)]
    pub native_libraries: Vec<PathBuf>,
}

impl DriverManifest {
    pub fn provides(&self, class_name: &str) -> bool {
        self.drivers.iter().any(|d| d == class_name)
    }
}

/// A manifest together with where it was read from.
#[derive(Debug, Clone)]
pub struct LoadedManifest {
    pub location: PathBuf,
    pub manifest: DriverManifest,
}

impl LoadedManifest {
    /// Read and parse the manifest at `path`.
    pub fn read(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read artifact {}", path.display()))?;
        let manifest = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid driver manifest {}", path.display()))?;
        Ok(Self {
            location: path.to_path_buf(),
            manifest,
        })
    }

    /// Display name of the artifact: the manifest name, else the file name.
    pub fn display_name(&self) -> String {
        self.manifest.name.clone().unwrap_or_else(|| {
            self.location
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.location.display().to_string())
        })
    }

    /// Native libraries that are not present on disk.
    pub fn missing_native_libraries(&self) -> Vec<PathBuf> {
        let base = self.location.parent().unwrap_or_else(|| Path::new("."));
        self.manifest
            .native_libraries
            .iter()
            .map(|lib| if lib.is_absolute() { lib.clone() } else { base.join(lib) })
            .filter(|lib| !lib.exists())
            .collect()
    }
}

/// Whether `path` looks like a driver artifact.
pub fn is_artifact(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(ARTIFACT_EXTENSION))
}

/// Manifests found at a classpath location.
///
/// Unreadable or malformed artifacts are skipped.
pub fn read_artifact(location: &Path) -> Vec<LoadedManifest> {
    if location.is_dir() {
        let entries = match std::fs::read_dir(location) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!("Unable to read artifact directory {}: {}", location.display(), e);
                return Vec::new();
            }
        };
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && is_artifact(p))
            .collect();
        paths.sort();
        return paths.iter().filter_map(|p| read_one(p)).collect();
    }

    read_one(location).into_iter().collect()
}

fn read_one(path: &Path) -> Option<LoadedManifest> {
    match LoadedManifest::read(path) {
        Ok(loaded) => Some(loaded),
        Err(e) => {
            tracing::debug!("Skipping artifact {}: {:#}", path.display(), e);
            None
        }
    }
}
