//! Loading contexts: scopes in which driver classes are resolved by name.

use std::path::PathBuf;
use std::sync::Arc;

use super::classpath::Classpath;
use super::manifest::{LoadedManifest, read_artifact};
use crate::drivers::{DriverCatalog, DriverClass, DriverFactory};
use crate::error::DriverError;

/// Scope from which driver classes are resolved by fully-qualified name.
pub trait LoadingContext: Send + Sync {
    /// Look up `class_name`. `None` means "not found here", which is not an error.
    fn resolve(&self, class_name: &str) -> Option<DriverClass>;

    /// Short human-readable description, used in logs.
    fn describe(&self) -> String;
}

/// Context scoped to the artifacts of a classpath.
///
/// A class resolves only when an artifact on the classpath declares it and the
/// catalog links an implementation for it. Classes the catalog knows but no
/// artifact declares stay invisible.
pub struct IsolatedContext {
    artifacts: Vec<LoadedManifest>,
    catalog: DriverCatalog,
}

impl IsolatedContext {
    pub fn new(artifacts: Vec<LoadedManifest>, catalog: DriverCatalog) -> Self {
        Self { artifacts, catalog }
    }

    /// Read every artifact on `classpath`.
    ///
    /// Entries that are not local files, or that cannot be read as manifests,
    /// are skipped.
    pub fn from_classpath(classpath: &Classpath, catalog: &DriverCatalog) -> Self {
        let artifacts = classpath
            .iter()
            .filter_map(|url| match url.to_file_path() {
                Ok(path) => Some(path),
                Err(()) => {
                    tracing::debug!("Skipping non-local classpath entry {}", url);
                    None
                }
            })
            .flat_map(|path| read_artifact(&path))
            .collect();

        Self::new(artifacts, catalog.clone())
    }

    pub fn artifacts(&self) -> &[LoadedManifest] {
        &self.artifacts
    }
}

impl LoadingContext for IsolatedContext {
    fn resolve(&self, class_name: &str) -> Option<DriverClass> {
        let artifact = self
            .artifacts
            .iter()
            .find(|a| a.manifest.provides(class_name))?;

        let Some(class) = self.catalog.get(class_name) else {
            tracing::debug!(
                "Artifact '{}' declares '{}' but no implementation is linked",
                artifact.display_name(),
                class_name
            );
            return None;
        };

        Some(class.with_factory(link_native_libraries(class, artifact)))
    }

    fn describe(&self) -> String {
        let names: Vec<String> = self.artifacts.iter().map(|a| a.display_name()).collect();
        format!("isolated context [{}]", names.join(", "))
    }
}

/// Wrap the class constructor so it fails when the artifact's native libraries
/// are absent.
fn link_native_libraries(class: &DriverClass, artifact: &LoadedManifest) -> DriverFactory {
    let inner = class.factory();
    let artifact = artifact.clone();
    Arc::new(move || {
        let missing: Vec<PathBuf> = artifact.missing_native_libraries();
        if let Some(first) = missing.first() {
            return Err(DriverError::NativeLibrary(format!(
                "cannot load native library {} required by artifact '{}'",
                first.display(),
                artifact.display_name()
            )));
        }
        inner()
    })
}

/// Context for resolving drivers against `classpath`.
///
/// An empty classpath falls back to the ambient catalog so drivers linked into
/// the program can still be found.
pub fn loading_context(classpath: &Classpath, catalog: &DriverCatalog) -> Box<dyn LoadingContext> {
    if classpath.is_empty() {
        Box::new(catalog.clone())
    } else {
        Box::new(IsolatedContext::from_classpath(classpath, catalog))
    }
}
