//! Driver registry: loads each driver at most once per (class, driver path).

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use super::classpath::{BundledResources, ResourceLocator, resolve_classpath};
use super::context::loading_context;
use super::diagnostics::resolution_message;
use super::resolver::resolve_driver_class;
use super::siblings::sibling_artifacts;
use crate::drivers::{Driver, DriverCatalog};
use crate::error::{ConnectionFailure, DriverError};

/// Cache key: resolved driver class name and the driver path it was loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DriverCacheKey {
    pub class_name: String,
    pub driver_path: String,
}

impl DriverCacheKey {
    pub fn new(class_name: impl Into<String>, driver_path: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            driver_path: driver_path.into(),
        }
    }
}

/// Append-only cache of instantiated drivers.
///
/// A single lock covers the whole lookup, load, and store sequence, so two
/// callers asking for the same key never both instantiate. Callers asking for
/// different keys wait for each other too.
pub struct DriverRegistry {
    catalog: DriverCatalog,
    resources: Box<dyn ResourceLocator>,
    drivers: Mutex<HashMap<DriverCacheKey, Arc<dyn Driver>>>,
}

impl DriverRegistry {
    /// Registry resolving against `catalog`, with bundled resources looked up
    /// next to the running executable.
    pub fn new(catalog: DriverCatalog) -> Self {
        Self::with_resources(catalog, BundledResources::current_exe())
    }

    pub fn with_resources(catalog: DriverCatalog, resources: impl ResourceLocator + 'static) -> Self {
        Self {
            catalog,
            resources: Box::new(resources),
            drivers: Mutex::new(HashMap::new()),
        }
    }

    pub fn catalog(&self) -> &DriverCatalog {
        &self.catalog
    }

    /// Cached driver for any of `candidates` at `driver_path`, loading it on a miss.
    ///
    /// # Errors
    ///
    /// - Resolution failure when no candidate resolves
    /// - Native-library failure when the driver's native libraries are missing
    /// - Instantiation failure when the driver constructor fails
    ///
    /// The cache is left untouched on every failure.
    pub fn get_or_create(
        &self,
        candidates: &[String],
        driver_path: &str,
        load_siblings: bool,
    ) -> Result<Arc<dyn Driver>, ConnectionFailure> {
        // The map is only ever inserted into, so a poisoned lock still holds a
        // consistent cache.
        let mut drivers = self.drivers.lock().unwrap_or_else(PoisonError::into_inner);

        for candidate in candidates {
            if let Some(driver) = drivers.get(&DriverCacheKey::new(candidate.as_str(), driver_path))
            {
                tracing::debug!("Using cached driver '{}' for '{}'", candidate, driver_path);
                return Ok(Arc::clone(driver));
            }
        }

        let mut classpath = resolve_classpath(driver_path, self.resources.as_ref());
        if load_siblings {
            classpath.extend(sibling_artifacts(driver_path));
        }

        let context = loading_context(&classpath, &self.catalog);
        let Some(class) = resolve_driver_class(candidates, context.as_ref()) else {
            return Err(ConnectionFailure::resolution(resolution_message(
                candidates,
                driver_path,
                load_siblings,
                &classpath,
            )));
        };

        let driver = match class.instantiate() {
            Ok(driver) => driver,
            Err(e @ DriverError::NativeLibrary(_)) => {
                return Err(ConnectionFailure::native_library(candidates, e));
            }
            Err(e) => {
                return Err(ConnectionFailure::instantiation(
                    resolution_message(candidates, driver_path, load_siblings, &classpath),
                    e,
                ));
            }
        };

        tracing::info!(
            "Loaded driver '{}' from {}",
            class.name(),
            if driver_path.is_empty() { "ambient catalog" } else { driver_path }
        );
        drivers.insert(
            DriverCacheKey::new(class.name(), driver_path),
            Arc::clone(&driver),
        );
        Ok(driver)
    }

    /// Whether a driver is cached under exactly this key.
    pub fn contains(&self, class_name: &str, driver_path: &str) -> bool {
        self.drivers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&DriverCacheKey::new(class_name, driver_path))
    }

    /// Cached keys, sorted.
    pub fn keys(&self) -> Vec<DriverCacheKey> {
        let drivers = self.drivers.lock().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<DriverCacheKey> = drivers.keys().cloned().collect();
        keys.sort_by(|a, b| {
            (a.class_name.as_str(), a.driver_path.as_str())
                .cmp(&(b.class_name.as_str(), b.driver_path.as_str()))
        });
        keys
    }

    pub fn len(&self) -> usize {
        self.drivers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("catalog", &self.catalog)
            .field("cached", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ConnectionProperties;
    use crate::drivers::BoxedDriverConnection;
    use crate::error::FailureKind;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NoopDriver;

    impl Driver for NoopDriver {
        fn connect(
            &self,
            _url: &str,
            _properties: &ConnectionProperties,
        ) -> Result<Option<BoxedDriverConnection>, DriverError> {
            Ok(None)
        }

        fn accepts_url(&self, _url: &str) -> bool {
            false
        }
    }

    fn counting_catalog(name: &str, count: Arc<AtomicUsize>) -> DriverCatalog {
        DriverCatalog::new().with(name, move || {
            count.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(NoopDriver) as Arc<dyn Driver>)
        })
    }

    fn registry(catalog: DriverCatalog) -> DriverRegistry {
        DriverRegistry::with_resources(catalog, BundledResources::none())
    }

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_second_call_is_cache_hit() {
        let count = Arc::new(AtomicUsize::new(0));
        let registry = registry(counting_catalog("org.acme.Driver", count.clone()));
        let candidates = names(&["org.acme.Driver"]);

        let first = registry.get_or_create(&candidates, "", false).unwrap();
        let second = registry.get_or_create(&candidates, "", false).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(registry.contains("org.acme.Driver", ""));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_different_path_different_instance() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("acme.json");
        fs::write(&artifact, r#"{"drivers": ["org.acme.Driver"]}"#).unwrap();
        let artifact_path = artifact.display().to_string();

        let count = Arc::new(AtomicUsize::new(0));
        let registry = registry(counting_catalog("org.acme.Driver", count.clone()));
        let candidates = names(&["org.acme.Driver"]);

        let ambient = registry.get_or_create(&candidates, "", false).unwrap();
        let isolated = registry
            .get_or_create(&candidates, &artifact_path, false)
            .unwrap();

        assert!(!Arc::ptr_eq(&ambient, &isolated));
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(
            registry.keys(),
            vec![
                DriverCacheKey::new("org.acme.Driver", ""),
                DriverCacheKey::new("org.acme.Driver", artifact_path.as_str()),
            ]
        );
    }

    #[test]
    fn test_cached_under_resolved_class_name() {
        let count = Arc::new(AtomicUsize::new(0));
        let registry = registry(counting_catalog("org.acme.Driver", count.clone()));

        let first = registry
            .get_or_create(&names(&["org.acme.Missing", "org.acme.Driver"]), "", false)
            .unwrap();
        assert!(registry.contains("org.acme.Driver", ""));
        assert!(!registry.contains("org.acme.Missing", ""));

        // a different ordering that reaches the same class shares the entry
        let second = registry
            .get_or_create(&names(&["org.acme.Driver", "org.acme.Other"]), "", false)
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_resolution_failure_leaves_cache_empty() {
        let registry = registry(DriverCatalog::new());
        let err = registry
            .get_or_create(&names(&["org.acme.Missing"]), "", false)
            .err()
            .unwrap();

        assert_eq!(err.kind(), FailureKind::Resolution);
        assert!(err.message().contains("org.acme.Missing"));
        assert!(err.message().contains("empty"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_instantiation_failure_not_cached() {
        let count = Arc::new(AtomicUsize::new(0));
        let attempts = count.clone();
        let catalog = DriverCatalog::new().with("org.acme.Flaky", move || {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err(DriverError::Other(anyhow::anyhow!("constructor failed")))
        });
        let registry = registry(catalog);
        let candidates = names(&["org.acme.Flaky"]);

        for _ in 0..2 {
            let err = registry.get_or_create(&candidates, "", false).err().unwrap();
            assert_eq!(err.kind(), FailureKind::Instantiation);
            assert!(err.message().contains("org.acme.Flaky"));
        }
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_native_library_failure() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("acme.json");
        fs::write(
            &artifact,
            r#"{"drivers": ["org.acme.Driver"], "native_libraries": ["libacme.so"]}"#,
        )
        .unwrap();

        let registry = registry(counting_catalog("org.acme.Driver", Arc::default()));
        let err = registry
            .get_or_create(&names(&["org.acme.Driver"]), &artifact.display().to_string(), false)
            .err()
            .unwrap();

        assert_eq!(err.kind(), FailureKind::NativeLibrary);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_sibling_artifacts_extend_classpath() {
        let dir = tempfile::tempdir().unwrap();
        let main = dir.path().join("acme.json");
        fs::write(&main, r#"{"drivers": ["org.acme.Driver"]}"#).unwrap();
        fs::write(dir.path().join("acme-extra.json"), r#"{"drivers": ["org.acme.Extra"]}"#)
            .unwrap();
        let driver_path = main.display().to_string();

        let catalog = counting_catalog("org.acme.Extra", Arc::default());
        let candidates = names(&["org.acme.Extra"]);

        let without = registry(catalog.clone());
        let err = without
            .get_or_create(&candidates, &driver_path, false)
            .err()
            .unwrap();
        assert_eq!(err.kind(), FailureKind::Resolution);
        assert!(err.message().contains("with sibling artifacts no."));

        let with = registry(catalog);
        assert!(with.get_or_create(&candidates, &driver_path, true).is_ok());
        assert!(with.contains("org.acme.Extra", &driver_path));
    }

    #[test]
    fn test_concurrent_callers_instantiate_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let registry = Arc::new(registry(counting_catalog("org.acme.Driver", count.clone())));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    registry
                        .get_or_create(&["org.acme.Driver".to_string()], "", false)
                        .is_ok()
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
