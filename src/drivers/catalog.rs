//! Driver catalog: the driver classes linked into the running program.
//!
//! The catalog doubles as the ambient loading context. When no classpath can
//! be resolved, candidate class names are looked up here directly.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::traits::{Driver, DriverClass, DriverFactory};
use crate::error::DriverError;
use crate::loader::LoadingContext;

/// Named driver constructors available to the host program.
#[derive(Clone, Default)]
pub struct DriverCatalog {
    classes: BTreeMap<String, DriverClass>,
}

impl DriverCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding every driver compiled into this crate.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        #[cfg(feature = "duckdb")]
        catalog.register(super::duckdb::DRIVER_CLASS, || {
            Ok(Arc::new(super::duckdb::DuckDbDriver::new()) as Arc<dyn Driver>)
        });
        catalog
    }

    /// Register a constructor under a fully-qualified class name.
    ///
    /// Registering the same name twice replaces the earlier constructor.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Result<Arc<dyn Driver>, DriverError> + Send + Sync + 'static,
    {
        let name = name.into();
        let factory: DriverFactory = Arc::new(factory);
        self.classes
            .insert(name.clone(), DriverClass::new(name, factory));
        self
    }

    /// Builder-style variant of [`register`](Self::register).
    pub fn with<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn Driver>, DriverError> + Send + Sync + 'static,
    {
        self.register(name, factory);
        self
    }

    pub fn get(&self, name: &str) -> Option<&DriverClass> {
        self.classes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Names of all registered classes, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.classes.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl LoadingContext for DriverCatalog {
    fn resolve(&self, class_name: &str) -> Option<DriverClass> {
        self.get(class_name).cloned()
    }

    fn describe(&self) -> String {
        "ambient driver catalog".to_string()
    }
}

impl std::fmt::Debug for DriverCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.classes.keys()).finish()
    }
}
