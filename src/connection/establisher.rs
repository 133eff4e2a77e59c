//! Connection establishment: configuration in, live connection out.

use std::sync::Arc;

use super::properties::build_connection_properties;
use super::url::{ConnectionUrlBuilder, SpecUrlBuilder};
use crate::config::ConnectionConfig;
use crate::drivers::BoxedDriverConnection;
use crate::error::{ConnectionFailure, DriverError};
use crate::loader::{DriverRegistry, resolve_driver_path};

/// Opens a single connection for a configuration.
///
/// Drivers are obtained through a shared [`DriverRegistry`], so repeated
/// connects with the same driver class and path reuse the loaded driver.
///
/// # Example
///
/// ```ignore
/// let registry = Arc::new(DriverRegistry::new(DriverCatalog::builtin()));
/// let config = Arc::new(DriverConfig::load("duckdb.json")?);
///
/// let connection = ConnectionEstablisher::new(config, registry).connect()?;
/// ```
pub struct ConnectionEstablisher {
    config: Arc<dyn ConnectionConfig>,
    url_builder: Box<dyn ConnectionUrlBuilder>,
    registry: Arc<DriverRegistry>,
    driver_classes: Vec<String>,
}

impl ConnectionEstablisher {
    /// Establisher using the configured driver classes and the `connectionSpec` URL template.
    pub fn new(config: Arc<dyn ConnectionConfig>, registry: Arc<DriverRegistry>) -> Self {
        let driver_classes = config.database_type_properties().driver_classes();
        Self {
            config,
            url_builder: Box::new(SpecUrlBuilder),
            registry,
            driver_classes,
        }
    }

    pub fn with_url_builder(mut self, url_builder: impl ConnectionUrlBuilder + 'static) -> Self {
        self.url_builder = Box::new(url_builder);
        self
    }

    /// Replace the candidate driver classes taken from the configuration.
    pub fn with_driver_classes(mut self, driver_classes: Vec<String>) -> Self {
        self.driver_classes = driver_classes;
        self
    }

    pub fn driver_classes(&self) -> &[String] {
        &self.driver_classes
    }

    /// Open the connection.
    ///
    /// # Errors
    ///
    /// Returns a [`ConnectionFailure`] when the URL cannot be built, the driver
    /// cannot be resolved or instantiated, a native library is missing, the
    /// driver returns no connection, or the connect call fails. Nothing is
    /// retried.
    pub fn connect(&self) -> Result<BoxedDriverConnection, ConnectionFailure> {
        let config = self.config.as_ref();
        let driver_path = resolve_driver_path(config);

        let url = self.url_builder.build(config).map_err(|e| {
            ConnectionFailure::generic("Failed to build connection URL".to_string(), e)
        })?;

        let driver =
            self.registry
                .get_or_create(&self.driver_classes, &driver_path, config.load_siblings())?;

        let properties = build_connection_properties(
            config.connection_properties(),
            config.user(),
            config.password(),
        );

        match driver.connect(&url, &properties) {
            Ok(Some(connection)) => {
                tracing::info!("Connected to '{}'", url);
                Ok(connection)
            }
            Ok(None) => Err(ConnectionFailure::null_connection(&url, &self.driver_classes)),
            Err(e @ DriverError::NativeLibrary(_)) => {
                Err(ConnectionFailure::native_library(&self.driver_classes, e))
            }
            Err(e) => Err(ConnectionFailure::connect(&url, e)),
        }
    }
}
