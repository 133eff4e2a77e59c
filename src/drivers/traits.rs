//! Core driver traits.
//!
//! A [`Driver`] turns a connection URL plus properties into a
//! [`DriverConnection`]. A [`DriverClass`] is the named, instantiable form of a
//! driver as it is found through a loading context.

use std::sync::Arc;

use crate::connection::ConnectionProperties;
use crate::error::DriverError;

/// A live connection produced by a driver.
pub trait DriverConnection: Send {
    /// The URL this connection was opened with.
    fn url(&self) -> &str;

    /// Check whether the connection is still usable.
    ///
    /// This may run a lightweight statement against the database.
    fn is_valid(&self) -> bool;

    /// Version string reported by the server, if the driver can tell.
    fn server_version(&self) -> Option<String> {
        None
    }

    /// Close the connection and release its resources.
    fn close(self: Box<Self>) -> anyhow::Result<()>;
}

/// A boxed connection, as handed back to callers.
pub type BoxedDriverConnection = Box<dyn DriverConnection>;

/// Pluggable database driver.
pub trait Driver: Send + Sync {
    /// Open a connection to `url`.
    ///
    /// Returns `Ok(None)` when the URL is not meant for this driver.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::NativeLibrary`] when a native library the driver
    /// depends on cannot be used, and [`DriverError::Other`] for everything else
    /// (bad credentials, unreachable server, malformed URL).
    fn connect(
        &self,
        url: &str,
        properties: &ConnectionProperties,
    ) -> Result<Option<BoxedDriverConnection>, DriverError>;

    /// Whether this driver understands `url`.
    fn accepts_url(&self, url: &str) -> bool;
}

/// Zero-argument constructor for a driver.
pub type DriverFactory = Arc<dyn Fn() -> Result<Arc<dyn Driver>, DriverError> + Send + Sync>;

/// A driver implementation resolved by fully-qualified name.
#[derive(Clone)]
pub struct DriverClass {
    name: String,
    factory: DriverFactory,
}

impl DriverClass {
    pub fn new(name: impl Into<String>, factory: DriverFactory) -> Self {
        Self {
            name: name.into(),
            factory,
        }
    }

    /// Fully-qualified name of this class.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Create a new driver instance.
    pub fn instantiate(&self) -> Result<Arc<dyn Driver>, DriverError> {
        (self.factory)()
    }

    /// Same class name, different constructor.
    pub(crate) fn with_factory(&self, factory: DriverFactory) -> Self {
        Self {
            name: self.name.clone(),
            factory,
        }
    }

    pub(crate) fn factory(&self) -> DriverFactory {
        Arc::clone(&self.factory)
    }
}

impl std::fmt::Debug for DriverClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverClass")
            .field("name", &self.name)
            .finish()
    }
}
