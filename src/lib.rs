//! Runtime database driver loading.
//!
//! Resolves a driver from a configurable, possibly multi-entry driver path,
//! caches the loaded driver per (class, path), and uses it to open a single
//! connection with the configured credentials.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use dbdriver_loader::{ConnectionEstablisher, DriverCatalog, DriverConfig, DriverRegistry};
//!
//! let registry = Arc::new(DriverRegistry::new(DriverCatalog::builtin()));
//! let config = Arc::new(DriverConfig::load("connection.json")?);
//!
//! let connection = ConnectionEstablisher::new(config, registry).connect()?;
//! println!("{:?}", connection.server_version());
//! ```

pub mod config;
pub mod connection;
pub mod drivers;
pub mod error;
pub mod loader;

pub use config::{ConnectionConfig, DatabaseTypeProperties, DriverConfig};
pub use connection::{ConnectionEstablisher, ConnectionProperties, ConnectionUrlBuilder};
pub use drivers::{Driver, DriverCatalog, DriverClass, DriverConnection};
pub use error::{ConnectionFailure, DriverError, FailureKind};
pub use loader::{DriverRegistry, LoadingContext};
