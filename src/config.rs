//! Connection configuration.
//!
//! The loader only reads configuration through the [`ConnectionConfig`]
//! capability. [`DriverConfig`] is the serde-backed implementation used by the
//! probe binary and by tests; hosts with their own settings layer implement the
//! trait directly.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::connection::ConnectionProperties;

/// Database-type property holding the comma-separated candidate driver classes.
pub const DRIVER_KEY: &str = "driver";
/// Database-type property holding the fallback driver path.
pub const DRIVER_PATH_KEY: &str = "driverPath";
/// Database-type property holding the connection URL template.
pub const CONNECTION_SPEC_KEY: &str = "connectionSpec";

/// Read-only view of everything needed for one connection attempt.
pub trait ConnectionConfig: Send + Sync {
    /// Explicit driver path override.
    fn driver_path(&self) -> Option<&str>;

    /// Whether artifacts next to the driver artifact join the classpath.
    fn load_siblings(&self) -> bool;

    fn user(&self) -> Option<&str>;

    fn password(&self) -> Option<&str>;

    /// Base properties passed to the driver before credentials are layered on.
    fn connection_properties(&self) -> &ConnectionProperties;

    /// Raw properties describing the database type.
    fn database_type_properties(&self) -> &DatabaseTypeProperties;

    /// Value substituted for `<name>` in the connection URL template.
    fn url_parameter(&self, name: &str) -> Option<&str>;
}

/// Properties describing a database type: driver classes, driver path, URL template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatabaseTypeProperties(BTreeMap<String, String>);

impl DatabaseTypeProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Candidate driver class names, in the order they should be tried.
    pub fn driver_classes(&self) -> Vec<String> {
        self.get(DRIVER_KEY)
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn driver_path(&self) -> Option<&str> {
        self.get(DRIVER_PATH_KEY)
    }

    pub fn connection_spec(&self) -> Option<&str> {
        self.get(CONNECTION_SPEC_KEY)
    }
}

/// Serde-backed connection configuration.
///
/// # Example
///
/// ```ignore
/// let config = DriverConfig::from_json_str(r#"{
///     "driver_path": "/opt/drivers/acme.json",
///     "user": "alice",
///     "database_type": {
///         "driver": "org.acme.Driver",
///         "connectionSpec": "acme://<host>/<db>"
///     },
///     "url_parameters": { "host": "localhost", "db": "sales" }
/// }"#)?;
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DriverConfig {
    #[serde(default)]
    pub driver_path: Option<String>,
    #[serde(default)]
    pub load_siblings: bool,
    #[serde(default)]
    pub user: Option<String>,
    /// Never written back out.
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    #[serde(default)]
    pub connection_properties: ConnectionProperties,
    #[serde(default)]
    pub database_type: DatabaseTypeProperties,
    #[serde(default)]
    pub url_parameters: BTreeMap<String, String>,
}

impl DriverConfig {
    pub fn new(database_type: DatabaseTypeProperties) -> Self {
        Self {
            database_type,
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid driver configuration")
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        Self::from_json_str(&contents)
            .with_context(|| format!("Failed to parse configuration file {}", path.display()))
    }
}

impl ConnectionConfig for DriverConfig {
    fn driver_path(&self) -> Option<&str> {
        self.driver_path.as_deref()
    }

    fn load_siblings(&self) -> bool {
        self.load_siblings
    }

    fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    fn connection_properties(&self) -> &ConnectionProperties {
        &self.connection_properties
    }

    fn database_type_properties(&self) -> &DatabaseTypeProperties {
        &self.database_type
    }

    fn url_parameter(&self, name: &str) -> Option<&str> {
        self.url_parameters.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_classes_split_and_trimmed() {
        let props = DatabaseTypeProperties::new()
            .with(DRIVER_KEY, "org.acme.Driver, org.acme.LegacyDriver,,");
        assert_eq!(
            props.driver_classes(),
            vec!["org.acme.Driver".to_string(), "org.acme.LegacyDriver".to_string()]
        );
    }

    #[test]
    fn test_driver_classes_missing() {
        assert!(DatabaseTypeProperties::new().driver_classes().is_empty());
    }

    #[test]
    fn test_config_from_json() {
        let config = DriverConfig::from_json_str(
            r#"{
                "driver_path": "/opt/drivers/acme.json",
                "load_siblings": true,
                "user": "alice",
                "password": "secret",
                "connection_properties": { "ssl": "true" },
                "database_type": {
                    "driver": "org.acme.Driver",
                    "driverPath": "/usr/share/acme",
                    "connectionSpec": "acme://<host>/<db>"
                },
                "url_parameters": { "host": "localhost", "db": "sales" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.driver_path(), Some("/opt/drivers/acme.json"));
        assert!(config.load_siblings());
        assert_eq!(config.user(), Some("alice"));
        assert_eq!(config.password(), Some("secret"));
        assert_eq!(config.connection_properties().get("ssl"), Some("true"));
        assert_eq!(config.database_type_properties().driver_path(), Some("/usr/share/acme"));
        assert_eq!(config.url_parameter("db"), Some("sales"));
        assert_eq!(config.url_parameter("port"), None);
    }

    #[test]
    fn test_config_defaults() {
        let config = DriverConfig::from_json_str("{}").unwrap();
        assert_eq!(config.driver_path(), None);
        assert!(!config.load_siblings());
        assert!(config.connection_properties().is_empty());
    }

    #[test]
    fn test_password_not_serialized() {
        let config = DriverConfig {
            password: Some("secret".to_string()),
            ..DriverConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"user": "bob"}"#).unwrap();

        let config = DriverConfig::load(&path).unwrap();
        assert_eq!(config.user(), Some("bob"));

        assert!(DriverConfig::load(dir.path().join("missing.json")).is_err());
    }
}
