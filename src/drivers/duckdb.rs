//! Built-in DuckDB driver.
//!
//! Accepts `jdbc:duckdb:<path>` and `duckdb:<path>` URLs. An empty path or
//! `:memory:` opens an in-memory database. DuckDB runs in-process, so there is
//! nothing to authenticate against and `user`/`password` are ignored.

use std::sync::Mutex;

use anyhow::{Context, anyhow};
use duckdb::{AccessMode, Config, Connection};

use super::traits::{BoxedDriverConnection, Driver, DriverConnection};
use crate::connection::ConnectionProperties;
use crate::error::DriverError;

/// Class name the DuckDB driver is registered under.
pub const DRIVER_CLASS: &str = "org.duckdb.DuckDBDriver";

/// Property that opens the database read-only when set to `true`.
pub const READ_ONLY_PROPERTY: &str = "duckdb.read_only";

const URL_PREFIXES: [&str; 2] = ["jdbc:duckdb:", "duckdb:"];
const MEMORY_PATH: &str = ":memory:";

#[derive(Debug, Default)]
pub struct DuckDbDriver;

impl DuckDbDriver {
    pub fn new() -> Self {
        Self
    }

    /// Strip the URL prefix, returning the database location.
    fn database_location(url: &str) -> Option<&str> {
        URL_PREFIXES
            .iter()
            .find_map(|prefix| url.strip_prefix(prefix))
    }

    fn is_read_only(properties: &ConnectionProperties) -> bool {
        properties
            .get(READ_ONLY_PROPERTY)
            .is_some_and(|value| value.eq_ignore_ascii_case("true"))
    }

    fn open(location: &str, read_only: bool) -> anyhow::Result<Connection> {
        if location.is_empty() || location == MEMORY_PATH {
            return Connection::open_in_memory()
                .map_err(|e| anyhow!("Failed to create in-memory DuckDB: {}", e));
        }

        let config = if read_only {
            Config::default().access_mode(AccessMode::ReadOnly)?
        } else {
            Config::default()
        };

        Connection::open_with_flags(location, config)
            .with_context(|| format!("Failed to open DuckDB file: {}", location))
    }
}

impl Driver for DuckDbDriver {
    fn connect(
        &self,
        url: &str,
        properties: &ConnectionProperties,
    ) -> Result<Option<BoxedDriverConnection>, DriverError> {
        let Some(location) = Self::database_location(url) else {
            tracing::debug!("DuckDB driver does not accept URL '{}'", url);
            return Ok(None);
        };

        let connection = Self::open(location, Self::is_read_only(properties))?;
        tracing::debug!("Opened DuckDB database at '{}'", location);

        Ok(Some(Box::new(DuckDbConnection {
            url: url.to_string(),
            connection: Mutex::new(connection),
        })))
    }

    fn accepts_url(&self, url: &str) -> bool {
        Self::database_location(url).is_some()
    }
}

/// Open DuckDB connection.
pub struct DuckDbConnection {
    url: String,
    connection: Mutex<Connection>,
}

impl DuckDbConnection {
    fn query_version(&self) -> anyhow::Result<String> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| anyhow!("Lock poisoned"))?;
        let version = conn.query_row("SELECT version()", [], |row| row.get::<_, String>(0))?;
        Ok(version)
    }
}

impl DriverConnection for DuckDbConnection {
    fn url(&self) -> &str {
        &self.url
    }

    fn is_valid(&self) -> bool {
        let Ok(conn) = self.connection.lock() else {
            return false;
        };
        conn.execute_batch("SELECT 1").is_ok()
    }

    fn server_version(&self) -> Option<String> {
        self.query_version()
            .map(|version| format!("DuckDB {}", version))
            .ok()
    }

    fn close(self: Box<Self>) -> anyhow::Result<()> {
        let connection = self
            .connection
            .into_inner()
            .map_err(|_| anyhow!("Lock poisoned"))?;
        connection
            .close()
            .map_err(|(_, e)| anyhow!("Failed to close DuckDB connection: {}", e))
    }
}
