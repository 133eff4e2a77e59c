//! Error types for driver loading and connection establishment.
//!
//! Everything that goes wrong while turning a configuration into a live
//! connection surfaces as a single [`ConnectionFailure`]. Drivers report their
//! own problems through [`DriverError`] so the establisher can tell a broken
//! native environment apart from an ordinary connect error.

use std::error::Error as StdError;

use thiserror::Error;

/// Boxed cause attached to a [`ConnectionFailure`].
pub type BoxedCause = Box<dyn StdError + Send + Sync + 'static>;

/// What kind of failure ended a connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// None of the candidate driver classes resolved.
    Resolution,
    /// A driver class resolved but could not be instantiated.
    Instantiation,
    /// A native library required by the driver could not be linked.
    NativeLibrary,
    /// The driver accepted the call but returned no connection.
    NullConnection,
    /// Any other failure while building the URL or connecting.
    Generic,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resolution => "resolution",
            Self::Instantiation => "instantiation",
            Self::NativeLibrary => "native-library",
            Self::NullConnection => "null-connection",
            Self::Generic => "generic",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Terminal failure of a connection attempt. Never retried.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ConnectionFailure {
    kind: FailureKind,
    message: String,
    #[source]
    source: Option<BoxedCause>,
}

impl ConnectionFailure {
    fn new(kind: FailureKind, message: String, source: Option<BoxedCause>) -> Self {
        Self {
            kind,
            message,
            source,
        }
    }

    /// No candidate class resolved. `diagnostic` is the full resolution report.
    pub fn resolution(diagnostic: String) -> Self {
        Self::new(FailureKind::Resolution, diagnostic, None)
    }

    /// A resolved class failed to instantiate.
    pub fn instantiation(diagnostic: String, cause: impl Into<BoxedCause>) -> Self {
        Self::new(FailureKind::Instantiation, diagnostic, Some(cause.into()))
    }

    pub fn native_library(driver_classes: &[String], cause: impl Into<BoxedCause>) -> Self {
        Self::new(
            FailureKind::NativeLibrary,
            format!(
                "Error with native library occurred while trying to use driver '{}'",
                join_classes(driver_classes)
            ),
            Some(cause.into()),
        )
    }

    pub fn null_connection(url: &str, driver_classes: &[String]) -> Self {
        Self::new(
            FailureKind::NullConnection,
            format!(
                "Cannot connect to '{}' with driver '{}'",
                url,
                join_classes(driver_classes)
            ),
            None,
        )
    }

    pub fn generic(message: String, cause: impl Into<BoxedCause>) -> Self {
        Self::new(FailureKind::Generic, message, Some(cause.into()))
    }

    /// Generic failure of the connect call itself, naming the URL.
    pub fn connect(url: &str, cause: impl Into<BoxedCause>) -> Self {
        Self::generic(format!("Failed to connect to database URL [{}]", url), cause)
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors raised by a driver while being instantiated or while connecting.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The driver is present but a native library it links against is not.
    #[error("native library error: {0}")]
    NativeLibrary(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Comma-joined class list, as shown in connection failures.
pub(crate) fn join_classes(driver_classes: &[String]) -> String {
    driver_classes.join(",")
}
