//! Connection establishment.
//!
//! - **Properties** (`properties`): property bag and credential layering
//! - **URL** (`url`): connection URL builders
//! - **Establisher** (`establisher`): resolves the driver and opens the connection

pub mod establisher;
pub mod properties;
pub mod url;

pub use establisher::ConnectionEstablisher;
pub use properties::{ConnectionProperties, PASSWORD_KEY, USER_KEY, build_connection_properties};
pub use self::url::{ConnectionUrlBuilder, FixedUrl, SpecUrlBuilder};
