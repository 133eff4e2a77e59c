//! Driver API and the drivers linked into this crate.
//!
//! - **Traits** (`traits`): `Driver`, `DriverConnection`, `DriverClass`
//! - **Catalog** (`catalog`): named driver constructors, also the ambient loading context
//! - **DuckDB** (`duckdb`): in-process DuckDB driver, behind the `duckdb` feature

mod catalog;
pub mod traits;

#[cfg(feature = "duckdb")]
pub mod duckdb;

pub use catalog::DriverCatalog;
pub use traits::{BoxedDriverConnection, Driver, DriverClass, DriverConnection, DriverFactory};
