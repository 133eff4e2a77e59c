//! Driver resolution and loading pipeline.
//!
//! Turning a driver path into a driver instance happens in these steps:
//!
//! - **Driver path** (`driver_path`): pick the effective path from the configured sources
//! - **Classpath** (`classpath`): expand the path into existing artifact locations,
//!   falling back to resources bundled with the program
//! - **Siblings** (`siblings`): optionally add artifacts living next to the driver artifact
//! - **Manifests** (`manifest`): read what each artifact provides
//! - **Context** (`context`): build an isolated loading context, or use the ambient catalog
//! - **Resolver** (`resolver`): pick the first candidate class that resolves
//! - **Registry** (`registry`): instantiate once per (class, path) and cache
//! - **Diagnostics** (`diagnostics`): explain what was searched when nothing resolved

pub mod classpath;
pub mod context;
pub mod diagnostics;
pub mod driver_path;
pub mod manifest;
pub mod registry;
pub mod resolver;
pub mod siblings;

pub use classpath::{BundledResources, Classpath, ResourceLocator, missing_segments, resolve_classpath};
pub use context::{IsolatedContext, LoadingContext, loading_context};
pub use diagnostics::resolution_message;
pub use driver_path::{first_non_empty, resolve_driver_path};
pub use manifest::{DriverManifest, LoadedManifest};
pub use registry::{DriverCacheKey, DriverRegistry};
pub use resolver::resolve_driver_class;
pub use siblings::sibling_artifacts;
