//! Candidate driver class resolution.

use super::context::LoadingContext;
use crate::drivers::DriverClass;

/// First of `candidates` that resolves in `context`, tried in order.
///
/// A candidate that is not found only moves on to the next one. `None` means
/// the whole list was exhausted.
pub fn resolve_driver_class(
    candidates: &[String],
    context: &dyn LoadingContext,
) -> Option<DriverClass> {
    for candidate in candidates {
        match context.resolve(candidate) {
            Some(class) => {
                tracing::debug!("Resolved driver class '{}' from {}", candidate, context.describe());
                return Some(class);
            }
            None => tracing::debug!("Unable to find driver class '{}'", candidate),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ConnectionProperties;
    use crate::drivers::{BoxedDriverConnection, Driver, DriverCatalog};
    use crate::error::DriverError;
    use std::sync::Arc;

    struct NoopDriver;

    impl Driver for NoopDriver {
        fn connect(
            &self,
            _url: &str,
            _properties: &ConnectionProperties,
        ) -> Result<Option<BoxedDriverConnection>, DriverError> {
            Ok(None)
        }

        fn accepts_url(&self, _url: &str) -> bool {
            false
        }
    }

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_skips_missing_candidate() {
        let catalog = DriverCatalog::new()
            .with("com.example.RealDriver", || Ok(Arc::new(NoopDriver) as Arc<dyn Driver>));

        let class = resolve_driver_class(
            &names(&["com.example.MissingDriver", "com.example.RealDriver"]),
            &catalog,
        )
        .unwrap();
        assert_eq!(class.name(), "com.example.RealDriver");
    }

    #[test]
    fn test_first_match_wins() {
        let catalog = DriverCatalog::new()
            .with("com.example.First", || Ok(Arc::new(NoopDriver) as Arc<dyn Driver>))
            .with("com.example.Second", || Ok(Arc::new(NoopDriver) as Arc<dyn Driver>));

        let class =
            resolve_driver_class(&names(&["com.example.Second", "com.example.First"]), &catalog)
                .unwrap();
        assert_eq!(class.name(), "com.example.Second");
    }

    #[test]
    fn test_none_resolved() {
        let catalog = DriverCatalog::new();
        let result = resolve_driver_class(
            &names(&["com.example.MissingDriver", "com.example.RealDriver"]),
            &catalog,
        );
        assert!(result.is_none());
        assert!(resolve_driver_class(&[], &catalog).is_none());
    }
}
