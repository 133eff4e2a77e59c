//! Effective driver path selection.

use crate::config::ConnectionConfig;

/// First candidate that is present and non-empty, else `""`.
///
/// Candidates are given in precedence order.
pub fn first_non_empty<I, S>(candidates: I) -> String
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.as_ref().is_empty())
        .map(|value| value.as_ref().to_string())
        .unwrap_or_default()
}

/// Driver path for `config`: the explicit override, then the database type's
/// `driverPath` property, then `""`.
pub fn resolve_driver_path(config: &dyn ConnectionConfig) -> String {
    first_non_empty([
        config.driver_path(),
        config.database_type_properties().driver_path(),
    ])
}
