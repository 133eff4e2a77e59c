//! Connection URL construction.

use anyhow::{Result, anyhow};

use crate::config::{CONNECTION_SPEC_KEY, ConnectionConfig};

/// Produces the URL a driver is asked to connect to.
pub trait ConnectionUrlBuilder: Send + Sync {
    fn build(&self, config: &dyn ConnectionConfig) -> Result<String>;
}

/// Fills the `connectionSpec` template of the database type.
///
/// Every `<name>` placeholder is replaced with the configured URL parameter of
/// the same name, e.g. `jdbc:acme://<host>:<port>/<db>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpecUrlBuilder;

impl ConnectionUrlBuilder for SpecUrlBuilder {
    fn build(&self, config: &dyn ConnectionConfig) -> Result<String> {
        let spec = config
            .database_type_properties()
            .connection_spec()
            .ok_or_else(|| anyhow!("Database type does not define '{}'", CONNECTION_SPEC_KEY))?;

        let mut url = String::with_capacity(spec.len());
        let mut rest = spec;
        while let Some(start) = rest.find('<') {
            let Some(len) = rest[start..].find('>') else {
                break;
            };
            let name = &rest[start + 1..start + len];
            let value = config
                .url_parameter(name)
                .ok_or_else(|| anyhow!("No value for parameter '<{}>' in '{}'", name, spec))?;
            url.push_str(&rest[..start]);
            url.push_str(value);
            rest = &rest[start + len + 1..];
        }
        url.push_str(rest);

        Ok(url)
    }
}

/// Always returns the same URL.
#[derive(Debug, Clone)]
pub struct FixedUrl(pub String);

impl ConnectionUrlBuilder for FixedUrl {
    fn build(&self, _config: &dyn ConnectionConfig) -> Result<String> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DatabaseTypeProperties, DriverConfig};

    fn config(spec: &str, params: &[(&str, &str)]) -> DriverConfig {
        let mut config =
            DriverConfig::new(DatabaseTypeProperties::new().with(CONNECTION_SPEC_KEY, spec));
        for (k, v) in params {
            config.url_parameters.insert(k.to_string(), v.to_string());
        }
        config
    }

    #[test]
    fn test_placeholders_substituted() {
        let config = config(
            "jdbc:acme://<host>:<port>/<db>",
            &[("host", "localhost"), ("port", "5432"), ("db", "sales")],
        );
        let url = SpecUrlBuilder.build(&config).unwrap();
        assert_eq!(url, "jdbc:acme://localhost:5432/sales");
    }

    #[test]
    fn test_spec_without_placeholders() {
        let config = config("jdbc:duckdb::memory:", &[]);
        assert_eq!(SpecUrlBuilder.build(&config).unwrap(), "jdbc:duckdb::memory:");
    }

    #[test]
    fn test_missing_parameter_is_error() {
        let config = config("jdbc:acme://<host>/<db>", &[("host", "localhost")]);
        let err = SpecUrlBuilder.build(&config).unwrap_err();
        assert!(err.to_string().contains("<db>"));
    }

    #[test]
    fn test_missing_spec_is_error() {
        let config = DriverConfig::default();
        assert!(SpecUrlBuilder.build(&config).is_err());
    }

    #[test]
    fn test_unclosed_bracket_kept_verbatim() {
        let config = config("acme://<host>/x<y", &[("host", "h")]);
        assert_eq!(SpecUrlBuilder.build(&config).unwrap(), "acme://h/x<y");
    }
}
