//! Connection property bag and credential layering.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Key the user name is stored under.
pub const USER_KEY: &str = "user";
/// Key the password is stored under.
pub const PASSWORD_KEY: &str = "password";

/// String properties handed to a driver's connect call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>")]
pub struct ConnectionProperties(BTreeMap<String, String>);

impl From<BTreeMap<String, String>> for ConnectionProperties {
    fn from(map: BTreeMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl ConnectionProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Set `key` to `value`, replacing any previous value.
    ///
    /// Empty keys are ignored.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        if !key.is_empty() {
            self.0.insert(key, value.into());
        }
        self
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Layer `value` under `key` only when a value is supplied.
    pub fn with_optional(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(value) = value {
            self.set(key, value);
        }
        self
    }

    pub fn with_user(self, user: Option<&str>) -> Self {
        self.with_optional(USER_KEY, user)
    }

    pub fn with_password(self, password: Option<&str>) -> Self {
        self.with_optional(PASSWORD_KEY, password)
    }
}

impl<K, V> FromIterator<(K, V)> for ConnectionProperties
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut properties = Self::new();
        for (key, value) in iter {
            properties.set(key, value);
        }
        properties
    }
}

/// Merge base properties with the configured credentials.
///
/// Layers apply in order base, user, password. An absent credential leaves the
/// value from the layer beneath untouched.
pub fn build_connection_properties(
    base: &ConnectionProperties,
    user: Option<&str>,
    password: Option<&str>,
) -> ConnectionProperties {
    base.clone().with_user(user).with_password(password)
}
