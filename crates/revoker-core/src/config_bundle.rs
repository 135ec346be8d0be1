use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
/// Opaque key/value mapping handed over by the job framework.
///
/// Used for both the secret bundle and the environment bundle. Blank values
/// are treated the same as missing ones by every lookup helper.
pub struct ConfigBundle {
    values: BTreeMap<String, String>,
}

impl ConfigBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures the current process environment.
    pub fn from_process_env() -> Self {
        std::env::vars().collect()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Returns the trimmed value for `key`, or `None` when missing or blank.
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.non_empty(key).is_some()
    }

    /// Parses `key` as an unsigned integer, falling back to `default` on any failure.
    pub fn u64_or(&self, key: &str, default: u64) -> u64 {
        self.non_empty(key)
            .and_then(|raw| raw.parse::<u64>().ok())
            .unwrap_or(default)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ConfigBundle
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

// Bundles routinely hold secrets, so only key names are ever printed.
impl std::fmt::Debug for ConfigBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigBundle")
            .field("keys", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}
