//! Account to destination webhook mapping.
//!
//! The registry is built once at startup from `WEBHOOK_<ACCOUNT>` environment
//! variables and never changes afterwards. Lookups report unknown or
//! unconfigured accounts as [`CoreError`] values instead of panicking.

use std::collections::BTreeMap;

use crate::error::CoreError;

/// Environment variable prefix that declares an account's destination URL.
pub const WEBHOOK_ENV_PREFIX: &str = "WEBHOOK_";

/// Account name used when a request does not name one.
pub const FALLBACK_ACCOUNT: &str = "unknown";

/// Immutable mapping from account name to destination webhook URL.
///
/// An account may be declared with an empty URL, in which case it is known
/// but unconfigured and resolves to [`CoreError::UnconfiguredAccount`].
#[derive(Debug, Clone, Default)]
pub struct AccountRegistry {
    destinations: BTreeMap<String, Option<String>>,
}

impl AccountRegistry {
    /// Build a registry from `(key, value)` pairs, keeping only keys that
    /// start with [`WEBHOOK_ENV_PREFIX`].
    ///
    /// `WEBHOOK_MAINCRO=https://...` declares the account `maincro`.
    pub fn from_env_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut registry = Self::default();
        for (key, value) in vars {
            let Some(name) = key.as_ref().strip_prefix(WEBHOOK_ENV_PREFIX) else {
                continue;
            };
            if name.is_empty() {
                continue;
            }
            registry.insert(name.to_lowercase(), value.as_ref());
        }
        registry
    }

    /// Declare `account` with the given destination URL. Blank URLs leave the
    /// account unconfigured.
    pub fn insert(&mut self, account: impl Into<String>, url: &str) {
        let url = url.trim();
        let url = (!url.is_empty()).then(|| url.to_string());
        self.destinations.insert(account.into(), url);
    }

    /// Resolve an account name to its destination URL.
    pub fn resolve(&self, account: &str) -> Result<&str, CoreError> {
        match self.destinations.get(account) {
            Some(Some(url)) => Ok(url),
            Some(None) => Err(CoreError::UnconfiguredAccount(account.to_string())),
            None => Err(CoreError::UnknownAccount(account.to_string())),
        }
    }

    /// Number of accounts with a usable destination URL.
    pub fn configured_count(&self) -> usize {
        self.destinations.values().filter(|url| url.is_some()).count()
    }

    /// Declared account names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.destinations.keys().map(String::as_str)
    }
}

/// Append the `wait=true` flag that makes Discord return the created message
/// synchronously.
pub fn with_wait_flag(destination: &str) -> String {
    if destination.contains('?') {
        format!("{destination}&wait=true")
    } else {
        format!("{destination}?wait=true")
    }
}
