use crate::error::ConfigError;
use crate::storage::config::{API_KEY_ENV, system_env_file_display};
use crate::storage::credentials::get_api_key;
use std::fmt;

pub const API_KEY_HEADER: &str = "X-API-Key";

/// Headers attached to every request. Holds at most the API key.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthHeaders {
    api_key: Option<String>,
}

impl AuthHeaders {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.api_key
            .as_deref()
            .map(|key| (API_KEY_HEADER, key))
            .into_iter()
    }
}

// The key must never reach logs.
impl fmt::Debug for AuthHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        if self.api_key.is_some() {
            map.entry(&API_KEY_HEADER, &"<redacted>");
        }
        map.finish()
    }
}

/// Build auth headers from the environment.
///
/// With `require = true` a missing key is a [`ConfigError::MissingApiKey`];
/// otherwise an empty header set is returned.
pub fn resolve_auth_headers(require: bool) -> Result<AuthHeaders, ConfigError> {
    resolve_with(get_api_key(), require)
}

pub fn resolve_with(api_key: Option<String>, require: bool) -> Result<AuthHeaders, ConfigError> {
    match api_key.filter(|k| !k.is_empty()) {
        Some(key) => Ok(AuthHeaders::with_api_key(key)),
        None if require => Err(ConfigError::MissingApiKey {
            env_var: API_KEY_ENV,
            system_env_file: system_env_file_display(),
        }),
        None => Ok(AuthHeaders::empty()),
    }
}
