//! Input validation
//!
//! `parse_*` functions double as clap value parsers and return `String`
//! errors; the rest map into the crate's error types.

use crate::error::{CliError, ConfigError};
use serde_json::Value;
use std::time::Duration;

/// Validate that a URL is properly formatted
pub fn validate_url(url: &str) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidValue {
        field: "url".to_string(),
        value: url.to_string(),
        reason: reason.to_string(),
    };

    if url.is_empty() {
        return Err(invalid("URL cannot be empty"));
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(invalid("URL must start with http:// or https://"));
    }

    Ok(())
}

/// Parse a JSON command-line argument. `None` stays `None`.
pub fn parse_json_arg(raw: Option<&str>, argument: &str) -> Result<Option<Value>, CliError> {
    raw.map(|text| {
        serde_json::from_str(text).map_err(|e| CliError::InvalidJson {
            argument: argument.to_string(),
            message: e.to_string(),
        })
    })
    .transpose()
}

/// Accepts true/yes/1 and false/no/0, case-insensitively.
pub fn parse_bool_flag(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(format!(
            "invalid boolean '{}' (expected true/false, yes/no or 1/0)",
            raw
        )),
    }
}

/// Positive, possibly fractional, seconds that fit in a [`Duration`].
pub fn parse_timeout_secs(raw: &str) -> Result<Duration, String> {
    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("invalid number of seconds '{}'", raw))?;

    if !(secs.is_finite() && secs > 0.0) {
        return Err("timeout must be a positive number of seconds".to_string());
    }

    Duration::try_from_secs_f64(secs).map_err(|_| format!("timeout '{}' is too large", raw))
}
