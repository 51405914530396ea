//! API key lookup
//!
//! The key lives only in the process environment (`TRIOEXPLORER_API_KEY`),
//! possibly populated from a `.env` file at startup. It is never persisted.

use super::config::API_KEY_ENV;
use std::env;

/// Returns the value of `TRIOEXPLORER_API_KEY` if set and non-empty.
pub fn get_api_key() -> Option<String> {
    env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty())
}

/// Mask a key for display, keeping the first four characters.
pub fn mask_api_key(api_key: &str) -> String {
    let visible: String = api_key.chars().take(4).collect();
    if api_key.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{}****", visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_api_key() {
        assert_eq!(mask_api_key("test-api-key-12345"), "test****");
        assert_eq!(mask_api_key("abc"), "****");
        assert_eq!(mask_api_key(""), "****");
    }
}
