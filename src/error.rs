use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("CliError: {0}")]
    Cli(#[from] CliError),
    #[error("ApiError: {0}")]
    Api(#[from] ApiError),
    #[error("ConfigError: {0}")]
    Config(#[from] ConfigError),
    #[error("StorageError: {0}")]
    Storage(#[from] StorageError),
    #[error("DisplayError: {0}")]
    Display(#[from] DisplayError),
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid JSON for {argument}: {message}")]
    InvalidJson { argument: String, message: String },
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

/// Classified outcome of a failed request. Variants are listed in the order
/// they are checked.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Authentication failed - Invalid or expired API key.")]
    Unauthorized { endpoint: String },
    #[error("Authorization denied - Your API key does not have permission for this operation.")]
    Forbidden { endpoint: String },
    #[error("Error {status}: {detail}")]
    Http {
        status: u16,
        endpoint: String,
        detail: String,
    },
    #[error("Cannot connect to Search API at {base_url}")]
    Connect { base_url: String },
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: f64, endpoint: String },
    #[error("Network error: {message}")]
    Network { message: String },
    #[error("Unexpected error: {message}")]
    Unexpected { message: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "No API key configured.\nSet {env_var} in one of:\n  1. {system_env_file} (recommended for personal use)\n  2. .env file in your project directory\n  3. Environment variable\nTo get an API key, contact salessupportdesk@triohealth.com"
    )]
    MissingApiKey {
        env_var: &'static str,
        system_env_file: String,
    },
    #[error("Invalid configuration value for '{field}': {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File I/O error at {path}: {source}")]
    FileIo {
        path: String,
        source: std::io::Error,
    },
    #[error("Configuration parse error: {message}")]
    ConfigParseError { message: String },
    #[error("Configuration directory not found")]
    ConfigDirNotFound,
}

#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("CSV output failed: {0}")]
    Csv(String),
    #[error("JSON output failed: {0}")]
    Json(String),
}

impl AppError {
    /// Process exit status for this error. Every classified failure exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Cli(_)
            | AppError::Api(_)
            | AppError::Config(_)
            | AppError::Storage(_)
            | AppError::Display(_) => 1,
        }
    }

    /// The single message printed to stderr before exiting.
    pub fn user_message(&self) -> String {
        let message = match self {
            AppError::Cli(err) => err.to_string(),
            AppError::Api(err) => err.to_string(),
            AppError::Config(err) => format!("Error: {}", err),
            AppError::Storage(err) => format!("Error: {}", err),
            AppError::Display(err) => format!("Error: {}", err),
        };

        match self.troubleshooting_hint() {
            Some(hint) => format!("{}\n{}", message, hint),
            None => message,
        }
    }

    pub fn troubleshooting_hint(&self) -> Option<String> {
        match self {
            AppError::Api(ApiError::Unauthorized { .. }) => Some(format!(
                "Please check your {} environment variable.",
                crate::storage::config::API_KEY_ENV
            )),
            AppError::Api(ApiError::Forbidden { .. }) => {
                Some("Contact your administrator to request access.".to_string())
            }
            AppError::Api(ApiError::Connect { .. }) => Some("Is the server running?".to_string()),
            AppError::Storage(StorageError::ConfigParseError { .. }) => Some(
                "Fix or remove ~/.trioexplorer/config.toml, or use 'trioexplorer config set'"
                    .to_string(),
            ),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_error_display() {
        let cli_err = CliError::InvalidJson {
            argument: "--filters".to_string(),
            message: "expected value at line 1 column 1".to_string(),
        };
        assert_eq!(
            format!("{}", cli_err),
            "Invalid JSON for --filters: expected value at line 1 column 1"
        );

        let cli_err = CliError::InvalidArguments("bad".to_string());
        assert_eq!(format!("{}", cli_err), "Invalid arguments: bad");
    }

    #[test]
    fn test_api_error_display() {
        let api_err = ApiError::Http {
            status: 404,
            endpoint: "/search-history/abc".to_string(),
            detail: "Not found".to_string(),
        };
        assert_eq!(format!("{}", api_err), "Error 404: Not found");

        let api_err = ApiError::Timeout {
            timeout_secs: 60.0,
            endpoint: "/search".to_string(),
        };
        assert_eq!(format!("{}", api_err), "Request timed out after 60s");

        let api_err = ApiError::Timeout {
            timeout_secs: 0.5,
            endpoint: "/search".to_string(),
        };
        assert_eq!(format!("{}", api_err), "Request timed out after 0.5s");

        let api_err = ApiError::Connect {
            base_url: "http://localhost:8001".to_string(),
        };
        assert_eq!(
            format!("{}", api_err),
            "Cannot connect to Search API at http://localhost:8001"
        );
    }

    #[test]
    fn test_user_message_includes_guidance() {
        let app_err = AppError::Api(ApiError::Unauthorized {
            endpoint: "/search".to_string(),
        });
        let message = app_err.user_message();
        assert!(message.starts_with("Authentication failed"));
        assert!(message.contains("TRIOEXPLORER_API_KEY"));

        let app_err = AppError::Api(ApiError::Forbidden {
            endpoint: "/search".to_string(),
        });
        assert!(app_err.user_message().contains("administrator"));

        let app_err = AppError::Api(ApiError::Connect {
            base_url: "http://localhost:8001".to_string(),
        });
        assert!(app_err.user_message().ends_with("Is the server running?"));
    }

    #[test]
    fn test_missing_api_key_message() {
        let app_err = AppError::Config(ConfigError::MissingApiKey {
            env_var: "TRIOEXPLORER_API_KEY",
            system_env_file: "~/.trioexplorer/.env".to_string(),
        });
        let message = app_err.user_message();
        assert!(message.starts_with("Error: No API key configured."));
        assert!(message.contains("TRIOEXPLORER_API_KEY"));
        assert!(message.contains("~/.trioexplorer/.env"));
        assert!(app_err.troubleshooting_hint().is_none());
    }

    #[test]
    fn test_every_error_exits_with_one() {
        let errors = vec![
            AppError::Cli(CliError::InvalidArguments("x".to_string())),
            AppError::Api(ApiError::Network {
                message: "reset".to_string(),
            }),
            AppError::Api(ApiError::Unexpected {
                message: "boom".to_string(),
            }),
            AppError::Storage(StorageError::ConfigDirNotFound),
            AppError::Display(DisplayError::Csv("x".to_string())),
        ];
        for err in errors {
            assert_eq!(err.exit_code(), 1);
        }
    }

    #[test]
    fn test_from_conversions() {
        let app_err: AppError = ApiError::Network {
            message: "reset".to_string(),
        }
        .into();
        assert!(matches!(app_err, AppError::Api(ApiError::Network { .. })));
        assert_eq!(
            format!("{}", app_err),
            "ApiError: Network error: reset"
        );

        let app_err: AppError = ConfigError::InvalidValue {
            field: "url".to_string(),
            value: "localhost".to_string(),
            reason: "must start with http:// or https://".to_string(),
        }
        .into();
        assert!(matches!(app_err, AppError::Config(ConfigError::InvalidValue { .. })));
    }
}
