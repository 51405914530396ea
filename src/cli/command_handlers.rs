use crate::api::params::HistoryStatsParams;
use crate::cli::main_types::{ConfigCommands, GetCommands, StatsCommands};
use crate::core::context::AppContext;
use crate::display::{ReportFormat, TableDisplay, render_json};
use crate::error::{AppError, CliError, ConfigError};
use crate::storage::config::{API_KEY_ENV, Config};
use crate::storage::credentials::{get_api_key, mask_api_key};
use crate::utils::validation::validate_url;

#[derive(Default)]
pub struct GetHandler;

impl GetHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(&self, command: GetCommands, context: &AppContext) -> Result<(), AppError> {
        match command {
            GetCommands::History { history_id, format } => {
                let client = context.create_client()?;
                let entry = client.get_search_history(&history_id).await?;

                let output = match format {
                    ReportFormat::Json => render_json(&entry)?,
                    ReportFormat::Table => TableDisplay::new().render_history_entry(&entry),
                };
                println!("{}", output);
                Ok(())
            }
        }
    }
}

#[derive(Default)]
pub struct StatsHandler;

impl StatsHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: StatsCommands,
        context: &AppContext,
    ) -> Result<(), AppError> {
        match command {
            StatsCommands::History {
                date_from,
                date_to,
                format,
            } => {
                let params = HistoryStatsParams {
                    date_from: date_from.filter(|s| !s.is_empty()),
                    date_to: date_to.filter(|s| !s.is_empty()),
                };
                let client = context.create_client()?;
                let stats = client.search_history_stats(&params).await?;

                let output = match format {
                    ReportFormat::Json => render_json(&stats)?,
                    ReportFormat::Table => TableDisplay::new().render_history_stats(&stats),
                };
                println!("{}", output);
                Ok(())
            }
        }
    }
}

/// `config show` and `config set`. Neither needs an API key.
#[derive(Default)]
pub struct ConfigHandler;

impl ConfigHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, command: ConfigCommands, context: &AppContext) -> Result<(), AppError> {
        match command {
            ConfigCommands::Show => {
                println!("{}", show_config(context));
                Ok(())
            }
            ConfigCommands::Set {
                url,
                timeout_seconds,
            } => {
                let mut config = context.config().clone();
                let updated = apply_config_updates(&mut config, url, timeout_seconds)?;
                config.save(None)?;

                println!("✅ Set {}", updated.join(", "));
                println!("Configuration saved successfully.");
                Ok(())
            }
        }
    }
}

fn show_config(context: &AppContext) -> String {
    let (base_url, source) = context.base_url();
    let config_file = Config::config_file_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "(home directory not found)".to_string());
    let api_key = match get_api_key() {
        Some(key) => format!("✅ Set ({}) via {}", mask_api_key(&key), API_KEY_ENV),
        None => format!("❌ Not set ({})", API_KEY_ENV),
    };

    [
        "Current Configuration:".to_string(),
        "=====================".to_string(),
        format!("API URL: {} (from {})", base_url, source),
        format!("Timeout: {}s", context.timeout().as_secs_f64()),
        format!("Config File: {}", config_file),
        format!("API Key: {}", api_key),
    ]
    .join("\n")
}

/// Validate and apply `config set` values. Returns a description of each
/// change; at least one value must be given.
fn apply_config_updates(
    config: &mut Config,
    url: Option<String>,
    timeout_seconds: Option<u64>,
) -> Result<Vec<String>, AppError> {
    let mut updated = Vec::new();

    if let Some(url) = url {
        validate_url(&url)?;
        config.set_url(url);
        updated.push(format!("URL to: {}", config.url.as_deref().unwrap_or_default()));
    }

    if let Some(secs) = timeout_seconds {
        if secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_seconds".to_string(),
                value: secs.to_string(),
                reason: "must be greater than zero".to_string(),
            }
            .into());
        }
        config.timeout_seconds = Some(secs);
        updated.push(format!("timeout to: {}s", secs));
    }

    if updated.is_empty() {
        return Err(CliError::InvalidArguments(
            "No configuration values provided. Use --url and/or --timeout-seconds".to_string(),
        )
        .into());
    }

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_apply_url_update() {
        let mut config = Config::default();
        let updated = apply_config_updates(
            &mut config,
            Some("http://localhost:8001/".to_string()),
            None,
        )
        .expect("valid URL applies");
        assert_eq!(config.url.as_deref(), Some("http://localhost:8001"));
        assert_eq!(updated, vec!["URL to: http://localhost:8001".to_string()]);
    }

    #[test]
    fn test_apply_rejects_invalid_values() {
        let mut config = Config::default();
        let err = apply_config_updates(&mut config, Some("localhost".to_string()), None)
            .expect_err("scheme is required");
        assert!(matches!(err, AppError::Config(ConfigError::InvalidValue { .. })));
        assert_eq!(config, Config::default());

        let err = apply_config_updates(&mut config, None, Some(0)).expect_err("zero timeout");
        assert!(matches!(err, AppError::Config(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_apply_requires_a_value() {
        let mut config = Config::default();
        let err = apply_config_updates(&mut config, None, None).expect_err("nothing to set");
        assert!(matches!(err, AppError::Cli(CliError::InvalidArguments(_))));
    }

    #[test]
    fn test_show_config_uses_override() {
        let context = AppContext::new(
            Config::default(),
            Some("http://localhost:9000/".to_string()),
            Some(Duration::from_secs(5)),
            false,
        );
        let output = show_config(&context);
        assert!(output.contains("API URL: http://localhost:9000 (from --api-url)"));
        assert!(output.contains("Timeout: 5s"));
        assert!(output.contains("TRIOEXPLORER_API_KEY"));
    }
}
