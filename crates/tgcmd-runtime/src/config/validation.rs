//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{HandlerConfig, LogOutput, LoggingConfig, TgcmdConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &TgcmdConfig) -> ConfigResult<()> {
    validate_handler_config(&config.handler)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

fn validate_handler_config(handler: &HandlerConfig) -> ConfigResult<()> {
    let Some(username) = &handler.bot_username else {
        return Ok(());
    };

    if username.is_empty() {
        return Err(ConfigError::validation("handler.bot_username cannot be empty"));
    }
    if username.contains('@') {
        return Err(ConfigError::validation(format!(
            "handler.bot_username must not contain '@': {username}"
        )));
    }
    if username.chars().any(char::is_whitespace) {
        return Err(ConfigError::validation(format!(
            "handler.bot_username must not contain whitespace: {username:?}"
        )));
    }

    Ok(())
}

fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::validation(
            "logging.file_path is required when logging.output is \"file\"",
        ));
    }

    if let Some(target) = logging.filters.keys().find(|t| t.trim().is_empty()) {
        return Err(ConfigError::validation(format!(
            "logging.filters contains an empty target: {target:?}"
        )));
    }

    Ok(())
}
