//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{BotConfig, CourierConfig, DispatchConfig, LogOutput, LoggingConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &CourierConfig) -> ConfigResult<()> {
    validate_bot_config(&config.bot)?;
    validate_dispatch_config(&config.dispatch)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

/// Validates the bot identity.
fn validate_bot_config(bot: &BotConfig) -> ConfigResult<()> {
    if bot.username.is_empty() {
        return Err(ConfigError::missing_field("bot.username"));
    }
    if bot.username.chars().any(char::is_whitespace) {
        return Err(ConfigError::validation(
            "Bot username cannot contain whitespace",
        ));
    }
    if bot.id == 0 {
        return Err(ConfigError::missing_field("bot.id"));
    }
    Ok(())
}

/// Validates dispatch settings.
fn validate_dispatch_config(dispatch: &DispatchConfig) -> ConfigResult<()> {
    if dispatch.max_in_flight == Some(0) {
        return Err(ConfigError::validation(
            "dispatch.max_in_flight must be greater than 0 when set",
        ));
    }
    Ok(())
}

/// Validates logging settings.
fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::missing_field("logging.file_path"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> CourierConfig {
        CourierConfig {
            bot: BotConfig {
                id: 42,
                username: "courier_bot".into(),
            },
            ..CourierConfig::default()
        }
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_default_config_misses_identity() {
        let config = CourierConfig::default();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::MissingField { .. })
        ));
    }

    #[test]
    fn test_validate_zero_concurrency_cap() {
        let mut config = valid_config();
        config.dispatch.max_in_flight = Some(0);
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn test_validate_file_output_requires_path() {
        let mut config = valid_config();
        config.logging.output = LogOutput::File;
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { .. }));

        config.logging.file_path = Some("courier.log".into());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_whitespace_username() {
        let mut config = valid_config();
        config.bot.username = "courier bot".into();
        assert!(validate_config(&config).is_err());
    }
}
