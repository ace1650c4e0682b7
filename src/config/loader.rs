//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML file without semantic validation.
///
/// Used when overrides still have to be applied before validating.
pub fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = read_config(path)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_config(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("vibe-checker-{}.toml", uuid::Uuid::new_v4()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_valid_file() {
        let path = temp_config(
            r#"
            [listener]
            bind_address = "127.0.0.1:9000"

            [page]
            title = "dog vibe checker"
            "#,
        );

        let config = load_config(&path).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.page.title, "dog vibe checker");

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let path = temp_config(
            r#"
            [upstream]
            url = "not a url"
            "#,
        );

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
        assert!(err.to_string().starts_with("Validation failed: upstream.url"));

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_read_config_skips_validation() {
        let path = temp_config(
            r#"
            [listener]
            bind_address = "later"
            "#,
        );

        assert_eq!(read_config(&path).unwrap().listener.bind_address, "later");
        assert!(load_config(&path).is_err());

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let path = temp_config("[listener\nbind_address = ");
        assert!(matches!(load_config(&path).unwrap_err(), ConfigError::Parse(_)));
        fs::remove_file(path).unwrap();
    }
}
