use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::{Validate, ValidationError};

use crate::sql_generator::dialect::SqlDialect;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Compiler configuration with validation
#[derive(Clone, Debug, PartialEq, Validate, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Target SQL dialect
    pub dialect: SqlDialect,

    /// Alias of the COUNT(...) projection in count statements
    #[validate(length(min = 1, message = "Count alias cannot be empty"))]
    pub count_alias: String,

    /// Replaces '.' when flattening reduce properties into aliases
    #[validate(custom(function = "validate_alias_separator"))]
    pub alias_separator: String,

    /// Prefix of dialect-generated result aliases (c0, c1, ...)
    #[validate(custom(function = "validate_result_alias_prefix"))]
    pub result_alias_prefix: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            dialect: SqlDialect::MySql,
            count_alias: "count".to_string(),
            alias_separator: "$".to_string(),
            result_alias_prefix: "c".to_string(),
        }
    }
}

fn validate_alias_separator(separator: &str) -> Result<(), ValidationError> {
    let mut chars = separator.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c != '.' && !c.is_alphanumeric() && !c.is_whitespace() => Ok(()),
        _ => Err(ValidationError::new("alias_separator").with_message(
            "Alias separator must be a single non-alphanumeric character other than '.'".into(),
        )),
    }
}

fn validate_result_alias_prefix(prefix: &str) -> Result<(), ValidationError> {
    if !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(ValidationError::new("result_alias_prefix")
            .with_message("Result alias prefix must be non-empty and alphabetic".into()))
    }
}

impl CompilerConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            dialect: parse_env_var("CRITERIA_SQL_DIALECT", "mysql")?,
            count_alias: env::var("CRITERIA_SQL_COUNT_ALIAS").unwrap_or_else(|_| "count".to_string()),
            alias_separator: env::var("CRITERIA_SQL_ALIAS_SEPARATOR")
                .unwrap_or_else(|_| "$".to_string()),
            result_alias_prefix: env::var("CRITERIA_SQL_RESULT_ALIAS_PREFIX")
                .unwrap_or_else(|_| "c".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from CLI arguments with validation
    pub fn from_cli(cli: CliConfig) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.merge_cli(cli)?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Merge with another configuration (file overrides environment)
    pub fn merge(&mut self, other: Self) {
        self.dialect = other.dialect;
        self.count_alias = other.count_alias;
        self.alias_separator = other.alias_separator;
        self.result_alias_prefix = other.result_alias_prefix;
    }

    /// Apply the flags that were given on the command line
    pub fn merge_cli(&mut self, cli: CliConfig) -> Result<(), ConfigError> {
        if let Some(dialect) = cli.dialect {
            self.dialect = dialect;
        }
        if let Some(count_alias) = cli.count_alias {
            self.count_alias = count_alias;
        }
        if let Some(alias_separator) = cli.alias_separator {
            self.alias_separator = alias_separator;
        }
        if let Some(result_alias_prefix) = cli.result_alias_prefix {
            self.result_alias_prefix = result_alias_prefix;
        }

        self.validate()?;
        Ok(())
    }
}

/// CLI configuration (parsed from command line arguments)
#[derive(Clone, Debug, Default)]
pub struct CliConfig {
    pub dialect: Option<SqlDialect>,
    pub count_alias: Option<String>,
    pub alias_separator: Option<String>,
    pub result_alias_prefix: Option<String>,
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
