//! Config (C9): validated, CLI-derived configuration for one session.
//!
//! Grounded in the teacher's `config.rs`: a `validator`-derived struct
//! built from a plain `CliConfig` parsed by `clap` in `main.rs`, with
//! defaults matching spec.md §6 exactly (`limit = 100`, `schema = "scry"`).

use thiserror::Error;
use validator::Validate;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// One session's configuration (spec.md §6). `limit = 0` disables the
/// row cap entirely, mirroring the `\set limit 0` setting.
#[derive(Clone, Debug, Validate)]
pub struct Config {
    #[validate(length(min = 1, message = "database connection string cannot be empty"))]
    pub database: String,

    #[validate(length(min = 1, message = "schema name cannot be empty"))]
    pub schema: String,

    pub limit: u32,

    #[validate(length(min = 1, message = "complete_style cannot be empty"))]
    pub complete_style: String,

    /// `-c/--command`: run one query non-interactively and exit.
    pub command: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: String::new(),
            schema: "scry".to_string(),
            limit: 100,
            complete_style: "column".to_string(),
            command: None,
        }
    }
}

impl Config {
    pub fn from_cli(cli: CliConfig) -> Result<Self, ConfigError> {
        let config = Self {
            database: cli.database,
            schema: cli.schema,
            limit: cli.limit,
            complete_style: cli.complete_style,
            command: cli.command,
        };
        config.validate()?;
        Ok(config)
    }
}

/// CLI configuration (parsed from command line arguments).
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub database: String,
    pub schema: String,
    pub limit: u32,
    pub complete_style: String,
    pub command: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(database: &str) -> CliConfig {
        CliConfig {
            database: database.to_string(),
            schema: "scry".to_string(),
            limit: 100,
            complete_style: "column".to_string(),
            command: None,
        }
    }

    #[test]
    fn test_default_config_values() {
        let config = Config::default();
        assert!(config.validate().is_err()); // empty database string
        assert_eq!(config.schema, "scry");
        assert_eq!(config.limit, 100);
    }

    #[test]
    fn test_valid_cli_config() {
        let config = Config::from_cli(cli("postgres://localhost/scry")).unwrap();
        assert_eq!(config.database, "postgres://localhost/scry");
        assert_eq!(config.limit, 100);
    }

    #[test]
    fn test_empty_schema_is_invalid() {
        let mut c = cli("postgres://localhost/scry");
        c.schema = "".to_string();
        assert!(Config::from_cli(c).is_err());
    }

    #[test]
    fn test_empty_database_is_invalid() {
        let c = cli("");
        assert!(Config::from_cli(c).is_err());
    }
}
