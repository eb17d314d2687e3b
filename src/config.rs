use crate::error::ConfigError;

/// Process configuration. The article store's connection string is the only
/// value the environment owns; everything operational (source selection,
/// pool widths) is a CLI flag.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
}

impl Config {
    /// A CLI override wins; otherwise `DATABASE_URL` from the process
    /// environment, after a best-effort `.env` load.
    pub fn from_env(cli_override: Option<&str>) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        if let Some(url) = cli_override {
            return Ok(Self {
                database_url: url.to_string(),
            });
        }
        match std::env::var("DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => Ok(Self { database_url: url }),
            _ => Err(ConfigError::MissingDatabaseUrl),
        }
    }
}
