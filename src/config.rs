use std::time::Duration;

/// Placeholder used when no map-provider key is configured.
pub const MAPS_API_KEY_PLACEHOLDER: &str = "YOUR_API_KEY_HERE";

const DEFAULT_DATABASE_URL: &str = "sqlite://battle_grid_database.db?mode=rwc";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub log_level: String,
    pub maps_api_key: String,
    pub archive_retention_days: u32,
    pub transmit_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            log_level: "info".to_string(),
            maps_api_key: MAPS_API_KEY_PLACEHOLDER.to_string(),
            archive_retention_days: 30,
            transmit_delay: Duration::from_millis(2000),
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    ///
    /// All values are optional: `DATABASE_URL`, `LOG_LEVEL`, `MAPS_API_KEY`,
    /// `ARCHIVE_RETENTION_DAYS`, `TRANSMIT_DELAY_MS`.
    ///
    /// # Errors
    ///
    /// Returns an error if `ARCHIVE_RETENTION_DAYS` or `TRANSMIT_DELAY_MS` are not
    /// valid unsigned integers.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let database_url = lookup("DATABASE_URL").unwrap_or(defaults.database_url);
        let log_level = lookup("LOG_LEVEL").unwrap_or(defaults.log_level);

        let maps_api_key = lookup("MAPS_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .unwrap_or(defaults.maps_api_key);

        let archive_retention_days = match lookup("ARCHIVE_RETENTION_DAYS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| anyhow::anyhow!("ARCHIVE_RETENTION_DAYS must be a valid u32"))?,
            None => defaults.archive_retention_days,
        };

        let transmit_delay = match lookup("TRANSMIT_DELAY_MS") {
            Some(raw) => Duration::from_millis(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| anyhow::anyhow!("TRANSMIT_DELAY_MS must be a valid u64"))?,
            ),
            None => defaults.transmit_delay,
        };

        Ok(Self {
            database_url,
            log_level,
            maps_api_key,
            archive_retention_days,
            transmit_delay,
        })
    }

    /// Whether a real map-provider key was supplied.
    #[must_use]
    pub fn has_maps_api_key(&self) -> bool {
        self.maps_api_key != MAPS_API_KEY_PLACEHOLDER
    }
}
