use clap::Parser;

/// MLB matchup analysis API
#[derive(Parser, Debug, Clone)]
#[command(name = "matchup-api", version, about)]
pub struct Config {
    /// Listening port
    #[arg(long, env = "PORT", default_value = "10000")]
    pub port: u16,

    /// Lineups page URL
    #[arg(
        long,
        env = "LINEUPS_URL",
        default_value = "https://swishanalytics.com/optimus/mlb/lineups"
    )]
    pub lineups_url: String,

    /// Player statistics site base URL
    #[arg(
        long,
        env = "SAVANT_URL",
        default_value = "https://baseballsavant.mlb.com"
    )]
    pub savant_url: String,

    /// Per-navigation timeout in seconds
    #[arg(long, env = "NAV_TIMEOUT_SECS", default_value = "60")]
    pub nav_timeout_secs: u64,

    /// Settle delay after loading the lineups page (ms)
    #[arg(long, env = "LINEUPS_SETTLE_MS", default_value = "5000")]
    pub lineups_settle_ms: u64,

    /// Settle delay after loading a player profile page (ms)
    #[arg(long, env = "PROFILE_SETTLE_MS", default_value = "3000")]
    pub profile_settle_ms: u64,

    /// Settle delay for the player search page and its results dropdown (ms)
    #[arg(long, env = "SEARCH_SETTLE_MS", default_value = "2000")]
    pub search_settle_ms: u64,

    /// Fixed delay between per-batter fetches in a composed matchup (ms)
    #[arg(long, env = "BATTER_DELAY_MS", default_value = "500")]
    pub batter_delay_ms: u64,

    /// Comma-separated CORS origin allow-list
    #[arg(
        long,
        env = "ALLOWED_ORIGINS",
        default_value = "https://www.thebettinginsider.com,http://localhost:3000"
    )]
    pub allowed_origins: String,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.nav_timeout_secs == 0 {
            anyhow::bail!("nav_timeout_secs must be positive");
        }
        if self.lineups_url.is_empty() || self.savant_url.is_empty() {
            anyhow::bail!("lineups_url and savant_url must not be empty");
        }
        if self.origins().is_empty() {
            anyhow::bail!("allowed_origins must list at least one origin");
        }
        Ok(())
    }

    /// Parsed CORS origin allow-list.
    pub fn origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_config() -> Config {
        Config::parse_from(["matchup-api"])
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = default_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.port, 10000);
    }

    #[test]
    fn test_origins_split_and_trimmed() {
        let mut config = default_config();
        config.allowed_origins = "https://a.example, http://localhost:3000 ,".into();
        assert_eq!(
            config.origins(),
            vec!["https://a.example", "http://localhost:3000"]
        );
    }

    #[test]
    fn test_empty_origins_rejected() {
        let mut config = default_config();
        config.allowed_origins = " , ".into();
        assert!(config.validate().is_err());
    }
}
