use clap::Parser;
use std::time::Duration;

/// Next-match countdown service for Arsenal fixtures
#[derive(Parser, Debug, Clone)]
#[command(name = "gunners-countdown", version, about)]
pub struct Config {
    /// HTTP listen address
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:5000")]
    pub listen_addr: String,

    /// football-data.org API token (required)
    #[arg(long, env = "FOOTBALL_DATA_API_KEY", hide_env_values = true)]
    pub football_data_api_key: Option<String>,

    /// TheSportsDB API key (required)
    #[arg(long, env = "SPORTSDB_API_KEY", hide_env_values = true)]
    pub sportsdb_api_key: Option<String>,

    /// football-data.org base URL
    #[arg(
        long,
        env = "FOOTBALL_DATA_API_URL",
        default_value = "https://api.football-data.org/v4"
    )]
    pub football_data_url: String,

    /// TheSportsDB base URL
    #[arg(
        long,
        env = "SPORTSDB_API_URL",
        default_value = "https://www.thesportsdb.com/api/v1/json"
    )]
    pub sportsdb_url: String,

    /// ESPN base URL used for TV listings
    #[arg(long, env = "ESPN_SCHEDULE_URL", default_value = "https://www.espn.com")]
    pub espn_url: String,

    /// Team ID on football-data.org
    #[arg(long, env = "FOOTBALL_DATA_TEAM_ID", default_value = "57")]
    pub football_data_team_id: String,

    /// Team ID on TheSportsDB
    #[arg(long, env = "SPORTSDB_TEAM_ID", default_value = "133604")]
    pub sportsdb_team_id: String,

    /// TheSportsDB league IDs kept from the cup provider (FA Cup, League Cup)
    #[arg(long, env = "CUP_LEAGUE_IDS", value_delimiter = ',', default_value = "4482,4570")]
    pub cup_league_ids: Vec<String>,

    /// Team name searched for in ESPN listings
    #[arg(long, env = "TEAM_NAME", default_value = "Arsenal")]
    pub team_name: String,

    /// Maximum fixtures requested from each provider
    #[arg(long, env = "FIXTURE_LIMIT", default_value = "50")]
    pub fixture_limit: u32,

    /// Per-provider request timeout in seconds
    #[arg(long, env = "PROVIDER_TIMEOUT_SECS", default_value = "5")]
    pub provider_timeout_secs: u64,

    /// How long an empty result suppresses upstream lookups, in seconds
    #[arg(long, env = "NEGATIVE_CACHE_SECS", default_value = "600")]
    pub negative_cache_secs: i64,

    /// Venue used when a provider omits it
    #[arg(long, env = "DEFAULT_VENUE", default_value = "Emirates Stadium")]
    pub default_venue: String,

    /// Directory of built front-end assets to serve
    #[arg(long, env = "STATIC_DIR")]
    pub static_dir: Option<String>,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.football_data_key().is_empty() {
            anyhow::bail!("FOOTBALL_DATA_API_KEY is required");
        }
        if self.sportsdb_key().is_empty() {
            anyhow::bail!("SPORTSDB_API_KEY is required");
        }
        for (name, value) in [
            ("football_data_url", &self.football_data_url),
            ("sportsdb_url", &self.sportsdb_url),
            ("espn_url", &self.espn_url),
        ] {
            url::Url::parse(value)
                .map_err(|e| anyhow::anyhow!("{} is not a valid URL ({}): {}", name, value, e))?;
        }
        if self.provider_timeout_secs == 0 {
            anyhow::bail!("provider_timeout_secs must be positive");
        }
        if !(600..=1800).contains(&self.negative_cache_secs) {
            anyhow::bail!("negative_cache_secs must be between 600 and 1800");
        }
        if !(1..=100).contains(&self.fixture_limit) {
            anyhow::bail!("fixture_limit must be between 1 and 100");
        }
        if self.cup_league_ids.iter().all(|id| id.trim().is_empty()) {
            anyhow::bail!("at least one cup league ID is required");
        }
        Ok(())
    }

    pub fn football_data_key(&self) -> &str {
        self.football_data_api_key.as_deref().unwrap_or("").trim()
    }

    pub fn sportsdb_key(&self) -> &str {
        self.sportsdb_api_key.as_deref().unwrap_or("").trim()
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    pub fn negative_cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.negative_cache_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Config {
        let mut args = vec![
            "gunners-countdown",
            "--football-data-api-key",
            "fd-token",
            "--sportsdb-api-key",
            "sdb-key",
        ];
        args.extend_from_slice(extra);
        Config::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_defaults_validate() {
        let config = parse(&[]);
        config.validate().unwrap();
        assert_eq!(config.cup_league_ids, vec!["4482", "4570"]);
        assert_eq!(config.provider_timeout(), Duration::from_secs(5));
        assert_eq!(config.negative_cache_ttl(), chrono::Duration::minutes(10));
    }

    #[test]
    fn test_missing_credential_is_fatal() {
        let mut config = parse(&[]);
        config.sportsdb_api_key = None;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("SPORTSDB_API_KEY"));

        let mut config = parse(&[]);
        config.football_data_api_key = Some("   ".into());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_window_bounds() {
        assert!(parse(&["--negative-cache-secs", "1800"]).validate().is_ok());
        assert!(parse(&["--negative-cache-secs", "60"]).validate().is_err());
        assert!(parse(&["--negative-cache-secs", "3600"]).validate().is_err());
    }

    #[test]
    fn test_rejects_bad_url_and_zero_timeout() {
        assert!(parse(&["--espn-url", "not a url"]).validate().is_err());
        assert!(parse(&["--provider-timeout-secs", "0"]).validate().is_err());
    }
}
