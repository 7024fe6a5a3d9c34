use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::provider::FixtureProvider;
use crate::models::Fixture;

/// Fixture provider backed by the football-data.org v4 API.
/// Covers the league and European fixtures for a single team.
/// Docs: <https://docs.football-data.org/general/v4/team.html>
pub struct FootballData {
    http: Client,
    api_key: String,
    team_id: String,
    limit: u32,
    /// Base URL for overriding in tests
    base_url: String,
}

impl FootballData {
    pub fn new(
        api_key: &str,
        team_id: &str,
        limit: u32,
        base_url: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(FootballData {
            http,
            api_key: api_key.to_string(),
            team_id: team_id.to_string(),
            limit,
            base_url: base_url
                .unwrap_or("https://api.football-data.org/v4")
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

#[async_trait]
impl FixtureProvider for FootballData {
    fn name(&self) -> &str {
        "football-data.org"
    }

    async fn fetch_fixtures(&self) -> Result<Vec<Fixture>> {
        let url = format!(
            "{}/teams/{}/matches?status=SCHEDULED&limit={}",
            self.base_url, self.team_id, self.limit
        );
        debug!("Fetching scheduled matches from {}", url);

        let resp = self
            .http
            .get(&url)
            .header("X-Auth-Token", &self.api_key)
            .send()
            .await
            .context("football-data.org request failed")?;

        if !resp.status().is_success() {
            anyhow::bail!("football-data.org error: {}", resp.status());
        }

        let raw: serde_json::Value = resp
            .json()
            .await
            .context("Failed to parse football-data.org response")?;

        Ok(parse_matches_response(&raw))
    }
}

fn parse_matches_response(raw: &serde_json::Value) -> Vec<Fixture> {
    let matches = match raw["matches"].as_array() {
        Some(a) => a,
        None => return vec![],
    };

    matches
        .iter()
        .filter_map(|m| {
            let kickoff = m["utcDate"]
                .as_str()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())?
                .with_timezone(&Utc);
            Some(Fixture {
                competition: m["competition"]["name"].as_str()?.to_string(),
                home_team: m["homeTeam"]["name"].as_str()?.to_string(),
                away_team: m["awayTeam"]["name"].as_str()?.to_string(),
                venue: m["venue"].as_str().map(str::to_string),
                kickoff,
            })
        })
        .collect()
}
