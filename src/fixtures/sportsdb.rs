use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::provider::FixtureProvider;
use crate::models::Fixture;

/// Cup-fixture provider backed by TheSportsDB v1 API.
///
/// football-data.org does not carry the domestic cups, so this provider only
/// keeps events from the configured cup league IDs (FA Cup, League Cup).
/// Docs: <https://www.thesportsdb.com/api.php>
pub struct TheSportsDB {
    http: Client,
    api_key: String,
    team_id: String,
    cup_league_ids: Vec<String>,
    limit: usize,
    /// Base URL for overriding in tests
    base_url: String,
}

impl TheSportsDB {
    pub fn new(
        api_key: &str,
        team_id: &str,
        cup_league_ids: Vec<String>,
        limit: usize,
        base_url: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(TheSportsDB {
            http,
            api_key: api_key.to_string(),
            team_id: team_id.to_string(),
            cup_league_ids: cup_league_ids
                .into_iter()
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .collect(),
            limit,
            base_url: base_url
                .unwrap_or("https://www.thesportsdb.com/api/v1/json")
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

#[async_trait]
impl FixtureProvider for TheSportsDB {
    fn name(&self) -> &str {
        "TheSportsDB"
    }

    async fn fetch_fixtures(&self) -> Result<Vec<Fixture>> {
        let url = format!(
            "{}/{}/eventsnext.php?id={}",
            self.base_url, self.api_key, self.team_id
        );
        debug!("Fetching next events from TheSportsDB for team {}", self.team_id);

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .context("TheSportsDB request failed")?;

        if !resp.status().is_success() {
            anyhow::bail!("TheSportsDB error: {}", resp.status());
        }

        let raw: serde_json::Value = resp
            .json()
            .await
            .context("Failed to parse TheSportsDB response")?;

        let mut fixtures = parse_next_events(&raw, &self.cup_league_ids);
        fixtures.truncate(self.limit);
        Ok(fixtures)
    }
}

fn parse_next_events(raw: &serde_json::Value, cup_league_ids: &[String]) -> Vec<Fixture> {
    // "events" is null when the team has nothing scheduled
    let events = match raw["events"].as_array() {
        Some(a) => a,
        None => return vec![],
    };

    events
        .iter()
        .filter(|ev| {
            ev["idLeague"]
                .as_str()
                .is_some_and(|id| cup_league_ids.iter().any(|c| c == id))
        })
        .filter_map(|ev| {
            let kickoff = parse_event_instant(ev["dateEvent"].as_str()?, ev["strTime"].as_str()?)?;
            Some(Fixture {
                competition: ev["strLeague"].as_str()?.to_string(),
                home_team: ev["strHomeTeam"].as_str()?.to_string(),
                away_team: ev["strAwayTeam"].as_str()?.to_string(),
                venue: ev["strVenue"].as_str().map(str::to_string),
                kickoff,
            })
        })
        .collect()
}

/// Join TheSportsDB's separate date and time fields into one instant.
/// Times without an offset are UTC.
fn parse_event_instant(date: &str, time: &str) -> Option<DateTime<Utc>> {
    let joined = format!("{}T{}", date.trim(), time.trim());
    if let Ok(dt) = DateTime::parse_from_rfc3339(&joined) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&joined, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn cups() -> Vec<String> {
        vec!["4482".to_string(), "4570".to_string()]
    }

    #[test]
    fn test_parse_event_instant_formats() {
        let expected = Utc.with_ymd_and_hms(2027, 1, 10, 19, 45, 0).unwrap();
        assert_eq!(parse_event_instant("2027-01-10", "19:45:00"), Some(expected));
        assert_eq!(parse_event_instant("2027-01-10", "19:45"), Some(expected));
        assert_eq!(parse_event_instant("2027-01-10", "19:45:00+00:00"), Some(expected));
        assert_eq!(
            parse_event_instant("2027-01-10", "20:45:00+01:00"),
            Some(expected)
        );
        assert_eq!(parse_event_instant("2027-01-10", "TBD"), None);
    }

    #[test]
    fn test_only_cup_events_are_kept() {
        let raw = json!({
            "events": [
                {
                    "idLeague": "4328",
                    "strLeague": "English Premier League",
                    "strHomeTeam": "Arsenal", "strAwayTeam": "Fulham",
                    "dateEvent": "2026-11-01", "strTime": "15:00:00",
                    "strVenue": "Emirates Stadium"
                },
                {
                    "idLeague": "4570",
                    "strLeague": "EFL Cup",
                    "strHomeTeam": "Brighton", "strAwayTeam": "Arsenal",
                    "dateEvent": "2026-10-29", "strTime": "19:45:00",
                    "strVenue": null
                }
            ]
        });

        let fixtures = parse_next_events(&raw, &cups());
        assert_eq!(fixtures.len(), 1);
        assert_eq!(fixtures[0].competition, "EFL Cup");
        assert_eq!(fixtures[0].venue, None);
        assert_eq!(
            fixtures[0].kickoff,
            Utc.with_ymd_and_hms(2026, 10, 29, 19, 45, 0).unwrap()
        );
    }

    #[test]
    fn test_null_events_is_empty() {
        assert!(parse_next_events(&json!({ "events": null }), &cups()).is_empty());
    }
}
