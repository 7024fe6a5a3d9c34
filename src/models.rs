use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The match served to the countdown page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    /// Process-local sequence number assigned when the record is cached
    pub id: u64,
    pub competition: String,
    pub home_team: String,
    pub away_team: String,
    pub venue: String,
    pub kickoff: DateTime<Utc>,
    /// country code → network
    #[serde(default)]
    pub broadcasts: BTreeMap<String, String>,
}

impl MatchRecord {
    /// Build a record from an upstream fixture, filling in a missing venue.
    pub fn from_fixture(id: u64, fixture: Fixture, default_venue: &str) -> Self {
        let venue = fixture
            .venue
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default_venue.to_string());
        MatchRecord {
            id,
            competition: fixture.competition,
            home_team: fixture.home_team,
            away_team: fixture.away_team,
            venue,
            kickoff: fixture.kickoff,
            broadcasts: BTreeMap::new(),
        }
    }

    /// Schema checks applied before a record is cached.
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("competition", &self.competition),
            ("homeTeam", &self.home_team),
            ("awayTeam", &self.away_team),
            ("venue", &self.venue),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(format!("{} must not be empty", name));
            }
        }
        if self.home_team.eq_ignore_ascii_case(&self.away_team) {
            return Err("homeTeam and awayTeam must differ".to_string());
        }
        Ok(())
    }
}

/// Provider-neutral fixture as parsed from an upstream API
#[derive(Debug, Clone, PartialEq)]
pub struct Fixture {
    pub competition: String,
    pub home_team: String,
    pub away_team: String,
    pub venue: Option<String>,
    pub kickoff: DateTime<Utc>,
}

/// Why there is no next match to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeasonStatus {
    OffSeason,
}

/// Countdown breakdown until kickoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeLeft {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl TimeLeft {
    /// Whole units remaining from `now` until `kickoff`; zero once kickoff has passed.
    pub fn until(kickoff: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let total = (kickoff - now).num_seconds().max(0);
        TimeLeft {
            days: total / 86_400,
            hours: (total % 86_400) / 3_600,
            minutes: (total % 3_600) / 60,
            seconds: total % 60,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.days == 0 && self.hours == 0 && self.minutes == 0 && self.seconds == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn fixture(venue: Option<&str>) -> Fixture {
        Fixture {
            competition: "Premier League".into(),
            home_team: "Arsenal FC".into(),
            away_team: "Chelsea FC".into(),
            venue: venue.map(str::to_string),
            kickoff: Utc.with_ymd_and_hms(2026, 10, 25, 16, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_missing_venue_uses_default() {
        let rec = MatchRecord::from_fixture(1, fixture(None), "Emirates Stadium");
        assert_eq!(rec.venue, "Emirates Stadium");

        let rec = MatchRecord::from_fixture(2, fixture(Some("  ")), "Emirates Stadium");
        assert_eq!(rec.venue, "Emirates Stadium");

        let rec = MatchRecord::from_fixture(3, fixture(Some("Stamford Bridge")), "Emirates Stadium");
        assert_eq!(rec.venue, "Stamford Bridge");
    }

    #[test]
    fn test_validate_rejects_blank_team() {
        let mut rec = MatchRecord::from_fixture(1, fixture(None), "Emirates Stadium");
        assert!(rec.validate().is_ok());
        rec.away_team = String::new();
        assert_eq!(rec.validate().unwrap_err(), "awayTeam must not be empty");
    }

    #[test]
    fn test_serializes_camel_case() {
        let rec = MatchRecord::from_fixture(7, fixture(None), "Emirates Stadium");
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["homeTeam"], "Arsenal FC");
        assert_eq!(json["awayTeam"], "Chelsea FC");
        assert_eq!(json["kickoff"], "2026-10-25T16:30:00Z");
        assert!(json["broadcasts"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_season_status_wire_name() {
        let v = serde_json::to_value(SeasonStatus::OffSeason).unwrap();
        assert_eq!(v, "off-season");
    }

    #[test]
    fn test_time_left_breakdown() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap();
        let kickoff = now + Duration::days(3) + Duration::hours(4) + Duration::minutes(5) + Duration::seconds(6);
        let left = TimeLeft::until(kickoff, now);
        assert_eq!(left, TimeLeft { days: 3, hours: 4, minutes: 5, seconds: 6 });
    }

    #[test]
    fn test_time_left_saturates_after_kickoff() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap();
        let left = TimeLeft::until(now - Duration::minutes(1), now);
        assert!(left.is_zero());
    }
}
