pub mod football_data;
pub mod provider;
pub mod sportsdb;

pub use football_data::FootballData;
pub use provider::FixtureProvider;
pub use sportsdb::TheSportsDB;

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::models::Fixture;

/// Outcome of one pass over every provider.
#[derive(Debug, Default)]
pub struct ProviderSweep {
    /// Future fixtures from every provider that answered, earliest first
    pub fixtures: Vec<Fixture>,
    /// Names of providers that answered successfully (possibly with nothing)
    pub succeeded: Vec<String>,
    /// (provider, error) for every provider that failed or timed out
    pub failures: Vec<(String, String)>,
}

impl ProviderSweep {
    /// True when no provider produced a usable answer.
    pub fn all_failed(&self) -> bool {
        self.succeeded.is_empty() && !self.failures.is_empty()
    }
}

/// Poll all providers **concurrently**, each bounded by `timeout`, and merge
/// their future fixtures into a single list sorted by kickoff.
///
/// A failing provider contributes nothing; it never aborts the sweep.
pub async fn collect_fixtures(
    providers: &[Arc<dyn FixtureProvider>],
    now: DateTime<Utc>,
    timeout: Duration,
) -> ProviderSweep {
    let fetch_futures: Vec<_> = providers
        .iter()
        .map(|p| {
            let p = Arc::clone(p);
            async move {
                let res = tokio::time::timeout(timeout, p.fetch_fixtures()).await;
                let out = match res {
                    Ok(result) => result,
                    Err(_) => Err(anyhow::anyhow!("timed out after {:?}", timeout)),
                };
                (p.name().to_string(), out)
            }
        })
        .collect();

    let results = futures_util::future::join_all(fetch_futures).await;

    let mut sweep = ProviderSweep::default();
    for (provider_name, result) in results {
        match result {
            Ok(fixtures) => {
                let future: Vec<Fixture> =
                    fixtures.into_iter().filter(|f| f.kickoff > now).collect();
                info!("{}: {} upcoming fixtures found", provider_name, future.len());
                sweep.fixtures.extend(future);
                sweep.succeeded.push(provider_name);
            }
            Err(e) => {
                warn!("Provider '{}' failed: {:#}", provider_name, e);
                sweep.failures.push((provider_name, format!("{:#}", e)));
            }
        }
    }

    // Stable: equal kickoffs keep provider order
    sweep.fixtures.sort_by_key(|f| f.kickoff);
    sweep
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::{Duration as ChronoDuration, TimeZone};

    struct Fixed(&'static str, Vec<Fixture>);

    #[async_trait]
    impl FixtureProvider for Fixed {
        async fn fetch_fixtures(&self) -> Result<Vec<Fixture>> {
            Ok(self.1.clone())
        }
        fn name(&self) -> &str {
            self.0
        }
    }

    struct Failing;

    #[async_trait]
    impl FixtureProvider for Failing {
        async fn fetch_fixtures(&self) -> Result<Vec<Fixture>> {
            anyhow::bail!("connection refused")
        }
        fn name(&self) -> &str {
            "failing"
        }
    }

    struct Slow;

    #[async_trait]
    impl FixtureProvider for Slow {
        async fn fetch_fixtures(&self) -> Result<Vec<Fixture>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(vec![])
        }
        fn name(&self) -> &str {
            "slow"
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    fn fx(home: &str, offset_hours: i64) -> Fixture {
        Fixture {
            competition: "Premier League".into(),
            home_team: home.into(),
            away_team: "Arsenal".into(),
            venue: None,
            kickoff: now() + ChronoDuration::hours(offset_hours),
        }
    }

    #[tokio::test]
    async fn test_merges_sorts_and_drops_past() {
        let providers: Vec<Arc<dyn FixtureProvider>> = vec![
            Arc::new(Fixed("a", vec![fx("late", 240), fx("past", -2), fx("kickoff-now", 0)])),
            Arc::new(Fixed("b", vec![fx("early", 72)])),
        ];
        let sweep = collect_fixtures(&providers, now(), Duration::from_secs(5)).await;
        let names: Vec<_> = sweep.fixtures.iter().map(|f| f.home_team.as_str()).collect();
        assert_eq!(names, vec!["early", "late"]);
        assert_eq!(sweep.succeeded.len(), 2);
        assert!(sweep.failures.is_empty());
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let providers: Vec<Arc<dyn FixtureProvider>> = vec![
            Arc::new(Fixed("a", vec![fx("only", 24)])),
            Arc::new(Failing),
        ];
        let sweep = collect_fixtures(&providers, now(), Duration::from_secs(5)).await;
        assert_eq!(sweep.fixtures.len(), 1);
        assert_eq!(sweep.failures[0].0, "failing");
        assert!(!sweep.all_failed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_counts_as_failure() {
        let providers: Vec<Arc<dyn FixtureProvider>> = vec![Arc::new(Slow), Arc::new(Failing)];
        let sweep = collect_fixtures(&providers, now(), Duration::from_secs(5)).await;
        assert!(sweep.all_failed());
        assert!(sweep.failures.iter().any(|(_, e)| e.contains("timed out")));
    }
}
