use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::cache::{CacheLookup, MatchCache};
use crate::fixtures::{collect_fixtures, FixtureProvider};
use crate::models::MatchRecord;

#[derive(Debug, Error)]
pub enum AggregateError {
    /// Every provider failed and nothing was cached.
    #[error("all fixture providers failed: {0}")]
    Upstream(String),
    /// The selected fixture failed schema checks; it was not cached.
    #[error("invalid match data: {0}")]
    Validation(String),
}

/// Answer to "what is the next match?"
#[derive(Debug, Clone, PartialEq)]
pub enum NextMatch {
    Found(MatchRecord),
    /// Providers answered but nothing is scheduled; negative-cached.
    OffSeason,
}

/// Picks the chronologically next fixture across all providers and keeps it
/// in the shared [`MatchCache`].
#[derive(Clone)]
pub struct NextMatchService {
    providers: Arc<Vec<Arc<dyn FixtureProvider>>>,
    cache: MatchCache,
    /// Serializes upstream passes so concurrent misses fetch once
    refresh_lock: Arc<Mutex<()>>,
    next_id: Arc<AtomicU64>,
    provider_timeout: Duration,
    default_venue: String,
}

impl NextMatchService {
    pub fn new(
        providers: Vec<Arc<dyn FixtureProvider>>,
        cache: MatchCache,
        provider_timeout: Duration,
        default_venue: &str,
    ) -> Self {
        NextMatchService {
            providers: Arc::new(providers),
            cache,
            refresh_lock: Arc::new(Mutex::new(())),
            next_id: Arc::new(AtomicU64::new(1)),
            provider_timeout,
            default_venue: default_venue.to_string(),
        }
    }

    pub async fn get_next_match(&self) -> Result<NextMatch, AggregateError> {
        self.get_next_match_at(Utc::now()).await
    }

    /// Resolve the next match as of `now`.
    pub async fn get_next_match_at(&self, now: DateTime<Utc>) -> Result<NextMatch, AggregateError> {
        if let Some(cached) = self.cached(now).await {
            return Ok(cached);
        }

        let _guard = self.refresh_lock.lock().await;
        // Another request may have refreshed while we waited
        if let Some(cached) = self.cached(now).await {
            return Ok(cached);
        }

        info!("Fetching new match data from {} providers", self.providers.len());
        let sweep = collect_fixtures(&self.providers, now, self.provider_timeout).await;

        if sweep.all_failed() {
            let detail = sweep
                .failures
                .iter()
                .map(|(name, err)| format!("{}: {}", name, err))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(AggregateError::Upstream(detail));
        }

        info!("Total upcoming fixtures from all sources: {}", sweep.fixtures.len());

        let Some(first) = sweep.fixtures.into_iter().next() else {
            info!("No upcoming matches found");
            self.cache.put_negative(now).await;
            return Ok(NextMatch::OffSeason);
        };

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let record = MatchRecord::from_fixture(id, first, &self.default_venue);
        if let Err(reason) = record.validate() {
            warn!("Rejecting fixture {} vs {}: {}", record.home_team, record.away_team, reason);
            return Err(AggregateError::Validation(reason));
        }

        info!(
            "Next match: {} vs {} ({}) at {}",
            record.home_team, record.away_team, record.competition, record.kickoff
        );
        self.cache.put(record.clone()).await;
        Ok(NextMatch::Found(record))
    }

    /// Drop every cached answer so the next request goes upstream.
    pub async fn clear_cache(&self) {
        self.cache.invalidate().await;
    }

    async fn cached(&self, now: DateTime<Utc>) -> Option<NextMatch> {
        match self.cache.get(now).await {
            CacheLookup::Hit(record) => {
                info!("Returning cached match data");
                Some(NextMatch::Found(record))
            }
            CacheLookup::NegativeHit { .. } => {
                info!("Using cached 'no matches' response");
                Some(NextMatch::OffSeason)
            }
            CacheLookup::Miss => None,
        }
    }
}
