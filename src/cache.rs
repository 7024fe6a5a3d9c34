//! In-memory next-match cache shared by every request handler.
//!
//! Two layers:
//! - a **positive** entry holding the next match; its kickoff is its expiry,
//!   so it is checked against the clock on every read and dropped once the
//!   match has started;
//! - a **negative** entry recording when an aggregation pass found nothing;
//!   it short-circuits lookups for a fixed window so an off-season page does
//!   not hammer the upstream rate limits.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::models::MatchRecord;

/// Result of a cache read.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    /// A match with a future kickoff is cached.
    Hit(MatchRecord),
    /// A recent pass found no fixtures; the window has not elapsed.
    NegativeHit { recorded_at: DateTime<Utc> },
    Miss,
}

/// Thread-safe, in-memory match cache.
#[derive(Clone)]
pub struct MatchCache {
    inner: Arc<RwLock<CacheInner>>,
    negative_ttl: Duration,
}

struct CacheInner {
    next_match: Option<MatchRecord>,
    /// When the last empty aggregation pass happened
    no_matches_at: Option<DateTime<Utc>>,
}

impl MatchCache {
    pub fn new(negative_ttl: Duration) -> Self {
        MatchCache {
            inner: Arc::new(RwLock::new(CacheInner {
                next_match: None,
                no_matches_at: None,
            })),
            negative_ttl,
        }
    }

    /// Read the cache as of `now`, discarding any entry that has expired.
    pub async fn get(&self, now: DateTime<Utc>) -> CacheLookup {
        let mut inner = self.inner.write().await;

        if let Some(m) = &inner.next_match {
            if m.kickoff > now {
                return CacheLookup::Hit(m.clone());
            }
            debug!("Cached match {} kicked off at {}, dropping", m.id, m.kickoff);
            inner.next_match = None;
        }

        if let Some(at) = inner.no_matches_at {
            if now - at < self.negative_ttl {
                return CacheLookup::NegativeHit { recorded_at: at };
            }
            inner.no_matches_at = None;
        }

        CacheLookup::Miss
    }

    /// Store the next match, replacing any positive or negative entry.
    pub async fn put(&self, record: MatchRecord) {
        let mut inner = self.inner.write().await;
        inner.no_matches_at = None;
        inner.next_match = Some(record);
    }

    /// Record that an aggregation pass at `now` found no fixtures.
    pub async fn put_negative(&self, now: DateTime<Utc>) {
        let mut inner = self.inner.write().await;
        inner.next_match = None;
        inner.no_matches_at = Some(now);
    }

    /// Drop both layers unconditionally.
    pub async fn invalidate(&self) {
        let mut inner = self.inner.write().await;
        inner.next_match = None;
        inner.no_matches_at = None;
        info!("All caches cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    fn record(kickoff: DateTime<Utc>) -> MatchRecord {
        MatchRecord {
            id: 1,
            competition: "Premier League".into(),
            home_team: "Arsenal FC".into(),
            away_team: "Everton FC".into(),
            venue: "Emirates Stadium".into(),
            kickoff,
            broadcasts: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn test_empty_cache_misses() {
        let cache = MatchCache::new(Duration::minutes(10));
        assert_eq!(cache.get(now()).await, CacheLookup::Miss);
    }

    #[tokio::test]
    async fn test_positive_entry_expires_at_kickoff() {
        let cache = MatchCache::new(Duration::minutes(10));
        let kickoff = now() + Duration::hours(2);
        cache.put(record(kickoff)).await;

        assert_eq!(cache.get(now()).await, CacheLookup::Hit(record(kickoff)));
        // Exactly at kickoff the match is no longer "next"
        assert_eq!(cache.get(kickoff).await, CacheLookup::Miss);
        // ...and it stays gone even for an earlier clock reading
        assert_eq!(cache.get(now()).await, CacheLookup::Miss);
    }

    #[tokio::test]
    async fn test_negative_entry_expires_after_window() {
        let cache = MatchCache::new(Duration::minutes(10));
        cache.put_negative(now()).await;

        assert_eq!(
            cache.get(now() + Duration::minutes(1)).await,
            CacheLookup::NegativeHit { recorded_at: now() }
        );
        assert_eq!(cache.get(now() + Duration::minutes(10)).await, CacheLookup::Miss);
    }

    #[tokio::test]
    async fn test_put_overwrites_negative() {
        let cache = MatchCache::new(Duration::minutes(10));
        cache.put_negative(now()).await;
        let kickoff = now() + Duration::days(1);
        cache.put(record(kickoff)).await;
        assert_eq!(cache.get(now()).await, CacheLookup::Hit(record(kickoff)));
    }

    #[tokio::test]
    async fn test_invalidate_drops_both_layers() {
        let cache = MatchCache::new(Duration::minutes(10));
        cache.put(record(now() + Duration::days(1))).await;
        cache.invalidate().await;
        assert_eq!(cache.get(now()).await, CacheLookup::Miss);

        cache.put_negative(now()).await;
        cache.invalidate().await;
        assert_eq!(cache.get(now()).await, CacheLookup::Miss);
    }
}
