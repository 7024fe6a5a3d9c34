use anyhow::Result;
use async_trait::async_trait;

use crate::models::Fixture;

/// Trait that every upstream fixture source must implement.
#[async_trait]
pub trait FixtureProvider: Send + Sync {
    /// Return the scheduled fixtures this provider knows about.
    ///
    /// Past fixtures may be included; the aggregator filters them.
    async fn fetch_fixtures(&self) -> Result<Vec<Fixture>>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
