use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use gunners_countdown::aggregator::NextMatchService;
use gunners_countdown::api::{self, AppState};
use gunners_countdown::cache::MatchCache;
use gunners_countdown::config::Config;
use gunners_countdown::fixtures::{FixtureProvider, FootballData, TheSportsDB};
use gunners_countdown::tv_listings::EspnSchedule;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    // 1. football-data.org: league + European fixtures
    // 2. TheSportsDB: domestic cups football-data.org does not cover
    let providers: Vec<Arc<dyn FixtureProvider>> = vec![
        Arc::new(FootballData::new(
            config.football_data_key(),
            &config.football_data_team_id,
            config.fixture_limit,
            Some(config.football_data_url.as_str()),
            config.provider_timeout(),
        )?),
        Arc::new(TheSportsDB::new(
            config.sportsdb_key(),
            &config.sportsdb_team_id,
            config.cup_league_ids.clone(),
            config.fixture_limit as usize,
            Some(config.sportsdb_url.as_str()),
            config.provider_timeout(),
        )?),
    ];
    info!("Configured {} fixture provider(s)", providers.len());

    let cache = MatchCache::new(config.negative_cache_ttl());
    let matches = NextMatchService::new(
        providers,
        cache,
        config.provider_timeout(),
        &config.default_venue,
    );
    let espn = EspnSchedule::new(&config.espn_url, &config.team_name)?;

    let app = api::router(AppState { matches, espn }, config.static_dir.as_deref());
    if let Some(dir) = &config.static_dir {
        info!("Serving static assets from {}", dir);
    }

    let addr: SocketAddr = config.listen_addr.parse()?;
    info!("Countdown API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
