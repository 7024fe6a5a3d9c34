pub mod aggregator;
pub mod api;
pub mod audio;
pub mod broadcasters;
pub mod cache;
pub mod config;
pub mod fixtures;
pub mod models;
pub mod tv_listings;
