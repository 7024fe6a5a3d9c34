use anyhow::{Context, Result};
use regex::Regex;
use reqwest::Client;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, info};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Bytes of page kept on either side of the team name when searching for
/// the network cell.
const SNIPPET_RADIUS: usize = 500;

/// Text of an element whose class list starts with `network-name`.
static RE_NETWORK_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"network-name[^>]*>([^<]+)<").unwrap());

/// Scrapes ESPN's soccer schedule page for the network showing a team's match.
#[derive(Clone)]
pub struct EspnSchedule {
    http: Client,
    base_url: String,
    team: String,
}

impl EspnSchedule {
    pub fn new(base_url: &str, team: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(EspnSchedule {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            team: team.to_string(),
        })
    }

    /// TV provider for `date` (`YYYYMMDD`), `None` when the page has no
    /// listing for the team or ESPN answers with an error status.
    pub async fn tv_provider(&self, date: &str) -> Result<Option<String>> {
        let url = format!("{}/soccer/schedule/_/date/{}", self.base_url, date);
        debug!("Fetching ESPN schedule: {}", url);

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .context("ESPN schedule request failed")?;

        if !resp.status().is_success() {
            debug!("ESPN schedule returned {}", resp.status());
            return Ok(None);
        }

        let html = resp.text().await.context("Failed to read ESPN schedule")?;
        let provider = extract_network(&html, &self.team);
        if let Some(p) = &provider {
            info!("Found TV provider for {}: {}", self.team, p);
        }
        Ok(provider)
    }
}

/// Accept only an eight-digit `YYYYMMDD` date.
pub fn is_schedule_date(date: &str) -> bool {
    date.len() == 8 && date.bytes().all(|b| b.is_ascii_digit())
}

/// Find the first `network-name` element near the first mention of `team`.
fn extract_network(html: &str, team: &str) -> Option<String> {
    let idx = html.find(team)?;
    let start = floor_char_boundary(html, idx.saturating_sub(SNIPPET_RADIUS));
    let end = floor_char_boundary(html, (idx + SNIPPET_RADIUS).min(html.len()));
    let snippet = &html[start..end];

    let caps = RE_NETWORK_NAME.captures(snippet)?;
    let name = caps[1].trim();
    (!name.is_empty()).then(|| name.to_string())
}

fn floor_char_boundary(s: &str, mut i: usize) -> usize {
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}
