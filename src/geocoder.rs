//! Nominatim address search, used when a listing is added.

use crate::errors::AlertError;
use crate::models::LatLon;
use serde::Deserialize;

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";

const USER_AGENT: &str = concat!("alert_map/", env!("CARGO_PKG_VERSION"));

pub const MAX_SUGGESTIONS: usize = 5;

/// Queries this short are not worth a round trip.
const MIN_SUGGEST_CHARS: usize = 4;

#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
}

#[derive(Clone)]
pub struct NominatimClient {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, AlertError> {
        let resp = self
            .client
            .get(&self.base_url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .query(&[("format", "json"), ("q", query), ("accept-language", "he")])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AlertError::Upstream(format!("geocoder returned {status}")));
        }

        let body = resp.bytes().await?;
        parse_results(&body)
    }

    /// Position of the best match, if any.
    pub async fn geocode(&self, address: &str) -> Result<Option<LatLon>, AlertError> {
        let results = self.search(address).await?;
        results.first().map(to_position).transpose()
    }

    pub async fn suggest(&self, query: &str) -> Result<Vec<String>, AlertError> {
        let query = query.trim();
        if query.chars().count() < MIN_SUGGEST_CHARS {
            return Ok(Vec::new());
        }
        let results = self.search(query).await?;
        Ok(results
            .into_iter()
            .map(|result| result.display_name)
            .take(MAX_SUGGESTIONS)
            .collect())
    }
}

fn parse_results(body: &[u8]) -> Result<Vec<SearchResult>, AlertError> {
    serde_json::from_slice(body).map_err(|err| AlertError::Upstream(format!("unparseable geocoder response: {err}")))
}

fn to_position(result: &SearchResult) -> Result<LatLon, AlertError> {
    let parse = |value: &str| {
        value
            .parse::<f64>()
            .map_err(|_| AlertError::Upstream(format!("invalid coordinate '{value}' in geocoder response")))
    };
    Ok(LatLon::new(parse(&result.lat)?, parse(&result.lon)?))
}
