//! Client for the alert-history service.

use crate::errors::AlertError;
use crate::fetcher::{AlertSource, DateChunk};
use crate::models::RawAlert;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{info, warn};

pub const DEFAULT_UPSTREAM_URL: &str =
    "https://alerts-history.oref.org.il//Shared/Ajax/GetAlarmsHistory.aspx";

/// Outbound date format the service expects in `fromDate`/`toDate`.
pub const UPSTREAM_DATE_FORMAT: &str = "%Y-%m-%d";

// The service answers only requests that look like they come from its own page.
const IDENTIFICATION_HEADERS: [(&str, &str); 11] = [
    ("accept", "*/*"),
    ("accept-language", "en-US,en;q=0.9,he;q=0.8"),
    (
        "sec-ch-ua",
        "\"Google Chrome\";v=\"129\", \"Not=A?Brand\";v=\"8\", \"Chromium\";v=\"129\"",
    ),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", "\"Windows\""),
    ("sec-fetch-dest", "empty"),
    ("sec-fetch-mode", "cors"),
    ("sec-fetch-site", "same-origin"),
    ("x-requested-with", "XMLHttpRequest"),
    (
        "referer",
        "https://alerts-history.oref.org.il/12481-en/Pakar.aspx?pagemode=iframe&u1st=0",
    ),
    ("referrer-policy", "strict-origin-when-cross-origin"),
];

#[derive(Clone)]
pub struct OrefClient {
    client: reqwest::Client,
    base_url: String,
}

impl OrefClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

pub fn identification_headers() -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(IDENTIFICATION_HEADERS.len());
    for (name, value) in IDENTIFICATION_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    headers
}

/// Decodes one response body. Days without alerts come back as an empty body.
pub fn parse_alerts(body: &[u8]) -> Result<Vec<RawAlert>, AlertError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    serde_json::from_slice(body).map_err(|err| AlertError::Upstream(format!("unparseable body: {err}")))
}

impl AlertSource for OrefClient {
    async fn fetch_chunk(&self, chunk: DateChunk) -> Result<Vec<RawAlert>, AlertError> {
        let from = chunk.start.format(UPSTREAM_DATE_FORMAT).to_string();
        let to = chunk.end.format(UPSTREAM_DATE_FORMAT).to_string();
        info!("fetching data for range: {from} to {to}");

        let resp = self
            .client
            .get(&self.base_url)
            .headers(identification_headers())
            .query(&[
                ("lang", "he"),
                ("fromDate", from.as_str()),
                ("toDate", to.as_str()),
                ("mode", "0"),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            warn!("alert history returned {status} for {from} to {to}");
            return Err(AlertError::Upstream(format!("HTTP error! status: {status}")));
        }

        let body = resp.bytes().await?;
        let alerts = parse_alerts(&body)?;
        info!("fetched {} alerts for range {from} to {to}", alerts.len());
        Ok(alerts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_is_no_alerts() {
        assert!(parse_alerts(b"").unwrap().is_empty());
        assert!(parse_alerts(b"  \r\n").unwrap().is_empty());
        assert!(parse_alerts(b"[]").unwrap().is_empty());
    }

    #[test]
    fn body_decodes_in_order() {
        let body = br#"[
            {"alertDate":"2024-01-01T10:00:00","title":"a","data":"A","category":1},
            {"alertDate":"2024-01-01T11:00:00","title":"b","data":"B","category":2}
        ]"#;
        let alerts = parse_alerts(body).unwrap();
        let titles: Vec<_> = alerts.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b"]);
    }

    #[test]
    fn malformed_body_is_upstream_error() {
        assert!(matches!(parse_alerts(b"<html>"), Err(AlertError::Upstream(_))));
        assert!(matches!(
            parse_alerts(br#"{"error":"nope"}"#),
            Err(AlertError::Upstream(_))
        ));
    }

    #[test]
    fn identification_headers_are_complete() {
        let headers = identification_headers();
        assert_eq!(headers.len(), IDENTIFICATION_HEADERS.len());
        assert_eq!(headers["x-requested-with"], "XMLHttpRequest");
    }
}
