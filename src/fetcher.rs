//! Date-range chunking and sequential fetching against an alert source.
//!
//! The alert-history service refuses ranges longer than about thirty days,
//! so a request is split into inclusive windows of at most
//! [`MAX_CHUNK_DAYS`] days and fetched one window at a time.

use crate::errors::AlertError;
use crate::models::RawAlert;
use chrono::{Duration, NaiveDate};
use std::fmt;
use tracing::info;

/// Inclusive number of calendar days one upstream request may cover.
pub const MAX_CHUNK_DAYS: i64 = 30;

/// Inbound date format used by the dashboards, e.g. `15.03.2024`.
pub const INBOUND_DATE_FORMAT: &str = "%d.%m.%Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// Parses the `fromDate`/`toDate` pair sent by the viewer.
    pub fn parse(from: Option<&str>, to: Option<&str>) -> Result<Self, AlertError> {
        let (Some(from), Some(to)) = (non_empty(from), non_empty(to)) else {
            return Err(AlertError::Validation(
                "fromDate and toDate are required".to_string(),
            ));
        };
        Ok(Self::new(parse_inbound_date(from)?, parse_inbound_date(to)?))
    }

    /// Absolute calendar-day difference between the two ends.
    pub fn day_span(&self) -> i64 {
        (self.to - self.from).num_days().abs()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn parse_inbound_date(value: &str) -> Result<NaiveDate, AlertError> {
    NaiveDate::parse_from_str(value, INBOUND_DATE_FORMAT)
        .map_err(|_| AlertError::Validation(format!("invalid date '{value}', expected DD.MM.YYYY")))
}

/// One inclusive upstream window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateChunk {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl fmt::Display for DateChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Splits `range` into consecutive inclusive windows of at most
/// [`MAX_CHUNK_DAYS`] days, the last one clipped to `range.to`.
/// A reversed range (`from > to`) has no windows.
pub fn plan_chunks(range: DateRange) -> Vec<DateChunk> {
    let mut chunks = Vec::new();
    let mut start = range.from;
    while start <= range.to {
        let end = (start + Duration::days(MAX_CHUNK_DAYS - 1)).min(range.to);
        chunks.push(DateChunk { start, end });
        start = end + Duration::days(1);
    }
    chunks
}

/// Anything that can answer a single upstream window.
pub trait AlertSource {
    fn fetch_chunk(
        &self,
        chunk: DateChunk,
    ) -> impl std::future::Future<Output = Result<Vec<RawAlert>, AlertError>> + Send;
}

/// Fetches every window of `range` in order, one request at a time, and
/// concatenates the results. The first failing window aborts the whole
/// fetch; records from earlier windows are discarded.
pub async fn fetch_range<S: AlertSource + Sync>(
    source: &S,
    range: DateRange,
) -> Result<Vec<RawAlert>, AlertError> {
    let chunks = plan_chunks(range);
    info!(
        from = %range.from,
        to = %range.to,
        days = range.day_span(),
        chunks = chunks.len(),
        "fetching alert range"
    );

    let mut alerts = Vec::new();
    for chunk in chunks {
        info!("processing chunk {chunk}");
        let batch = source.fetch_chunk(chunk).await?;
        alerts.extend(batch);
        info!("total alerts collected: {}", alerts.len());
    }

    Ok(alerts)
}
