//! Resolution of raw alerts to coordinates, and category filtering.

use crate::coords::CoordinateTable;
use crate::errors::AlertError;
use crate::models::{Category, LatLon, RawAlert, ResolvedAlert};
use tracing::debug;

/// Resolves every raw alert against `table`.
///
/// A location that matches the table as a whole yields one entry. Otherwise
/// the location is split on commas and each part that matches yields its own
/// entry. Alerts with no matching part are dropped.
pub fn resolve(raws: &[RawAlert], table: &CoordinateTable) -> Vec<ResolvedAlert> {
    let mut resolved = Vec::with_capacity(raws.len());
    let mut dropped = 0usize;
    for raw in raws {
        if resolve_one(raw, table, &mut resolved) == 0 {
            dropped += 1;
        }
    }
    if dropped > 0 {
        debug!("{dropped} of {} alerts had no known coordinates", raws.len());
    }
    resolved
}

fn resolve_one(raw: &RawAlert, table: &CoordinateTable, out: &mut Vec<ResolvedAlert>) -> usize {
    let location = raw.data.trim();
    let category = Category::from_code(raw.category);

    if let Some(pos) = table.get(location) {
        out.push(to_resolved(raw, location, category, pos));
        return 1;
    }

    let before = out.len();
    for part in location.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        if let Some(pos) = table.get(part) {
            out.push(to_resolved(raw, part, category, pos));
        }
    }

    let emitted = out.len() - before;
    if emitted == 0 {
        debug!("no coordinates found for location: {location}");
    }
    emitted
}

fn to_resolved(raw: &RawAlert, location: &str, category: Category, pos: LatLon) -> ResolvedAlert {
    ResolvedAlert {
        date: raw.alert_date,
        title: raw.title.clone(),
        location: location.to_string(),
        category,
        lat: pos.lat,
        lon: pos.lon,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Accepts `all` (or nothing) and the category labels.
    pub fn parse(value: Option<&str>) -> Result<Self, AlertError> {
        match value.map(str::trim) {
            None | Some("") | Some("all") => Ok(CategoryFilter::All),
            Some(label) => Category::from_label(label)
                .map(CategoryFilter::Only)
                .ok_or_else(|| AlertError::Validation(format!("unknown category '{label}'"))),
        }
    }

    pub fn matches(self, alert: &ResolvedAlert) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => alert.category == category,
        }
    }

    pub fn apply(self, resolved: &[ResolvedAlert]) -> Vec<ResolvedAlert> {
        resolved.iter().filter(|alert| self.matches(alert)).cloned().collect()
    }
}
