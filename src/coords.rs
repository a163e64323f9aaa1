//! Place name → coordinate lookup table, loaded once from a `loc,lat,long` CSV.

use crate::errors::AlertError;
use crate::models::LatLon;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

const REQUIRED_COLUMNS: [&str; 3] = ["loc", "lat", "long"];

#[derive(Debug, Deserialize)]
struct CoordRow {
    loc: String,
    lat: String,
    long: String,
}

#[derive(Debug, Clone, Default)]
pub struct CoordinateTable {
    entries: HashMap<String, LatLon>,
}

impl CoordinateTable {
    /// Reads a `loc,lat,long` table. A missing column fails the load; a row
    /// with an unusable coordinate is skipped with a warning.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, AlertError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|err| AlertError::Parse(format!("coordinate header: {err}")))?;
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|header| header == column) {
                return Err(AlertError::Parse(format!(
                    "coordinate header is missing the '{column}' column"
                )));
            }
        }

        let mut entries = HashMap::new();
        let mut skipped = 0usize;
        for (index, row) in reader.deserialize::<CoordRow>().enumerate() {
            // Header is line 1.
            let line = index + 2;
            let Some((name, pos)) = parse_row(row, line) else {
                skipped += 1;
                continue;
            };
            if entries.insert(name.clone(), pos).is_some() {
                warn!("duplicate coordinate entry for '{name}' on line {line}, keeping the later one");
            }
        }
        if skipped > 0 {
            warn!("skipped {skipped} unusable coordinate rows");
        }

        Ok(Self { entries })
    }

    pub fn load(path: &Path) -> Result<Self, AlertError> {
        let file = std::fs::File::open(path)?;
        let table = Self::from_csv_reader(file)?;
        info!("loaded {} coordinates from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn get(&self, name: &str) -> Option<LatLon> {
        self.entries.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, LatLon)> for CoordinateTable {
    fn from_iter<I: IntoIterator<Item = (K, LatLon)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(name, pos)| (name.into(), pos)).collect(),
        }
    }
}

fn parse_row(row: Result<CoordRow, csv::Error>, line: usize) -> Option<(String, LatLon)> {
    let row = match row {
        Ok(row) => row,
        Err(err) => {
            warn!("skipping coordinate row {line}: {err}");
            return None;
        }
    };
    if row.loc.is_empty() {
        warn!("skipping coordinate row {line}: empty loc");
        return None;
    }
    let lat = parse_coordinate(&row.lat, "lat", line)?;
    let lon = parse_coordinate(&row.long, "long", line)?;
    Some((row.loc, LatLon::new(lat, lon)))
}

fn parse_coordinate(value: &str, column: &str, line: usize) -> Option<f64> {
    let parsed = value.parse::<f64>().ok().filter(|v| v.is_finite());
    if parsed.is_none() {
        warn!("skipping coordinate row {line}: invalid {column} '{value}'");
    }
    parsed
}
