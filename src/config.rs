use crate::geocoder::DEFAULT_NOMINATIM_URL;
use crate::upstream::DEFAULT_UPSTREAM_URL;
use std::{env, path::PathBuf};

pub const DEFAULT_PORT: u16 = 8080;

/// Service settings, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub upstream_url: String,
    pub coords_path: PathBuf,
    pub apartments_path: PathBuf,
    pub nominatim_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            port,
            upstream_url: lookup("ALERTS_UPSTREAM_URL")
                .unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string()),
            coords_path: lookup("COORDS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/coord.csv")),
            apartments_path: lookup("APARTMENTS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/apartments.json")),
            nominatim_url: lookup("NOMINATIM_URL")
                .unwrap_or_else(|| DEFAULT_NOMINATIM_URL.to_string()),
        }
    }
}
