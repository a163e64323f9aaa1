use crate::apartments::ApartmentBook;
use crate::coords::CoordinateTable;
use crate::geocoder::NominatimClient;
use crate::upstream::OrefClient;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub upstream: OrefClient,
    pub geocoder: NominatimClient,
    pub coords: Arc<CoordinateTable>,
    pub apartments_path: PathBuf,
    pub apartments: Arc<Mutex<ApartmentBook>>,
}

impl AppState {
    pub fn new(
        upstream: OrefClient,
        geocoder: NominatimClient,
        coords: CoordinateTable,
        apartments_path: PathBuf,
        apartments: ApartmentBook,
    ) -> Self {
        Self {
            upstream,
            geocoder,
            coords: Arc::new(coords),
            apartments_path,
            apartments: Arc::new(Mutex::new(apartments)),
        }
    }
}
