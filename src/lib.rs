pub mod aggregate;
pub mod apartments;
pub mod app;
pub mod config;
pub mod coords;
pub mod errors;
pub mod fetcher;
pub mod geo;
pub mod geocoder;
pub mod handlers;
pub mod models;
pub mod state;
pub mod stats;
pub mod storage;
pub mod upstream;

pub use apartments::ApartmentBook;
pub use app::router;
pub use config::Config;
pub use coords::CoordinateTable;
pub use geocoder::NominatimClient;
pub use state::AppState;
pub use storage::load_apartments;
pub use upstream::OrefClient;
