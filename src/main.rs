use alert_map::{
    load_apartments, router, ApartmentBook, AppState, Config, CoordinateTable, NominatimClient,
    OrefClient,
};
use std::net::SocketAddr;
use tokio::fs;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();

    let coords = match CoordinateTable::load(&config.coords_path) {
        Ok(table) => table,
        Err(err) => {
            error!("error loading {}: {err}", config.coords_path.display());
            warn!("continuing without coordinates; alerts will not resolve");
            CoordinateTable::default()
        }
    };

    if let Some(parent) = config.apartments_path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let apartments = load_apartments(&config.apartments_path).await;
    info!("loaded {} apartments", apartments.len());

    let state = AppState::new(
        OrefClient::new(config.upstream_url.clone()),
        NominatimClient::new(config.nominatim_url.clone()),
        coords,
        config.apartments_path.clone(),
        ApartmentBook::new(apartments),
    );
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
