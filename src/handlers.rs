use crate::aggregate::{resolve, CategoryFilter};
use crate::errors::{AlertError, AppError};
use crate::fetcher::{fetch_range, DateRange};
use crate::geo::{find_nearest, NEAREST_THRESHOLD_METERS};
use crate::models::{
    AlertView, AlertsQuery, ApartmentView, LatLon, ListQuery, NearestRequest, NewApartment,
    NoteRequest, PositionQuery, RawAlert, ResolvedAlert, SuggestQuery, UploadQuery, ViewQuery,
};
use crate::state::AppState;
use crate::stats::{build_view, DEFAULT_TOP_N};
use crate::storage::persist_apartments;
use axum::{
    body::Bytes,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::{error, info};

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "status": "ok", "coordinates": state.coords.len() }))
}

pub async fn get_alerts(
    State(state): State<AppState>,
    query: Result<Query<AlertsQuery>, QueryRejection>,
) -> Result<Json<Vec<RawAlert>>, AppError> {
    let Query(query) = query?;
    info!(
        "received request with fromDate: {:?}, toDate: {:?}",
        query.from_date, query.to_date
    );
    let range = DateRange::parse(query.from_date.as_deref(), query.to_date.as_deref())?;
    let alerts = fetch_alerts(&state, range).await?;
    info!("returning {} total alerts", alerts.len());
    Ok(Json(alerts))
}

pub async fn get_alert_view(
    State(state): State<AppState>,
    query: Result<Query<ViewQuery>, QueryRejection>,
) -> Result<Json<AlertView>, AppError> {
    let Query(query) = query?;
    let range = DateRange::parse(query.from_date.as_deref(), query.to_date.as_deref())?;
    let filter = CategoryFilter::parse(query.category.as_deref())?;
    let raws = fetch_alerts(&state, range).await?;
    let resolved = resolve(&raws, &state.coords);
    Ok(Json(build_view(&resolved, filter, query.top.unwrap_or(DEFAULT_TOP_N))))
}

pub async fn upload_alerts(
    State(state): State<AppState>,
    query: Result<Query<UploadQuery>, QueryRejection>,
    body: Bytes,
) -> Result<Json<AlertView>, AppError> {
    let Query(query) = query?;
    if body.is_empty() {
        return Err(AppError::bad_request("no file uploaded"));
    }
    let filter = CategoryFilter::parse(query.category.as_deref())?;
    let raws: Vec<RawAlert> = serde_json::from_slice(&body).map_err(|err| {
        error!("failed to parse uploaded alerts: {err}");
        AlertError::Parse(format!(
            "failed to parse the uploaded file, please ensure it's a valid JSON file: {err}"
        ))
    })?;
    let resolved = resolve(&raws, &state.coords);
    info!("uploaded {} alerts, {} resolved", raws.len(), resolved.len());
    Ok(Json(build_view(&resolved, filter, query.top.unwrap_or(DEFAULT_TOP_N))))
}

pub async fn nearest_alert(
    payload: Result<Json<NearestRequest>, JsonRejection>,
) -> Result<Json<Option<ResolvedAlert>>, AppError> {
    let Json(payload) = payload?;
    let click = LatLon::new(payload.lat, payload.lon);
    let max_distance = payload.max_distance_meters.unwrap_or(NEAREST_THRESHOLD_METERS);
    Ok(Json(find_nearest(click, &payload.points, max_distance).cloned()))
}

async fn fetch_alerts(state: &AppState, range: DateRange) -> Result<Vec<RawAlert>, AppError> {
    fetch_range(&state.upstream, range).await.map_err(|err| {
        error!("error fetching alerts: {err}");
        AppError::internal("Failed to fetch alerts")
    })
}

pub async fn list_apartments(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<ApartmentView>>, AppError> {
    let Query(query) = query?;
    let book = state.apartments.lock().await;
    let listings = book
        .search(query.q.as_deref().unwrap_or_default())
        .into_iter()
        .cloned()
        .map(ApartmentView::from)
        .collect();
    Ok(Json(listings))
}

pub async fn add_apartment(
    State(state): State<AppState>,
    form: Result<Json<NewApartment>, JsonRejection>,
) -> Result<(StatusCode, Json<ApartmentView>), AppError> {
    let Json(form) = form?;
    if form.address.trim().is_empty() {
        return Err(AlertError::Validation("address is required".to_string()).into());
    }

    let position = state
        .geocoder
        .geocode(form.address.trim())
        .await?
        .ok_or_else(|| AlertError::NoMatch("Could not find coordinates for the given address".to_string()))?;

    let mut book = state.apartments.lock().await;
    let added = book.add(form, position)?.clone();
    persist_apartments(&state.apartments_path, book.list()).await?;
    info!("added apartment {} at {}", added.id, added.address);
    Ok((StatusCode::CREATED, Json(added.into())))
}

pub async fn remove_apartment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut book = state.apartments.lock().await;
    if !book.remove(&id) {
        return Err(AlertError::NotFound(format!("apartment {id}")).into());
    }
    persist_apartments(&state.apartments_path, book.list()).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<NoteRequest>, JsonRejection>,
) -> Result<Json<ApartmentView>, AppError> {
    let Json(payload) = payload?;
    let mut book = state.apartments.lock().await;
    let updated = book.add_note(&id, &payload.note)?.clone();
    persist_apartments(&state.apartments_path, book.list()).await?;
    Ok(Json(updated.into()))
}

pub async fn toggle_relevance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApartmentView>, AppError> {
    let mut book = state.apartments.lock().await;
    let updated = book.toggle_relevance(&id)?.clone();
    persist_apartments(&state.apartments_path, book.list()).await?;
    Ok(Json(updated.into()))
}

pub async fn nearest_apartment(
    State(state): State<AppState>,
    query: Result<Query<PositionQuery>, QueryRejection>,
) -> Result<Json<Option<ApartmentView>>, AppError> {
    let Query(query) = query?;
    let book = state.apartments.lock().await;
    let click = LatLon::new(query.lat, query.lon);
    let nearest = find_nearest(click, book.list(), NEAREST_THRESHOLD_METERS).cloned();
    Ok(Json(nearest.map(ApartmentView::from)))
}

pub async fn suggest_addresses(
    State(state): State<AppState>,
    query: Result<Query<SuggestQuery>, QueryRejection>,
) -> Result<Json<Vec<String>>, AppError> {
    let Query(query) = query?;
    let suggestions = state.geocoder.suggest(&query.q).await?;
    Ok(Json(suggestions))
}
