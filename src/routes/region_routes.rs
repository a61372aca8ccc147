use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};

use super::{created, list_response};
use crate::models::{PatchRegion, Region};
use crate::services::RegionService;
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_region_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_regiones).post(create_region))
        .route("/nombre/:nombre", get(get_region_by_nombre))
        .route(
            "/:id",
            get(get_region)
                .put(update_region)
                .patch(patch_region)
                .delete(delete_region),
        )
}

async fn list_regiones(State(state): State<AppState>) -> AppResult<Response> {
    let mut store = state.store().await?;
    let regiones = RegionService::new(&mut store).find_all().await?;
    store.commit().await?;
    Ok(list_response(regiones))
}

async fn get_region(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Region>> {
    let mut store = state.store().await?;
    let region = RegionService::new(&mut store).find_by_id(id).await?;
    store.commit().await?;
    Ok(Json(region))
}

async fn get_region_by_nombre(
    State(state): State<AppState>,
    Path(nombre): Path<String>,
) -> AppResult<Json<Region>> {
    let mut store = state.store().await?;
    let region = RegionService::new(&mut store).find_by_nombre(&nombre).await?;
    store.commit().await?;
    Ok(Json(region))
}

async fn create_region(
    State(state): State<AppState>,
    Json(mut region): Json<Region>,
) -> AppResult<Response> {
    region.id = 0;
    let mut store = state.store().await?;
    let region = RegionService::new(&mut store).save(region).await?;
    store.commit().await?;
    Ok(created(region))
}

async fn update_region(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(region): Json<Region>,
) -> AppResult<Json<Region>> {
    let mut store = state.store().await?;
    let region = RegionService::new(&mut store).update(id, region).await?;
    store.commit().await?;
    Ok(Json(region))
}

async fn patch_region(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<PatchRegion>,
) -> AppResult<Json<Region>> {
    let mut store = state.store().await?;
    let region = RegionService::new(&mut store).patch(id, patch).await?;
    store.commit().await?;
    Ok(Json(region))
}

async fn delete_region(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let mut store = state.store().await?;
    RegionService::new(&mut store).delete(id).await?;
    store.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}
