use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::{created, list_response};
use crate::models::{Comuna, PatchComuna};
use crate::services::ComunaService;
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_comuna_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_comunas).post(create_comuna))
        .route("/buscar", get(search_comunas))
        .route("/codigo/:codigo", get(get_comuna_by_codigo))
        .route("/region/:region_id", get(list_by_region))
        .route(
            "/:id",
            get(get_comuna)
                .put(update_comuna)
                .patch(patch_comuna)
                .delete(delete_comuna),
        )
}

#[derive(Debug, Deserialize)]
struct BuscarComunaQuery {
    nombre: String,
    region_id: i64,
}

async fn list_comunas(State(state): State<AppState>) -> AppResult<Response> {
    let mut store = state.store().await?;
    let comunas = ComunaService::new(&mut store).find_all().await?;
    store.commit().await?;
    Ok(list_response(comunas))
}

async fn get_comuna(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Comuna>> {
    let mut store = state.store().await?;
    let comuna = ComunaService::new(&mut store).find_by_id(id).await?;
    store.commit().await?;
    Ok(Json(comuna))
}

async fn get_comuna_by_codigo(
    State(state): State<AppState>,
    Path(codigo): Path<i64>,
) -> AppResult<Json<Comuna>> {
    let mut store = state.store().await?;
    let comuna = ComunaService::new(&mut store).find_by_codigo(codigo).await?;
    store.commit().await?;
    Ok(Json(comuna))
}

async fn list_by_region(
    State(state): State<AppState>,
    Path(region_id): Path<i64>,
) -> AppResult<Response> {
    let mut store = state.store().await?;
    let comunas = ComunaService::new(&mut store)
        .find_by_region(region_id)
        .await?;
    store.commit().await?;
    Ok(list_response(comunas))
}

async fn search_comunas(
    State(state): State<AppState>,
    Query(query): Query<BuscarComunaQuery>,
) -> AppResult<Response> {
    let mut store = state.store().await?;
    let comunas = ComunaService::new(&mut store)
        .find_by_nombre_and_region(&query.nombre, query.region_id)
        .await?;
    store.commit().await?;
    Ok(list_response(comunas))
}

async fn create_comuna(
    State(state): State<AppState>,
    Json(mut comuna): Json<Comuna>,
) -> AppResult<Response> {
    comuna.id = 0;
    let mut store = state.store().await?;
    let comuna = ComunaService::new(&mut store).save(comuna).await?;
    store.commit().await?;
    Ok(created(comuna))
}

async fn update_comuna(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(comuna): Json<Comuna>,
) -> AppResult<Json<Comuna>> {
    let mut store = state.store().await?;
    let comuna = ComunaService::new(&mut store).update(id, comuna).await?;
    store.commit().await?;
    Ok(Json(comuna))
}

async fn patch_comuna(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<PatchComuna>,
) -> AppResult<Json<Comuna>> {
    let mut store = state.store().await?;
    let comuna = ComunaService::new(&mut store).patch(id, patch).await?;
    store.commit().await?;
    Ok(Json(comuna))
}

async fn delete_comuna(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let mut store = state.store().await?;
    ComunaService::new(&mut store).delete(id).await?;
    store.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}
