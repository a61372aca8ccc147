use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};

use super::{created, list_response};
use crate::models::{Auto, PatchAuto};
use crate::services::AutoService;
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_auto_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_autos).post(create_auto))
        .route("/patente/:patente", get(get_auto_by_patente))
        .route("/usuario/:usuario_id", get(list_by_usuario))
        .route(
            "/:id",
            get(get_auto)
                .put(update_auto)
                .patch(patch_auto)
                .delete(delete_auto),
        )
}

async fn list_autos(State(state): State<AppState>) -> AppResult<Response> {
    let mut store = state.store().await?;
    let autos = AutoService::new(&mut store).find_all().await?;
    store.commit().await?;
    Ok(list_response(autos))
}

async fn get_auto(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Auto>> {
    let mut store = state.store().await?;
    let auto = AutoService::new(&mut store).find_by_id(id).await?;
    store.commit().await?;
    Ok(Json(auto))
}

async fn get_auto_by_patente(
    State(state): State<AppState>,
    Path(patente): Path<String>,
) -> AppResult<Json<Auto>> {
    let mut store = state.store().await?;
    let auto = AutoService::new(&mut store).find_by_patente(&patente).await?;
    store.commit().await?;
    Ok(Json(auto))
}

async fn list_by_usuario(
    State(state): State<AppState>,
    Path(usuario_id): Path<i64>,
) -> AppResult<Response> {
    let mut store = state.store().await?;
    let autos = AutoService::new(&mut store)
        .find_by_usuario(usuario_id)
        .await?;
    store.commit().await?;
    Ok(list_response(autos))
}

async fn create_auto(
    State(state): State<AppState>,
    Json(mut auto): Json<Auto>,
) -> AppResult<Response> {
    auto.id = 0;
    let mut store = state.store().await?;
    let auto = AutoService::new(&mut store).save(auto).await?;
    store.commit().await?;
    Ok(created(auto))
}

async fn update_auto(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(auto): Json<Auto>,
) -> AppResult<Json<Auto>> {
    let mut store = state.store().await?;
    let auto = AutoService::new(&mut store).update(id, auto).await?;
    store.commit().await?;
    Ok(Json(auto))
}

async fn patch_auto(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<PatchAuto>,
) -> AppResult<Json<Auto>> {
    let mut store = state.store().await?;
    let auto = AutoService::new(&mut store).patch(id, patch).await?;
    store.commit().await?;
    Ok(Json(auto))
}

async fn delete_auto(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    let mut store = state.store().await?;
    AutoService::new(&mut store).delete(id).await?;
    store.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}
