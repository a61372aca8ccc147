use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use serde_json::json;
use validator::Validate;

use super::{created, list_response};
use crate::dto::{CrearPagoRequest, RangoFechasQuery};
use crate::models::{Pago, PatchPago};
use crate::repositories::PgStore;
use crate::services::PagoService;
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_pago_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_pagos).post(create_pago))
        .route("/detalle", get(list_detalle))
        .route("/rango", get(list_between))
        .route("/metodo/:metodo", get(list_by_metodo))
        .route(
            "/registro/:registro_id",
            get(get_by_registro).delete(delete_by_registro),
        )
        .route("/registro/:registro_id/existe", get(exists_for_registro))
        .route(
            "/:id",
            get(get_pago)
                .put(update_pago)
                .patch(patch_pago)
                .delete(delete_pago),
        )
}

fn service<'a>(state: &AppState, store: &'a mut PgStore) -> PagoService<'a, PgStore> {
    PagoService::new(store).with_tarifa(state.tarifa())
}

/// Cobra un registro cerrado; el monto lo calcula la tarifa
async fn create_pago(
    State(state): State<AppState>,
    Json(request): Json<CrearPagoRequest>,
) -> AppResult<Response> {
    request.validate()?;
    let mut store = state.store().await?;
    let pago = service(&state, &mut store)
        .create_payment(request.registro_id, &request.metodo)
        .await?;
    store.commit().await?;
    Ok(created(pago))
}

async fn list_pagos(State(state): State<AppState>) -> AppResult<Response> {
    let mut store = state.store().await?;
    let pagos = service(&state, &mut store).find_all().await?;
    store.commit().await?;
    Ok(list_response(pagos))
}

async fn list_detalle(State(state): State<AppState>) -> AppResult<Response> {
    let mut store = state.store().await?;
    let detalle = service(&state, &mut store).find_detalle().await?;
    store.commit().await?;
    Ok(list_response(detalle))
}

async fn list_between(
    State(state): State<AppState>,
    Query(rango): Query<RangoFechasQuery>,
) -> AppResult<Response> {
    rango.check()?;
    let mut store = state.store().await?;
    let pagos = service(&state, &mut store)
        .find_between(rango.desde, rango.hasta)
        .await?;
    store.commit().await?;
    Ok(list_response(pagos))
}

async fn list_by_metodo(
    State(state): State<AppState>,
    Path(metodo): Path<String>,
) -> AppResult<Response> {
    let mut store = state.store().await?;
    let pagos = service(&state, &mut store).find_by_metodo(&metodo).await?;
    store.commit().await?;
    Ok(list_response(pagos))
}

async fn get_by_registro(
    State(state): State<AppState>,
    Path(registro_id): Path<i64>,
) -> AppResult<Json<Pago>> {
    let mut store = state.store().await?;
    let pago = service(&state, &mut store)
        .find_by_registro(registro_id)
        .await?;
    store.commit().await?;
    Ok(Json(pago))
}

async fn exists_for_registro(
    State(state): State<AppState>,
    Path(registro_id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    let mut store = state.store().await?;
    let existe = service(&state, &mut store)
        .exists_for_registro(registro_id)
        .await?;
    store.commit().await?;
    Ok(Json(json!({ "registro_id": registro_id, "existe": existe })))
}

async fn delete_by_registro(
    State(state): State<AppState>,
    Path(registro_id): Path<i64>,
) -> AppResult<StatusCode> {
    let mut store = state.store().await?;
    service(&state, &mut store)
        .delete_by_registro(registro_id)
        .await?;
    store.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_pago(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Pago>> {
    let mut store = state.store().await?;
    let pago = service(&state, &mut store).find_by_id(id).await?;
    store.commit().await?;
    Ok(Json(pago))
}

async fn update_pago(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(pago): Json<Pago>,
) -> AppResult<Json<Pago>> {
    let mut store = state.store().await?;
    let pago = service(&state, &mut store).update(id, pago).await?;
    store.commit().await?;
    Ok(Json(pago))
}

async fn patch_pago(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<PatchPago>,
) -> AppResult<Json<Pago>> {
    let mut store = state.store().await?;
    let pago = service(&state, &mut store).patch(id, patch).await?;
    store.commit().await?;
    Ok(Json(pago))
}

async fn delete_pago(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    let mut store = state.store().await?;
    service(&state, &mut store).delete(id).await?;
    store.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}
