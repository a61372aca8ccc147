use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

use super::{created, list_response};
use crate::dto::{EntradaRequest, SalidaRequest};
use crate::models::{Estacionamiento, PatchEstacionamiento};
use crate::services::{EstacionamientoService, OcupacionService};
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_estacionamiento_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_estacionamientos).post(create_estacionamiento))
        .route("/entrada", post(register_arrival))
        .route("/salida", post(register_departure))
        .route("/ocupados", get(list_occupied))
        .route("/libres", get(list_free))
        .route("/detalle", get(occupied_detail))
        .route("/numero/:numero", get(get_by_numero))
        .route("/patente/:patente", get(get_by_patente))
        .route("/sucursal/:sucursal_id", get(list_by_sucursal))
        .route("/sucursal/:sucursal_id/libres", get(list_free_by_sucursal))
        .route(
            "/:id",
            get(get_estacionamiento)
                .put(update_estacionamiento)
                .patch(patch_estacionamiento)
                .delete(delete_estacionamiento),
        )
}

async fn register_arrival(
    State(state): State<AppState>,
    Json(request): Json<EntradaRequest>,
) -> AppResult<Json<Estacionamiento>> {
    request.validate()?;
    let mut store = state.store().await?;
    let mut service = OcupacionService::new(&mut store);
    let estacionamiento = match request.sucursal_id {
        Some(sucursal_id) => {
            service
                .register_arrival_at_branch(&request.patente, sucursal_id, request.numero)
                .await?
        }
        None => service.register_arrival(&request.patente, request.numero).await?,
    };
    store.commit().await?;
    Ok(Json(estacionamiento))
}

async fn register_departure(
    State(state): State<AppState>,
    Json(request): Json<SalidaRequest>,
) -> AppResult<Json<Estacionamiento>> {
    request.validate()?;
    let mut store = state.store().await?;
    let estacionamiento = OcupacionService::new(&mut store)
        .register_departure(&request.patente)
        .await?;
    store.commit().await?;
    Ok(Json(estacionamiento))
}

async fn list_occupied(State(state): State<AppState>) -> AppResult<Response> {
    let mut store = state.store().await?;
    let ocupados = OcupacionService::new(&mut store).list_occupied().await?;
    store.commit().await?;
    Ok(list_response(ocupados))
}

async fn list_free(State(state): State<AppState>) -> AppResult<Response> {
    let mut store = state.store().await?;
    let libres = OcupacionService::new(&mut store).list_free().await?;
    store.commit().await?;
    Ok(list_response(libres))
}

async fn occupied_detail(State(state): State<AppState>) -> AppResult<Response> {
    let mut store = state.store().await?;
    let detalle = OcupacionService::new(&mut store).occupied_detail().await?;
    store.commit().await?;
    Ok(list_response(detalle))
}

async fn get_by_numero(
    State(state): State<AppState>,
    Path(numero): Path<i32>,
) -> AppResult<Json<Estacionamiento>> {
    let mut store = state.store().await?;
    let estacionamiento = OcupacionService::new(&mut store)
        .find_by_spot_number(numero)
        .await?;
    store.commit().await?;
    Ok(Json(estacionamiento))
}

async fn get_by_patente(
    State(state): State<AppState>,
    Path(patente): Path<String>,
) -> AppResult<Json<Estacionamiento>> {
    let mut store = state.store().await?;
    let estacionamiento = OcupacionService::new(&mut store)
        .find_by_vehicle_plate(&patente)
        .await?;
    store.commit().await?;
    Ok(Json(estacionamiento))
}

async fn list_by_sucursal(
    State(state): State<AppState>,
    Path(sucursal_id): Path<i64>,
) -> AppResult<Response> {
    let mut store = state.store().await?;
    let estacionamientos = OcupacionService::new(&mut store)
        .list_by_branch(sucursal_id)
        .await?;
    store.commit().await?;
    Ok(list_response(estacionamientos))
}

async fn list_free_by_sucursal(
    State(state): State<AppState>,
    Path(sucursal_id): Path<i64>,
) -> AppResult<Response> {
    let mut store = state.store().await?;
    let libres = OcupacionService::new(&mut store)
        .list_free_by_branch(sucursal_id)
        .await?;
    store.commit().await?;
    Ok(list_response(libres))
}

async fn list_estacionamientos(State(state): State<AppState>) -> AppResult<Response> {
    let mut store = state.store().await?;
    let estacionamientos = EstacionamientoService::new(&mut store).find_all().await?;
    store.commit().await?;
    Ok(list_response(estacionamientos))
}

async fn get_estacionamiento(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Estacionamiento>> {
    let mut store = state.store().await?;
    let estacionamiento = EstacionamientoService::new(&mut store).find_by_id(id).await?;
    store.commit().await?;
    Ok(Json(estacionamiento))
}

async fn create_estacionamiento(
    State(state): State<AppState>,
    Json(mut estacionamiento): Json<Estacionamiento>,
) -> AppResult<Response> {
    estacionamiento.id = 0;
    let mut store = state.store().await?;
    let estacionamiento = EstacionamientoService::new(&mut store)
        .save(estacionamiento)
        .await?;
    store.commit().await?;
    Ok(created(estacionamiento))
}

async fn update_estacionamiento(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(estacionamiento): Json<Estacionamiento>,
) -> AppResult<Json<Estacionamiento>> {
    let mut store = state.store().await?;
    let estacionamiento = EstacionamientoService::new(&mut store)
        .update(id, estacionamiento)
        .await?;
    store.commit().await?;
    Ok(Json(estacionamiento))
}

async fn patch_estacionamiento(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<PatchEstacionamiento>,
) -> AppResult<Json<Estacionamiento>> {
    let mut store = state.store().await?;
    let estacionamiento = EstacionamientoService::new(&mut store)
        .patch(id, patch)
        .await?;
    store.commit().await?;
    Ok(Json(estacionamiento))
}

async fn delete_estacionamiento(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let mut store = state.store().await?;
    EstacionamientoService::new(&mut store).delete(id).await?;
    store.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}
