use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::{created, list_response};
use crate::models::{PatchSucursal, Sucursal};
use crate::services::SucursalService;
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, AppResult};

pub fn create_sucursal_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sucursales).post(create_sucursal))
        .route("/buscar", get(search_sucursales))
        .route("/comuna/:comuna_id", get(list_by_comuna))
        .route(
            "/:id",
            get(get_sucursal)
                .put(update_sucursal)
                .patch(patch_sucursal)
                .delete(delete_sucursal),
        )
}

/// `?nombre=...`, `?direccion=...` o `?nombre=...&comuna_id=...`
#[derive(Debug, Deserialize)]
struct BuscarSucursalQuery {
    nombre: Option<String>,
    direccion: Option<String>,
    comuna_id: Option<i64>,
}

async fn list_sucursales(State(state): State<AppState>) -> AppResult<Response> {
    let mut store = state.store().await?;
    let sucursales = SucursalService::new(&mut store).find_all().await?;
    store.commit().await?;
    Ok(list_response(sucursales))
}

async fn get_sucursal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Sucursal>> {
    let mut store = state.store().await?;
    let sucursal = SucursalService::new(&mut store).find_by_id(id).await?;
    store.commit().await?;
    Ok(Json(sucursal))
}

async fn list_by_comuna(
    State(state): State<AppState>,
    Path(comuna_id): Path<i64>,
) -> AppResult<Response> {
    let mut store = state.store().await?;
    let sucursales = SucursalService::new(&mut store)
        .find_by_comuna(comuna_id)
        .await?;
    store.commit().await?;
    Ok(list_response(sucursales))
}

async fn search_sucursales(
    State(state): State<AppState>,
    Query(query): Query<BuscarSucursalQuery>,
) -> AppResult<Response> {
    let mut store = state.store().await?;
    let mut service = SucursalService::new(&mut store);
    let sucursales = match (query.nombre, query.direccion, query.comuna_id) {
        (Some(nombre), None, Some(comuna_id)) => {
            service.find_by_nombre_and_comuna(&nombre, comuna_id).await?
        }
        (Some(nombre), None, None) => service.find_by_nombre(&nombre).await?,
        (None, Some(direccion), None) => service.find_by_direccion(&direccion).await?,
        _ => {
            return Err(bad_request_error(
                "use 'nombre', 'direccion' o 'nombre' junto a 'comuna_id'",
            ))
        }
    };
    store.commit().await?;
    Ok(list_response(sucursales))
}

async fn create_sucursal(
    State(state): State<AppState>,
    Json(mut sucursal): Json<Sucursal>,
) -> AppResult<Response> {
    sucursal.id = 0;
    let mut store = state.store().await?;
    let sucursal = SucursalService::new(&mut store).save(sucursal).await?;
    store.commit().await?;
    Ok(created(sucursal))
}

async fn update_sucursal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(sucursal): Json<Sucursal>,
) -> AppResult<Json<Sucursal>> {
    let mut store = state.store().await?;
    let sucursal = SucursalService::new(&mut store).update(id, sucursal).await?;
    store.commit().await?;
    Ok(Json(sucursal))
}

async fn patch_sucursal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<PatchSucursal>,
) -> AppResult<Json<Sucursal>> {
    let mut store = state.store().await?;
    let sucursal = SucursalService::new(&mut store).patch(id, patch).await?;
    store.commit().await?;
    Ok(Json(sucursal))
}

async fn delete_sucursal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let mut store = state.store().await?;
    SucursalService::new(&mut store).delete(id).await?;
    store.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}
