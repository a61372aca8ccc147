use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};

use super::{created, list_response};
use crate::dto::RangoFechasQuery;
use crate::models::{PatchRegistro, Registro};
use crate::services::RegistroService;
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, AppResult};
use crate::utils::validation::validate_date;

pub fn create_registro_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_registros).post(create_registro))
        .route("/activos", get(list_activos))
        .route("/rango", get(list_between))
        .route("/fecha/:fecha", get(list_by_fecha))
        .route("/patente/:patente", get(list_by_patente))
        .route(
            "/:id",
            get(get_registro)
                .put(update_registro)
                .patch(patch_registro)
                .delete(delete_registro),
        )
}

async fn list_registros(State(state): State<AppState>) -> AppResult<Response> {
    let mut store = state.store().await?;
    let registros = RegistroService::new(&mut store).find_all().await?;
    store.commit().await?;
    Ok(list_response(registros))
}

async fn list_activos(State(state): State<AppState>) -> AppResult<Response> {
    let mut store = state.store().await?;
    let registros = RegistroService::new(&mut store).find_activos().await?;
    store.commit().await?;
    Ok(list_response(registros))
}

async fn list_between(
    State(state): State<AppState>,
    Query(rango): Query<RangoFechasQuery>,
) -> AppResult<Response> {
    rango.check()?;
    let mut store = state.store().await?;
    let registros = RegistroService::new(&mut store)
        .find_between(rango.desde, rango.hasta)
        .await?;
    store.commit().await?;
    Ok(list_response(registros))
}

async fn list_by_fecha(
    State(state): State<AppState>,
    Path(fecha): Path<String>,
) -> AppResult<Response> {
    let fecha = validate_date(&fecha)
        .map_err(|_| bad_request_error("fecha inválida, se espera YYYY-MM-DD"))?;
    let mut store = state.store().await?;
    let registros = RegistroService::new(&mut store).find_by_fecha(fecha).await?;
    store.commit().await?;
    Ok(list_response(registros))
}

async fn list_by_patente(
    State(state): State<AppState>,
    Path(patente): Path<String>,
) -> AppResult<Response> {
    let mut store = state.store().await?;
    let registros = RegistroService::new(&mut store)
        .find_by_patente(&patente)
        .await?;
    store.commit().await?;
    Ok(list_response(registros))
}

async fn get_registro(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Registro>> {
    let mut store = state.store().await?;
    let registro = RegistroService::new(&mut store).find_by_id(id).await?;
    store.commit().await?;
    Ok(Json(registro))
}

async fn create_registro(
    State(state): State<AppState>,
    Json(mut registro): Json<Registro>,
) -> AppResult<Response> {
    registro.id = 0;
    let mut store = state.store().await?;
    let registro = RegistroService::new(&mut store).save(registro).await?;
    store.commit().await?;
    Ok(created(registro))
}

async fn update_registro(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(registro): Json<Registro>,
) -> AppResult<Json<Registro>> {
    let mut store = state.store().await?;
    let registro = RegistroService::new(&mut store).update(id, registro).await?;
    store.commit().await?;
    Ok(Json(registro))
}

async fn patch_registro(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<PatchRegistro>,
) -> AppResult<Json<Registro>> {
    let mut store = state.store().await?;
    let registro = RegistroService::new(&mut store).patch(id, patch).await?;
    store.commit().await?;
    Ok(Json(registro))
}

async fn delete_registro(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let mut store = state.store().await?;
    RegistroService::new(&mut store).delete(id).await?;
    store.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}
