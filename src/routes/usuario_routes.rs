use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::{created, list_response};
use crate::models::{PatchUsuario, Usuario};
use crate::repositories::PgStore;
use crate::services::UsuarioService;
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_usuario_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_usuarios).post(create_usuario))
        .route("/buscar", get(search_usuarios))
        .route("/correo/:correo", get(get_usuario_by_correo))
        .route(
            "/:id",
            get(get_usuario)
                .put(update_usuario)
                .patch(patch_usuario)
                .delete(delete_usuario),
        )
}

#[derive(Debug, Deserialize)]
struct BuscarUsuarioQuery {
    nombre: String,
}

fn service<'a>(state: &AppState, store: &'a mut PgStore) -> UsuarioService<'a, PgStore> {
    UsuarioService::new(store).with_hash_cost(state.config.bcrypt_cost)
}

async fn list_usuarios(State(state): State<AppState>) -> AppResult<Response> {
    let mut store = state.store().await?;
    let usuarios = service(&state, &mut store).find_all().await?;
    store.commit().await?;
    Ok(list_response(usuarios))
}

async fn get_usuario(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Usuario>> {
    let mut store = state.store().await?;
    let usuario = service(&state, &mut store).find_by_id(id).await?;
    store.commit().await?;
    Ok(Json(usuario))
}

async fn get_usuario_by_correo(
    State(state): State<AppState>,
    Path(correo): Path<String>,
) -> AppResult<Json<Usuario>> {
    let mut store = state.store().await?;
    let usuario = service(&state, &mut store).find_by_correo(&correo).await?;
    store.commit().await?;
    Ok(Json(usuario))
}

async fn search_usuarios(
    State(state): State<AppState>,
    Query(query): Query<BuscarUsuarioQuery>,
) -> AppResult<Response> {
    let mut store = state.store().await?;
    let usuarios = service(&state, &mut store)
        .find_by_nombre(&query.nombre)
        .await?;
    store.commit().await?;
    Ok(list_response(usuarios))
}

async fn create_usuario(
    State(state): State<AppState>,
    Json(mut usuario): Json<Usuario>,
) -> AppResult<Response> {
    usuario.id = 0;
    let mut store = state.store().await?;
    let usuario = service(&state, &mut store).save(usuario).await?;
    store.commit().await?;
    Ok(created(usuario))
}

async fn update_usuario(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(usuario): Json<Usuario>,
) -> AppResult<Json<Usuario>> {
    let mut store = state.store().await?;
    let usuario = service(&state, &mut store).update(id, usuario).await?;
    store.commit().await?;
    Ok(Json(usuario))
}

async fn patch_usuario(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<PatchUsuario>,
) -> AppResult<Json<Usuario>> {
    let mut store = state.store().await?;
    let usuario = service(&state, &mut store).patch(id, patch).await?;
    store.commit().await?;
    Ok(Json(usuario))
}

async fn delete_usuario(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let mut store = state.store().await?;
    service(&state, &mut store).delete(id).await?;
    store.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}
