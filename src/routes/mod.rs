//! Rutas HTTP
//!
//! Cada handler abre una transacción, llama al servicio y confirma al final.
//! Si el servicio falla, la transacción se descarta sin confirmar.

pub mod auto_routes;
pub mod comuna_routes;
pub mod estacionamiento_routes;
pub mod pago_routes;
pub mod region_routes;
pub mod registro_routes;
pub mod sucursal_routes;
pub mod usuario_routes;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;

use crate::state::AppState;

/// Router completo de la API, sin capas de CORS ni trazas
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v2/regiones", region_routes::create_region_router())
        .nest("/api/v2/comunas", comuna_routes::create_comuna_router())
        .nest("/api/v2/sucursales", sucursal_routes::create_sucursal_router())
        .nest(
            "/api/v2/estacionamientos",
            estacionamiento_routes::create_estacionamiento_router(),
        )
        .nest("/api/v2/autos", auto_routes::create_auto_router())
        .nest("/api/v2/usuarios", usuario_routes::create_usuario_router())
        .nest("/api/v2/registros", registro_routes::create_registro_router())
        .nest("/api/v2/pagos", pago_routes::create_pago_router())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Listado: `204 No Content` cuando no hay elementos
pub(crate) fn list_response<T: Serialize>(items: Vec<T>) -> Response {
    if items.is_empty() {
        return StatusCode::NO_CONTENT.into_response();
    }
    Json(items).into_response()
}

pub(crate) fn created<T: Serialize>(item: T) -> Response {
    (StatusCode::CREATED, Json(item)).into_response()
}
