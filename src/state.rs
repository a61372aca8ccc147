//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::PgStore;
use crate::services::Tarifa;
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self { pool, config }
    }

    /// Abrir una unidad de trabajo para un request
    pub async fn store(&self) -> AppResult<PgStore> {
        PgStore::begin(&self.pool).await
    }

    pub fn tarifa(&self) -> Tarifa {
        Tarifa::from(&self.config)
    }
}
