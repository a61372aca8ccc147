//! Servicio de registros de estadía

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use super::cascada_service::CascadaService;
use crate::models::{Auto, Entidad, PatchRegistro, Registro};
use crate::repositories::ParkingStore;
use crate::utils::errors::{bad_request_error, conflict_error, not_found_error, AppResult};

pub struct RegistroService<'a, S: ParkingStore> {
    store: &'a mut S,
}

impl<'a, S: ParkingStore> RegistroService<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    pub async fn find_all(&mut self) -> AppResult<Vec<Registro>> {
        self.store.find_registros().await
    }

    pub async fn find_by_id(&mut self, id: i64) -> AppResult<Registro> {
        self.store
            .find_registro(id)
            .await?
            .ok_or_else(|| not_found_error(Registro::RECURSO, id))
    }

    pub async fn find_by_patente(&mut self, patente: &str) -> AppResult<Vec<Registro>> {
        self.store.find_registros_by_patente(patente).await
    }

    /// Registros sin hora de salida
    pub async fn find_activos(&mut self) -> AppResult<Vec<Registro>> {
        self.store.find_registros_activos().await
    }

    pub async fn find_between(
        &mut self,
        desde: DateTime<Utc>,
        hasta: DateTime<Utc>,
    ) -> AppResult<Vec<Registro>> {
        self.store.find_registros_between(desde, hasta).await
    }

    /// Registros cuya llegada ocurrió durante el día indicado (UTC)
    pub async fn find_by_fecha(&mut self, fecha: NaiveDate) -> AppResult<Vec<Registro>> {
        let siguiente = fecha
            .succ_opt()
            .ok_or_else(|| bad_request_error("fecha fuera de rango"))?;
        let desde = Utc.from_utc_datetime(&fecha.and_time(NaiveTime::default()));
        let hasta = Utc.from_utc_datetime(&siguiente.and_time(NaiveTime::default()))
            - Duration::nanoseconds(1);
        self.find_between(desde, hasta).await
    }

    pub async fn save(&mut self, registro: Registro) -> AppResult<Registro> {
        registro.check_times()?;
        if self.store.find_auto(registro.auto_id).await?.is_none() {
            return Err(not_found_error(Auto::RECURSO, registro.auto_id));
        }
        if registro.is_open() {
            if let Some(abierto) = self.store.find_open_registro(registro.auto_id).await? {
                if abierto.id != registro.id {
                    return Err(conflict_error("El auto ya tiene un registro abierto."));
                }
            }
        }

        let saved = self.store.save_registro(registro).await?;
        tracing::info!("Registro {} guardado", saved.id);
        Ok(saved)
    }

    pub async fn update(&mut self, id: i64, mut registro: Registro) -> AppResult<Registro> {
        self.find_by_id(id).await?;
        registro.id = id;
        self.save(registro).await
    }

    pub async fn patch(&mut self, id: i64, patch: PatchRegistro) -> AppResult<Registro> {
        let mut registro = self.find_by_id(id).await?;
        patch.apply_to(&mut registro);
        self.save(registro).await
    }

    pub async fn delete(&mut self, id: i64) -> AppResult<()> {
        CascadaService::new(&mut *self.store).delete_registro(id).await
    }
}
