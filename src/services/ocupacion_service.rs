//! Entradas y salidas de autos
//!
//! Una entrada abre un registro y ocupa el estacionamiento; una salida cierra
//! el registro abierto del auto y libera el estacionamiento que ocupaba. Los
//! dos cambios se guardan en la misma unidad de trabajo.

use chrono::Utc;

use crate::models::{Auto, Estacionamiento, OcupacionDetalle, Registro};
use crate::repositories::ParkingStore;
use crate::utils::errors::{conflict_error, AppError, AppResult};

pub const AUTO_YA_ESTACIONADO: &str = "El auto ya se encuentra estacionado.";
pub const ESTACIONAMIENTO_OCUPADO: &str = "El estacionamiento ya esta ocupado.";

pub struct OcupacionService<'a, S: ParkingStore> {
    store: &'a mut S,
}

impl<'a, S: ParkingStore> OcupacionService<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// Estaciona el auto `patente` en el estacionamiento `numero`
    ///
    /// Si varias sucursales tienen ese número se usa el de menor id; para
    /// elegir sucursal está `register_arrival_at_branch`.
    pub async fn register_arrival(
        &mut self,
        patente: &str,
        numero: i32,
    ) -> AppResult<Estacionamiento> {
        let auto = self.find_auto(patente).await?;
        let estacionamiento = self.find_by_spot_number(numero).await?;
        self.park(auto, estacionamiento).await
    }

    /// Estaciona el auto `patente` en el estacionamiento `numero` de la sucursal indicada
    pub async fn register_arrival_at_branch(
        &mut self,
        patente: &str,
        sucursal_id: i64,
        numero: i32,
    ) -> AppResult<Estacionamiento> {
        let auto = self.find_auto(patente).await?;
        let estacionamiento = self
            .list_by_branch(sucursal_id)
            .await?
            .into_iter()
            .find(|e| e.numero == numero)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Estacionamiento número '{}' no encontrado en la sucursal '{}'",
                    numero, sucursal_id
                ))
            })?;
        self.park(auto, estacionamiento).await
    }

    /// Cierra la estadía del auto `patente` y libera su estacionamiento
    pub async fn register_departure(&mut self, patente: &str) -> AppResult<Estacionamiento> {
        let auto = self.find_auto(patente).await?;

        let mut registro = self
            .store
            .find_open_registro(auto.id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "No hay un registro abierto para la patente '{}'",
                    patente
                ))
            })?;
        let mut estacionamiento = self.find_by_vehicle_plate(patente).await?;

        registro.hora_salida = Some(Utc::now());
        let registro = self.store.save_registro(registro).await?;
        estacionamiento.release();
        let estacionamiento = self.store.save_estacionamiento(estacionamiento).await?;

        tracing::info!(
            "Salida: auto {} deja el estacionamiento {} (registro {})",
            patente,
            estacionamiento.numero,
            registro.id
        );
        Ok(estacionamiento)
    }

    pub async fn list_occupied(&mut self) -> AppResult<Vec<Estacionamiento>> {
        self.store.find_estacionamientos_by_ocupado(true).await
    }

    pub async fn list_free(&mut self) -> AppResult<Vec<Estacionamiento>> {
        self.store.find_estacionamientos_by_ocupado(false).await
    }

    pub async fn list_by_branch(&mut self, sucursal_id: i64) -> AppResult<Vec<Estacionamiento>> {
        self.store.find_estacionamientos_by_sucursal(sucursal_id).await
    }

    pub async fn list_free_by_branch(&mut self, sucursal_id: i64) -> AppResult<Vec<Estacionamiento>> {
        self.store.find_libres_by_sucursal(sucursal_id).await
    }

    pub async fn find_by_spot_number(&mut self, numero: i32) -> AppResult<Estacionamiento> {
        self.store
            .find_estacionamiento_by_numero(numero)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Estacionamiento número '{}' no encontrado", numero))
            })
    }

    pub async fn find_by_vehicle_plate(&mut self, patente: &str) -> AppResult<Estacionamiento> {
        self.store
            .find_estacionamiento_by_patente(patente)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "No hay un estacionamiento ocupado por la patente '{}'",
                    patente
                ))
            })
    }

    /// Número, patente y dueño de cada estacionamiento ocupado
    pub async fn occupied_detail(&mut self) -> AppResult<Vec<OcupacionDetalle>> {
        self.store.find_ocupacion_detalle().await
    }

    async fn park(
        &mut self,
        auto: Auto,
        mut estacionamiento: Estacionamiento,
    ) -> AppResult<Estacionamiento> {
        if self.store.find_open_registro(auto.id).await?.is_some() {
            return Err(conflict_error(AUTO_YA_ESTACIONADO));
        }
        if estacionamiento.ocupado {
            return Err(conflict_error(ESTACIONAMIENTO_OCUPADO));
        }

        let registro = self
            .store
            .save_registro(Registro::open(auto.id, Utc::now()))
            .await?;
        estacionamiento.occupy(auto.id);
        let estacionamiento = self.store.save_estacionamiento(estacionamiento).await?;

        tracing::info!(
            "Entrada: auto {} en estacionamiento {} de la sucursal {} (registro {})",
            auto.patente,
            estacionamiento.numero,
            estacionamiento.sucursal_id,
            registro.id
        );
        Ok(estacionamiento)
    }

    async fn find_auto(&mut self, patente: &str) -> AppResult<Auto> {
        self.store
            .find_auto_by_patente(patente)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Auto con patente '{}' no encontrado", patente)))
    }
}
