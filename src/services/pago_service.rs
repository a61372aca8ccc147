//! Servicio de pagos
//!
//! Un registro admite a lo más un pago, y solo una vez cerrado: el monto
//! depende de la hora de salida.

use chrono::{DateTime, Utc};
use validator::{Validate, ValidationErrors};

use super::tarifa::Tarifa;
use crate::models::{Entidad, Pago, PagoDetalle, PatchPago, Registro};
use crate::repositories::ParkingStore;
use crate::utils::errors::{conflict_error, not_found_error, AppError, AppResult};
use crate::utils::validation::validate_non_negative;

pub const PAGO_DUPLICADO: &str = "El registro ya tiene un pago.";
pub const REGISTRO_ABIERTO: &str = "El registro sigue abierto.";

pub struct PagoService<'a, S: ParkingStore> {
    store: &'a mut S,
    tarifa: Tarifa,
}

impl<'a, S: ParkingStore> PagoService<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self {
            store,
            tarifa: Tarifa::default(),
        }
    }

    pub fn with_tarifa(mut self, tarifa: Tarifa) -> Self {
        self.tarifa = tarifa;
        self
    }

    pub async fn find_all(&mut self) -> AppResult<Vec<Pago>> {
        self.store.find_pagos().await
    }

    pub async fn find_by_id(&mut self, id: i64) -> AppResult<Pago> {
        self.store
            .find_pago(id)
            .await?
            .ok_or_else(|| not_found_error(Pago::RECURSO, id))
    }

    pub async fn find_by_metodo(&mut self, metodo: &str) -> AppResult<Vec<Pago>> {
        self.store.find_pagos_by_metodo(metodo).await
    }

    pub async fn find_between(
        &mut self,
        desde: DateTime<Utc>,
        hasta: DateTime<Utc>,
    ) -> AppResult<Vec<Pago>> {
        self.store.find_pagos_between(desde, hasta).await
    }

    pub async fn find_by_registro(&mut self, registro_id: i64) -> AppResult<Pago> {
        self.store
            .find_pago_by_registro(registro_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Pago del registro '{}' no encontrado",
                    registro_id
                ))
            })
    }

    pub async fn exists_for_registro(&mut self, registro_id: i64) -> AppResult<bool> {
        self.store.exists_pago_by_registro(registro_id).await
    }

    /// Pagos junto a la estadía y la patente que los originaron
    pub async fn find_detalle(&mut self) -> AppResult<Vec<PagoDetalle>> {
        self.store.find_pago_detalle().await
    }

    /// Cobra un registro cerrado según la tarifa vigente
    pub async fn create_payment(&mut self, registro_id: i64, metodo: &str) -> AppResult<Pago> {
        let registro = self
            .store
            .find_registro(registro_id)
            .await?
            .ok_or_else(|| not_found_error(Registro::RECURSO, registro_id))?;

        if self.store.exists_pago_by_registro(registro_id).await? {
            return Err(conflict_error(PAGO_DUPLICADO));
        }
        let salida = registro
            .hora_salida
            .ok_or_else(|| conflict_error(REGISTRO_ABIERTO))?;

        let pago = Pago {
            id: 0,
            fecha_pago: Utc::now(),
            monto: self.tarifa.calcular(registro.hora_llegada, salida),
            metodo: metodo.to_string(),
            registro_id,
        };
        pago.validate()?;

        let saved = self.store.save_pago(pago).await?;
        tracing::info!(
            "Pago {} de {} registrado para el registro {}",
            saved.id,
            saved.monto,
            registro_id
        );
        Ok(saved)
    }

    pub async fn save(&mut self, pago: Pago) -> AppResult<Pago> {
        pago.validate()?;
        if let Err(error) = validate_non_negative(pago.monto) {
            let mut errors = ValidationErrors::new();
            errors.add("monto", error);
            return Err(errors.into());
        }

        let registro = self
            .store
            .find_registro(pago.registro_id)
            .await?
            .ok_or_else(|| not_found_error(Registro::RECURSO, pago.registro_id))?;
        if let Some(otro) = self.store.find_pago_by_registro(pago.registro_id).await? {
            if otro.id != pago.id {
                return Err(conflict_error(PAGO_DUPLICADO));
            }
        }

        if registro.is_open() {
            return Err(conflict_error(REGISTRO_ABIERTO));
        }

        let saved = self.store.save_pago(pago).await?;
        tracing::info!("Pago {} guardado", saved.id);
        Ok(saved)
    }

    pub async fn update(&mut self, id: i64, mut pago: Pago) -> AppResult<Pago> {
        self.find_by_id(id).await?;
        pago.id = id;
        self.save(pago).await
    }

    pub async fn patch(&mut self, id: i64, patch: PatchPago) -> AppResult<Pago> {
        patch.validate()?;
        let mut pago = self.find_by_id(id).await?;
        patch.apply_to(&mut pago);
        self.save(pago).await
    }

    pub async fn delete(&mut self, id: i64) -> AppResult<()> {
        self.find_by_id(id).await?;
        self.store.delete_pago(id).await
    }

    pub async fn delete_by_registro(&mut self, registro_id: i64) -> AppResult<()> {
        if let Some(pago) = self.store.find_pago_by_registro(registro_id).await? {
            self.store.delete_pago(pago.id).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Auto, Usuario};
    use crate::repositories::MemoryStore;
    use chrono::Duration;
    use rust_decimal::Decimal;

    async fn registro(store: &mut MemoryStore, cerrado: bool) -> Registro {
        let usuario = store
            .save_usuario(Usuario {
                id: 0,
                run: "33333333".to_string(),
                nombre_completo: "luis soto".to_string(),
                correo: "luis@correo.cl".to_string(),
                password: "hash".to_string(),
            })
            .await
            .unwrap();
        let auto = store
            .save_auto(Auto {
                id: 0,
                patente: "PQRS34".to_string(),
                usuario_id: usuario.id,
            })
            .await
            .unwrap();
        let llegada = Utc::now() - Duration::minutes(90);
        let mut registro = Registro::open(auto.id, llegada);
        if cerrado {
            registro.hora_salida = Some(Utc::now());
        }
        store.save_registro(registro).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_payment_uses_tarifa() {
        let mut store = MemoryStore::new();
        let registro = registro(&mut store, true).await;
        let mut service = PagoService::new(&mut store)
            .with_tarifa(Tarifa::new(Decimal::new(1000, 0), Decimal::new(500, 0)));

        let pago = service.create_payment(registro.id, "debito").await.unwrap();

        assert_eq!(pago.monto, Decimal::new(2000, 0));
        assert_eq!(pago.metodo, "debito");
        assert!(service.exists_for_registro(registro.id).await.unwrap());
        assert_eq!(service.find_by_registro(registro.id).await.unwrap(), pago);
    }

    #[tokio::test]
    async fn test_second_payment_is_conflict() {
        let mut store = MemoryStore::new();
        let registro = registro(&mut store, true).await;
        let mut service = PagoService::new(&mut store);

        service.create_payment(registro.id, "efectivo").await.unwrap();
        let result = service.create_payment(registro.id, "efectivo").await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_open_registro_cannot_be_paid() {
        let mut store = MemoryStore::new();
        let registro = registro(&mut store, false).await;
        let mut service = PagoService::new(&mut store);

        let result = service.create_payment(registro.id, "efectivo").await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_missing_registro_is_not_found() {
        let mut store = MemoryStore::new();
        let mut service = PagoService::new(&mut store);

        let result = service.create_payment(404, "efectivo").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_negative_amount_is_rejected() {
        let mut store = MemoryStore::new();
        let registro = registro(&mut store, true).await;
        let mut service = PagoService::new(&mut store);

        let result = service
            .save(Pago {
                id: 0,
                fecha_pago: Utc::now(),
                monto: Decimal::new(-1, 0),
                metodo: "efectivo".to_string(),
                registro_id: registro.id,
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_save_on_open_registro_is_conflict() {
        let mut store = MemoryStore::new();
        let registro = registro(&mut store, false).await;
        let mut service = PagoService::new(&mut store);

        let result = service
            .save(Pago {
                id: 0,
                fecha_pago: Utc::now(),
                monto: Decimal::new(2000, 0),
                metodo: "efectivo".to_string(),
                registro_id: registro.id,
            })
            .await;

        match result {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, REGISTRO_ABIERTO),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_patch_metodo_keeps_other_fields() {
        let mut store = MemoryStore::new();
        let registro = registro(&mut store, true).await;
        let mut service = PagoService::new(&mut store);
        let pago = service.create_payment(registro.id, "efectivo").await.unwrap();

        let patched = service
            .patch(
                pago.id,
                PatchPago {
                    metodo: Some("transferencia".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(patched.metodo, "transferencia");
        assert_eq!(patched.monto, pago.monto);
        assert_eq!(patched.fecha_pago, pago.fecha_pago);
        assert_eq!(patched.registro_id, pago.registro_id);

        let missing = service
            .patch(
                pago.id + 1000,
                PatchPago {
                    metodo: Some("debito".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_patch_onto_paid_registro_is_conflict() {
        let mut store = MemoryStore::new();
        let primero = registro(&mut store, true).await;
        let mut segundo = Registro::open(primero.auto_id, Utc::now() - Duration::minutes(30));
        segundo.hora_salida = Some(Utc::now());
        let segundo = store.save_registro(segundo).await.unwrap();

        let mut service = PagoService::new(&mut store);
        service.create_payment(primero.id, "efectivo").await.unwrap();
        let otro = service.create_payment(segundo.id, "debito").await.unwrap();

        let result = service
            .patch(
                otro.id,
                PatchPago {
                    registro_id: Some(primero.id),
                    ..Default::default()
                },
            )
            .await;

        match result {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, PAGO_DUPLICADO),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(service.find_by_id(otro.id).await.unwrap().registro_id, segundo.id);
    }

    #[tokio::test]
    async fn test_detalle_and_filters() {
        let mut store = MemoryStore::new();
        let registro = registro(&mut store, true).await;
        let mut service = PagoService::new(&mut store);
        let pago = service.create_payment(registro.id, "credito").await.unwrap();

        let detalle = service.find_detalle().await.unwrap();
        assert_eq!(detalle.len(), 1);
        assert_eq!(detalle[0].patente, "PQRS34");
        assert_eq!(detalle[0].pago_id, pago.id);

        assert_eq!(service.find_by_metodo("credito").await.unwrap(), vec![pago.clone()]);
        let hoy = service
            .find_between(Utc::now() - Duration::hours(1), Utc::now() + Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(hoy, vec![pago]);

        service.delete_by_registro(registro.id).await.unwrap();
        assert!(!service.exists_for_registro(registro.id).await.unwrap());
    }
}
