//! Servicio de estacionamientos (CRUD)
//!
//! Las entradas y salidas de autos viven en `ocupacion_service`.

use validator::Validate;

use super::cascada_service::CascadaService;
use crate::models::{Entidad, Estacionamiento, PatchEstacionamiento, Sucursal};
use crate::repositories::ParkingStore;
use crate::utils::errors::{conflict_error, not_found_error, AppResult};

pub const OCUPACION_SOLO_POR_ENTRADA_SALIDA: &str =
    "La ocupación se cambia con /entrada y /salida.";

pub struct EstacionamientoService<'a, S: ParkingStore> {
    store: &'a mut S,
}

impl<'a, S: ParkingStore> EstacionamientoService<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    pub async fn find_all(&mut self) -> AppResult<Vec<Estacionamiento>> {
        self.store.find_estacionamientos().await
    }

    pub async fn find_by_id(&mut self, id: i64) -> AppResult<Estacionamiento> {
        self.store
            .find_estacionamiento(id)
            .await?
            .ok_or_else(|| not_found_error(Estacionamiento::RECURSO, id))
    }

    pub async fn save(&mut self, estacionamiento: Estacionamiento) -> AppResult<Estacionamiento> {
        estacionamiento.validate()?;
        estacionamiento.check_occupancy()?;

        if self
            .store
            .find_sucursal(estacionamiento.sucursal_id)
            .await?
            .is_none()
        {
            return Err(not_found_error(
                Sucursal::RECURSO,
                estacionamiento.sucursal_id,
            ));
        }

        self.check_occupancy_unchanged(&estacionamiento).await?;

        let saved = self.store.save_estacionamiento(estacionamiento).await?;
        tracing::info!("Estacionamiento {} guardado", saved.id);
        Ok(saved)
    }

    pub async fn update(
        &mut self,
        id: i64,
        mut estacionamiento: Estacionamiento,
    ) -> AppResult<Estacionamiento> {
        self.find_by_id(id).await?;
        estacionamiento.id = id;
        self.save(estacionamiento).await
    }

    pub async fn patch(
        &mut self,
        id: i64,
        patch: PatchEstacionamiento,
    ) -> AppResult<Estacionamiento> {
        patch.validate()?;
        let mut estacionamiento = self.find_by_id(id).await?;
        patch.apply_to(&mut estacionamiento);
        self.save(estacionamiento).await
    }

    pub async fn delete(&mut self, id: i64) -> AppResult<()> {
        CascadaService::new(&mut *self.store)
            .delete_estacionamiento(id)
            .await
    }

    /// `ocupado` y `auto_id` solo cambian por entrada o salida, que además
    /// abren o cierran el registro del auto. Un estacionamiento nuevo nace libre.
    async fn check_occupancy_unchanged(
        &mut self,
        estacionamiento: &Estacionamiento,
    ) -> AppResult<()> {
        let (ocupado, auto_id) = if estacionamiento.id == 0 {
            (false, None)
        } else {
            let actual = self.find_by_id(estacionamiento.id).await?;
            (actual.ocupado, actual.auto_id)
        };

        if estacionamiento.ocupado != ocupado || estacionamiento.auto_id != auto_id {
            return Err(conflict_error(OCUPACION_SOLO_POR_ENTRADA_SALIDA));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Auto, Comuna, Region, Usuario};
    use crate::repositories::MemoryStore;
    use crate::services::OcupacionService;
    use crate::utils::errors::AppError;

    async fn sucursal(store: &mut MemoryStore) -> Sucursal {
        let region = store
            .save_region(Region {
                id: 0,
                codigo: 8,
                nombre: "Biobío".to_string(),
            })
            .await
            .unwrap();
        let comuna = store
            .save_comuna(Comuna {
                id: 0,
                codigo: 8101,
                nombre: "Concepción".to_string(),
                region_id: region.id,
            })
            .await
            .unwrap();
        store
            .save_sucursal(Sucursal {
                id: 0,
                nombre: "Plaza".to_string(),
                direccion: "Barros Arana 500".to_string(),
                telefono: 412_000_000,
                comuna_id: comuna.id,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_occupied_without_vehicle_is_rejected() {
        let mut store = MemoryStore::new();
        let sucursal = sucursal(&mut store).await;
        let mut service = EstacionamientoService::new(&mut store);

        let result = service
            .save(Estacionamiento {
                id: 0,
                numero: 1,
                ocupado: true,
                auto_id: None,
                sucursal_id: sucursal.id,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_patch_cannot_break_occupancy_invariant() {
        let mut store = MemoryStore::new();
        let sucursal = sucursal(&mut store).await;
        let mut service = EstacionamientoService::new(&mut store);
        let libre = service
            .save(Estacionamiento {
                id: 0,
                numero: 4,
                ocupado: false,
                auto_id: None,
                sucursal_id: sucursal.id,
            })
            .await
            .unwrap();

        let result = service
            .patch(
                libre.id,
                PatchEstacionamiento {
                    ocupado: Some(true),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let renumerado = service
            .patch(
                libre.id,
                PatchEstacionamiento {
                    numero: Some(5),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renumerado.numero, 5);
        assert!(!renumerado.ocupado);
    }

    #[tokio::test]
    async fn test_save_requires_existing_sucursal() {
        let mut store = MemoryStore::new();
        let mut service = EstacionamientoService::new(&mut store);

        let result = service
            .save(Estacionamiento {
                id: 0,
                numero: 1,
                ocupado: false,
                auto_id: None,
                sucursal_id: 3,
            })
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_occupancy_changes_only_through_arrival_and_departure() {
        let mut store = MemoryStore::new();
        let sucursal = sucursal(&mut store).await;
        let usuario = store
            .save_usuario(Usuario {
                id: 0,
                run: "44444444".to_string(),
                nombre_completo: "sara diaz".to_string(),
                correo: "sara@correo.cl".to_string(),
                password: "hash".to_string(),
            })
            .await
            .unwrap();
        let auto = store
            .save_auto(Auto {
                id: 0,
                patente: "ABC123".to_string(),
                usuario_id: usuario.id,
            })
            .await
            .unwrap();

        let mut service = EstacionamientoService::new(&mut store);
        match service
            .save(Estacionamiento {
                id: 0,
                numero: 10,
                ocupado: true,
                auto_id: Some(auto.id),
                sucursal_id: sucursal.id,
            })
            .await
        {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, OCUPACION_SOLO_POR_ENTRADA_SALIDA),
            other => panic!("unexpected result: {:?}", other),
        }
        let libre = service
            .save(Estacionamiento {
                id: 0,
                numero: 10,
                ocupado: false,
                auto_id: None,
                sucursal_id: sucursal.id,
            })
            .await
            .unwrap();

        OcupacionService::new(&mut store)
            .register_arrival("ABC123", 10)
            .await
            .unwrap();

        let mut service = EstacionamientoService::new(&mut store);
        let result = service
            .patch(
                libre.id,
                PatchEstacionamiento {
                    ocupado: Some(false),
                    auto_id: Some(None),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));

        // Renumerar un estacionamiento ocupado no toca su ocupación
        let renumerado = service
            .patch(
                libre.id,
                PatchEstacionamiento {
                    numero: Some(20),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(renumerado.ocupado);

        let salida = OcupacionService::new(&mut store)
            .register_departure("ABC123")
            .await
            .unwrap();
        assert!(!salida.ocupado);
        assert!(store.find_registros_activos().await.unwrap().is_empty());
    }
}
