//! Servicio de comunas

use validator::Validate;

use super::cascada_service::CascadaService;
use crate::models::{Comuna, Entidad, PatchComuna, Region};
use crate::repositories::ParkingStore;
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub struct ComunaService<'a, S: ParkingStore> {
    store: &'a mut S,
}

impl<'a, S: ParkingStore> ComunaService<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    pub async fn find_all(&mut self) -> AppResult<Vec<Comuna>> {
        self.store.find_comunas().await
    }

    pub async fn find_by_id(&mut self, id: i64) -> AppResult<Comuna> {
        self.store
            .find_comuna(id)
            .await?
            .ok_or_else(|| not_found_error(Comuna::RECURSO, id))
    }

    pub async fn find_by_codigo(&mut self, codigo: i64) -> AppResult<Comuna> {
        self.store
            .find_comuna_by_codigo(codigo)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Comuna con código '{}' no encontrada", codigo)))
    }

    pub async fn find_by_region(&mut self, region_id: i64) -> AppResult<Vec<Comuna>> {
        self.store.find_comunas_by_region(region_id).await
    }

    pub async fn find_by_nombre_and_region(
        &mut self,
        nombre: &str,
        region_id: i64,
    ) -> AppResult<Vec<Comuna>> {
        self.store
            .find_comunas_by_nombre_and_region(nombre, region_id)
            .await
    }

    pub async fn save(&mut self, comuna: Comuna) -> AppResult<Comuna> {
        comuna.validate()?;
        if self.store.find_region(comuna.region_id).await?.is_none() {
            return Err(not_found_error(Region::RECURSO, comuna.region_id));
        }

        let saved = self.store.save_comuna(comuna).await?;
        tracing::info!("Comuna {} guardada", saved.id);
        Ok(saved)
    }

    pub async fn update(&mut self, id: i64, mut comuna: Comuna) -> AppResult<Comuna> {
        self.find_by_id(id).await?;
        comuna.id = id;
        self.save(comuna).await
    }

    pub async fn patch(&mut self, id: i64, patch: PatchComuna) -> AppResult<Comuna> {
        patch.validate()?;
        let mut comuna = self.find_by_id(id).await?;
        patch.apply_to(&mut comuna);
        self.save(comuna).await
    }

    pub async fn delete(&mut self, id: i64) -> AppResult<()> {
        CascadaService::new(&mut *self.store).delete_comuna(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryStore;

    async fn region(store: &mut MemoryStore) -> Region {
        store
            .save_region(Region {
                id: 0,
                codigo: 13,
                nombre: "Metropolitana".to_string(),
            })
            .await
            .unwrap()
    }

    fn providencia(region_id: i64) -> Comuna {
        Comuna {
            id: 0,
            codigo: 13123,
            nombre: "Providencia".to_string(),
            region_id,
        }
    }

    #[tokio::test]
    async fn test_save_requires_existing_region() {
        let mut store = MemoryStore::new();
        let mut service = ComunaService::new(&mut store);

        let result = service.save(providencia(42)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_derived_lookups() {
        let mut store = MemoryStore::new();
        let region = region(&mut store).await;
        let mut service = ComunaService::new(&mut store);
        let saved = service.save(providencia(region.id)).await.unwrap();

        assert_eq!(service.find_by_codigo(13123).await.unwrap(), saved);
        assert_eq!(service.find_by_region(region.id).await.unwrap(), vec![saved.clone()]);
        assert_eq!(
            service
                .find_by_nombre_and_region("Providencia", region.id)
                .await
                .unwrap(),
            vec![saved]
        );
        assert!(service
            .find_by_nombre_and_region("Providencia", region.id + 1)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_patch_moves_comuna_to_other_region() {
        let mut store = MemoryStore::new();
        let first = region(&mut store).await;
        let second = region(&mut store).await;
        let mut service = ComunaService::new(&mut store);
        let saved = service.save(providencia(first.id)).await.unwrap();

        let patched = service
            .patch(
                saved.id,
                PatchComuna {
                    region_id: Some(second.id),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(patched.region_id, second.id);
        assert_eq!(patched.nombre, "Providencia");
    }
}
