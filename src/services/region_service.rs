//! Servicio de regiones

use validator::Validate;

use super::cascada_service::CascadaService;
use crate::models::{Entidad, PatchRegion, Region};
use crate::repositories::ParkingStore;
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub struct RegionService<'a, S: ParkingStore> {
    store: &'a mut S,
}

impl<'a, S: ParkingStore> RegionService<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    pub async fn find_all(&mut self) -> AppResult<Vec<Region>> {
        self.store.find_regiones().await
    }

    pub async fn find_by_id(&mut self, id: i64) -> AppResult<Region> {
        self.store
            .find_region(id)
            .await?
            .ok_or_else(|| not_found_error(Region::RECURSO, id))
    }

    pub async fn find_by_nombre(&mut self, nombre: &str) -> AppResult<Region> {
        self.store
            .find_region_by_nombre(nombre)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Region '{}' no encontrada", nombre)))
    }

    pub async fn save(&mut self, region: Region) -> AppResult<Region> {
        region.validate()?;
        let saved = self.store.save_region(region).await?;
        tracing::info!("Región {} guardada", saved.id);
        Ok(saved)
    }

    pub async fn update(&mut self, id: i64, mut region: Region) -> AppResult<Region> {
        self.find_by_id(id).await?;
        region.id = id;
        self.save(region).await
    }

    pub async fn patch(&mut self, id: i64, patch: PatchRegion) -> AppResult<Region> {
        patch.validate()?;
        let mut region = self.find_by_id(id).await?;
        patch.apply_to(&mut region);
        self.save(region).await
    }

    pub async fn delete(&mut self, id: i64) -> AppResult<()> {
        CascadaService::new(&mut *self.store).delete_region(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryStore;

    fn santiago() -> Region {
        Region {
            id: 0,
            codigo: 1234,
            nombre: "Santiago".to_string(),
        }
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let mut store = MemoryStore::new();
        let mut service = RegionService::new(&mut store);

        let saved = service.save(santiago()).await.unwrap();
        let found = service.find_by_id(saved.id).await.unwrap();

        assert_eq!(found, saved);
        assert_eq!(service.find_by_nombre("Santiago").await.unwrap(), saved);
        assert_eq!(service.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_patch_keeps_unsupplied_fields() {
        let mut store = MemoryStore::new();
        let mut service = RegionService::new(&mut store);
        let saved = service.save(santiago()).await.unwrap();

        let patched = service
            .patch(
                saved.id,
                PatchRegion {
                    nombre: Some("Santiago Actualizado".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(patched.codigo, 1234);
        assert_eq!(patched.nombre, "Santiago Actualizado");
    }

    #[tokio::test]
    async fn test_delete_then_find_is_not_found() {
        let mut store = MemoryStore::new();
        let mut service = RegionService::new(&mut store);
        let saved = service.save(santiago()).await.unwrap();

        service.delete(saved.id).await.unwrap();

        assert!(matches!(
            service.find_by_id(saved.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(saved.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let mut store = MemoryStore::new();
        let mut service = RegionService::new(&mut store);

        let result = service.update(77, santiago()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_invalid_region_is_rejected() {
        let mut store = MemoryStore::new();
        let mut service = RegionService::new(&mut store);

        let result = service
            .save(Region {
                id: 0,
                codigo: 0,
                nombre: String::new(),
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
