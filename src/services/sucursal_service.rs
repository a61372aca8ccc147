//! Servicio de sucursales

use validator::Validate;

use super::cascada_service::CascadaService;
use crate::models::{Comuna, Entidad, PatchSucursal, Sucursal};
use crate::repositories::ParkingStore;
use crate::utils::errors::{not_found_error, AppResult};

pub struct SucursalService<'a, S: ParkingStore> {
    store: &'a mut S,
}

impl<'a, S: ParkingStore> SucursalService<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    pub async fn find_all(&mut self) -> AppResult<Vec<Sucursal>> {
        self.store.find_sucursales().await
    }

    pub async fn find_by_id(&mut self, id: i64) -> AppResult<Sucursal> {
        self.store
            .find_sucursal(id)
            .await?
            .ok_or_else(|| not_found_error(Sucursal::RECURSO, id))
    }

    pub async fn find_by_nombre(&mut self, nombre: &str) -> AppResult<Vec<Sucursal>> {
        self.store.find_sucursales_by_nombre(nombre).await
    }

    pub async fn find_by_direccion(&mut self, direccion: &str) -> AppResult<Vec<Sucursal>> {
        self.store.find_sucursales_by_direccion(direccion).await
    }

    pub async fn find_by_comuna(&mut self, comuna_id: i64) -> AppResult<Vec<Sucursal>> {
        self.store.find_sucursales_by_comuna(comuna_id).await
    }

    pub async fn find_by_nombre_and_comuna(
        &mut self,
        nombre: &str,
        comuna_id: i64,
    ) -> AppResult<Vec<Sucursal>> {
        let sucursales = self.store.find_sucursales_by_comuna(comuna_id).await?;
        Ok(sucursales
            .into_iter()
            .filter(|s| s.nombre == nombre)
            .collect())
    }

    pub async fn save(&mut self, sucursal: Sucursal) -> AppResult<Sucursal> {
        sucursal.validate()?;
        if self.store.find_comuna(sucursal.comuna_id).await?.is_none() {
            return Err(not_found_error(Comuna::RECURSO, sucursal.comuna_id));
        }

        let saved = self.store.save_sucursal(sucursal).await?;
        tracing::info!("Sucursal {} guardada", saved.id);
        Ok(saved)
    }

    pub async fn update(&mut self, id: i64, mut sucursal: Sucursal) -> AppResult<Sucursal> {
        self.find_by_id(id).await?;
        sucursal.id = id;
        self.save(sucursal).await
    }

    pub async fn patch(&mut self, id: i64, patch: PatchSucursal) -> AppResult<Sucursal> {
        patch.validate()?;
        let mut sucursal = self.find_by_id(id).await?;
        patch.apply_to(&mut sucursal);
        self.save(sucursal).await
    }

    pub async fn delete(&mut self, id: i64) -> AppResult<()> {
        CascadaService::new(&mut *self.store).delete_sucursal(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Region;
    use crate::repositories::MemoryStore;
    use crate::utils::errors::AppError;

    async fn comuna(store: &mut MemoryStore) -> Comuna {
        let region = store
            .save_region(Region {
                id: 0,
                codigo: 5,
                nombre: "Valparaíso".to_string(),
            })
            .await
            .unwrap();
        store
            .save_comuna(Comuna {
                id: 0,
                codigo: 5109,
                nombre: "Viña del Mar".to_string(),
                region_id: region.id,
            })
            .await
            .unwrap()
    }

    fn sucursal(nombre: &str, comuna_id: i64) -> Sucursal {
        Sucursal {
            id: 0,
            nombre: nombre.to_string(),
            direccion: "Av. Libertad 1000".to_string(),
            telefono: 322_000_000,
            comuna_id,
        }
    }

    #[tokio::test]
    async fn test_find_by_nombre_and_comuna() {
        let mut store = MemoryStore::new();
        let comuna = comuna(&mut store).await;
        let mut service = SucursalService::new(&mut store);

        let centro = service.save(sucursal("Centro", comuna.id)).await.unwrap();
        service.save(sucursal("Norte", comuna.id)).await.unwrap();

        assert_eq!(
            service
                .find_by_nombre_and_comuna("Centro", comuna.id)
                .await
                .unwrap(),
            vec![centro]
        );
        assert_eq!(service.find_by_comuna(comuna.id).await.unwrap().len(), 2);
        assert_eq!(
            service
                .find_by_direccion("Av. Libertad 1000")
                .await
                .unwrap()
                .len(),
            2
        );
    }

    #[tokio::test]
    async fn test_short_phone_is_rejected() {
        let mut store = MemoryStore::new();
        let comuna = comuna(&mut store).await;
        let mut service = SucursalService::new(&mut store);

        let mut invalida = sucursal("Centro", comuna.id);
        invalida.telefono = 123;

        assert!(matches!(
            service.save(invalida).await,
            Err(AppError::Validation(_))
        ));
    }
}
