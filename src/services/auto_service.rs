//! Servicio de autos

use validator::Validate;

use super::cascada_service::CascadaService;
use crate::models::{Auto, Entidad, PatchAuto, Usuario};
use crate::repositories::ParkingStore;
use crate::utils::errors::{conflict_error, not_found_error, AppError, AppResult};

pub struct AutoService<'a, S: ParkingStore> {
    store: &'a mut S,
}

impl<'a, S: ParkingStore> AutoService<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    pub async fn find_all(&mut self) -> AppResult<Vec<Auto>> {
        self.store.find_autos().await
    }

    pub async fn find_by_id(&mut self, id: i64) -> AppResult<Auto> {
        self.store
            .find_auto(id)
            .await?
            .ok_or_else(|| not_found_error(Auto::RECURSO, id))
    }

    pub async fn find_by_patente(&mut self, patente: &str) -> AppResult<Auto> {
        self.store
            .find_auto_by_patente(patente)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Auto con patente '{}' no encontrado", patente)))
    }

    pub async fn find_by_usuario(&mut self, usuario_id: i64) -> AppResult<Vec<Auto>> {
        self.store.find_autos_by_usuario(usuario_id).await
    }

    pub async fn save(&mut self, auto: Auto) -> AppResult<Auto> {
        auto.validate()?;
        if self.store.find_usuario(auto.usuario_id).await?.is_none() {
            return Err(not_found_error(Usuario::RECURSO, auto.usuario_id));
        }
        if let Some(existente) = self.store.find_auto_by_patente(&auto.patente).await? {
            if existente.id != auto.id {
                return Err(conflict_error("La patente ya esta registrada."));
            }
        }

        let saved = self.store.save_auto(auto).await?;
        tracing::info!("Auto {} guardado", saved.id);
        Ok(saved)
    }

    pub async fn update(&mut self, id: i64, mut auto: Auto) -> AppResult<Auto> {
        self.find_by_id(id).await?;
        auto.id = id;
        self.save(auto).await
    }

    pub async fn patch(&mut self, id: i64, patch: PatchAuto) -> AppResult<Auto> {
        patch.validate()?;
        let mut auto = self.find_by_id(id).await?;
        patch.apply_to(&mut auto);
        self.save(auto).await
    }

    pub async fn delete(&mut self, id: i64) -> AppResult<()> {
        CascadaService::new(&mut *self.store).delete_auto(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryStore;

    async fn usuario(store: &mut MemoryStore) -> Usuario {
        store
            .save_usuario(Usuario {
                id: 0,
                run: "11111111".to_string(),
                nombre_completo: "maria perez".to_string(),
                correo: "maria@correo.cl".to_string(),
                password: "hash".to_string(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_patente_is_conflict() {
        let mut store = MemoryStore::new();
        let usuario = usuario(&mut store).await;
        let mut service = AutoService::new(&mut store);

        let auto = Auto {
            id: 0,
            patente: "ABC123".to_string(),
            usuario_id: usuario.id,
        };
        let saved = service.save(auto.clone()).await.unwrap();

        match service.save(auto).await {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, "La patente ya esta registrada."),
            other => panic!("unexpected result: {:?}", other),
        }

        // Guardar de nuevo el mismo auto no choca consigo mismo
        assert!(service.save(saved).await.is_ok());
    }

    #[tokio::test]
    async fn test_lookups_by_patente_and_usuario() {
        let mut store = MemoryStore::new();
        let usuario = usuario(&mut store).await;
        let mut service = AutoService::new(&mut store);
        let saved = service
            .save(Auto {
                id: 0,
                patente: "XY1234".to_string(),
                usuario_id: usuario.id,
            })
            .await
            .unwrap();

        assert_eq!(service.find_by_patente("XY1234").await.unwrap(), saved);
        assert_eq!(service.find_by_usuario(usuario.id).await.unwrap(), vec![saved]);
        assert!(matches!(
            service.find_by_patente("ZZ9999").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_patente_is_rejected() {
        let mut store = MemoryStore::new();
        let usuario = usuario(&mut store).await;
        let mut service = AutoService::new(&mut store);

        let result = service
            .save(Auto {
                id: 0,
                patente: "AB-12".to_string(),
                usuario_id: usuario.id,
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
