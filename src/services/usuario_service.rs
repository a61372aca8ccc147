//! Servicio de usuarios
//!
//! `correo` y `run` son únicos (se valida el correo primero). Toda contraseña
//! recibida se guarda como hash bcrypt.

use bcrypt::{hash, DEFAULT_COST};
use validator::Validate;

use super::cascada_service::CascadaService;
use crate::models::{Entidad, PatchUsuario, Usuario};
use crate::repositories::ParkingStore;
use crate::utils::errors::{conflict_error, not_found_error, AppError, AppResult};

pub const CORREO_DUPLICADO: &str = "El Correo ya esta registrado.";
pub const RUN_DUPLICADO: &str = "El Run ya esta registrado.";

pub struct UsuarioService<'a, S: ParkingStore> {
    store: &'a mut S,
    hash_cost: u32,
}

impl<'a, S: ParkingStore> UsuarioService<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self {
            store,
            hash_cost: DEFAULT_COST,
        }
    }

    /// Costo bcrypt a usar al hashear contraseñas
    pub fn with_hash_cost(mut self, hash_cost: u32) -> Self {
        self.hash_cost = hash_cost;
        self
    }

    pub async fn find_all(&mut self) -> AppResult<Vec<Usuario>> {
        self.store.find_usuarios().await
    }

    pub async fn find_by_id(&mut self, id: i64) -> AppResult<Usuario> {
        self.store
            .find_usuario(id)
            .await?
            .ok_or_else(|| not_found_error(Usuario::RECURSO, id))
    }

    pub async fn find_by_nombre(&mut self, nombre: &str) -> AppResult<Vec<Usuario>> {
        self.store.find_usuarios_by_nombre(nombre).await
    }

    pub async fn find_by_correo(&mut self, correo: &str) -> AppResult<Usuario> {
        self.store
            .find_usuario_by_correo(correo)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Usuario con correo '{}' no encontrado", correo)))
    }

    pub async fn save(&mut self, mut usuario: Usuario) -> AppResult<Usuario> {
        usuario.validate()?;
        self.check_unique(&usuario).await?;
        usuario.password = self.hash_password(&usuario.password)?;
        self.persist(usuario).await
    }

    pub async fn update(&mut self, id: i64, mut usuario: Usuario) -> AppResult<Usuario> {
        self.find_by_id(id).await?;
        usuario.id = id;
        self.save(usuario).await
    }

    pub async fn patch(&mut self, id: i64, mut patch: PatchUsuario) -> AppResult<Usuario> {
        patch.validate()?;
        let mut usuario = self.find_by_id(id).await?;

        if let Some(password) = patch.password.take() {
            usuario.password = self.hash_password(&password)?;
        }
        patch.apply_to(&mut usuario);

        self.check_unique(&usuario).await?;
        self.persist(usuario).await
    }

    pub async fn delete(&mut self, id: i64) -> AppResult<()> {
        CascadaService::new(&mut *self.store).delete_usuario(id).await
    }

    async fn check_unique(&mut self, usuario: &Usuario) -> AppResult<()> {
        if let Some(otro) = self.store.find_usuario_by_correo(&usuario.correo).await? {
            if otro.id != usuario.id {
                return Err(conflict_error(CORREO_DUPLICADO));
            }
        }
        if let Some(otro) = self.store.find_usuario_by_run(&usuario.run).await? {
            if otro.id != usuario.id {
                return Err(conflict_error(RUN_DUPLICADO));
            }
        }
        Ok(())
    }

    fn hash_password(&self, password: &str) -> AppResult<String> {
        hash(password, self.hash_cost).map_err(|e| AppError::Hash(e.to_string()))
    }

    async fn persist(&mut self, usuario: Usuario) -> AppResult<Usuario> {
        let saved = self.store.save_usuario(usuario).await?;
        tracing::info!("Usuario {} guardado", saved.id);
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryStore;

    const TEST_COST: u32 = 4;

    fn pedro() -> Usuario {
        Usuario {
            id: 0,
            run: "22222222".to_string(),
            nombre_completo: "pedro juan".to_string(),
            correo: "pedrojuan@gmail.com".to_string(),
            password: "123456".to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_correo_is_reported_first() {
        let mut store = MemoryStore::new();
        let mut service = UsuarioService::new(&mut store).with_hash_cost(TEST_COST);
        service.save(pedro()).await.unwrap();

        match service.save(pedro()).await {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, CORREO_DUPLICADO),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_duplicate_run_is_conflict() {
        let mut store = MemoryStore::new();
        let mut service = UsuarioService::new(&mut store).with_hash_cost(TEST_COST);
        service.save(pedro()).await.unwrap();

        let mut otro = pedro();
        otro.correo = "otro@gmail.com".to_string();

        match service.save(otro).await {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, RUN_DUPLICADO),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_password_is_hashed() {
        let mut store = MemoryStore::new();
        let mut service = UsuarioService::new(&mut store).with_hash_cost(TEST_COST);

        let saved = service.save(pedro()).await.unwrap();

        assert_ne!(saved.password, "123456");
        assert!(bcrypt::verify("123456", &saved.password).unwrap());
    }

    #[tokio::test]
    async fn test_patch_rehashes_password_and_keeps_other_fields() {
        let mut store = MemoryStore::new();
        let mut service = UsuarioService::new(&mut store).with_hash_cost(TEST_COST);
        let saved = service.save(pedro()).await.unwrap();

        let patched = service
            .patch(
                saved.id,
                PatchUsuario {
                    password: Some("nueva-clave".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(patched.correo, saved.correo);
        assert!(bcrypt::verify("nueva-clave", &patched.password).unwrap());
    }

    #[tokio::test]
    async fn test_update_keeps_own_correo() {
        let mut store = MemoryStore::new();
        let mut service = UsuarioService::new(&mut store).with_hash_cost(TEST_COST);
        let saved = service.save(pedro()).await.unwrap();

        let mut cambio = pedro();
        cambio.nombre_completo = "pedro juan perez".to_string();
        let updated = service.update(saved.id, cambio).await.unwrap();

        assert_eq!(updated.id, saved.id);
        assert_eq!(updated.nombre_completo, "pedro juan perez");
    }

    #[tokio::test]
    async fn test_find_by_nombre_is_case_insensitive() {
        let mut store = MemoryStore::new();
        let mut service = UsuarioService::new(&mut store).with_hash_cost(TEST_COST);
        let saved = service.save(pedro()).await.unwrap();

        assert_eq!(service.find_by_nombre("JUAN").await.unwrap(), vec![saved]);
    }
}
