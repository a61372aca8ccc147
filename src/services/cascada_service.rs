//! Eliminación en cascada
//!
//! El esquema no declara `ON DELETE CASCADE`: cada borrado de una entidad con
//! dependientes recorre la jerarquía de arriba hacia abajo y elimina primero
//! las filas que la referencian. La raíz debe existir antes de tocar nada.

use crate::models::{Auto, Comuna, Entidad, Estacionamiento, Region, Registro, Sucursal, Usuario};
use crate::repositories::ParkingStore;
use crate::utils::errors::{not_found_error, AppResult};

pub struct CascadaService<'a, S: ParkingStore> {
    store: &'a mut S,
}

impl<'a, S: ParkingStore> CascadaService<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// Región → comunas → sucursales → estacionamientos
    pub async fn delete_region(&mut self, id: i64) -> AppResult<()> {
        if self.store.find_region(id).await?.is_none() {
            return Err(not_found_error(Region::RECURSO, id));
        }

        for comuna in self.store.find_comunas_by_region(id).await? {
            tracing::debug!("Cascada región {}: comuna {}", id, comuna.id);
            self.remove_comuna(comuna.id).await?;
        }

        self.store.delete_region(id).await?;
        tracing::debug!("Región {} eliminada", id);
        Ok(())
    }

    pub async fn delete_comuna(&mut self, id: i64) -> AppResult<()> {
        if self.store.find_comuna(id).await?.is_none() {
            return Err(not_found_error(Comuna::RECURSO, id));
        }
        self.remove_comuna(id).await
    }

    pub async fn delete_sucursal(&mut self, id: i64) -> AppResult<()> {
        if self.store.find_sucursal(id).await?.is_none() {
            return Err(not_found_error(Sucursal::RECURSO, id));
        }
        self.remove_sucursal(id).await
    }

    /// Un estacionamiento ocupado suelta antes al auto que lo ocupa
    pub async fn delete_estacionamiento(&mut self, id: i64) -> AppResult<()> {
        let estacionamiento = self
            .store
            .find_estacionamiento(id)
            .await?
            .ok_or_else(|| not_found_error(Estacionamiento::RECURSO, id))?;

        if let Some(auto_id) = estacionamiento.auto_id {
            self.detach_auto(auto_id).await?;
        }

        self.store.delete_estacionamiento(id).await?;
        tracing::debug!("Estacionamiento {} eliminado", id);
        Ok(())
    }

    pub async fn delete_auto(&mut self, id: i64) -> AppResult<()> {
        if self.store.find_auto(id).await?.is_none() {
            return Err(not_found_error(Auto::RECURSO, id));
        }
        self.remove_auto(id).await
    }

    pub async fn delete_usuario(&mut self, id: i64) -> AppResult<()> {
        if self.store.find_usuario(id).await?.is_none() {
            return Err(not_found_error(Usuario::RECURSO, id));
        }

        for auto in self.store.find_autos_by_usuario(id).await? {
            tracing::debug!("Cascada usuario {}: auto {}", id, auto.id);
            self.remove_auto(auto.id).await?;
        }

        self.store.delete_usuario(id).await?;
        tracing::debug!("Usuario {} eliminado", id);
        Ok(())
    }

    pub async fn delete_registro(&mut self, id: i64) -> AppResult<()> {
        if self.store.find_registro(id).await?.is_none() {
            return Err(not_found_error(Registro::RECURSO, id));
        }
        self.remove_registro(id).await
    }

    async fn remove_comuna(&mut self, id: i64) -> AppResult<()> {
        for sucursal in self.store.find_sucursales_by_comuna(id).await? {
            tracing::debug!("Cascada comuna {}: sucursal {}", id, sucursal.id);
            self.remove_sucursal(sucursal.id).await?;
        }

        self.store.delete_comuna(id).await?;
        tracing::debug!("Comuna {} eliminada", id);
        Ok(())
    }

    async fn remove_sucursal(&mut self, id: i64) -> AppResult<()> {
        let estacionamientos = self.store.find_estacionamientos_by_sucursal(id).await?;

        for estacionamiento in &estacionamientos {
            if let Some(auto_id) = estacionamiento.auto_id {
                tracing::debug!(
                    "Cascada sucursal {}: liberando auto {} del estacionamiento {}",
                    id,
                    auto_id,
                    estacionamiento.id
                );
                self.detach_auto(auto_id).await?;
            }
        }

        for estacionamiento in estacionamientos {
            self.store.delete_estacionamiento(estacionamiento.id).await?;
            tracing::debug!("Estacionamiento {} eliminado", estacionamiento.id);
        }

        self.store.delete_sucursal(id).await?;
        tracing::debug!("Sucursal {} eliminada", id);
        Ok(())
    }

    /// Borra pagos y registros del auto y libera los estacionamientos que
    /// ocupa. El auto sigue existiendo.
    async fn detach_auto(&mut self, auto_id: i64) -> AppResult<()> {
        for registro in self.store.find_registros_by_auto(auto_id).await? {
            self.remove_registro(registro.id).await?;
        }

        for mut estacionamiento in self.store.find_estacionamientos_by_auto(auto_id).await? {
            estacionamiento.release();
            self.store.save_estacionamiento(estacionamiento).await?;
        }
        Ok(())
    }

    async fn remove_auto(&mut self, id: i64) -> AppResult<()> {
        self.detach_auto(id).await?;
        self.store.delete_auto(id).await?;
        tracing::debug!("Auto {} eliminado", id);
        Ok(())
    }

    async fn remove_registro(&mut self, id: i64) -> AppResult<()> {
        if let Some(pago) = self.store.find_pago_by_registro(id).await? {
            self.store.delete_pago(pago.id).await?;
            tracing::debug!("Pago {} del registro {} eliminado", pago.id, id);
        }

        self.store.delete_registro(id).await?;
        tracing::debug!("Registro {} eliminado", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Pago;
    use crate::repositories::MemoryStore;
    use crate::utils::errors::AppError;
    use chrono::Utc;
    use rust_decimal::Decimal;

    struct Jerarquia {
        region: i64,
        comuna: i64,
        sucursal: i64,
        estacionamiento: i64,
        auto: i64,
        usuario: i64,
        registro: i64,
        pago: i64,
    }

    async fn seed(store: &mut MemoryStore) -> Jerarquia {
        let region = store
            .save_region(Region {
                id: 0,
                codigo: 13,
                nombre: "Metropolitana".to_string(),
            })
            .await
            .unwrap();
        let comuna = store
            .save_comuna(Comuna {
                id: 0,
                codigo: 13101,
                nombre: "Santiago".to_string(),
                region_id: region.id,
            })
            .await
            .unwrap();
        let sucursal = store
            .save_sucursal(Sucursal {
                id: 0,
                nombre: "Centro".to_string(),
                direccion: "Alameda 123".to_string(),
                telefono: 226_543_210,
                comuna_id: comuna.id,
            })
            .await
            .unwrap();
        let usuario = store
            .save_usuario(Usuario {
                id: 0,
                run: "22222222".to_string(),
                nombre_completo: "pedro juan".to_string(),
                correo: "pedrojuan@gmail.com".to_string(),
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
        let mut estacionamiento = Estacionamiento {
            id: 0,
            numero: 10,
            ocupado: false,
            auto_id: None,
            sucursal_id: sucursal.id,
        };
        estacionamiento.occupy(auto.id);
        let estacionamiento = store.save_estacionamiento(estacionamiento).await.unwrap();
        let registro = store
            .save_registro(Registro::open(auto.id, Utc::now()))
            .await
            .unwrap();
        let pago = store
            .save_pago(Pago {
                id: 0,
                fecha_pago: Utc::now(),
                monto: Decimal::new(2000, 0),
                metodo: "efectivo".to_string(),
                registro_id: registro.id,
            })
            .await
            .unwrap();

        Jerarquia {
            region: region.id,
            comuna: comuna.id,
            sucursal: sucursal.id,
            estacionamiento: estacionamiento.id,
            auto: auto.id,
            usuario: usuario.id,
            registro: registro.id,
            pago: pago.id,
        }
    }

    #[tokio::test]
    async fn test_region_cascade_deletes_top_down() {
        let mut store = MemoryStore::new();
        let ids = seed(&mut store).await;

        CascadaService::new(&mut store)
            .delete_region(ids.region)
            .await
            .unwrap();

        assert_eq!(
            store.eliminados(),
            &[
                ("pagos", ids.pago),
                ("registros", ids.registro),
                ("estacionamientos", ids.estacionamiento),
                ("sucursales", ids.sucursal),
                ("comunas", ids.comuna),
                ("regiones", ids.region),
            ]
        );
        assert!(store.find_auto(ids.auto).await.unwrap().is_some());
        assert!(store.find_usuario(ids.usuario).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_auto_cascade_frees_spot() {
        let mut store = MemoryStore::new();
        let ids = seed(&mut store).await;

        CascadaService::new(&mut store)
            .delete_auto(ids.auto)
            .await
            .unwrap();

        let estacionamiento = store
            .find_estacionamiento(ids.estacionamiento)
            .await
            .unwrap()
            .unwrap();
        assert!(!estacionamiento.ocupado);
        assert_eq!(estacionamiento.auto_id, None);
        assert_eq!(
            store.eliminados(),
            &[
                ("pagos", ids.pago),
                ("registros", ids.registro),
                ("autos", ids.auto),
            ]
        );
    }

    #[tokio::test]
    async fn test_usuario_cascade_removes_owned_autos() {
        let mut store = MemoryStore::new();
        let ids = seed(&mut store).await;

        CascadaService::new(&mut store)
            .delete_usuario(ids.usuario)
            .await
            .unwrap();

        assert!(store.find_auto(ids.auto).await.unwrap().is_none());
        assert!(store.find_usuario(ids.usuario).await.unwrap().is_none());
        assert!(store.find_pagos().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_estacionamiento_cascade_detaches_vehicle() {
        let mut store = MemoryStore::new();
        let ids = seed(&mut store).await;

        CascadaService::new(&mut store)
            .delete_estacionamiento(ids.estacionamiento)
            .await
            .unwrap();

        assert!(store.find_registros().await.unwrap().is_empty());
        assert!(store.find_auto(ids.auto).await.unwrap().is_some());
        assert_eq!(
            store.eliminados().last(),
            Some(&("estacionamientos", ids.estacionamiento))
        );
    }

    #[tokio::test]
    async fn test_missing_root_is_not_found_and_touches_nothing() {
        let mut store = MemoryStore::new();
        seed(&mut store).await;

        let result = CascadaService::new(&mut store).delete_comuna(999).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(store.eliminados().is_empty());
    }
}
