//! Implementación en memoria de `ParkingStore`
//!
//! Mantiene cada tabla en un `BTreeMap` ordenado por id y verifica las
//! llaves foráneas igual que el esquema SQL: no se puede guardar una fila
//! que apunte a un padre inexistente ni borrar una fila que todavía es
//! referenciada. Las filas borradas quedan anotadas en orden en
//! `eliminados()`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::parking_store::ParkingStore;
use crate::models::{
    Auto, Comuna, Entidad, Estacionamiento, OcupacionDetalle, Pago, PagoDetalle, Region,
    Registro, Sucursal, Usuario,
};
use crate::utils::errors::{not_found_error, AppError, AppResult};

#[derive(Debug, Default)]
pub struct MemoryStore {
    secuencia: i64,
    regiones: BTreeMap<i64, Region>,
    comunas: BTreeMap<i64, Comuna>,
    sucursales: BTreeMap<i64, Sucursal>,
    estacionamientos: BTreeMap<i64, Estacionamiento>,
    autos: BTreeMap<i64, Auto>,
    usuarios: BTreeMap<i64, Usuario>,
    registros: BTreeMap<i64, Registro>,
    pagos: BTreeMap<i64, Pago>,
    eliminados: Vec<(&'static str, i64)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filas borradas, como `(tabla, id)`, en el orden en que se borraron
    pub fn eliminados(&self) -> &[(&'static str, i64)] {
        &self.eliminados
    }
}

fn upsert<T: Entidad + Clone>(
    tabla: &mut BTreeMap<i64, T>,
    secuencia: &mut i64,
    mut entidad: T,
) -> AppResult<T> {
    if entidad.is_new() {
        *secuencia += 1;
        entidad.set_id(*secuencia);
    } else if !tabla.contains_key(&entidad.id()) {
        return Err(not_found_error(T::RECURSO, entidad.id()));
    }
    tabla.insert(entidad.id(), entidad.clone());
    Ok(entidad)
}

fn remove<T>(
    tabla: &mut BTreeMap<i64, T>,
    eliminados: &mut Vec<(&'static str, i64)>,
    nombre: &'static str,
    id: i64,
) {
    if tabla.remove(&id).is_some() {
        eliminados.push((nombre, id));
    }
}

fn listar<T: Clone>(tabla: &BTreeMap<i64, T>, filtro: impl Fn(&T) -> bool) -> Vec<T> {
    tabla.values().filter(|fila| filtro(fila)).cloned().collect()
}

fn foreign_key(tabla: &str, columna: &str, id: i64) -> AppError {
    AppError::Internal(format!(
        "violación de llave foránea: {}.{} = {}",
        tabla, columna, id
    ))
}

fn still_referenced(tabla: &str, id: i64, por: &str) -> AppError {
    AppError::Internal(format!(
        "violación de llave foránea: {} {} sigue referenciada desde {}",
        tabla, id, por
    ))
}

#[async_trait]
impl ParkingStore for MemoryStore {
    async fn find_regiones(&mut self) -> AppResult<Vec<Region>> {
        Ok(listar(&self.regiones, |_| true))
    }

    async fn find_region(&mut self, id: i64) -> AppResult<Option<Region>> {
        Ok(self.regiones.get(&id).cloned())
    }

    async fn find_region_by_nombre(&mut self, nombre: &str) -> AppResult<Option<Region>> {
        Ok(self.regiones.values().find(|r| r.nombre == nombre).cloned())
    }

    async fn save_region(&mut self, region: Region) -> AppResult<Region> {
        upsert(&mut self.regiones, &mut self.secuencia, region)
    }

    async fn delete_region(&mut self, id: i64) -> AppResult<()> {
        if self.comunas.values().any(|c| c.region_id == id) {
            return Err(still_referenced("regiones", id, "comunas"));
        }
        remove(&mut self.regiones, &mut self.eliminados, "regiones", id);
        Ok(())
    }

    async fn find_comunas(&mut self) -> AppResult<Vec<Comuna>> {
        Ok(listar(&self.comunas, |_| true))
    }

    async fn find_comuna(&mut self, id: i64) -> AppResult<Option<Comuna>> {
        Ok(self.comunas.get(&id).cloned())
    }

    async fn find_comuna_by_codigo(&mut self, codigo: i64) -> AppResult<Option<Comuna>> {
        Ok(self.comunas.values().find(|c| c.codigo == codigo).cloned())
    }

    async fn find_comunas_by_region(&mut self, region_id: i64) -> AppResult<Vec<Comuna>> {
        Ok(listar(&self.comunas, |c| c.region_id == region_id))
    }

    async fn find_comunas_by_nombre_and_region(
        &mut self,
        nombre: &str,
        region_id: i64,
    ) -> AppResult<Vec<Comuna>> {
        Ok(listar(&self.comunas, |c| {
            c.nombre == nombre && c.region_id == region_id
        }))
    }

    async fn save_comuna(&mut self, comuna: Comuna) -> AppResult<Comuna> {
        if !self.regiones.contains_key(&comuna.region_id) {
            return Err(foreign_key("comunas", "region_id", comuna.region_id));
        }
        upsert(&mut self.comunas, &mut self.secuencia, comuna)
    }

    async fn delete_comuna(&mut self, id: i64) -> AppResult<()> {
        if self.sucursales.values().any(|s| s.comuna_id == id) {
            return Err(still_referenced("comunas", id, "sucursales"));
        }
        remove(&mut self.comunas, &mut self.eliminados, "comunas", id);
        Ok(())
    }

    async fn find_sucursales(&mut self) -> AppResult<Vec<Sucursal>> {
        Ok(listar(&self.sucursales, |_| true))
    }

    async fn find_sucursal(&mut self, id: i64) -> AppResult<Option<Sucursal>> {
        Ok(self.sucursales.get(&id).cloned())
    }

    async fn find_sucursales_by_nombre(&mut self, nombre: &str) -> AppResult<Vec<Sucursal>> {
        Ok(listar(&self.sucursales, |s| s.nombre == nombre))
    }

    async fn find_sucursales_by_direccion(&mut self, direccion: &str) -> AppResult<Vec<Sucursal>> {
        Ok(listar(&self.sucursales, |s| s.direccion == direccion))
    }

    async fn find_sucursales_by_comuna(&mut self, comuna_id: i64) -> AppResult<Vec<Sucursal>> {
        Ok(listar(&self.sucursales, |s| s.comuna_id == comuna_id))
    }

    async fn save_sucursal(&mut self, sucursal: Sucursal) -> AppResult<Sucursal> {
        if !self.comunas.contains_key(&sucursal.comuna_id) {
            return Err(foreign_key("sucursales", "comuna_id", sucursal.comuna_id));
        }
        upsert(&mut self.sucursales, &mut self.secuencia, sucursal)
    }

    async fn delete_sucursal(&mut self, id: i64) -> AppResult<()> {
        if self.estacionamientos.values().any(|e| e.sucursal_id == id) {
            return Err(still_referenced("sucursales", id, "estacionamientos"));
        }
        remove(&mut self.sucursales, &mut self.eliminados, "sucursales", id);
        Ok(())
    }

    async fn find_estacionamientos(&mut self) -> AppResult<Vec<Estacionamiento>> {
        Ok(listar(&self.estacionamientos, |_| true))
    }

    async fn find_estacionamiento(&mut self, id: i64) -> AppResult<Option<Estacionamiento>> {
        Ok(self.estacionamientos.get(&id).cloned())
    }

    async fn find_estacionamiento_by_numero(
        &mut self,
        numero: i32,
    ) -> AppResult<Option<Estacionamiento>> {
        Ok(self
            .estacionamientos
            .values()
            .find(|e| e.numero == numero)
            .cloned())
    }

    async fn find_estacionamientos_by_ocupado(
        &mut self,
        ocupado: bool,
    ) -> AppResult<Vec<Estacionamiento>> {
        Ok(listar(&self.estacionamientos, |e| e.ocupado == ocupado))
    }

    async fn find_estacionamientos_by_sucursal(
        &mut self,
        sucursal_id: i64,
    ) -> AppResult<Vec<Estacionamiento>> {
        Ok(listar(&self.estacionamientos, |e| e.sucursal_id == sucursal_id))
    }

    async fn find_libres_by_sucursal(
        &mut self,
        sucursal_id: i64,
    ) -> AppResult<Vec<Estacionamiento>> {
        Ok(listar(&self.estacionamientos, |e| {
            e.sucursal_id == sucursal_id && !e.ocupado
        }))
    }

    async fn find_estacionamiento_by_patente(
        &mut self,
        patente: &str,
    ) -> AppResult<Option<Estacionamiento>> {
        let auto_id = match self.autos.values().find(|a| a.patente == patente) {
            Some(auto) => auto.id,
            None => return Ok(None),
        };
        Ok(self
            .estacionamientos
            .values()
            .find(|e| e.auto_id == Some(auto_id))
            .cloned())
    }

    async fn find_estacionamientos_by_auto(
        &mut self,
        auto_id: i64,
    ) -> AppResult<Vec<Estacionamiento>> {
        Ok(listar(&self.estacionamientos, |e| e.auto_id == Some(auto_id)))
    }

    async fn find_ocupacion_detalle(&mut self) -> AppResult<Vec<OcupacionDetalle>> {
        let detalle = self
            .estacionamientos
            .values()
            .filter_map(|e| {
                let auto = self.autos.get(&e.auto_id?)?;
                let usuario = self.usuarios.get(&auto.usuario_id)?;
                Some(OcupacionDetalle {
                    numero: e.numero,
                    patente: auto.patente.clone(),
                    nombre_completo: usuario.nombre_completo.clone(),
                })
            })
            .collect();
        Ok(detalle)
    }

    async fn save_estacionamiento(
        &mut self,
        estacionamiento: Estacionamiento,
    ) -> AppResult<Estacionamiento> {
        if !self.sucursales.contains_key(&estacionamiento.sucursal_id) {
            return Err(foreign_key(
                "estacionamientos",
                "sucursal_id",
                estacionamiento.sucursal_id,
            ));
        }
        if let Some(auto_id) = estacionamiento.auto_id {
            if !self.autos.contains_key(&auto_id) {
                return Err(foreign_key("estacionamientos", "auto_id", auto_id));
            }
        }
        upsert(&mut self.estacionamientos, &mut self.secuencia, estacionamiento)
    }

    async fn delete_estacionamiento(&mut self, id: i64) -> AppResult<()> {
        remove(
            &mut self.estacionamientos,
            &mut self.eliminados,
            "estacionamientos",
            id,
        );
        Ok(())
    }

    async fn find_autos(&mut self) -> AppResult<Vec<Auto>> {
        Ok(listar(&self.autos, |_| true))
    }

    async fn find_auto(&mut self, id: i64) -> AppResult<Option<Auto>> {
        Ok(self.autos.get(&id).cloned())
    }

    async fn find_auto_by_patente(&mut self, patente: &str) -> AppResult<Option<Auto>> {
        Ok(self.autos.values().find(|a| a.patente == patente).cloned())
    }

    async fn find_autos_by_usuario(&mut self, usuario_id: i64) -> AppResult<Vec<Auto>> {
        Ok(listar(&self.autos, |a| a.usuario_id == usuario_id))
    }

    async fn save_auto(&mut self, auto: Auto) -> AppResult<Auto> {
        if !self.usuarios.contains_key(&auto.usuario_id) {
            return Err(foreign_key("autos", "usuario_id", auto.usuario_id));
        }
        upsert(&mut self.autos, &mut self.secuencia, auto)
    }

    async fn delete_auto(&mut self, id: i64) -> AppResult<()> {
        if self.registros.values().any(|r| r.auto_id == id) {
            return Err(still_referenced("autos", id, "registros"));
        }
        if self.estacionamientos.values().any(|e| e.auto_id == Some(id)) {
            return Err(still_referenced("autos", id, "estacionamientos"));
        }
        remove(&mut self.autos, &mut self.eliminados, "autos", id);
        Ok(())
    }

    async fn find_usuarios(&mut self) -> AppResult<Vec<Usuario>> {
        Ok(listar(&self.usuarios, |_| true))
    }

    async fn find_usuario(&mut self, id: i64) -> AppResult<Option<Usuario>> {
        Ok(self.usuarios.get(&id).cloned())
    }

    async fn find_usuario_by_correo(&mut self, correo: &str) -> AppResult<Option<Usuario>> {
        Ok(self.usuarios.values().find(|u| u.correo == correo).cloned())
    }

    async fn find_usuario_by_run(&mut self, run: &str) -> AppResult<Option<Usuario>> {
        Ok(self.usuarios.values().find(|u| u.run == run).cloned())
    }

    async fn find_usuarios_by_nombre(&mut self, nombre: &str) -> AppResult<Vec<Usuario>> {
        let nombre = nombre.to_lowercase();
        Ok(listar(&self.usuarios, |u| {
            u.nombre_completo.to_lowercase().contains(&nombre)
        }))
    }

    async fn save_usuario(&mut self, usuario: Usuario) -> AppResult<Usuario> {
        upsert(&mut self.usuarios, &mut self.secuencia, usuario)
    }

    async fn delete_usuario(&mut self, id: i64) -> AppResult<()> {
        if self.autos.values().any(|a| a.usuario_id == id) {
            return Err(still_referenced("usuarios", id, "autos"));
        }
        remove(&mut self.usuarios, &mut self.eliminados, "usuarios", id);
        Ok(())
    }

    async fn find_registros(&mut self) -> AppResult<Vec<Registro>> {
        Ok(listar(&self.registros, |_| true))
    }

    async fn find_registro(&mut self, id: i64) -> AppResult<Option<Registro>> {
        Ok(self.registros.get(&id).cloned())
    }

    async fn find_registros_by_auto(&mut self, auto_id: i64) -> AppResult<Vec<Registro>> {
        Ok(listar(&self.registros, |r| r.auto_id == auto_id))
    }

    async fn find_registros_by_patente(&mut self, patente: &str) -> AppResult<Vec<Registro>> {
        let auto_id = match self.autos.values().find(|a| a.patente == patente) {
            Some(auto) => auto.id,
            None => return Ok(Vec::new()),
        };
        Ok(listar(&self.registros, |r| r.auto_id == auto_id))
    }

    async fn find_open_registro(&mut self, auto_id: i64) -> AppResult<Option<Registro>> {
        Ok(self
            .registros
            .values()
            .find(|r| r.auto_id == auto_id && r.is_open())
            .cloned())
    }

    async fn find_registros_activos(&mut self) -> AppResult<Vec<Registro>> {
        Ok(listar(&self.registros, Registro::is_open))
    }

    async fn find_registros_between(
        &mut self,
        desde: DateTime<Utc>,
        hasta: DateTime<Utc>,
    ) -> AppResult<Vec<Registro>> {
        Ok(listar(&self.registros, |r| {
            r.hora_llegada >= desde && r.hora_llegada <= hasta
        }))
    }

    async fn save_registro(&mut self, registro: Registro) -> AppResult<Registro> {
        if !self.autos.contains_key(&registro.auto_id) {
            return Err(foreign_key("registros", "auto_id", registro.auto_id));
        }
        upsert(&mut self.registros, &mut self.secuencia, registro)
    }

    async fn delete_registro(&mut self, id: i64) -> AppResult<()> {
        if self.pagos.values().any(|p| p.registro_id == id) {
            return Err(still_referenced("registros", id, "pagos"));
        }
        remove(&mut self.registros, &mut self.eliminados, "registros", id);
        Ok(())
    }

    async fn find_pagos(&mut self) -> AppResult<Vec<Pago>> {
        Ok(listar(&self.pagos, |_| true))
    }

    async fn find_pago(&mut self, id: i64) -> AppResult<Option<Pago>> {
        Ok(self.pagos.get(&id).cloned())
    }

    async fn find_pagos_by_metodo(&mut self, metodo: &str) -> AppResult<Vec<Pago>> {
        Ok(listar(&self.pagos, |p| p.metodo == metodo))
    }

    async fn find_pagos_between(
        &mut self,
        desde: DateTime<Utc>,
        hasta: DateTime<Utc>,
    ) -> AppResult<Vec<Pago>> {
        Ok(listar(&self.pagos, |p| {
            p.fecha_pago >= desde && p.fecha_pago <= hasta
        }))
    }

    async fn find_pago_by_registro(&mut self, registro_id: i64) -> AppResult<Option<Pago>> {
        Ok(self
            .pagos
            .values()
            .find(|p| p.registro_id == registro_id)
            .cloned())
    }

    async fn exists_pago_by_registro(&mut self, registro_id: i64) -> AppResult<bool> {
        Ok(self.pagos.values().any(|p| p.registro_id == registro_id))
    }

    async fn find_pago_detalle(&mut self) -> AppResult<Vec<PagoDetalle>> {
        let detalle = self
            .pagos
            .values()
            .filter_map(|p| {
                let registro = self.registros.get(&p.registro_id)?;
                let auto = self.autos.get(&registro.auto_id)?;
                Some(PagoDetalle {
                    pago_id: p.id,
                    fecha_pago: p.fecha_pago,
                    monto: p.monto,
                    metodo: p.metodo.clone(),
                    hora_llegada: registro.hora_llegada,
                    hora_salida: registro.hora_salida,
                    patente: auto.patente.clone(),
                })
            })
            .collect();
        Ok(detalle)
    }

    async fn save_pago(&mut self, pago: Pago) -> AppResult<Pago> {
        if !self.registros.contains_key(&pago.registro_id) {
            return Err(foreign_key("pagos", "registro_id", pago.registro_id));
        }
        upsert(&mut self.pagos, &mut self.secuencia, pago)
    }

    async fn delete_pago(&mut self, id: i64) -> AppResult<()> {
        remove(&mut self.pagos, &mut self.eliminados, "pagos", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(nombre: &str) -> Region {
        Region {
            id: 0,
            codigo: 13,
            nombre: nombre.to_string(),
        }
    }

    #[tokio::test]
    async fn test_save_assigns_increasing_ids() {
        let mut store = MemoryStore::new();
        let a = store.save_region(region("Metropolitana")).await.unwrap();
        let b = store.save_region(region("Valparaíso")).await.unwrap();

        assert!(a.id > 0);
        assert!(b.id > a.id);
        assert_eq!(store.find_regiones().await.unwrap(), vec![a, b]);
    }

    #[tokio::test]
    async fn test_save_with_unknown_id_is_not_found() {
        let mut store = MemoryStore::new();
        let mut fantasma = region("Biobío");
        fantasma.id = 99;

        let result = store.save_region(fantasma).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_referenced_parent_fails() {
        let mut store = MemoryStore::new();
        let region = store.save_region(region("Metropolitana")).await.unwrap();
        store
            .save_comuna(Comuna {
                id: 0,
                codigo: 13101,
                nombre: "Santiago".to_string(),
                region_id: region.id,
            })
            .await
            .unwrap();

        assert!(store.delete_region(region.id).await.is_err());
        assert!(store.eliminados().is_empty());
    }

    #[tokio::test]
    async fn test_save_with_missing_parent_fails() {
        let mut store = MemoryStore::new();
        let result = store
            .save_comuna(Comuna {
                id: 0,
                codigo: 13101,
                nombre: "Santiago".to_string(),
                region_id: 7,
            })
            .await;

        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_row_is_noop() {
        let mut store = MemoryStore::new();
        store.delete_region(5).await.unwrap();
        assert!(store.eliminados().is_empty());
    }
}
