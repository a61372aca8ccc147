//! Contrato de persistencia
//!
//! `ParkingStore` agrupa las consultas que necesitan los servicios. Cada
//! instancia representa una unidad de trabajo: `PgStore` envuelve una
//! transacción de PostgreSQL y `MemoryStore` mantiene las tablas en memoria.
//!
//! Convenciones:
//! - `save_*` inserta cuando el id es `0` y sobrescribe la fila completa en
//!   otro caso; un id distinto de cero que no existe es `NotFound`.
//! - `delete_*` sobre un id inexistente no falla.
//! - los listados se devuelven ordenados por id.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{
    Auto, Comuna, Estacionamiento, OcupacionDetalle, Pago, PagoDetalle, Region, Registro,
    Sucursal, Usuario,
};
use crate::utils::errors::AppResult;

#[async_trait]
pub trait ParkingStore: Send {
    // Regiones
    async fn find_regiones(&mut self) -> AppResult<Vec<Region>>;
    async fn find_region(&mut self, id: i64) -> AppResult<Option<Region>>;
    async fn find_region_by_nombre(&mut self, nombre: &str) -> AppResult<Option<Region>>;
    async fn save_region(&mut self, region: Region) -> AppResult<Region>;
    async fn delete_region(&mut self, id: i64) -> AppResult<()>;

    // Comunas
    async fn find_comunas(&mut self) -> AppResult<Vec<Comuna>>;
    async fn find_comuna(&mut self, id: i64) -> AppResult<Option<Comuna>>;
    async fn find_comuna_by_codigo(&mut self, codigo: i64) -> AppResult<Option<Comuna>>;
    async fn find_comunas_by_region(&mut self, region_id: i64) -> AppResult<Vec<Comuna>>;
    async fn find_comunas_by_nombre_and_region(
        &mut self,
        nombre: &str,
        region_id: i64,
    ) -> AppResult<Vec<Comuna>>;
    async fn save_comuna(&mut self, comuna: Comuna) -> AppResult<Comuna>;
    async fn delete_comuna(&mut self, id: i64) -> AppResult<()>;

    // Sucursales
    async fn find_sucursales(&mut self) -> AppResult<Vec<Sucursal>>;
    async fn find_sucursal(&mut self, id: i64) -> AppResult<Option<Sucursal>>;
    async fn find_sucursales_by_nombre(&mut self, nombre: &str) -> AppResult<Vec<Sucursal>>;
    async fn find_sucursales_by_direccion(&mut self, direccion: &str) -> AppResult<Vec<Sucursal>>;
    async fn find_sucursales_by_comuna(&mut self, comuna_id: i64) -> AppResult<Vec<Sucursal>>;
    async fn save_sucursal(&mut self, sucursal: Sucursal) -> AppResult<Sucursal>;
    async fn delete_sucursal(&mut self, id: i64) -> AppResult<()>;

    // Estacionamientos
    async fn find_estacionamientos(&mut self) -> AppResult<Vec<Estacionamiento>>;
    async fn find_estacionamiento(&mut self, id: i64) -> AppResult<Option<Estacionamiento>>;
    /// El número no es único entre sucursales: devuelve el de menor id
    async fn find_estacionamiento_by_numero(
        &mut self,
        numero: i32,
    ) -> AppResult<Option<Estacionamiento>>;
    async fn find_estacionamientos_by_ocupado(
        &mut self,
        ocupado: bool,
    ) -> AppResult<Vec<Estacionamiento>>;
    async fn find_estacionamientos_by_sucursal(
        &mut self,
        sucursal_id: i64,
    ) -> AppResult<Vec<Estacionamiento>>;
    async fn find_libres_by_sucursal(&mut self, sucursal_id: i64)
        -> AppResult<Vec<Estacionamiento>>;
    async fn find_estacionamiento_by_patente(
        &mut self,
        patente: &str,
    ) -> AppResult<Option<Estacionamiento>>;
    async fn find_estacionamientos_by_auto(
        &mut self,
        auto_id: i64,
    ) -> AppResult<Vec<Estacionamiento>>;
    async fn find_ocupacion_detalle(&mut self) -> AppResult<Vec<OcupacionDetalle>>;
    async fn save_estacionamiento(
        &mut self,
        estacionamiento: Estacionamiento,
    ) -> AppResult<Estacionamiento>;
    async fn delete_estacionamiento(&mut self, id: i64) -> AppResult<()>;

    // Autos
    async fn find_autos(&mut self) -> AppResult<Vec<Auto>>;
    async fn find_auto(&mut self, id: i64) -> AppResult<Option<Auto>>;
    async fn find_auto_by_patente(&mut self, patente: &str) -> AppResult<Option<Auto>>;
    async fn find_autos_by_usuario(&mut self, usuario_id: i64) -> AppResult<Vec<Auto>>;
    async fn save_auto(&mut self, auto: Auto) -> AppResult<Auto>;
    async fn delete_auto(&mut self, id: i64) -> AppResult<()>;

    // Usuarios
    async fn find_usuarios(&mut self) -> AppResult<Vec<Usuario>>;
    async fn find_usuario(&mut self, id: i64) -> AppResult<Option<Usuario>>;
    async fn find_usuario_by_correo(&mut self, correo: &str) -> AppResult<Option<Usuario>>;
    async fn find_usuario_by_run(&mut self, run: &str) -> AppResult<Option<Usuario>>;
    /// Búsqueda por nombre sin distinguir mayúsculas
    async fn find_usuarios_by_nombre(&mut self, nombre: &str) -> AppResult<Vec<Usuario>>;
    async fn save_usuario(&mut self, usuario: Usuario) -> AppResult<Usuario>;
    async fn delete_usuario(&mut self, id: i64) -> AppResult<()>;

    // Registros
    async fn find_registros(&mut self) -> AppResult<Vec<Registro>>;
    async fn find_registro(&mut self, id: i64) -> AppResult<Option<Registro>>;
    async fn find_registros_by_auto(&mut self, auto_id: i64) -> AppResult<Vec<Registro>>;
    async fn find_registros_by_patente(&mut self, patente: &str) -> AppResult<Vec<Registro>>;
    async fn find_open_registro(&mut self, auto_id: i64) -> AppResult<Option<Registro>>;
    async fn find_registros_activos(&mut self) -> AppResult<Vec<Registro>>;
    /// Registros cuya hora de llegada cae en `[desde, hasta]`
    async fn find_registros_between(
        &mut self,
        desde: DateTime<Utc>,
        hasta: DateTime<Utc>,
    ) -> AppResult<Vec<Registro>>;
    async fn save_registro(&mut self, registro: Registro) -> AppResult<Registro>;
    async fn delete_registro(&mut self, id: i64) -> AppResult<()>;

    // Pagos
    async fn find_pagos(&mut self) -> AppResult<Vec<Pago>>;
    async fn find_pago(&mut self, id: i64) -> AppResult<Option<Pago>>;
    async fn find_pagos_by_metodo(&mut self, metodo: &str) -> AppResult<Vec<Pago>>;
    /// Pagos cuya fecha cae en `[desde, hasta]`
    async fn find_pagos_between(
        &mut self,
        desde: DateTime<Utc>,
        hasta: DateTime<Utc>,
    ) -> AppResult<Vec<Pago>>;
    async fn find_pago_by_registro(&mut self, registro_id: i64) -> AppResult<Option<Pago>>;
    async fn exists_pago_by_registro(&mut self, registro_id: i64) -> AppResult<bool>;
    async fn find_pago_detalle(&mut self) -> AppResult<Vec<PagoDetalle>>;
    async fn save_pago(&mut self, pago: Pago) -> AppResult<Pago>;
    async fn delete_pago(&mut self, id: i64) -> AppResult<()>;
}
