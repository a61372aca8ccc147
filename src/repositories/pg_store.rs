//! Implementación PostgreSQL de `ParkingStore`
//!
//! Cada `PgStore` es una transacción: se abre con `begin`, los servicios
//! trabajan sobre ella y el handler llama a `commit` al terminar. Si el
//! `PgStore` se descarta sin confirmar, la transacción se revierte.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use super::parking_store::ParkingStore;
use crate::models::{
    Auto, Comuna, Entidad, Estacionamiento, OcupacionDetalle, Pago, PagoDetalle, Region,
    Registro, Sucursal, Usuario,
};
use crate::utils::errors::{not_found_error, AppResult};

pub struct PgStore {
    tx: Transaction<'static, Postgres>,
}

impl PgStore {
    /// Abrir una transacción sobre el pool
    pub async fn begin(pool: &PgPool) -> AppResult<Self> {
        let tx = pool.begin().await?;
        Ok(Self { tx })
    }

    /// Confirmar la transacción
    pub async fn commit(self) -> AppResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl ParkingStore for PgStore {
    // ---------------------------------------------------------------- regiones

    async fn find_regiones(&mut self) -> AppResult<Vec<Region>> {
        let regiones =
            sqlx::query_as::<_, Region>("SELECT id, codigo, nombre FROM regiones ORDER BY id")
                .fetch_all(&mut *self.tx)
                .await?;
        Ok(regiones)
    }

    async fn find_region(&mut self, id: i64) -> AppResult<Option<Region>> {
        let region =
            sqlx::query_as::<_, Region>("SELECT id, codigo, nombre FROM regiones WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *self.tx)
                .await?;
        Ok(region)
    }

    async fn find_region_by_nombre(&mut self, nombre: &str) -> AppResult<Option<Region>> {
        let region = sqlx::query_as::<_, Region>(
            "SELECT id, codigo, nombre FROM regiones WHERE nombre = $1 ORDER BY id LIMIT 1",
        )
        .bind(nombre)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(region)
    }

    async fn save_region(&mut self, region: Region) -> AppResult<Region> {
        if region.is_new() {
            let saved = sqlx::query_as::<_, Region>(
                "INSERT INTO regiones (codigo, nombre) VALUES ($1, $2) RETURNING id, codigo, nombre",
            )
            .bind(region.codigo)
            .bind(&region.nombre)
            .fetch_one(&mut *self.tx)
            .await?;
            return Ok(saved);
        }

        sqlx::query_as::<_, Region>(
            "UPDATE regiones SET codigo = $2, nombre = $3 WHERE id = $1 RETURNING id, codigo, nombre",
        )
        .bind(region.id)
        .bind(region.codigo)
        .bind(&region.nombre)
        .fetch_optional(&mut *self.tx)
        .await?
        .ok_or_else(|| not_found_error(Region::RECURSO, region.id))
    }

    async fn delete_region(&mut self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM regiones WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    // ----------------------------------------------------------------- comunas

    async fn find_comunas(&mut self) -> AppResult<Vec<Comuna>> {
        let comunas = sqlx::query_as::<_, Comuna>(
            "SELECT id, codigo, nombre, region_id FROM comunas ORDER BY id",
        )
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(comunas)
    }

    async fn find_comuna(&mut self, id: i64) -> AppResult<Option<Comuna>> {
        let comuna = sqlx::query_as::<_, Comuna>(
            "SELECT id, codigo, nombre, region_id FROM comunas WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(comuna)
    }

    async fn find_comuna_by_codigo(&mut self, codigo: i64) -> AppResult<Option<Comuna>> {
        let comuna = sqlx::query_as::<_, Comuna>(
            "SELECT id, codigo, nombre, region_id FROM comunas WHERE codigo = $1 ORDER BY id LIMIT 1",
        )
        .bind(codigo)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(comuna)
    }

    async fn find_comunas_by_region(&mut self, region_id: i64) -> AppResult<Vec<Comuna>> {
        let comunas = sqlx::query_as::<_, Comuna>(
            "SELECT id, codigo, nombre, region_id FROM comunas WHERE region_id = $1 ORDER BY id",
        )
        .bind(region_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(comunas)
    }

    async fn find_comunas_by_nombre_and_region(
        &mut self,
        nombre: &str,
        region_id: i64,
    ) -> AppResult<Vec<Comuna>> {
        let comunas = sqlx::query_as::<_, Comuna>(
            r#"
            SELECT id, codigo, nombre, region_id
            FROM comunas
            WHERE nombre = $1 AND region_id = $2
            ORDER BY id
            "#,
        )
        .bind(nombre)
        .bind(region_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(comunas)
    }

    async fn save_comuna(&mut self, comuna: Comuna) -> AppResult<Comuna> {
        if comuna.is_new() {
            let saved = sqlx::query_as::<_, Comuna>(
                r#"
                INSERT INTO comunas (codigo, nombre, region_id)
                VALUES ($1, $2, $3)
                RETURNING id, codigo, nombre, region_id
                "#,
            )
            .bind(comuna.codigo)
            .bind(&comuna.nombre)
            .bind(comuna.region_id)
            .fetch_one(&mut *self.tx)
            .await?;
            return Ok(saved);
        }

        sqlx::query_as::<_, Comuna>(
            r#"
            UPDATE comunas
            SET codigo = $2, nombre = $3, region_id = $4
            WHERE id = $1
            RETURNING id, codigo, nombre, region_id
            "#,
        )
        .bind(comuna.id)
        .bind(comuna.codigo)
        .bind(&comuna.nombre)
        .bind(comuna.region_id)
        .fetch_optional(&mut *self.tx)
        .await?
        .ok_or_else(|| not_found_error(Comuna::RECURSO, comuna.id))
    }

    async fn delete_comuna(&mut self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM comunas WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    // -------------------------------------------------------------- sucursales

    async fn find_sucursales(&mut self) -> AppResult<Vec<Sucursal>> {
        let sucursales = sqlx::query_as::<_, Sucursal>(
            "SELECT id, nombre, direccion, telefono, comuna_id FROM sucursales ORDER BY id",
        )
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(sucursales)
    }

    async fn find_sucursal(&mut self, id: i64) -> AppResult<Option<Sucursal>> {
        let sucursal = sqlx::query_as::<_, Sucursal>(
            "SELECT id, nombre, direccion, telefono, comuna_id FROM sucursales WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(sucursal)
    }

    async fn find_sucursales_by_nombre(&mut self, nombre: &str) -> AppResult<Vec<Sucursal>> {
        let sucursales = sqlx::query_as::<_, Sucursal>(
            r#"
            SELECT id, nombre, direccion, telefono, comuna_id
            FROM sucursales
            WHERE nombre = $1
            ORDER BY id
            "#,
        )
        .bind(nombre)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(sucursales)
    }

    async fn find_sucursales_by_direccion(&mut self, direccion: &str) -> AppResult<Vec<Sucursal>> {
        let sucursales = sqlx::query_as::<_, Sucursal>(
            r#"
            SELECT id, nombre, direccion, telefono, comuna_id
            FROM sucursales
            WHERE direccion = $1
            ORDER BY id
            "#,
        )
        .bind(direccion)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(sucursales)
    }

    async fn find_sucursales_by_comuna(&mut self, comuna_id: i64) -> AppResult<Vec<Sucursal>> {
        let sucursales = sqlx::query_as::<_, Sucursal>(
            r#"
            SELECT id, nombre, direccion, telefono, comuna_id
            FROM sucursales
            WHERE comuna_id = $1
            ORDER BY id
            "#,
        )
        .bind(comuna_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(sucursales)
    }

    async fn save_sucursal(&mut self, sucursal: Sucursal) -> AppResult<Sucursal> {
        if sucursal.is_new() {
            let saved = sqlx::query_as::<_, Sucursal>(
                r#"
                INSERT INTO sucursales (nombre, direccion, telefono, comuna_id)
                VALUES ($1, $2, $3, $4)
                RETURNING id, nombre, direccion, telefono, comuna_id
                "#,
            )
            .bind(&sucursal.nombre)
            .bind(&sucursal.direccion)
            .bind(sucursal.telefono)
            .bind(sucursal.comuna_id)
            .fetch_one(&mut *self.tx)
            .await?;
            return Ok(saved);
        }

        sqlx::query_as::<_, Sucursal>(
            r#"
            UPDATE sucursales
            SET nombre = $2, direccion = $3, telefono = $4, comuna_id = $5
            WHERE id = $1
            RETURNING id, nombre, direccion, telefono, comuna_id
            "#,
        )
        .bind(sucursal.id)
        .bind(&sucursal.nombre)
        .bind(&sucursal.direccion)
        .bind(sucursal.telefono)
        .bind(sucursal.comuna_id)
        .fetch_optional(&mut *self.tx)
        .await?
        .ok_or_else(|| not_found_error(Sucursal::RECURSO, sucursal.id))
    }

    async fn delete_sucursal(&mut self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM sucursales WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    // -------------------------------------------------------- estacionamientos

    async fn find_estacionamientos(&mut self) -> AppResult<Vec<Estacionamiento>> {
        let estacionamientos = sqlx::query_as::<_, Estacionamiento>(
            "SELECT id, numero, ocupado, auto_id, sucursal_id FROM estacionamientos ORDER BY id",
        )
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(estacionamientos)
    }

    async fn find_estacionamiento(&mut self, id: i64) -> AppResult<Option<Estacionamiento>> {
        let estacionamiento = sqlx::query_as::<_, Estacionamiento>(
            "SELECT id, numero, ocupado, auto_id, sucursal_id FROM estacionamientos WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(estacionamiento)
    }

    async fn find_estacionamiento_by_numero(
        &mut self,
        numero: i32,
    ) -> AppResult<Option<Estacionamiento>> {
        let estacionamiento = sqlx::query_as::<_, Estacionamiento>(
            r#"
            SELECT id, numero, ocupado, auto_id, sucursal_id
            FROM estacionamientos
            WHERE numero = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(numero)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(estacionamiento)
    }

    async fn find_estacionamientos_by_ocupado(
        &mut self,
        ocupado: bool,
    ) -> AppResult<Vec<Estacionamiento>> {
        let estacionamientos = sqlx::query_as::<_, Estacionamiento>(
            r#"
            SELECT id, numero, ocupado, auto_id, sucursal_id
            FROM estacionamientos
            WHERE ocupado = $1
            ORDER BY id
            "#,
        )
        .bind(ocupado)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(estacionamientos)
    }

    async fn find_estacionamientos_by_sucursal(
        &mut self,
        sucursal_id: i64,
    ) -> AppResult<Vec<Estacionamiento>> {
        let estacionamientos = sqlx::query_as::<_, Estacionamiento>(
            r#"
            SELECT id, numero, ocupado, auto_id, sucursal_id
            FROM estacionamientos
            WHERE sucursal_id = $1
            ORDER BY id
            "#,
        )
        .bind(sucursal_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(estacionamientos)
    }

    async fn find_libres_by_sucursal(
        &mut self,
        sucursal_id: i64,
    ) -> AppResult<Vec<Estacionamiento>> {
        let estacionamientos = sqlx::query_as::<_, Estacionamiento>(
            r#"
            SELECT id, numero, ocupado, auto_id, sucursal_id
            FROM estacionamientos
            WHERE sucursal_id = $1 AND ocupado = FALSE
            ORDER BY id
            "#,
        )
        .bind(sucursal_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(estacionamientos)
    }

    async fn find_estacionamiento_by_patente(
        &mut self,
        patente: &str,
    ) -> AppResult<Option<Estacionamiento>> {
        let estacionamiento = sqlx::query_as::<_, Estacionamiento>(
            r#"
            SELECT e.id, e.numero, e.ocupado, e.auto_id, e.sucursal_id
            FROM estacionamientos e
            JOIN autos a ON a.id = e.auto_id
            WHERE a.patente = $1
            ORDER BY e.id
            LIMIT 1
            "#,
        )
        .bind(patente)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(estacionamiento)
    }

    async fn find_estacionamientos_by_auto(
        &mut self,
        auto_id: i64,
    ) -> AppResult<Vec<Estacionamiento>> {
        let estacionamientos = sqlx::query_as::<_, Estacionamiento>(
            r#"
            SELECT id, numero, ocupado, auto_id, sucursal_id
            FROM estacionamientos
            WHERE auto_id = $1
            ORDER BY id
            "#,
        )
        .bind(auto_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(estacionamientos)
    }

    async fn find_ocupacion_detalle(&mut self) -> AppResult<Vec<OcupacionDetalle>> {
        let detalle = sqlx::query_as::<_, OcupacionDetalle>(
            r#"
            SELECT e.numero, a.patente, u.nombre_completo
            FROM estacionamientos e
            JOIN autos a ON a.id = e.auto_id
            JOIN usuarios u ON u.id = a.usuario_id
            ORDER BY e.id
            "#,
        )
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(detalle)
    }

    async fn save_estacionamiento(
        &mut self,
        estacionamiento: Estacionamiento,
    ) -> AppResult<Estacionamiento> {
        if estacionamiento.is_new() {
            let saved = sqlx::query_as::<_, Estacionamiento>(
                r#"
                INSERT INTO estacionamientos (numero, ocupado, auto_id, sucursal_id)
                VALUES ($1, $2, $3, $4)
                RETURNING id, numero, ocupado, auto_id, sucursal_id
                "#,
            )
            .bind(estacionamiento.numero)
            .bind(estacionamiento.ocupado)
            .bind(estacionamiento.auto_id)
            .bind(estacionamiento.sucursal_id)
            .fetch_one(&mut *self.tx)
            .await?;
            return Ok(saved);
        }

        sqlx::query_as::<_, Estacionamiento>(
            r#"
            UPDATE estacionamientos
            SET numero = $2, ocupado = $3, auto_id = $4, sucursal_id = $5
            WHERE id = $1
            RETURNING id, numero, ocupado, auto_id, sucursal_id
            "#,
        )
        .bind(estacionamiento.id)
        .bind(estacionamiento.numero)
        .bind(estacionamiento.ocupado)
        .bind(estacionamiento.auto_id)
        .bind(estacionamiento.sucursal_id)
        .fetch_optional(&mut *self.tx)
        .await?
        .ok_or_else(|| not_found_error(Estacionamiento::RECURSO, estacionamiento.id))
    }

    async fn delete_estacionamiento(&mut self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM estacionamientos WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    // ------------------------------------------------------------------- autos

    async fn find_autos(&mut self) -> AppResult<Vec<Auto>> {
        let autos =
            sqlx::query_as::<_, Auto>("SELECT id, patente, usuario_id FROM autos ORDER BY id")
                .fetch_all(&mut *self.tx)
                .await?;
        Ok(autos)
    }

    async fn find_auto(&mut self, id: i64) -> AppResult<Option<Auto>> {
        let auto =
            sqlx::query_as::<_, Auto>("SELECT id, patente, usuario_id FROM autos WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *self.tx)
                .await?;
        Ok(auto)
    }

    async fn find_auto_by_patente(&mut self, patente: &str) -> AppResult<Option<Auto>> {
        let auto = sqlx::query_as::<_, Auto>(
            "SELECT id, patente, usuario_id FROM autos WHERE patente = $1",
        )
        .bind(patente)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(auto)
    }

    async fn find_autos_by_usuario(&mut self, usuario_id: i64) -> AppResult<Vec<Auto>> {
        let autos = sqlx::query_as::<_, Auto>(
            "SELECT id, patente, usuario_id FROM autos WHERE usuario_id = $1 ORDER BY id",
        )
        .bind(usuario_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(autos)
    }

    async fn save_auto(&mut self, auto: Auto) -> AppResult<Auto> {
        if auto.is_new() {
            let saved = sqlx::query_as::<_, Auto>(
                "INSERT INTO autos (patente, usuario_id) VALUES ($1, $2) RETURNING id, patente, usuario_id",
            )
            .bind(&auto.patente)
            .bind(auto.usuario_id)
            .fetch_one(&mut *self.tx)
            .await?;
            return Ok(saved);
        }

        sqlx::query_as::<_, Auto>(
            "UPDATE autos SET patente = $2, usuario_id = $3 WHERE id = $1 RETURNING id, patente, usuario_id",
        )
        .bind(auto.id)
        .bind(&auto.patente)
        .bind(auto.usuario_id)
        .fetch_optional(&mut *self.tx)
        .await?
        .ok_or_else(|| not_found_error(Auto::RECURSO, auto.id))
    }

    async fn delete_auto(&mut self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM autos WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    // ---------------------------------------------------------------- usuarios

    async fn find_usuarios(&mut self) -> AppResult<Vec<Usuario>> {
        let usuarios = sqlx::query_as::<_, Usuario>(
            "SELECT id, run, nombre_completo, correo, password FROM usuarios ORDER BY id",
        )
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(usuarios)
    }

    async fn find_usuario(&mut self, id: i64) -> AppResult<Option<Usuario>> {
        let usuario = sqlx::query_as::<_, Usuario>(
            "SELECT id, run, nombre_completo, correo, password FROM usuarios WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(usuario)
    }

    async fn find_usuario_by_correo(&mut self, correo: &str) -> AppResult<Option<Usuario>> {
        let usuario = sqlx::query_as::<_, Usuario>(
            "SELECT id, run, nombre_completo, correo, password FROM usuarios WHERE correo = $1",
        )
        .bind(correo)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(usuario)
    }

    async fn find_usuario_by_run(&mut self, run: &str) -> AppResult<Option<Usuario>> {
        let usuario = sqlx::query_as::<_, Usuario>(
            "SELECT id, run, nombre_completo, correo, password FROM usuarios WHERE run = $1",
        )
        .bind(run)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(usuario)
    }

    async fn find_usuarios_by_nombre(&mut self, nombre: &str) -> AppResult<Vec<Usuario>> {
        let usuarios = sqlx::query_as::<_, Usuario>(
            r#"
            SELECT id, run, nombre_completo, correo, password
            FROM usuarios
            WHERE nombre_completo ILIKE $1
            ORDER BY id
            "#,
        )
        .bind(format!("%{}%", nombre))
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(usuarios)
    }

    async fn save_usuario(&mut self, usuario: Usuario) -> AppResult<Usuario> {
        if usuario.is_new() {
            let saved = sqlx::query_as::<_, Usuario>(
                r#"
                INSERT INTO usuarios (run, nombre_completo, correo, password)
                VALUES ($1, $2, $3, $4)
                RETURNING id, run, nombre_completo, correo, password
                "#,
            )
            .bind(&usuario.run)
            .bind(&usuario.nombre_completo)
            .bind(&usuario.correo)
            .bind(&usuario.password)
            .fetch_one(&mut *self.tx)
            .await?;
            return Ok(saved);
        }

        sqlx::query_as::<_, Usuario>(
            r#"
            UPDATE usuarios
            SET run = $2, nombre_completo = $3, correo = $4, password = $5
            WHERE id = $1
            RETURNING id, run, nombre_completo, correo, password
            "#,
        )
        .bind(usuario.id)
        .bind(&usuario.run)
        .bind(&usuario.nombre_completo)
        .bind(&usuario.correo)
        .bind(&usuario.password)
        .fetch_optional(&mut *self.tx)
        .await?
        .ok_or_else(|| not_found_error(Usuario::RECURSO, usuario.id))
    }

    async fn delete_usuario(&mut self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM usuarios WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    // --------------------------------------------------------------- registros

    async fn find_registros(&mut self) -> AppResult<Vec<Registro>> {
        let registros = sqlx::query_as::<_, Registro>(
            "SELECT id, hora_llegada, hora_salida, auto_id FROM registros ORDER BY id",
        )
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(registros)
    }

    async fn find_registro(&mut self, id: i64) -> AppResult<Option<Registro>> {
        let registro = sqlx::query_as::<_, Registro>(
            "SELECT id, hora_llegada, hora_salida, auto_id FROM registros WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(registro)
    }

    async fn find_registros_by_auto(&mut self, auto_id: i64) -> AppResult<Vec<Registro>> {
        let registros = sqlx::query_as::<_, Registro>(
            r#"
            SELECT id, hora_llegada, hora_salida, auto_id
            FROM registros
            WHERE auto_id = $1
            ORDER BY id
            "#,
        )
        .bind(auto_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(registros)
    }

    async fn find_registros_by_patente(&mut self, patente: &str) -> AppResult<Vec<Registro>> {
        let registros = sqlx::query_as::<_, Registro>(
            r#"
            SELECT r.id, r.hora_llegada, r.hora_salida, r.auto_id
            FROM registros r
            JOIN autos a ON a.id = r.auto_id
            WHERE a.patente = $1
            ORDER BY r.id
            "#,
        )
        .bind(patente)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(registros)
    }

    async fn find_open_registro(&mut self, auto_id: i64) -> AppResult<Option<Registro>> {
        let registro = sqlx::query_as::<_, Registro>(
            r#"
            SELECT id, hora_llegada, hora_salida, auto_id
            FROM registros
            WHERE auto_id = $1 AND hora_salida IS NULL
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(auto_id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(registro)
    }

    async fn find_registros_activos(&mut self) -> AppResult<Vec<Registro>> {
        let registros = sqlx::query_as::<_, Registro>(
            r#"
            SELECT id, hora_llegada, hora_salida, auto_id
            FROM registros
            WHERE hora_salida IS NULL
            ORDER BY id
            "#,
        )
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(registros)
    }

    async fn find_registros_between(
        &mut self,
        desde: DateTime<Utc>,
        hasta: DateTime<Utc>,
    ) -> AppResult<Vec<Registro>> {
        let registros = sqlx::query_as::<_, Registro>(
            r#"
            SELECT id, hora_llegada, hora_salida, auto_id
            FROM registros
            WHERE hora_llegada BETWEEN $1 AND $2
            ORDER BY id
            "#,
        )
        .bind(desde)
        .bind(hasta)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(registros)
    }

    async fn save_registro(&mut self, registro: Registro) -> AppResult<Registro> {
        if registro.is_new() {
            let saved = sqlx::query_as::<_, Registro>(
                r#"
                INSERT INTO registros (hora_llegada, hora_salida, auto_id)
                VALUES ($1, $2, $3)
                RETURNING id, hora_llegada, hora_salida, auto_id
                "#,
            )
            .bind(registro.hora_llegada)
            .bind(registro.hora_salida)
            .bind(registro.auto_id)
            .fetch_one(&mut *self.tx)
            .await?;
            return Ok(saved);
        }

        sqlx::query_as::<_, Registro>(
            r#"
            UPDATE registros
            SET hora_llegada = $2, hora_salida = $3, auto_id = $4
            WHERE id = $1
            RETURNING id, hora_llegada, hora_salida, auto_id
            "#,
        )
        .bind(registro.id)
        .bind(registro.hora_llegada)
        .bind(registro.hora_salida)
        .bind(registro.auto_id)
        .fetch_optional(&mut *self.tx)
        .await?
        .ok_or_else(|| not_found_error(Registro::RECURSO, registro.id))
    }

    async fn delete_registro(&mut self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM registros WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    // ------------------------------------------------------------------- pagos

    async fn find_pagos(&mut self) -> AppResult<Vec<Pago>> {
        let pagos = sqlx::query_as::<_, Pago>(
            "SELECT id, fecha_pago, monto, metodo, registro_id FROM pagos ORDER BY id",
        )
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(pagos)
    }

    async fn find_pago(&mut self, id: i64) -> AppResult<Option<Pago>> {
        let pago = sqlx::query_as::<_, Pago>(
            "SELECT id, fecha_pago, monto, metodo, registro_id FROM pagos WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(pago)
    }

    async fn find_pagos_by_metodo(&mut self, metodo: &str) -> AppResult<Vec<Pago>> {
        let pagos = sqlx::query_as::<_, Pago>(
            r#"
            SELECT id, fecha_pago, monto, metodo, registro_id
            FROM pagos
            WHERE metodo = $1
            ORDER BY id
            "#,
        )
        .bind(metodo)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(pagos)
    }

    async fn find_pagos_between(
        &mut self,
        desde: DateTime<Utc>,
        hasta: DateTime<Utc>,
    ) -> AppResult<Vec<Pago>> {
        let pagos = sqlx::query_as::<_, Pago>(
            r#"
            SELECT id, fecha_pago, monto, metodo, registro_id
            FROM pagos
            WHERE fecha_pago BETWEEN $1 AND $2
            ORDER BY id
            "#,
        )
        .bind(desde)
        .bind(hasta)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(pagos)
    }

    async fn find_pago_by_registro(&mut self, registro_id: i64) -> AppResult<Option<Pago>> {
        let pago = sqlx::query_as::<_, Pago>(
            "SELECT id, fecha_pago, monto, metodo, registro_id FROM pagos WHERE registro_id = $1",
        )
        .bind(registro_id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(pago)
    }

    async fn exists_pago_by_registro(&mut self, registro_id: i64) -> AppResult<bool> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pagos WHERE registro_id = $1)")
                .bind(registro_id)
                .fetch_one(&mut *self.tx)
                .await?;
        Ok(result.0)
    }

    async fn find_pago_detalle(&mut self) -> AppResult<Vec<PagoDetalle>> {
        let detalle = sqlx::query_as::<_, PagoDetalle>(
            r#"
            SELECT p.id AS pago_id, p.fecha_pago, p.monto, p.metodo,
                   r.hora_llegada, r.hora_salida, a.patente
            FROM pagos p
            JOIN registros r ON r.id = p.registro_id
            JOIN autos a ON a.id = r.auto_id
            ORDER BY p.id
            "#,
        )
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(detalle)
    }

    async fn save_pago(&mut self, pago: Pago) -> AppResult<Pago> {
        if pago.is_new() {
            let saved = sqlx::query_as::<_, Pago>(
                r#"
                INSERT INTO pagos (fecha_pago, monto, metodo, registro_id)
                VALUES ($1, $2, $3, $4)
                RETURNING id, fecha_pago, monto, metodo, registro_id
                "#,
            )
            .bind(pago.fecha_pago)
            .bind(pago.monto)
            .bind(&pago.metodo)
            .bind(pago.registro_id)
            .fetch_one(&mut *self.tx)
            .await?;
            return Ok(saved);
        }

        sqlx::query_as::<_, Pago>(
            r#"
            UPDATE pagos
            SET fecha_pago = $2, monto = $3, metodo = $4, registro_id = $5
            WHERE id = $1
            RETURNING id, fecha_pago, monto, metodo, registro_id
            "#,
        )
        .bind(pago.id)
        .bind(pago.fecha_pago)
        .bind(pago.monto)
        .bind(&pago.metodo)
        .bind(pago.registro_id)
        .fetch_optional(&mut *self.tx)
        .await?
        .ok_or_else(|| not_found_error(Pago::RECURSO, pago.id))
    }

    async fn delete_pago(&mut self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM pagos WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }
}
