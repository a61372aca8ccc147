//! Modelo de Usuario
//!
//! La contraseña se guarda como hash bcrypt y nunca se serializa en las respuestas.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::Entidad;
use crate::utils::validation::validate_run;

/// Usuario - dueño de autos; `correo` y `run` son únicos
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct Usuario {
    #[serde(default)]
    pub id: i64,
    #[validate(custom = "validate_run")]
    pub run: String,
    #[validate(length(min = 2, max = 150))]
    pub nombre_completo: String,
    #[validate(email)]
    pub correo: String,
    #[serde(skip_serializing, default)]
    #[validate(length(min = 6, max = 100))]
    pub password: String,
}

impl Entidad for Usuario {
    const RECURSO: &'static str = "Usuario";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PatchUsuario {
    #[validate(custom = "validate_run")]
    pub run: Option<String>,
    #[validate(length(min = 2, max = 150))]
    pub nombre_completo: Option<String>,
    #[validate(email)]
    pub correo: Option<String>,
    #[validate(length(min = 6, max = 100))]
    pub password: Option<String>,
}

impl PatchUsuario {
    /// Aplica los campos presentes. La contraseña se aplica tal cual: el
    /// servicio la reemplaza por su hash antes de llamar a este método.
    pub fn apply_to(self, usuario: &mut Usuario) {
        if let Some(run) = self.run {
            usuario.run = run;
        }
        if let Some(nombre_completo) = self.nombre_completo {
            usuario.nombre_completo = nombre_completo;
        }
        if let Some(correo) = self.correo {
            usuario.correo = correo;
        }
        if let Some(password) = self.password {
            usuario.password = password;
        }
    }
}
