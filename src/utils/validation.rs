//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos.

use chrono::NaiveDate;
use serde::Serialize;
use validator::ValidationError;

/// Validar y convertir string a fecha
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar formato de patente: solo letras y dígitos, entre 4 y 8 caracteres
pub fn validate_patente(value: &str) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if !(4..=8).contains(&len) || !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        let mut error = ValidationError::new("patente");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"4-8 caracteres alfanuméricos".to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de RUN: 7 u 8 dígitos, con dígito verificador opcional (`12345678-K`)
pub fn validate_run(value: &str) -> Result<(), ValidationError> {
    let (cuerpo, verificador) = match value.split_once('-') {
        Some((cuerpo, dv)) => (cuerpo, Some(dv)),
        None => (value, None),
    };

    let cuerpo_ok = (7..=8).contains(&cuerpo.len()) && cuerpo.chars().all(|c| c.is_ascii_digit());
    let verificador_ok = match verificador {
        Some(dv) => dv.len() == 1 && dv.chars().all(|c| c.is_ascii_digit() || c == 'k' || c == 'K'),
        None => true,
    };

    if !cuerpo_ok || !verificador_ok {
        let mut error = ValidationError::new("run");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}
