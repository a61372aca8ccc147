use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::utils::errors::{bad_request_error, AppResult};
use crate::utils::validation::validate_not_empty;

/// Request para cobrar un registro cerrado
#[derive(Debug, Deserialize, Validate)]
pub struct CrearPagoRequest {
    pub registro_id: i64,
    #[validate(custom = "validate_not_empty", length(max = 30))]
    pub metodo: String,
}

/// Query `?desde=...&hasta=...` con fechas RFC 3339
#[derive(Debug, Deserialize)]
pub struct RangoFechasQuery {
    pub desde: DateTime<Utc>,
    pub hasta: DateTime<Utc>,
}

impl RangoFechasQuery {
    pub fn check(&self) -> AppResult<()> {
        if self.desde > self.hasta {
            return Err(bad_request_error("'desde' debe ser anterior a 'hasta'"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_inverted_range_is_rejected() {
        let ahora = Utc::now();
        let rango = RangoFechasQuery {
            desde: ahora,
            hasta: ahora - Duration::days(1),
        };
        assert!(rango.check().is_err());

        let rango = RangoFechasQuery {
            desde: ahora - Duration::days(1),
            hasta: ahora,
        };
        assert!(rango.check().is_ok());
    }

    #[test]
    fn test_blank_metodo_is_rejected() {
        let request = CrearPagoRequest {
            registro_id: 1,
            metodo: "   ".to_string(),
        };
        assert!(request.validate().is_err());
    }
}
