//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos. Las funciones `validate_*` siguen la firma que
//! espera `#[validate(custom = "...")]`.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};
use validator::ValidationError;

use crate::models::fueling::to_storage_scale;
use crate::utils::cpf::is_valid_cpf;

/// Fracción máxima aceptada en la entrada (se guarda con 2)
pub const MAX_INPUT_DECIMAL_PLACES: u32 = 3;

/// Límite exclusivo impuesto por NUMERIC(10,2)
pub const MAX_QUANTITY: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

/// Validar CPF (dígitos verificadores, acepta puntuación)
pub fn validate_cpf(value: &str) -> Result<(), ValidationError> {
    if !is_valid_cpf(value) {
        let mut error = ValidationError::new("cpf");
        error.message = Some(Cow::from("CPF inválido"));
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea positivo
pub fn validate_positive<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value <= T::zero() {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar precio o volumen: positivo, hasta 3 decimales, y que quepa en NUMERIC(10,2)
pub fn validate_quantity(value: &Decimal) -> Result<(), ValidationError> {
    validate_positive(*value)?;

    if value.normalize().scale() > MAX_INPUT_DECIMAL_PLACES {
        let mut error = ValidationError::new("decimal_places");
        error.add_param("value".into(), value);
        error.add_param("max".into(), &MAX_INPUT_DECIMAL_PLACES);
        return Err(error);
    }

    // Los límites se comprueban sobre el valor que se guarda
    let stored = to_storage_scale(*value);

    // 0.004 pasaría como positivo pero se guardaría como 0.00
    if stored.is_zero() {
        let mut error = ValidationError::new("min_stored_value");
        error.add_param("value".into(), value);
        return Err(error);
    }

    if stored >= MAX_QUANTITY {
        let mut error = ValidationError::new("max_digits");
        error.add_param("value".into(), value);
        error.add_param("max_exclusive".into(), &MAX_QUANTITY);
        return Err(error);
    }

    Ok(())
}

/// Validar y convertir string a datetime.
///
/// Acepta RFC3339 con offset. Un timestamp ISO 8601 sin zona horaria se
/// interpreta como UTC.
pub fn validate_datetime(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .map_err(|_| {
            let mut error = ValidationError::new("datetime");
            error.add_param("value".into(), &value.to_string());
            error.add_param("format".into(), &"ISO 8601".to_string());
            error
        })
}

/// `deserialize_with` para timestamps obligatorios
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    validate_datetime(&raw)
        .map_err(|_| de::Error::custom(format!("invalid timestamp '{}', expected ISO 8601", raw)))
}

/// `deserialize_with` para timestamps opcionales (query strings)
pub fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => validate_datetime(&raw).map(Some).map_err(|_| {
            de::Error::custom(format!("invalid timestamp '{}', expected ISO 8601", raw))
        }),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_validate_cpf() {
        assert!(validate_cpf("52998224725").is_ok());
        assert!(validate_cpf("529.982.247-25").is_ok());

        let err = validate_cpf("12345678900").unwrap_err();
        assert_eq!(err.code, "cpf");
        assert!(validate_cpf("00000000000").is_err());
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive(5).is_ok());
        assert!(validate_positive(0).is_err());
        assert!(validate_positive(-5).is_err());
        assert!(validate_positive(dec("0.001")).is_ok());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(&dec("5.499")).is_ok());
        assert!(validate_quantity(&dec("40")).is_ok());
        assert!(validate_quantity(&dec("6.5000")).is_ok());
        assert!(validate_quantity(&dec("99999999.99")).is_ok());

        assert_eq!(validate_quantity(&dec("0")).unwrap_err().code, "positive");
        assert_eq!(validate_quantity(&dec("-1.50")).unwrap_err().code, "positive");
        assert_eq!(validate_quantity(&dec("5.4999")).unwrap_err().code, "decimal_places");
        assert_eq!(validate_quantity(&dec("0.004")).unwrap_err().code, "min_stored_value");
        assert!(validate_quantity(&dec("0.005")).is_ok());
        assert_eq!(validate_quantity(&dec("100000000")).unwrap_err().code, "max_digits");
        // se guardaría como 100000000.00
        assert_eq!(validate_quantity(&dec("99999999.995")).unwrap_err().code, "max_digits");
        assert!(validate_quantity(&dec("99999999.994")).is_ok());
    }

    #[test]
    fn test_validate_datetime() {
        let with_offset = validate_datetime("2024-01-15T10:30:00-03:00").unwrap();
        assert_eq!(with_offset.hour(), 13);

        let naive = validate_datetime("2024-01-15T10:30:00.123456").unwrap();
        assert_eq!(naive.day(), 15);
        assert_eq!(naive.hour(), 10);

        assert!(validate_datetime("2024-01-15 10:30:00").is_ok());
        assert!(validate_datetime("15/01/2024").is_err());
        assert!(validate_datetime("").is_err());
    }

    #[derive(Debug, Deserialize)]
    struct Window {
        #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
        start: Option<DateTime<Utc>>,
    }

    #[test]
    fn test_deserialize_optional_timestamp() {
        let w: Window = serde_json::from_str(r#"{"start": "2024-01-15T00:00:00Z"}"#).unwrap();
        assert!(w.start.is_some());

        let w: Window = serde_json::from_str("{}").unwrap();
        assert!(w.start.is_none());

        assert!(serde_json::from_str::<Window>(r#"{"start": "ayer"}"#).is_err());
    }
}
