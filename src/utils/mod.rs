//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación
//! de campos y el algoritmo de CPF.

pub mod cpf;
pub mod errors;
pub mod validation;

pub use errors::{AppError, AppResult};
