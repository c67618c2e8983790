//! Services module
//!
//! Este módulo contiene la lógica de negocio: el pipeline de admisión de
//! abastecimientos y el proveedor de precios de referencia.

pub mod fueling_service;
pub mod reference_price;

pub use fueling_service::{exceeds_reference, FuelingService};
pub use reference_price::{ReferencePriceProvider, StaticReferencePrices};
