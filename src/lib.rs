//! Servicio de ingesta de abastecimientos
//!
//! Recibe registros de abastecimiento de combustible, los valida, marca
//! los precios anómalos frente a una referencia por combustible y los
//! persiste en PostgreSQL.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
