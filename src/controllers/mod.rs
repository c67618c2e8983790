pub mod fueling_controller;
pub mod health_controller;
