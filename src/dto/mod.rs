pub mod fueling_dto;
