pub mod dto;
pub mod entity;
pub mod ports;
pub mod types;
