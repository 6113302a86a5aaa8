pub mod error;
pub mod montos;
pub mod tiempo;
