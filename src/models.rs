pub mod agenda;
pub mod arqueos;
pub mod empleados;
