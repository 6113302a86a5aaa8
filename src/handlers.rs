pub mod agenda;
pub mod arqueos;
