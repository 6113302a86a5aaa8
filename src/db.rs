pub mod agenda_repo;
pub use agenda_repo::{AgendaRepo, PgAgendaRepo};
pub mod arqueos_repo;
pub use arqueos_repo::{ArqueosRepo, PgArqueosRepo};
pub mod empleados_repo;
pub use empleados_repo::{EmpleadosRepo, PgEmpleadosRepo};
pub mod fichadas_repo;
pub use fichadas_repo::{FichadasRepo, PgFichadasRepo};

#[cfg(test)]
pub mod memoria;
