pub mod agenda_service;
pub use agenda_service::AgendaService;
pub mod arqueo_service;
pub use arqueo_service::ArqueoService;
