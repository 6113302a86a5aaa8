// src/config.rs

use std::sync::Arc;
use std::{env, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{PgAgendaRepo, PgArqueosRepo, PgEmpleadosRepo, PgFichadasRepo},
    services::{AgendaService, ArqueoService},
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub agenda_service: Arc<AgendaService>,
    pub arqueo_service: Arc<ArqueoService>,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")?;

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexión con la base de datos establecida");

        // --- Arma el grafo de dependencias ---
        let empleados_repo = Arc::new(PgEmpleadosRepo::new(db_pool.clone()));
        let agenda_repo = Arc::new(PgAgendaRepo::new(db_pool.clone()));
        let arqueos_repo = Arc::new(PgArqueosRepo::new(db_pool.clone()));
        let fichadas_repo = Arc::new(PgFichadasRepo::new(db_pool.clone()));

        let agenda_service = Arc::new(AgendaService::new(
            empleados_repo.clone(),
            agenda_repo,
        ));
        let arqueo_service = Arc::new(ArqueoService::new(
            arqueos_repo,
            fichadas_repo,
            empleados_repo,
            agenda_service.clone(),
        ));

        Ok(Self {
            db_pool,
            agenda_service,
            arqueo_service,
        })
    }
}
