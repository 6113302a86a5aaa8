// src/db/fichadas_repo.rs
//
// Lectura de las marcaciones del reloj. Las escribe el subsistema de
// asistencia; acá solo sirven de respaldo cuando la agenda no alcanza.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::{common::error::AppError, models::empleados::Fichada};

#[async_trait]
pub trait FichadasRepo: Send + Sync {
    async fn por_fecha(&self, fecha: NaiveDate) -> Result<Vec<Fichada>, AppError>;
}

#[derive(Clone)]
pub struct PgFichadasRepo {
    pool: PgPool,
}

impl PgFichadasRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FichadasRepo for PgFichadasRepo {
    async fn por_fecha(&self, fecha: NaiveDate) -> Result<Vec<Fichada>, AppError> {
        let fichadas = sqlx::query_as::<_, Fichada>(
            r#"
            SELECT legajo, fecha, entrada_min, salida_min
            FROM fichadas
            WHERE fecha = $1
            ORDER BY legajo, entrada_min
            "#,
        )
        .bind(fecha)
        .fetch_all(&self.pool)
        .await?;

        Ok(fichadas)
    }
}
