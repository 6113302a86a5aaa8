// src/db/empleados_repo.rs
//
// El registro de empleados lo administra otro subsistema; acá solo se lee.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::empleados::{Empleado, Sector},
};

#[async_trait]
pub trait EmpleadosRepo: Send + Sync {
    /// Empleados activos, opcionalmente filtrados por sector.
    async fn activos(&self, sector: Option<Sector>) -> Result<Vec<Empleado>, AppError>;

    async fn buscar(&self, legajo: &str) -> Result<Option<Empleado>, AppError>;
}

#[derive(Clone)]
pub struct PgEmpleadosRepo {
    pool: PgPool,
}

impl PgEmpleadosRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmpleadosRepo for PgEmpleadosRepo {
    async fn activos(&self, sector: Option<Sector>) -> Result<Vec<Empleado>, AppError> {
        let empleados = sqlx::query_as::<_, Empleado>(
            r#"
            SELECT legajo, nombre, sector, puesto, activo
            FROM empleados
            WHERE activo AND ($1::sector IS NULL OR sector = $1)
            ORDER BY nombre ASC
            "#,
        )
        .bind(sector)
        .fetch_all(&self.pool)
        .await?;

        Ok(empleados)
    }

    async fn buscar(&self, legajo: &str) -> Result<Option<Empleado>, AppError> {
        let empleado = sqlx::query_as::<_, Empleado>(
            "SELECT legajo, nombre, sector, puesto, activo FROM empleados WHERE legajo = $1",
        )
        .bind(legajo)
        .fetch_optional(&self.pool)
        .await?;

        Ok(empleado)
    }
}
