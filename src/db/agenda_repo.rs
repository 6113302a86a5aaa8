// src/db/agenda_repo.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::agenda::{AsignacionPatron, Excepcion, Patron, PatronDetalle, VentanaPuesto},
};

#[async_trait]
pub trait AgendaRepo: Send + Sync {
    /// Asignación de patrón propia del empleado, si tiene una.
    async fn asignacion_para_legajo(
        &self,
        legajo: &str,
    ) -> Result<Option<AsignacionPatron>, AppError>;

    /// Asignación de patrón del puesto, el fallback cuando el empleado
    /// no tiene una propia.
    async fn asignacion_para_puesto(
        &self,
        puesto: &str,
    ) -> Result<Option<AsignacionPatron>, AppError>;

    async fn patron(&self, patron_id: i64) -> Result<Option<Patron>, AppError>;

    async fn detalles(&self, patron_id: i64) -> Result<Vec<PatronDetalle>, AppError>;

    /// Excepciones del empleado dentro del rango inclusivo [desde, hasta].
    async fn excepciones_rango(
        &self,
        legajo: &str,
        desde: NaiveDate,
        hasta: NaiveDate,
    ) -> Result<Vec<Excepcion>, AppError>;

    /// Ventanas horarias explícitas del puesto (todas, una por turno).
    async fn ventanas_puesto(&self, puesto: &str) -> Result<Vec<VentanaPuesto>, AppError>;

    /// Alta o reemplazo de la excepción del empleado para esa fecha.
    async fn guardar_excepcion(&self, excepcion: &Excepcion) -> Result<Excepcion, AppError>;

    /// Devuelve false si no había excepción que borrar.
    async fn borrar_excepcion(&self, legajo: &str, fecha: NaiveDate) -> Result<bool, AppError>;
}

#[derive(Clone)]
pub struct PgAgendaRepo {
    pool: PgPool,
}

impl PgAgendaRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AgendaRepo for PgAgendaRepo {
    async fn asignacion_para_legajo(
        &self,
        legajo: &str,
    ) -> Result<Option<AsignacionPatron>, AppError> {
        let asignacion = sqlx::query_as::<_, AsignacionPatron>(
            r#"
            SELECT id, legajo, puesto, patron_id, fecha_ancla
            FROM calendario_empleado_patron
            WHERE legajo = $1
            "#,
        )
        .bind(legajo)
        .fetch_optional(&self.pool)
        .await?;

        Ok(asignacion)
    }

    async fn asignacion_para_puesto(
        &self,
        puesto: &str,
    ) -> Result<Option<AsignacionPatron>, AppError> {
        let asignacion = sqlx::query_as::<_, AsignacionPatron>(
            r#"
            SELECT id, legajo, puesto, patron_id, fecha_ancla
            FROM calendario_empleado_patron
            WHERE puesto = $1
            "#,
        )
        .bind(puesto)
        .fetch_optional(&self.pool)
        .await?;

        Ok(asignacion)
    }

    async fn patron(&self, patron_id: i64) -> Result<Option<Patron>, AppError> {
        let patron = sqlx::query_as::<_, Patron>(
            "SELECT id, nombre, ciclo_dias FROM calendario_patrones WHERE id = $1",
        )
        .bind(patron_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(patron)
    }

    async fn detalles(&self, patron_id: i64) -> Result<Vec<PatronDetalle>, AppError> {
        let detalles = sqlx::query_as::<_, PatronDetalle>(
            r#"
            SELECT patron_id, dia_indice, turno
            FROM calendario_patron_detalle
            WHERE patron_id = $1
            ORDER BY dia_indice ASC
            "#,
        )
        .bind(patron_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(detalles)
    }

    async fn excepciones_rango(
        &self,
        legajo: &str,
        desde: NaiveDate,
        hasta: NaiveDate,
    ) -> Result<Vec<Excepcion>, AppError> {
        let excepciones = sqlx::query_as::<_, Excepcion>(
            r#"
            SELECT legajo, fecha, tipo, puesto_override, turno_override, motivo
            FROM calendario_excepciones
            WHERE legajo = $1 AND fecha BETWEEN $2 AND $3
            ORDER BY fecha ASC
            "#,
        )
        .bind(legajo)
        .bind(desde)
        .bind(hasta)
        .fetch_all(&self.pool)
        .await?;

        Ok(excepciones)
    }

    async fn ventanas_puesto(&self, puesto: &str) -> Result<Vec<VentanaPuesto>, AppError> {
        let ventanas = sqlx::query_as::<_, VentanaPuesto>(
            r#"
            SELECT puesto, turno, inicio_min, fin_min
            FROM calendario_ventanas_puesto
            WHERE puesto = $1
            "#,
        )
        .bind(puesto)
        .fetch_all(&self.pool)
        .await?;

        Ok(ventanas)
    }

    async fn guardar_excepcion(&self, excepcion: &Excepcion) -> Result<Excepcion, AppError> {
        let guardada = sqlx::query_as::<_, Excepcion>(
            r#"
            INSERT INTO calendario_excepciones
                (legajo, fecha, tipo, puesto_override, turno_override, motivo)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (legajo, fecha) DO UPDATE SET
                tipo = EXCLUDED.tipo,
                puesto_override = EXCLUDED.puesto_override,
                turno_override = EXCLUDED.turno_override,
                motivo = EXCLUDED.motivo
            RETURNING legajo, fecha, tipo, puesto_override, turno_override, motivo
            "#,
        )
        .bind(&excepcion.legajo)
        .bind(excepcion.fecha)
        .bind(excepcion.tipo)
        .bind(&excepcion.puesto_override)
        .bind(excepcion.turno_override)
        .bind(&excepcion.motivo)
        .fetch_one(&self.pool)
        .await?;

        Ok(guardada)
    }

    async fn borrar_excepcion(&self, legajo: &str, fecha: NaiveDate) -> Result<bool, AppError> {
        let resultado = sqlx::query(
            "DELETE FROM calendario_excepciones WHERE legajo = $1 AND fecha = $2",
        )
        .bind(legajo)
        .bind(fecha)
        .execute(&self.pool)
        .await?;

        Ok(resultado.rows_affected() > 0)
    }
}
