// src/db/arqueos_repo.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::agenda::Turno,
    models::arqueos::{Arqueo, AsignacionConfirmada, Propuesta},
    models::empleados::Sector,
};

#[async_trait]
pub trait ArqueosRepo: Send + Sync {
    /// Alta o pisada del arqueo del sector + fecha + turno (last-write-wins).
    async fn upsert_arqueo(
        &self,
        sector: Sector,
        fecha: NaiveDate,
        turno: Turno,
        diferencia_objetivo: Decimal,
        notas: &str,
    ) -> Result<Arqueo, AppError>;

    async fn buscar(&self, id: Uuid) -> Result<Option<Arqueo>, AppError>;

    async fn por_fecha(
        &self,
        fecha: NaiveDate,
        sector: Option<Sector>,
    ) -> Result<Vec<Arqueo>, AppError>;

    /// Descarta las propuestas vigentes del arqueo y carga las nuevas.
    async fn reemplazar_propuestas(
        &self,
        arqueo_id: Uuid,
        propuestas: &[Propuesta],
    ) -> Result<(), AppError>;

    async fn propuestas(&self, arqueo_id: Uuid) -> Result<Vec<Propuesta>, AppError>;

    /// Devuelve false si el empleado no tiene propuesta en ese arqueo.
    async fn actualizar_monto_final(
        &self,
        arqueo_id: Uuid,
        legajo: &str,
        monto_final: Decimal,
    ) -> Result<bool, AppError>;

    /// Borra lo confirmado del arqueo e inserta las filas nuevas.
    /// Cubre un solo arqueo; nunca toca filas de otros.
    async fn reemplazar_confirmadas(
        &self,
        arqueo_id: Uuid,
        filas: &[AsignacionConfirmada],
    ) -> Result<u64, AppError>;
}

#[derive(Clone)]
pub struct PgArqueosRepo {
    pool: PgPool,
}

impl PgArqueosRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArqueosRepo for PgArqueosRepo {
    async fn upsert_arqueo(
        &self,
        sector: Sector,
        fecha: NaiveDate,
        turno: Turno,
        diferencia_objetivo: Decimal,
        notas: &str,
    ) -> Result<Arqueo, AppError> {
        let arqueo = sqlx::query_as::<_, Arqueo>(
            r#"
            INSERT INTO arqueos (sector, fecha, turno, diferencia_objetivo, notas)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (sector, fecha, turno) DO UPDATE SET
                diferencia_objetivo = EXCLUDED.diferencia_objetivo,
                notas = EXCLUDED.notas
            RETURNING id, sector, fecha, turno, diferencia_objetivo, notas, created_at
            "#,
        )
        .bind(sector)
        .bind(fecha)
        .bind(turno)
        .bind(diferencia_objetivo)
        .bind(notas)
        .fetch_one(&self.pool)
        .await?;

        Ok(arqueo)
    }

    async fn buscar(&self, id: Uuid) -> Result<Option<Arqueo>, AppError> {
        let arqueo = sqlx::query_as::<_, Arqueo>(
            r#"
            SELECT id, sector, fecha, turno, diferencia_objetivo, notas, created_at
            FROM arqueos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(arqueo)
    }

    async fn por_fecha(
        &self,
        fecha: NaiveDate,
        sector: Option<Sector>,
    ) -> Result<Vec<Arqueo>, AppError> {
        let arqueos = sqlx::query_as::<_, Arqueo>(
            r#"
            SELECT id, sector, fecha, turno, diferencia_objetivo, notas, created_at
            FROM arqueos
            WHERE fecha = $1 AND ($2::sector IS NULL OR sector = $2)
            ORDER BY sector, turno
            "#,
        )
        .bind(fecha)
        .bind(sector)
        .fetch_all(&self.pool)
        .await?;

        Ok(arqueos)
    }

    async fn reemplazar_propuestas(
        &self,
        arqueo_id: Uuid,
        propuestas: &[Propuesta],
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM arqueo_propuestas WHERE arqueo_id = $1")
            .bind(arqueo_id)
            .execute(&mut *tx)
            .await?;

        for p in propuestas {
            sqlx::query(
                r#"
                INSERT INTO arqueo_propuestas
                    (arqueo_id, legajo, puesto, minutos_trabajados, monto_propuesto, monto_final)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(arqueo_id)
            .bind(&p.legajo)
            .bind(&p.puesto)
            .bind(p.minutos_trabajados)
            .bind(p.monto_propuesto)
            .bind(p.monto_final)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn propuestas(&self, arqueo_id: Uuid) -> Result<Vec<Propuesta>, AppError> {
        let propuestas = sqlx::query_as::<_, Propuesta>(
            r#"
            SELECT arqueo_id, legajo, puesto, minutos_trabajados, monto_propuesto, monto_final
            FROM arqueo_propuestas
            WHERE arqueo_id = $1
            ORDER BY legajo ASC
            "#,
        )
        .bind(arqueo_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(propuestas)
    }

    async fn actualizar_monto_final(
        &self,
        arqueo_id: Uuid,
        legajo: &str,
        monto_final: Decimal,
    ) -> Result<bool, AppError> {
        let resultado = sqlx::query(
            r#"
            UPDATE arqueo_propuestas
            SET monto_final = $3
            WHERE arqueo_id = $1 AND legajo = $2
            "#,
        )
        .bind(arqueo_id)
        .bind(legajo)
        .bind(monto_final)
        .execute(&self.pool)
        .await?;

        Ok(resultado.rows_affected() > 0)
    }

    async fn reemplazar_confirmadas(
        &self,
        arqueo_id: Uuid,
        filas: &[AsignacionConfirmada],
    ) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM arqueo_asignaciones WHERE arqueo_id = $1")
            .bind(arqueo_id)
            .execute(&mut *tx)
            .await?;

        let mut insertadas = 0u64;
        for fila in filas {
            let resultado = sqlx::query(
                r#"
                INSERT INTO arqueo_asignaciones
                    (arqueo_id, legajo, puesto, minutos_trabajados, monto_propuesto, monto_final)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(arqueo_id)
            .bind(&fila.legajo)
            .bind(&fila.puesto)
            .bind(fila.minutos_trabajados)
            .bind(fila.monto_propuesto)
            .bind(fila.monto_final)
            .execute(&mut *tx)
            .await?;
            insertadas += resultado.rows_affected();
        }

        tx.commit().await?;
        Ok(insertadas)
    }
}
