// src/models/arqueos.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;
use utoipa::ToSchema;

use crate::models::agenda::Turno;
use crate::models::empleados::Sector;

/// Un arqueo de caja: la diferencia total de un sector + fecha + turno.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Arqueo {
    pub id: Uuid,

    pub sector: Sector,

    #[schema(value_type = String, format = Date, example = "2024-03-01")]
    pub fecha: NaiveDate,

    pub turno: Turno,

    #[schema(example = "1500.00")]
    pub diferencia_objetivo: Decimal,

    #[schema(example = "Faltante en caja 2")]
    pub notas: String,

    pub created_at: DateTime<Utc>,
}

/// Propuesta de reparto por empleado. `monto_final` arranca igual al
/// propuesto y queda editable hasta la confirmación.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Propuesta {
    pub arqueo_id: Uuid,
    pub legajo: String,

    #[schema(example = "playero")]
    pub puesto: String,

    #[schema(example = 480)]
    pub minutos_trabajados: i32,

    #[schema(example = "1000.00")]
    pub monto_propuesto: Decimal,

    #[schema(example = "1000.00")]
    pub monto_final: Decimal,
}

/// Fila confirmada de reparto. Confirmar reemplaza todas las filas del arqueo.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AsignacionConfirmada {
    pub arqueo_id: Uuid,
    pub legajo: String,
    pub puesto: String,
    pub minutos_trabajados: i32,
    pub monto_propuesto: Decimal,
    pub monto_final: Decimal,
}

/// Estado de cierre de un arqueo: objetivo contra lo repartido.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BalanceArqueo {
    pub arqueo_id: Uuid,
    pub sector: Sector,
    pub turno: Turno,

    #[schema(example = "1500.00")]
    pub objetivo: Decimal,

    #[schema(example = "1600.00")]
    pub asignado: Decimal,

    /// Con signo: positivo = sobre-repartido.
    #[schema(example = "100.00")]
    pub diferencia: Decimal,

    pub balanceado: bool,
}

/// Lo que devuelve guardar-y-calcular por cada turno persistido.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultadoCalculo {
    pub arqueo: Arqueo,
    pub propuestas: Vec<Propuesta>,

    /// Objetivo distinto de cero sin nadie que haya trabajado el turno:
    /// la pantalla tiene que avisarlo, acá no es un error.
    pub sin_empleados: bool,
}

/// Lo cargado en pantalla para un turno: diferencia de caja y notas.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntradaTurno {
    pub turno: Turno,

    #[schema(example = "1500.00")]
    pub monto: Decimal,

    #[serde(default)]
    #[schema(example = "Faltante en caja 2")]
    pub notas: String,
}

impl EntradaTurno {
    /// Monto en cero y sin notas: no hay nada que persistir.
    pub fn es_trivial(&self) -> bool {
        self.monto.is_zero() && self.notas.trim().is_empty()
    }
}

/// Fila que el usuario confirma; el servicio le agrega el arqueo.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilaConfirmacion {
    pub legajo: String,
    pub puesto: String,
    pub minutos_trabajados: i32,
    pub monto_propuesto: Decimal,
    pub monto_final: Decimal,
}

/// Un arqueo con sus propuestas vigentes, para la pantalla de edición.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArqueoConPropuestas {
    pub arqueo: Arqueo,
    pub propuestas: Vec<Propuesta>,
    pub balance: BalanceArqueo,
}
