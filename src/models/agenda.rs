// src/models/agenda.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::NaiveDate;
use utoipa::ToSchema;

use crate::common::tiempo::VentanaHoraria;

// --- Enums (mapean los tipos de Postgres) ---

/// Turno tal como se persiste: en los detalles de patrón y en las
/// excepciones. `Franco` es un valor válido de patrón (día libre programado).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "turno", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Turno {
    Manana,
    Tarde,
    Noche,
    Franco,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "tipo_excepcion", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TipoExcepcion {
    CambioTurno,
    Vacaciones,
    Licencia,
    Enfermedad,
    Permiso,
    FrancoExtra,
}

impl TipoExcepcion {
    /// Las ausencias anulan el turno del día entero, sin ventana horaria.
    pub fn es_ausencia(&self) -> bool {
        matches!(
            self,
            TipoExcepcion::Vacaciones
                | TipoExcepcion::Licencia
                | TipoExcepcion::Enfermedad
                | TipoExcepcion::Permiso
        )
    }
}

/// Código efectivo de un día ya resuelto. A diferencia de `Turno`, acá
/// aparecen también la ausencia y el "sin agenda".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CodigoTurno {
    Manana,
    Tarde,
    Noche,
    Franco,
    Ausencia,
    SinAgenda,
}

impl From<Turno> for CodigoTurno {
    fn from(turno: Turno) -> Self {
        match turno {
            Turno::Manana => CodigoTurno::Manana,
            Turno::Tarde => CodigoTurno::Tarde,
            Turno::Noche => CodigoTurno::Noche,
            Turno::Franco => CodigoTurno::Franco,
        }
    }
}

impl CodigoTurno {
    /// El turno de trabajo subyacente, si el código representa uno.
    pub fn turno_laboral(&self) -> Option<Turno> {
        match self {
            CodigoTurno::Manana => Some(Turno::Manana),
            CodigoTurno::Tarde => Some(Turno::Tarde),
            CodigoTurno::Noche => Some(Turno::Noche),
            _ => None,
        }
    }
}

/// De dónde salió el turno efectivo de un día.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrigenTurno {
    Excepcion,
    PatronEmpleado,
    PatronPuesto,
    SinAgenda,
}

// --- Structs persistidas ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Patron {
    pub id: i64,

    #[schema(example = "Rotativo 6x2")]
    pub nombre: String,

    #[schema(example = 8)]
    pub ciclo_dias: i32,
}

/// Una fila por día del ciclo; `turno` en NULL significa sin agenda ese día.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatronDetalle {
    pub patron_id: i64,
    pub dia_indice: i32,
    pub turno: Option<Turno>,
}

/// Vincula un patrón con un empleado puntual o con todo un puesto.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AsignacionPatron {
    pub id: i64,
    pub legajo: Option<String>,
    pub puesto: Option<String>,
    pub patron_id: i64,

    #[schema(value_type = String, format = Date, example = "2024-01-01")]
    pub fecha_ancla: NaiveDate,
}

/// Override puntual por empleado y fecha. Siempre le gana al patrón.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Excepcion {
    pub legajo: String,

    #[schema(value_type = String, format = Date, example = "2024-03-15")]
    pub fecha: NaiveDate,

    pub tipo: TipoExcepcion,
    pub puesto_override: Option<String>,
    pub turno_override: Option<Turno>,

    #[schema(example = "Cubre a Pérez")]
    pub motivo: Option<String>,
}

/// Ventana horaria explícita de un puesto para un turno.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VentanaPuesto {
    pub puesto: String,
    pub turno: Turno,
    pub inicio_min: i32,
    pub fin_min: i32,
}

// --- Derivados (nunca se persisten) ---

/// El resultado del resolvedor para un empleado y un día.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiaResuelto {
    #[schema(value_type = String, format = Date, example = "2024-03-01")]
    pub fecha: NaiveDate,

    pub legajo: String,

    #[schema(example = "playero")]
    pub puesto: String,

    pub codigo: CodigoTurno,

    /// Ausente para franco, ausencia o sin agenda.
    pub ventana: Option<VentanaHoraria>,

    pub origen: OrigenTurno,
}

/// Fila de la grilla mensual: un empleado con su mes resuelto.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgendaEmpleado {
    pub empleado: crate::models::empleados::Empleado,
    pub dias: Vec<DiaResuelto>,
}
