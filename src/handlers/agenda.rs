// src/handlers/agenda.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use validator::Validate;
use utoipa::{IntoParams, ToSchema};

use crate::{
    common::error::AppError,
    common::tiempo::fecha_iso,
    config::AppState,
    models::agenda::{AgendaEmpleado, DiaResuelto, Excepcion, TipoExcepcion, Turno},
};

fn fecha_requerida(texto: &str) -> Result<chrono::NaiveDate, AppError> {
    fecha_iso(texto).ok_or_else(|| AppError::DatoInvalido(format!("Fecha inválida: {texto}")))
}

// =============================================================================
//  AGENDA RESUELTA
// =============================================================================

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct RangoQuery {
    /// AAAA-MM-DD, inclusive.
    pub desde: String,
    /// AAAA-MM-DD, inclusive.
    pub hasta: String,
}

// GET /api/agenda/{legajo}
#[utoipa::path(
    get,
    path = "/api/agenda/{legajo}",
    tag = "Agenda",
    params(
        ("legajo" = String, Path, description = "Legajo del empleado"),
        RangoQuery
    ),
    responses(
        (status = 200, description = "Un día resuelto por cada día del rango", body = Vec<DiaResuelto>),
        (status = 400, description = "Fecha inválida"),
        (status = 404, description = "Empleado inexistente")
    )
)]
pub async fn agenda_empleado(
    State(app_state): State<AppState>,
    Path(legajo): Path<String>,
    Query(rango): Query<RangoQuery>,
) -> Result<impl IntoResponse, AppError> {
    let desde = fecha_requerida(&rango.desde)?;
    let hasta = fecha_requerida(&rango.hasta)?;

    let dias = app_state
        .agenda_service
        .resolver_rango(&legajo, desde, hasta)
        .await?;

    Ok((StatusCode::OK, Json(dias)))
}

// GET /api/agenda/grilla/{anio}/{mes}
#[utoipa::path(
    get,
    path = "/api/agenda/grilla/{anio}/{mes}",
    tag = "Agenda",
    params(
        ("anio" = i32, Path, description = "Año"),
        ("mes" = u32, Path, description = "Mes (1-12)")
    ),
    responses(
        (status = 200, description = "El mes resuelto para cada empleado activo", body = Vec<AgendaEmpleado>),
        (status = 400, description = "Mes inválido")
    )
)]
pub async fn grilla_mensual(
    State(app_state): State<AppState>,
    Path((anio, mes)): Path<(i32, u32)>,
) -> Result<impl IntoResponse, AppError> {
    let grilla = app_state.agenda_service.grilla_mensual(anio, mes).await?;
    Ok((StatusCode::OK, Json(grilla)))
}

// =============================================================================
//  EXCEPCIONES
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrearExcepcionPayload {
    #[validate(length(min = 1, message = "El legajo es obligatorio"))]
    #[schema(example = "1042")]
    pub legajo: String,

    /// AAAA-MM-DD.
    #[schema(example = "2024-03-15")]
    pub fecha: String,

    pub tipo: TipoExcepcion,

    #[schema(example = "cajero")]
    pub puesto_override: Option<String>,

    pub turno_override: Option<Turno>,

    #[schema(example = "Cubre a Pérez")]
    pub motivo: Option<String>,
}

// POST /api/agenda/excepciones
#[utoipa::path(
    post,
    path = "/api/agenda/excepciones",
    tag = "Agenda",
    request_body = CrearExcepcionPayload,
    responses(
        (status = 201, description = "Excepción creada o reemplazada", body = Excepcion),
        (status = 400, description = "Datos inválidos"),
        (status = 404, description = "Empleado inexistente")
    )
)]
pub async fn crear_excepcion(
    State(app_state): State<AppState>,
    Json(payload): Json<CrearExcepcionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let fecha = fecha_requerida(&payload.fecha)?;

    let excepcion = app_state
        .agenda_service
        .guardar_excepcion(Excepcion {
            legajo: payload.legajo,
            fecha,
            tipo: payload.tipo,
            puesto_override: payload.puesto_override,
            turno_override: payload.turno_override,
            motivo: payload.motivo,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(excepcion)))
}

// DELETE /api/agenda/excepciones/{legajo}/{fecha}
#[utoipa::path(
    delete,
    path = "/api/agenda/excepciones/{legajo}/{fecha}",
    tag = "Agenda",
    params(
        ("legajo" = String, Path, description = "Legajo del empleado"),
        ("fecha" = String, Path, description = "Fecha AAAA-MM-DD")
    ),
    responses(
        (status = 204, description = "Excepción borrada"),
        (status = 404, description = "No había excepción para ese día")
    )
)]
pub async fn borrar_excepcion(
    State(app_state): State<AppState>,
    Path((legajo, fecha)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let fecha = fecha_requerida(&fecha)?;
    app_state
        .agenda_service
        .borrar_excepcion(&legajo, fecha)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
