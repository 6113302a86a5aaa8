// src/handlers/arqueos.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;
use utoipa::{IntoParams, ToSchema};

use crate::{
    common::error::AppError,
    common::tiempo::fecha_iso,
    config::AppState,
    models::arqueos::{
        ArqueoConPropuestas, BalanceArqueo, EntradaTurno, FilaConfirmacion, Propuesta,
        ResultadoCalculo,
    },
    models::empleados::Sector,
};

fn fecha_requerida(texto: &str) -> Result<chrono::NaiveDate, AppError> {
    fecha_iso(texto).ok_or_else(|| AppError::DatoInvalido(format!("Fecha inválida: {texto}")))
}

// =============================================================================
//  GUARDAR Y CALCULAR
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuardarArqueosPayload {
    /// AAAA-MM-DD. Obligatoria.
    #[schema(example = "2024-03-01")]
    pub fecha: Option<String>,

    pub sector: Sector,

    /// Una entrada por turno del sector; las triviales se descartan.
    pub turnos: Vec<EntradaTurno>,
}

// POST /api/arqueos
#[utoipa::path(
    post,
    path = "/api/arqueos",
    tag = "Arqueos",
    request_body = GuardarArqueosPayload,
    responses(
        (status = 201, description = "Arqueos persistidos con sus propuestas", body = Vec<ResultadoCalculo>),
        (status = 400, description = "Falta la fecha o el turno no es del sector")
    )
)]
pub async fn guardar_y_calcular(
    State(app_state): State<AppState>,
    Json(payload): Json<GuardarArqueosPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let fecha = payload
        .fecha
        .as_deref()
        .ok_or_else(|| AppError::DatoInvalido("Falta la fecha del arqueo".to_string()))?;
    let fecha = fecha_requerida(fecha)?;

    let resultados = app_state
        .arqueo_service
        .guardar_y_calcular(fecha, payload.sector, payload.turnos)
        .await?;

    Ok((StatusCode::CREATED, Json(resultados)))
}

// =============================================================================
//  CONSULTA Y EDICIÓN
// =============================================================================

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ArqueosQuery {
    /// AAAA-MM-DD.
    pub fecha: String,
    pub sector: Option<Sector>,
}

// GET /api/arqueos
#[utoipa::path(
    get,
    path = "/api/arqueos",
    tag = "Arqueos",
    params(ArqueosQuery),
    responses(
        (status = 200, description = "Arqueos de la fecha con propuestas y balance", body = Vec<ArqueoConPropuestas>),
        (status = 400, description = "Fecha inválida")
    )
)]
pub async fn arqueos_de_fecha(
    State(app_state): State<AppState>,
    Query(query): Query<ArqueosQuery>,
) -> Result<impl IntoResponse, AppError> {
    let fecha = fecha_requerida(&query.fecha)?;
    let arqueos = app_state
        .arqueo_service
        .arqueos_de_fecha(fecha, query.sector)
        .await?;
    Ok((StatusCode::OK, Json(arqueos)))
}

// GET /api/arqueos/{id}/balance
#[utoipa::path(
    get,
    path = "/api/arqueos/{id}/balance",
    tag = "Arqueos",
    params(("id" = Uuid, Path, description = "Id del arqueo")),
    responses(
        (status = 200, description = "Objetivo contra lo repartido", body = BalanceArqueo),
        (status = 404, description = "Arqueo inexistente")
    )
)]
pub async fn balance(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let balance = app_state.arqueo_service.verificar_balance(id).await?;
    Ok((StatusCode::OK, Json(balance)))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditarPropuestaPayload {
    /// Texto crudo del campo de monto: "1.234,56" o "1234.56".
    /// Lo ilegible vale 0.
    #[schema(example = "1.234,56")]
    pub monto: String,
}

// PUT /api/arqueos/{id}/propuestas/{legajo}
#[utoipa::path(
    put,
    path = "/api/arqueos/{id}/propuestas/{legajo}",
    tag = "Arqueos",
    params(
        ("id" = Uuid, Path, description = "Id del arqueo"),
        ("legajo" = String, Path, description = "Legajo del empleado")
    ),
    request_body = EditarPropuestaPayload,
    responses(
        (status = 200, description = "Propuesta con el monto final editado", body = Propuesta),
        (status = 404, description = "Arqueo o propuesta inexistente")
    )
)]
pub async fn editar_propuesta(
    State(app_state): State<AppState>,
    Path((id, legajo)): Path<(Uuid, String)>,
    Json(payload): Json<EditarPropuestaPayload>,
) -> Result<impl IntoResponse, AppError> {
    let propuesta = app_state
        .arqueo_service
        .editar_propuesta(id, &legajo, &payload.monto)
        .await?;
    Ok((StatusCode::OK, Json(propuesta)))
}

// =============================================================================
//  CONFIRMACIÓN
// =============================================================================

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmarPayload {
    pub filas: Vec<FilaConfirmacion>,
}

// POST /api/arqueos/{id}/confirmar
#[utoipa::path(
    post,
    path = "/api/arqueos/{id}/confirmar",
    tag = "Arqueos",
    params(("id" = Uuid, Path, description = "Id del arqueo")),
    request_body = ConfirmarPayload,
    responses(
        (status = 200, description = "Cantidad de filas confirmadas"),
        (status = 404, description = "Arqueo inexistente"),
        (status = 409, description = "El reparto no coincide con el objetivo")
    )
)]
pub async fn confirmar(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ConfirmarPayload>,
) -> Result<impl IntoResponse, AppError> {
    let confirmadas = app_state.arqueo_service.confirmar(id, payload.filas).await?;
    Ok((StatusCode::OK, Json(json!({ "confirmadas": confirmadas }))))
}
