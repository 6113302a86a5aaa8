use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error;

// Nuestro tipo de error, con `thiserror` para mejor ergonomía.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error de validación")]
    ValidationError(#[from] validator::ValidationErrors),

    // Fecha mal formada, turno que no corresponde al sector, etc.
    #[error("Dato inválido: {0}")]
    DatoInvalido(String),

    #[error("No encontrado: {0}")]
    NoEncontrado(String),

    // El arqueo no cierra: lo repartido no coincide con el objetivo.
    #[error("Arqueo desbalanceado: objetivo {objetivo}, asignado {asignado}")]
    ArqueoDesbalanceado {
        objetivo: Decimal,
        asignado: Decimal,
        diferencia: Decimal,
    },

    #[error("Error de base de datos")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para cualquier otro error inesperado.
    #[error("Error interno del servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Devolvemos todos los detalles de la validación.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Uno o más campos son inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::DatoInvalido(msg) => {
                let body = Json(json!({ "error": msg }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::NoEncontrado(msg) => {
                let body = Json(json!({ "error": msg }));
                return (StatusCode::NOT_FOUND, body).into_response();
            }
            // El desbalance lleva los números: la UI los muestra tal cual.
            AppError::ArqueoDesbalanceado {
                objetivo,
                asignado,
                diferencia,
            } => {
                let body = Json(json!({
                    "error": "El reparto no coincide con la diferencia de caja.",
                    "objetivo": objetivo,
                    "asignado": asignado,
                    "diferencia": diferencia,
                }));
                return (StatusCode::CONFLICT, body).into_response();
            }

            // Todo lo demás (DatabaseError, InternalServerError) es un 500.
            // El `tracing` deja registrado el detalle que `thiserror` nos da.
            ref e => {
                tracing::error!("Error interno del servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocurrió un error inesperado.")
            }
        };

        // Respuesta estándar para errores simples con un solo mensaje.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
