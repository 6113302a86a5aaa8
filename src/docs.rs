// src/docs.rs

use utoipa::OpenApi;

use crate::common;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Agenda ---
        handlers::agenda::agenda_empleado,
        handlers::agenda::grilla_mensual,
        handlers::agenda::crear_excepcion,
        handlers::agenda::borrar_excepcion,

        // --- Arqueos ---
        handlers::arqueos::guardar_y_calcular,
        handlers::arqueos::arqueos_de_fecha,
        handlers::arqueos::balance,
        handlers::arqueos::editar_propuesta,
        handlers::arqueos::confirmar,
    ),
    components(
        schemas(
            // --- Empleados ---
            models::empleados::Empleado,
            models::empleados::Sector,
            models::empleados::Fichada,

            // --- Agenda ---
            common::tiempo::VentanaHoraria,
            models::agenda::Turno,
            models::agenda::CodigoTurno,
            models::agenda::OrigenTurno,
            models::agenda::TipoExcepcion,
            models::agenda::Excepcion,
            models::agenda::Patron,
            models::agenda::PatronDetalle,
            models::agenda::AsignacionPatron,
            models::agenda::DiaResuelto,
            models::agenda::AgendaEmpleado,

            // --- Arqueos ---
            models::arqueos::Arqueo,
            models::arqueos::Propuesta,
            models::arqueos::AsignacionConfirmada,
            models::arqueos::BalanceArqueo,
            models::arqueos::EntradaTurno,
            models::arqueos::FilaConfirmacion,
            models::arqueos::ResultadoCalculo,
            models::arqueos::ArqueoConPropuestas,

            // --- Payloads ---
            handlers::agenda::CrearExcepcionPayload,
            handlers::arqueos::GuardarArqueosPayload,
            handlers::arqueos::EditarPropuestaPayload,
            handlers::arqueos::ConfirmarPayload,
        )
    ),
    tags(
        (name = "Agenda", description = "Turnos resueltos y excepciones del calendario"),
        (name = "Arqueos", description = "Diferencias de caja y su reparto")
    )
)]
pub struct ApiDoc;
