//src/main.rs

use axum::{
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaración de los módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod models;
mod services;

use crate::config::AppState;

#[tokio::main]
async fn main() {
    // Inicializa el logger.
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() está bien acá: si la configuración falla, la aplicación
    // no debe arrancar.
    let app_state = AppState::new()
        .await
        .expect("Falló la inicialización del estado de la aplicación.");

    // Corre las migraciones de SQLx al arrancar.
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Fallaron las migraciones de la base de datos.");

    tracing::info!("✅ Migraciones de la base de datos ejecutadas");

    // Agenda: turnos resueltos + excepciones del calendario
    let agenda_routes = Router::new()
        .route("/grilla/{anio}/{mes}", get(handlers::agenda::grilla_mensual))
        .route("/excepciones", post(handlers::agenda::crear_excepcion))
        .route(
            "/excepciones/{legajo}/{fecha}",
            axum::routing::delete(handlers::agenda::borrar_excepcion),
        )
        .route("/{legajo}", get(handlers::agenda::agenda_empleado));

    // Arqueos: guardar-y-calcular, edición y confirmación
    let arqueo_routes = Router::new()
        .route(
            "/",
            post(handlers::arqueos::guardar_y_calcular).get(handlers::arqueos::arqueos_de_fecha),
        )
        .route("/{id}/balance", get(handlers::arqueos::balance))
        .route(
            "/{id}/propuestas/{legajo}",
            put(handlers::arqueos::editar_propuesta),
        )
        .route("/{id}/confirmar", post(handlers::arqueos::confirmar));

    // Combina todo en el router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/agenda", agenda_routes)
        .nest("/api/arqueos", arqueo_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia el servidor
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falló el listener TCP");
    tracing::info!("🚀 Servidor escuchando en {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Error en el servidor Axum");
}
