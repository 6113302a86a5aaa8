// src/models/empleados.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::NaiveDate;
use utoipa::ToSchema;

// --- Enums (mapean los tipos de Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "sector", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    Playa, // Pista de surtidores
    Shop,  // Tienda
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Empleado {
    #[schema(example = "1042")]
    pub legajo: String,

    #[schema(example = "María Gómez")]
    pub nombre: String,

    pub sector: Sector,

    #[schema(example = "playero")]
    pub puesto: String,

    #[schema(example = true)]
    pub activo: bool,
}

/// Una marcación del reloj. Los minutos son relativos a la medianoche de
/// `fecha`; una salida menor que la entrada cruzó la medianoche.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Fichada {
    pub legajo: String,

    #[schema(value_type = String, format = Date, example = "2024-03-01")]
    pub fecha: NaiveDate,

    #[schema(example = 1320)]
    pub entrada_min: i32,

    #[schema(example = 270)]
    pub salida_min: i32,
}

/// Normaliza un legajo cargado a mano: espacios fuera y, si es numérico,
/// sin ceros a la izquierda. Un legajo no numérico queda tal cual (recortado).
pub fn normalizar_legajo(crudo: &str) -> String {
    let recortado = crudo.trim();
    if !recortado.is_empty() && recortado.chars().all(|c| c.is_ascii_digit()) {
        let sin_ceros = recortado.trim_start_matches('0');
        if sin_ceros.is_empty() {
            return "0".to_string();
        }
        return sin_ceros.to_string();
    }
    recortado.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normaliza_legajos_numericos_y_textuales() {
        assert_eq!(normalizar_legajo(" 0042 "), "42");
        assert_eq!(normalizar_legajo("1042"), "1042");
        assert_eq!(normalizar_legajo("000"), "0");
        assert_eq!(normalizar_legajo(" A-17 "), "A-17");
    }
}
