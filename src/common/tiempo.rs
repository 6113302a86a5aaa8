// src/common/tiempo.rs
//
// Aritmética de fechas y ventanas horarias compartida por el resolvedor de
// agenda y el reparto de arqueos. Los horarios se expresan en minutos desde
// la medianoche; una ventana nocturna termina después de 1440 (la noche de
// playa es 21:00–29:00, o sea [1260, 1740)).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const MINUTOS_POR_DIA: i32 = 1440;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VentanaHoraria {
    /// Minutos desde la medianoche, inclusive.
    #[schema(example = 1260)]
    pub inicio_min: i32,
    /// Minutos desde la medianoche, exclusivo. Puede superar 1440.
    #[schema(example = 1740)]
    pub fin_min: i32,
}

impl VentanaHoraria {
    pub fn new(inicio_min: i32, fin_min: i32) -> Self {
        Self { inicio_min, fin_min }
    }

    pub fn duracion_min(&self) -> i32 {
        (self.fin_min - self.inicio_min).max(0)
    }

    /// Minutos de solapamiento con el intervalo [inicio, fin).
    /// El intervalo debe venir ya normalizado (fin > inicio, sin vuelta).
    pub fn solapamiento_min(&self, inicio: i32, fin: i32) -> i32 {
        let desde = self.inicio_min.max(inicio);
        let hasta = self.fin_min.min(fin);
        (hasta - desde).max(0)
    }
}

/// Normaliza un intervalo entrada/salida de fichada: si la salida es menor
/// que la entrada, la fichada cruzó la medianoche y se corre un día.
pub fn normalizar_intervalo(entrada_min: i32, salida_min: i32) -> (i32, i32) {
    if salida_min < entrada_min {
        (entrada_min, salida_min + MINUTOS_POR_DIA)
    } else {
        (entrada_min, salida_min)
    }
}

/// Cantidad entera de días de `desde` a `hasta` (negativa si `hasta` es
/// anterior). NaiveDate es un día calendario puro, sin zona horaria, así que
/// los cambios de hora de verano no distorsionan la cuenta.
pub fn dias_entre(desde: NaiveDate, hasta: NaiveDate) -> i64 {
    (hasta - desde).num_days()
}

/// Índice dentro del ciclo de un patrón para una fecha dada.
/// El módulo de Rust conserva el signo, por eso el doble ajuste.
pub fn indice_ciclo(ancla: NaiveDate, fecha: NaiveDate, ciclo_dias: i32) -> i32 {
    let c = i64::from(ciclo_dias);
    let indice = ((dias_entre(ancla, fecha) % c) + c) % c;
    indice as i32
}

/// Fecha en formato ISO (AAAA-MM-DD), como viaja en la URL.
pub fn fecha_iso(texto: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(texto.trim(), "%Y-%m-%d").ok()
}

/// Los días del rango inclusivo [desde, hasta], en orden. Rango vacío si
/// `hasta` es anterior a `desde`.
pub fn dias_del_rango(
    desde: NaiveDate,
    hasta: NaiveDate,
) -> impl Iterator<Item = NaiveDate> + Clone {
    desde.iter_days().take_while(move |d| *d <= hasta)
}
