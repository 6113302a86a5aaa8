// src/common/montos.rs
//
// Parseo tolerante de montos escritos a mano. Los cajeros cargan tanto
// "1.234,56" (notación local: punto de miles, coma decimal) como "1234.56".
// Regla de desambiguación: si hay coma, la coma es el decimal y los puntos
// agrupan miles; si no hay coma y hay varios puntos, el último es el decimal.
// Un texto ilegible vale 0: el total en pantalla es el control, no este parseo.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

pub fn parsear_monto(texto: &str) -> Decimal {
    let limpio: String = texto
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',' || *c == '-')
        .collect();

    if limpio.is_empty() || limpio == "-" {
        return Decimal::ZERO;
    }

    let normalizado = if limpio.contains(',') {
        // Notación local: fuera los puntos, la coma pasa a ser el decimal.
        limpio.replace('.', "").replace(',', ".")
    } else {
        match limpio.match_indices('.').count() {
            0 | 1 => limpio,
            // Varios puntos sin coma: el último separa decimales.
            _ => {
                let ultimo = limpio.rfind('.').unwrap();
                let mut s = String::with_capacity(limpio.len());
                for (i, c) in limpio.char_indices() {
                    if c == '.' && i != ultimo {
                        continue;
                    }
                    s.push(c);
                }
                s
            }
        }
    };

    Decimal::from_str(&normalizado).unwrap_or(Decimal::ZERO)
}

/// Redondeo a dos decimales para mostrar y comparar contra la tolerancia.
pub fn redondear2(monto: Decimal) -> Decimal {
    monto.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Tolerancia de cierre de un arqueo: un centavo.
pub fn tolerancia() -> Decimal {
    Decimal::new(1, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn notacion_local_y_plana() {
        assert_eq!(parsear_monto("1.234,56"), d("1234.56"));
        assert_eq!(parsear_monto("1234.56"), d("1234.56"));
        assert_eq!(parsear_monto("1.234.567,89"), d("1234567.89"));
        assert_eq!(parsear_monto(""), Decimal::ZERO);
    }

    #[test]
    fn varios_puntos_sin_coma() {
        // El último punto es el decimal, los anteriores agrupan miles.
        assert_eq!(parsear_monto("1.234.567.89"), d("1234567.89"));
    }

    #[test]
    fn negativos_y_basura() {
        assert_eq!(parsear_monto("-150,25"), d("-150.25"));
        assert_eq!(parsear_monto("$ 1.500,00"), d("1500.00"));
        assert_eq!(parsear_monto("abc"), Decimal::ZERO);
        assert_eq!(parsear_monto("  "), Decimal::ZERO);
    }

    #[test]
    fn redondeo_a_dos_decimales() {
        assert_eq!(redondear2(d("33.333333")), d("33.33"));
        assert_eq!(redondear2(d("0.005")), d("0.01"));
    }
}
