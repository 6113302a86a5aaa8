// src/services/agenda_service.rs
//
// El resolvedor de agenda: combina el patrón cíclico con las excepciones
// puntuales y produce el turno efectivo de cada empleado para cada día.
// Precedencia: excepción > patrón del empleado > patrón del puesto > nada.
// La falta de datos degrada a "sin agenda"; acá no hay errores de negocio.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};

use crate::{
    common::error::AppError,
    common::tiempo::{dias_del_rango, indice_ciclo, VentanaHoraria},
    db::{AgendaRepo, EmpleadosRepo},
    models::agenda::{
        AgendaEmpleado, CodigoTurno, DiaResuelto, Excepcion, OrigenTurno, Turno,
    },
    models::empleados::{normalizar_legajo, Empleado, Sector},
};

/// Ventanas por defecto del sector, en minutos desde la medianoche.
/// La noche de playa termina a las 29:00: cruza al día siguiente.
/// El shop no tiene turno noche.
pub fn ventana_por_defecto(sector: Sector, turno: Turno) -> Option<VentanaHoraria> {
    match (sector, turno) {
        (Sector::Playa, Turno::Manana) => Some(VentanaHoraria::new(300, 780)),
        (Sector::Playa, Turno::Tarde) => Some(VentanaHoraria::new(780, 1260)),
        (Sector::Playa, Turno::Noche) => Some(VentanaHoraria::new(1260, 1740)),
        (Sector::Shop, Turno::Manana) => Some(VentanaHoraria::new(360, 840)),
        (Sector::Shop, Turno::Tarde) => Some(VentanaHoraria::new(840, 1320)),
        _ => None,
    }
}

/// Los turnos con caja de un sector, en el orden de la pantalla de arqueos.
pub fn turnos_del_sector(sector: Sector) -> &'static [Turno] {
    match sector {
        Sector::Playa => &[Turno::Manana, Turno::Tarde, Turno::Noche],
        Sector::Shop => &[Turno::Manana, Turno::Tarde],
    }
}

/// Todo lo que hace falta para resolver un rango de un empleado, leído de
/// una sola vez. La resolución en sí es pura: recorrer el rango no vuelve
/// a tocar la base.
struct DatosAgenda {
    excepciones: HashMap<NaiveDate, Excepcion>,
    // (ancla, ciclo, turnos por índice, origen del patrón)
    patron: Option<(NaiveDate, i32, Vec<Option<Turno>>, OrigenTurno)>,
    ventanas: HashMap<(String, Turno), VentanaHoraria>,
}

pub struct AgendaService {
    empleados: Arc<dyn EmpleadosRepo>,
    agenda: Arc<dyn AgendaRepo>,
}

impl AgendaService {
    pub fn new(empleados: Arc<dyn EmpleadosRepo>, agenda: Arc<dyn AgendaRepo>) -> Self {
        Self { empleados, agenda }
    }

    pub async fn resolver_dia(
        &self,
        legajo: &str,
        fecha: NaiveDate,
    ) -> Result<DiaResuelto, AppError> {
        let mut dias = self.resolver_rango(legajo, fecha, fecha).await?;
        // El rango de un día siempre produce exactamente un elemento.
        dias.pop()
            .ok_or_else(|| anyhow::anyhow!("rango de un día sin resultado").into())
    }

    /// Un `DiaResuelto` por cada día del rango inclusivo [desde, hasta].
    pub async fn resolver_rango(
        &self,
        legajo: &str,
        desde: NaiveDate,
        hasta: NaiveDate,
    ) -> Result<Vec<DiaResuelto>, AppError> {
        let legajo = normalizar_legajo(legajo);
        let empleado = self
            .empleados
            .buscar(&legajo)
            .await?
            .ok_or_else(|| AppError::NoEncontrado(format!("Empleado {legajo}")))?;

        let datos = self.datos_para(&empleado, desde, hasta).await?;
        Ok(dias_del_rango(desde, hasta)
            .map(|fecha| resolver_dia_puro(&empleado, fecha, &datos))
            .collect())
    }

    /// La grilla mensual: el mes entero resuelto para cada empleado activo.
    pub async fn grilla_mensual(
        &self,
        anio: i32,
        mes: u32,
    ) -> Result<Vec<AgendaEmpleado>, AppError> {
        // Un diciembre en el borde del calendario de chrono no tiene día
        // siguiente: también es un mes inválido, no un panic.
        let desde = NaiveDate::from_ymd_opt(anio, mes, 1)
            .ok_or_else(|| AppError::DatoInvalido(format!("Mes inválido: {anio}-{mes}")))?;
        let hasta = ultimo_dia_del_mes(desde)
            .ok_or_else(|| AppError::DatoInvalido(format!("Mes inválido: {anio}-{mes}")))?;

        let mut grilla = Vec::new();
        for empleado in self.empleados.activos(None).await? {
            let datos = self.datos_para(&empleado, desde, hasta).await?;
            let dias = dias_del_rango(desde, hasta)
                .map(|fecha| resolver_dia_puro(&empleado, fecha, &datos))
                .collect();
            grilla.push(AgendaEmpleado { empleado, dias });
        }
        Ok(grilla)
    }

    /// Alta o reemplazo de la excepción del empleado para una fecha.
    pub async fn guardar_excepcion(&self, excepcion: Excepcion) -> Result<Excepcion, AppError> {
        let legajo = normalizar_legajo(&excepcion.legajo);
        self.empleados
            .buscar(&legajo)
            .await?
            .ok_or_else(|| AppError::NoEncontrado(format!("Empleado {legajo}")))?;

        self.agenda
            .guardar_excepcion(&Excepcion { legajo, ..excepcion })
            .await
    }

    pub async fn borrar_excepcion(
        &self,
        legajo: &str,
        fecha: NaiveDate,
    ) -> Result<(), AppError> {
        let legajo = normalizar_legajo(legajo);
        if !self.agenda.borrar_excepcion(&legajo, fecha).await? {
            return Err(AppError::NoEncontrado(format!(
                "Excepción de {legajo} para {fecha}"
            )));
        }
        Ok(())
    }

    async fn datos_para(
        &self,
        empleado: &Empleado,
        desde: NaiveDate,
        hasta: NaiveDate,
    ) -> Result<DatosAgenda, AppError> {
        let excepciones: HashMap<NaiveDate, Excepcion> = self
            .agenda
            .excepciones_rango(&empleado.legajo, desde, hasta)
            .await?
            .into_iter()
            .map(|e| (e.fecha, e))
            .collect();

        // Patrón propio primero, el del puesto como fallback.
        let (asignacion, origen) =
            match self.agenda.asignacion_para_legajo(&empleado.legajo).await? {
                Some(a) => (Some(a), OrigenTurno::PatronEmpleado),
                None => match self.agenda.asignacion_para_puesto(&empleado.puesto).await? {
                    Some(a) => (Some(a), OrigenTurno::PatronPuesto),
                    None => (None, OrigenTurno::SinAgenda),
                },
            };

        let mut patron = None;
        if let Some(asignacion) = asignacion {
            // Un patron_id colgado degrada a sin agenda, no es un error.
            if let Some(def) = self.agenda.patron(asignacion.patron_id).await? {
                let mut turnos: Vec<Option<Turno>> = vec![None; def.ciclo_dias.max(1) as usize];
                for detalle in self.agenda.detalles(def.id).await? {
                    let indice = detalle.dia_indice as usize;
                    if indice < turnos.len() {
                        turnos[indice] = detalle.turno;
                    }
                }
                patron = Some((asignacion.fecha_ancla, def.ciclo_dias.max(1), turnos, origen));
            }
        }

        // Ventanas explícitas del puesto base y de los puestos que aparezcan
        // como override en las excepciones del rango.
        let mut puestos = vec![empleado.puesto.clone()];
        for excepcion in excepciones.values() {
            if let Some(p) = &excepcion.puesto_override {
                if !puestos.contains(p) {
                    puestos.push(p.clone());
                }
            }
        }
        let mut ventanas = HashMap::new();
        for puesto in puestos {
            for v in self.agenda.ventanas_puesto(&puesto).await? {
                ventanas.insert(
                    (v.puesto.clone(), v.turno),
                    VentanaHoraria::new(v.inicio_min, v.fin_min),
                );
            }
        }

        Ok(DatosAgenda {
            excepciones,
            patron,
            ventanas,
        })
    }
}

/// None si el mes siguiente queda fuera del calendario de chrono.
fn ultimo_dia_del_mes(primero: NaiveDate) -> Option<NaiveDate> {
    let (anio, mes) = (primero.year(), primero.month());
    let siguiente = if mes == 12 {
        NaiveDate::from_ymd_opt(anio + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(anio, mes + 1, 1)
    }?;
    siguiente.pred_opt()
}

/// El turno que dicta el patrón para una fecha, sin mirar excepciones.
fn codigo_de_patron(fecha: NaiveDate, datos: &DatosAgenda) -> (CodigoTurno, OrigenTurno) {
    match &datos.patron {
        Some((ancla, ciclo, turnos, origen)) => {
            let indice = indice_ciclo(*ancla, fecha, *ciclo) as usize;
            // Índice sin fila cargada = franco.
            let codigo = turnos
                .get(indice)
                .copied()
                .flatten()
                .map(CodigoTurno::from)
                .unwrap_or(CodigoTurno::Franco);
            (codigo, *origen)
        }
        None => (CodigoTurno::SinAgenda, OrigenTurno::SinAgenda),
    }
}

fn resolver_dia_puro(empleado: &Empleado, fecha: NaiveDate, datos: &DatosAgenda) -> DiaResuelto {
    let (codigo, puesto, origen) = match datos.excepciones.get(&fecha) {
        Some(excepcion) if excepcion.tipo.es_ausencia() => {
            (CodigoTurno::Ausencia, empleado.puesto.clone(), OrigenTurno::Excepcion)
        }
        Some(excepcion) if excepcion.tipo == crate::models::agenda::TipoExcepcion::FrancoExtra => {
            let codigo = excepcion
                .turno_override
                .map(CodigoTurno::from)
                .unwrap_or(CodigoTurno::Franco);
            let puesto = excepcion
                .puesto_override
                .clone()
                .unwrap_or_else(|| empleado.puesto.clone());
            (codigo, puesto, OrigenTurno::Excepcion)
        }
        // Cambio genérico: cada campo en blanco cae al valor del patrón.
        Some(excepcion) => {
            let (codigo_patron, _) = codigo_de_patron(fecha, datos);
            let codigo = excepcion
                .turno_override
                .map(CodigoTurno::from)
                .unwrap_or(codigo_patron);
            let puesto = excepcion
                .puesto_override
                .clone()
                .unwrap_or_else(|| empleado.puesto.clone());
            (codigo, puesto, OrigenTurno::Excepcion)
        }
        None => {
            let (codigo, origen) = codigo_de_patron(fecha, datos);
            (codigo, empleado.puesto.clone(), origen)
        }
    };

    // Ventana: configuración del puesto primero, sector por defecto después.
    let ventana = codigo.turno_laboral().and_then(|turno| {
        datos
            .ventanas
            .get(&(puesto.clone(), turno))
            .copied()
            .or_else(|| ventana_por_defecto(empleado.sector, turno))
    });

    DiaResuelto {
        fecha,
        legajo: empleado.legajo.clone(),
        puesto,
        codigo,
        ventana,
        origen,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memoria::{AgendaEnMemoria, EmpleadosEnMemoria};
    use crate::models::agenda::{AsignacionPatron, Patron, PatronDetalle, TipoExcepcion, VentanaPuesto};

    fn fecha(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn playero(legajo: &str) -> Empleado {
        Empleado {
            legajo: legajo.to_string(),
            nombre: format!("Empleado {legajo}"),
            sector: Sector::Playa,
            puesto: "playero".to_string(),
            activo: true,
        }
    }

    /// Patrón de 4 días M, T, N, franco anclado al 2024-01-01, asignado
    /// al legajo 1 directamente y al puesto "playero" como fallback.
    fn armar_servicio() -> AgendaService {
        let empleados = EmpleadosEnMemoria {
            empleados: vec![playero("1"), playero("2")],
        };
        let agenda = AgendaEnMemoria {
            patrones: vec![Patron {
                id: 10,
                nombre: "Rotativo 4".to_string(),
                ciclo_dias: 4,
            }],
            detalles: vec![
                PatronDetalle { patron_id: 10, dia_indice: 0, turno: Some(Turno::Manana) },
                PatronDetalle { patron_id: 10, dia_indice: 1, turno: Some(Turno::Tarde) },
                PatronDetalle { patron_id: 10, dia_indice: 2, turno: Some(Turno::Noche) },
                PatronDetalle { patron_id: 10, dia_indice: 3, turno: Some(Turno::Franco) },
            ],
            asignaciones: vec![
                AsignacionPatron {
                    id: 1,
                    legajo: Some("1".to_string()),
                    puesto: None,
                    patron_id: 10,
                    fecha_ancla: fecha(2024, 1, 1),
                },
                AsignacionPatron {
                    id: 2,
                    legajo: None,
                    puesto: Some("playero".to_string()),
                    patron_id: 10,
                    fecha_ancla: fecha(2024, 1, 2),
                },
            ],
            ..Default::default()
        };
        AgendaService::new(Arc::new(empleados), Arc::new(agenda))
    }

    #[tokio::test]
    async fn patron_del_empleado_cicla_desde_el_ancla() {
        let servicio = armar_servicio();

        let dia = servicio.resolver_dia("1", fecha(2024, 1, 1)).await.unwrap();
        assert_eq!(dia.codigo, CodigoTurno::Manana);
        assert_eq!(dia.origen, OrigenTurno::PatronEmpleado);
        assert_eq!(dia.ventana, Some(VentanaHoraria::new(300, 780)));

        // Ancla + k * ciclo repite el mismo turno, también hacia atrás.
        for k in [-2i64, 1, 3, 25] {
            let d = fecha(2024, 1, 1) + chrono::Duration::days(4 * k);
            let dia = servicio.resolver_dia("1", d).await.unwrap();
            assert_eq!(dia.codigo, CodigoTurno::Manana, "k={k}");
        }

        let franco = servicio.resolver_dia("1", fecha(2024, 1, 4)).await.unwrap();
        assert_eq!(franco.codigo, CodigoTurno::Franco);
        assert_eq!(franco.ventana, None);
    }

    #[tokio::test]
    async fn sin_patron_propio_usa_el_del_puesto() {
        let servicio = armar_servicio();

        // El legajo 2 no tiene asignación propia: cae al patrón del puesto,
        // anclado un día más tarde.
        let dia = servicio.resolver_dia("2", fecha(2024, 1, 2)).await.unwrap();
        assert_eq!(dia.codigo, CodigoTurno::Manana);
        assert_eq!(dia.origen, OrigenTurno::PatronPuesto);
    }

    #[tokio::test]
    async fn excepcion_pisa_al_patron() {
        let servicio = armar_servicio();
        servicio
            .guardar_excepcion(Excepcion {
                legajo: "1".to_string(),
                fecha: fecha(2024, 1, 1),
                tipo: TipoExcepcion::CambioTurno,
                puesto_override: None,
                turno_override: Some(Turno::Noche),
                motivo: Some("Cubre a Pérez".to_string()),
            })
            .await
            .unwrap();

        let dia = servicio.resolver_dia("1", fecha(2024, 1, 1)).await.unwrap();
        assert_eq!(dia.origen, OrigenTurno::Excepcion);
        assert_eq!(dia.codigo, CodigoTurno::Noche);
        // La noche de playa cruza la medianoche.
        assert_eq!(dia.ventana, Some(VentanaHoraria::new(1260, 1740)));
    }

    #[tokio::test]
    async fn cambio_sin_turno_cae_al_valor_del_patron() {
        let servicio = armar_servicio();
        servicio
            .guardar_excepcion(Excepcion {
                legajo: "1".to_string(),
                fecha: fecha(2024, 1, 2), // el patrón dice tarde
                tipo: TipoExcepcion::CambioTurno,
                puesto_override: Some("cajero".to_string()),
                turno_override: None,
                motivo: None,
            })
            .await
            .unwrap();

        let dia = servicio.resolver_dia("1", fecha(2024, 1, 2)).await.unwrap();
        assert_eq!(dia.codigo, CodigoTurno::Tarde);
        assert_eq!(dia.puesto, "cajero");
        assert_eq!(dia.origen, OrigenTurno::Excepcion);
    }

    #[tokio::test]
    async fn ausencias_y_francos_extra() {
        let servicio = armar_servicio();
        servicio
            .guardar_excepcion(Excepcion {
                legajo: "1".to_string(),
                fecha: fecha(2024, 1, 1),
                tipo: TipoExcepcion::Vacaciones,
                puesto_override: None,
                turno_override: None,
                motivo: None,
            })
            .await
            .unwrap();
        servicio
            .guardar_excepcion(Excepcion {
                legajo: "1".to_string(),
                fecha: fecha(2024, 1, 2),
                tipo: TipoExcepcion::FrancoExtra,
                puesto_override: None,
                turno_override: None,
                motivo: None,
            })
            .await
            .unwrap();

        let ausente = servicio.resolver_dia("1", fecha(2024, 1, 1)).await.unwrap();
        assert_eq!(ausente.codigo, CodigoTurno::Ausencia);
        assert_eq!(ausente.ventana, None);

        let franco = servicio.resolver_dia("1", fecha(2024, 1, 2)).await.unwrap();
        assert_eq!(franco.codigo, CodigoTurno::Franco);
    }

    #[tokio::test]
    async fn ventana_del_puesto_le_gana_a_la_del_sector() {
        let empleados = EmpleadosEnMemoria {
            empleados: vec![playero("1")],
        };
        let agenda = AgendaEnMemoria {
            ventanas: vec![VentanaPuesto {
                puesto: "playero".to_string(),
                turno: Turno::Manana,
                inicio_min: 360,
                fin_min: 840,
            }],
            ..Default::default()
        };
        let servicio = AgendaService::new(Arc::new(empleados), Arc::new(agenda));
        servicio
            .guardar_excepcion(Excepcion {
                legajo: "1".to_string(),
                fecha: fecha(2024, 1, 1),
                tipo: TipoExcepcion::CambioTurno,
                puesto_override: None,
                turno_override: Some(Turno::Manana),
                motivo: None,
            })
            .await
            .unwrap();

        let dia = servicio.resolver_dia("1", fecha(2024, 1, 1)).await.unwrap();
        assert_eq!(dia.ventana, Some(VentanaHoraria::new(360, 840)));
    }

    #[tokio::test]
    async fn sin_datos_degrada_a_sin_agenda() {
        let empleados = EmpleadosEnMemoria {
            empleados: vec![playero("9")],
        };
        let servicio =
            AgendaService::new(Arc::new(empleados), Arc::new(AgendaEnMemoria::default()));

        let dia = servicio.resolver_dia("9", fecha(2024, 5, 20)).await.unwrap();
        assert_eq!(dia.codigo, CodigoTurno::SinAgenda);
        assert_eq!(dia.origen, OrigenTurno::SinAgenda);
        assert_eq!(dia.ventana, None);
    }

    #[tokio::test]
    async fn grilla_de_mes_invalido_no_entra_en_panico() {
        let servicio = armar_servicio();

        // Mes 13: nunca existió.
        let error = servicio.grilla_mensual(2024, 13).await.unwrap_err();
        assert!(matches!(error, AppError::DatoInvalido(_)));

        // Último diciembre del calendario de chrono: el primer día del mes
        // es una fecha válida pero el mes no tiene día siguiente.
        let error = servicio.grilla_mensual(262142, 12).await.unwrap_err();
        assert!(matches!(error, AppError::DatoInvalido(_)));

        let grilla = servicio.grilla_mensual(2024, 2).await.unwrap();
        assert_eq!(grilla.len(), 2);
        assert!(grilla.iter().all(|fila| fila.dias.len() == 29));
    }

    #[tokio::test]
    async fn rango_inclusivo_y_legajo_normalizado() {
        let servicio = armar_servicio();
        let dias = servicio
            .resolver_rango(" 01 ", fecha(2024, 1, 1), fecha(2024, 1, 8))
            .await
            .unwrap();
        assert_eq!(dias.len(), 8);
        assert_eq!(dias[0].codigo, CodigoTurno::Manana);
        assert_eq!(dias[4].codigo, CodigoTurno::Manana); // ciclo completo
        assert!(dias.iter().all(|d| d.legajo == "1"));
    }
}
