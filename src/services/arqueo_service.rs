// src/services/arqueo_service.rs
//
// El reparto de arqueos: toma la diferencia total de caja de un sector +
// fecha + turno, propone cuánto le toca a cada empleado que trabajó ese
// turno (proporcional a los minutos trabajados dentro de la ventana) y no
// deja confirmar hasta que lo repartido coincida con el objetivo.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::montos::{parsear_monto, redondear2, tolerancia},
    common::tiempo::normalizar_intervalo,
    db::{ArqueosRepo, EmpleadosRepo, FichadasRepo},
    models::agenda::Turno,
    models::arqueos::{
        Arqueo, ArqueoConPropuestas, AsignacionConfirmada, BalanceArqueo, EntradaTurno,
        FilaConfirmacion, Propuesta, ResultadoCalculo,
    },
    models::empleados::{normalizar_legajo, Sector},
    services::agenda_service::{turnos_del_sector, ventana_por_defecto, AgendaService},
};

pub struct ArqueoService {
    arqueos: Arc<dyn ArqueosRepo>,
    fichadas: Arc<dyn FichadasRepo>,
    empleados: Arc<dyn EmpleadosRepo>,
    agenda: Arc<AgendaService>,
}

impl ArqueoService {
    pub fn new(
        arqueos: Arc<dyn ArqueosRepo>,
        fichadas: Arc<dyn FichadasRepo>,
        empleados: Arc<dyn EmpleadosRepo>,
        agenda: Arc<AgendaService>,
    ) -> Self {
        Self {
            arqueos,
            fichadas,
            empleados,
            agenda,
        }
    }

    /// Guardar y calcular: persiste un arqueo por cada turno no trivial y
    /// genera las propuestas de reparto. Volver a llamar para el mismo
    /// sector + fecha + turno pisa el arqueo anterior y regenera las
    /// propuestas (las ediciones sin confirmar se pierden).
    pub async fn guardar_y_calcular(
        &self,
        fecha: NaiveDate,
        sector: Sector,
        entradas: Vec<EntradaTurno>,
    ) -> Result<Vec<ResultadoCalculo>, AppError> {
        for entrada in &entradas {
            if !turnos_del_sector(sector).contains(&entrada.turno) {
                return Err(AppError::DatoInvalido(format!(
                    "El sector {sector:?} no tiene turno {:?}",
                    entrada.turno
                )));
            }
        }

        let mut resultados = Vec::new();
        for entrada in entradas {
            // Turno en cero y sin notas: no se persiste nada.
            if entrada.es_trivial() {
                continue;
            }

            let arqueo = self
                .arqueos
                .upsert_arqueo(sector, fecha, entrada.turno, entrada.monto, &entrada.notas)
                .await?;

            let candidatos = self.candidatos(fecha, sector, entrada.turno).await?;
            let total_minutos: i64 = candidatos.iter().map(|c| i64::from(c.minutos)).sum();

            let propuestas: Vec<Propuesta> = candidatos
                .into_iter()
                .map(|c| {
                    let monto = if total_minutos > 0 {
                        (arqueo.diferencia_objetivo * Decimal::from(c.minutos)
                            / Decimal::from(total_minutos))
                        .round_dp(4)
                    } else {
                        Decimal::ZERO
                    };
                    Propuesta {
                        arqueo_id: arqueo.id,
                        legajo: c.legajo,
                        puesto: c.puesto,
                        minutos_trabajados: c.minutos,
                        monto_propuesto: monto,
                        monto_final: monto,
                    }
                })
                .collect();

            self.arqueos
                .reemplazar_propuestas(arqueo.id, &propuestas)
                .await?;

            let sin_empleados =
                total_minutos == 0 && !arqueo.diferencia_objetivo.is_zero();
            if sin_empleados {
                tracing::warn!(
                    "Arqueo {} ({:?} {:?} {}): objetivo {} sin empleados que repartir",
                    arqueo.id,
                    sector,
                    arqueo.turno,
                    fecha,
                    arqueo.diferencia_objetivo
                );
            } else {
                tracing::info!(
                    "Arqueo {} guardado con {} propuestas",
                    arqueo.id,
                    propuestas.len()
                );
            }

            resultados.push(ResultadoCalculo {
                arqueo,
                propuestas,
                sin_empleados,
            });
        }
        Ok(resultados)
    }

    /// Edita el monto final de un empleado. El texto viene crudo de la
    /// pantalla: acepta "1.234,56" y "1234.56"; lo ilegible vale 0.
    pub async fn editar_propuesta(
        &self,
        arqueo_id: Uuid,
        legajo: &str,
        monto_crudo: &str,
    ) -> Result<Propuesta, AppError> {
        self.buscar_arqueo(arqueo_id).await?;

        // El mismo saneo de legajo que usa la agenda.
        let legajo = normalizar_legajo(legajo);
        let monto = parsear_monto(monto_crudo);
        if !self
            .arqueos
            .actualizar_monto_final(arqueo_id, &legajo, monto)
            .await?
        {
            return Err(AppError::NoEncontrado(format!(
                "Propuesta de {legajo} en el arqueo {arqueo_id}"
            )));
        }

        let propuestas = self.arqueos.propuestas(arqueo_id).await?;
        propuestas
            .into_iter()
            .find(|p| p.legajo == legajo)
            .ok_or_else(|| AppError::NoEncontrado(format!("Propuesta de {legajo}")))
    }

    /// Objetivo contra lo repartido. Balanceado si la diferencia no supera
    /// un centavo.
    pub async fn verificar_balance(&self, arqueo_id: Uuid) -> Result<BalanceArqueo, AppError> {
        let arqueo = self.buscar_arqueo(arqueo_id).await?;
        let propuestas = self.arqueos.propuestas(arqueo_id).await?;
        Ok(balance_de(&arqueo, propuestas.iter().map(|p| p.monto_final)))
    }

    /// Confirma el reparto de UN arqueo: exige balance, borra lo confirmado
    /// antes e inserta las filas nuevas. Quien confirma varios turnos llama
    /// una vez por arqueo; la falla de uno no deshace los ya confirmados.
    pub async fn confirmar(
        &self,
        arqueo_id: Uuid,
        filas: Vec<FilaConfirmacion>,
    ) -> Result<u64, AppError> {
        let arqueo = self.buscar_arqueo(arqueo_id).await?;

        let balance = balance_de(&arqueo, filas.iter().map(|f| f.monto_final));
        if !balance.balanceado {
            return Err(AppError::ArqueoDesbalanceado {
                objetivo: balance.objetivo,
                asignado: balance.asignado,
                diferencia: balance.diferencia,
            });
        }

        let confirmadas: Vec<AsignacionConfirmada> = filas
            .into_iter()
            .map(|f| AsignacionConfirmada {
                arqueo_id,
                legajo: f.legajo,
                puesto: f.puesto,
                minutos_trabajados: f.minutos_trabajados,
                monto_propuesto: f.monto_propuesto,
                monto_final: f.monto_final,
            })
            .collect();

        let insertadas = self
            .arqueos
            .reemplazar_confirmadas(arqueo_id, &confirmadas)
            .await?;
        tracing::info!("Arqueo {} confirmado con {} filas", arqueo_id, insertadas);
        Ok(insertadas)
    }

    /// Los arqueos de una fecha con sus propuestas y su balance, para la
    /// pantalla de edición.
    pub async fn arqueos_de_fecha(
        &self,
        fecha: NaiveDate,
        sector: Option<Sector>,
    ) -> Result<Vec<ArqueoConPropuestas>, AppError> {
        let mut resultado = Vec::new();
        for arqueo in self.arqueos.por_fecha(fecha, sector).await? {
            let propuestas = self.arqueos.propuestas(arqueo.id).await?;
            let balance = balance_de(&arqueo, propuestas.iter().map(|p| p.monto_final));
            resultado.push(ArqueoConPropuestas {
                arqueo,
                propuestas,
                balance,
            });
        }
        Ok(resultado)
    }

    async fn buscar_arqueo(&self, arqueo_id: Uuid) -> Result<Arqueo, AppError> {
        self.arqueos
            .buscar(arqueo_id)
            .await?
            .ok_or_else(|| AppError::NoEncontrado(format!("Arqueo {arqueo_id}")))
    }

    /// Quiénes trabajaron el turno y cuántos minutos de la ventana cubrió
    /// cada uno. La agenda resuelta manda; si no arroja a nadie, las
    /// fichadas del reloj son el respaldo.
    async fn candidatos(
        &self,
        fecha: NaiveDate,
        sector: Sector,
        turno: Turno,
    ) -> Result<Vec<Candidato>, AppError> {
        let Some(ventana_turno) = ventana_por_defecto(sector, turno) else {
            return Ok(Vec::new());
        };

        let activos = self.empleados.activos(Some(sector)).await?;

        let mut candidatos = Vec::new();
        for empleado in &activos {
            let dia = self.agenda.resolver_dia(&empleado.legajo, fecha).await?;
            if dia.codigo.turno_laboral() != Some(turno) {
                continue;
            }
            let minutos = dia
                .ventana
                .map(|v| ventana_turno.solapamiento_min(v.inicio_min, v.fin_min))
                .unwrap_or(0);
            candidatos.push(Candidato {
                legajo: dia.legajo,
                puesto: dia.puesto,
                minutos,
            });
        }

        if !candidatos.is_empty() {
            return Ok(candidatos);
        }

        // Respaldo: marcaciones reales del reloj que pisan la ventana.
        for fichada in self.fichadas.por_fecha(fecha).await? {
            let Some(empleado) = activos.iter().find(|e| e.legajo == fichada.legajo) else {
                continue;
            };
            let (entrada, salida) =
                normalizar_intervalo(fichada.entrada_min, fichada.salida_min);
            let minutos = ventana_turno.solapamiento_min(entrada, salida);
            if minutos > 0 {
                candidatos.push(Candidato {
                    legajo: empleado.legajo.clone(),
                    puesto: empleado.puesto.clone(),
                    minutos,
                });
            }
        }
        Ok(candidatos)
    }
}

struct Candidato {
    legajo: String,
    puesto: String,
    minutos: i32,
}

fn balance_de(arqueo: &Arqueo, montos_finales: impl Iterator<Item = Decimal>) -> BalanceArqueo {
    let asignado: Decimal = montos_finales.sum();
    let diferencia = asignado - arqueo.diferencia_objetivo;
    BalanceArqueo {
        arqueo_id: arqueo.id,
        sector: arqueo.sector,
        turno: arqueo.turno,
        objetivo: arqueo.diferencia_objetivo,
        asignado: redondear2(asignado),
        diferencia: redondear2(diferencia),
        balanceado: diferencia.abs() <= tolerancia(),
    }
}
