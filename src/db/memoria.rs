// src/db/memoria.rs
//
// Implementaciones en memoria de los repositorios, para los tests de los
// servicios. Mismo contrato que las versiones Postgres, sin base de datos.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AgendaRepo, ArqueosRepo, EmpleadosRepo, FichadasRepo},
    models::agenda::{AsignacionPatron, Excepcion, Patron, PatronDetalle, Turno, VentanaPuesto},
    models::arqueos::{Arqueo, AsignacionConfirmada, Propuesta},
    models::empleados::{Empleado, Fichada, Sector},
};

#[derive(Default)]
pub struct EmpleadosEnMemoria {
    pub empleados: Vec<Empleado>,
}

#[async_trait]
impl EmpleadosRepo for EmpleadosEnMemoria {
    async fn activos(&self, sector: Option<Sector>) -> Result<Vec<Empleado>, AppError> {
        Ok(self
            .empleados
            .iter()
            .filter(|e| e.activo && sector.map_or(true, |s| e.sector == s))
            .cloned()
            .collect())
    }

    async fn buscar(&self, legajo: &str) -> Result<Option<Empleado>, AppError> {
        Ok(self.empleados.iter().find(|e| e.legajo == legajo).cloned())
    }
}

#[derive(Default)]
pub struct AgendaEnMemoria {
    pub asignaciones: Vec<AsignacionPatron>,
    pub patrones: Vec<Patron>,
    pub detalles: Vec<PatronDetalle>,
    pub ventanas: Vec<VentanaPuesto>,
    pub excepciones: Mutex<Vec<Excepcion>>,
}

#[async_trait]
impl AgendaRepo for AgendaEnMemoria {
    async fn asignacion_para_legajo(
        &self,
        legajo: &str,
    ) -> Result<Option<AsignacionPatron>, AppError> {
        Ok(self
            .asignaciones
            .iter()
            .find(|a| a.legajo.as_deref() == Some(legajo))
            .cloned())
    }

    async fn asignacion_para_puesto(
        &self,
        puesto: &str,
    ) -> Result<Option<AsignacionPatron>, AppError> {
        Ok(self
            .asignaciones
            .iter()
            .find(|a| a.puesto.as_deref() == Some(puesto))
            .cloned())
    }

    async fn patron(&self, patron_id: i64) -> Result<Option<Patron>, AppError> {
        Ok(self.patrones.iter().find(|p| p.id == patron_id).cloned())
    }

    async fn detalles(&self, patron_id: i64) -> Result<Vec<PatronDetalle>, AppError> {
        Ok(self
            .detalles
            .iter()
            .filter(|d| d.patron_id == patron_id)
            .cloned()
            .collect())
    }

    async fn excepciones_rango(
        &self,
        legajo: &str,
        desde: NaiveDate,
        hasta: NaiveDate,
    ) -> Result<Vec<Excepcion>, AppError> {
        Ok(self
            .excepciones
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.legajo == legajo && e.fecha >= desde && e.fecha <= hasta)
            .cloned()
            .collect())
    }

    async fn ventanas_puesto(&self, puesto: &str) -> Result<Vec<VentanaPuesto>, AppError> {
        Ok(self
            .ventanas
            .iter()
            .filter(|v| v.puesto == puesto)
            .cloned()
            .collect())
    }

    async fn guardar_excepcion(&self, excepcion: &Excepcion) -> Result<Excepcion, AppError> {
        let mut excepciones = self.excepciones.lock().unwrap();
        excepciones.retain(|e| !(e.legajo == excepcion.legajo && e.fecha == excepcion.fecha));
        excepciones.push(excepcion.clone());
        Ok(excepcion.clone())
    }

    async fn borrar_excepcion(&self, legajo: &str, fecha: NaiveDate) -> Result<bool, AppError> {
        let mut excepciones = self.excepciones.lock().unwrap();
        let antes = excepciones.len();
        excepciones.retain(|e| !(e.legajo == legajo && e.fecha == fecha));
        Ok(excepciones.len() < antes)
    }
}

#[derive(Default)]
pub struct ArqueosEnMemoria {
    pub arqueos: Mutex<Vec<Arqueo>>,
    pub propuestas: Mutex<Vec<Propuesta>>,
    pub confirmadas: Mutex<Vec<AsignacionConfirmada>>,
}

#[async_trait]
impl ArqueosRepo for ArqueosEnMemoria {
    async fn upsert_arqueo(
        &self,
        sector: Sector,
        fecha: NaiveDate,
        turno: Turno,
        diferencia_objetivo: Decimal,
        notas: &str,
    ) -> Result<Arqueo, AppError> {
        let mut arqueos = self.arqueos.lock().unwrap();
        if let Some(existente) = arqueos
            .iter_mut()
            .find(|a| a.sector == sector && a.fecha == fecha && a.turno == turno)
        {
            existente.diferencia_objetivo = diferencia_objetivo;
            existente.notas = notas.to_string();
            return Ok(existente.clone());
        }
        let arqueo = Arqueo {
            id: Uuid::new_v4(),
            sector,
            fecha,
            turno,
            diferencia_objetivo,
            notas: notas.to_string(),
            created_at: Utc::now(),
        };
        arqueos.push(arqueo.clone());
        Ok(arqueo)
    }

    async fn buscar(&self, id: Uuid) -> Result<Option<Arqueo>, AppError> {
        Ok(self.arqueos.lock().unwrap().iter().find(|a| a.id == id).cloned())
    }

    async fn por_fecha(
        &self,
        fecha: NaiveDate,
        sector: Option<Sector>,
    ) -> Result<Vec<Arqueo>, AppError> {
        Ok(self
            .arqueos
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.fecha == fecha && sector.map_or(true, |s| a.sector == s))
            .cloned()
            .collect())
    }

    async fn reemplazar_propuestas(
        &self,
        arqueo_id: Uuid,
        propuestas: &[Propuesta],
    ) -> Result<(), AppError> {
        let mut vigentes = self.propuestas.lock().unwrap();
        vigentes.retain(|p| p.arqueo_id != arqueo_id);
        vigentes.extend_from_slice(propuestas);
        Ok(())
    }

    async fn propuestas(&self, arqueo_id: Uuid) -> Result<Vec<Propuesta>, AppError> {
        let mut propuestas: Vec<Propuesta> = self
            .propuestas
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.arqueo_id == arqueo_id)
            .cloned()
            .collect();
        propuestas.sort_by(|a, b| a.legajo.cmp(&b.legajo));
        Ok(propuestas)
    }

    async fn actualizar_monto_final(
        &self,
        arqueo_id: Uuid,
        legajo: &str,
        monto_final: Decimal,
    ) -> Result<bool, AppError> {
        let mut propuestas = self.propuestas.lock().unwrap();
        match propuestas
            .iter_mut()
            .find(|p| p.arqueo_id == arqueo_id && p.legajo == legajo)
        {
            Some(p) => {
                p.monto_final = monto_final;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn reemplazar_confirmadas(
        &self,
        arqueo_id: Uuid,
        filas: &[AsignacionConfirmada],
    ) -> Result<u64, AppError> {
        let mut confirmadas = self.confirmadas.lock().unwrap();
        confirmadas.retain(|c| c.arqueo_id != arqueo_id);
        confirmadas.extend_from_slice(filas);
        Ok(filas.len() as u64)
    }
}

#[derive(Default)]
pub struct FichadasEnMemoria {
    pub fichadas: Vec<Fichada>,
}

#[async_trait]
impl FichadasRepo for FichadasEnMemoria {
    async fn por_fecha(&self, fecha: NaiveDate) -> Result<Vec<Fichada>, AppError> {
        Ok(self
            .fichadas
            .iter()
            .filter(|f| f.fecha == fecha)
            .cloned()
            .collect())
    }
}
