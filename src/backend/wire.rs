use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{BackendError, ServerFieldErrors};
use crate::models::{availability::Availability, reservations::ReservationStatus};

#[derive(Deserialize)]
pub struct AvailabilityResponse {
    pub disponible: bool,
    #[serde(default)]
    pub horas: Vec<String>,
    #[serde(default)]
    pub horario_id: Option<u64>,
    #[serde(default)]
    pub motivo: Option<String>,
    #[serde(default)]
    pub fecha: Option<NaiveDate>,
}

impl AvailabilityResponse {
    pub fn into_availability(self, fecha: NaiveDate) -> Result<Availability, BackendError> {
        if let Some(reported) = self.fecha {
            if reported != fecha {
                return Err(BackendError::Unexpected {
                    status: 200,
                    body: format!("horas para {} al consultar {}", reported, fecha),
                });
            }
        }
        if !self.disponible {
            return Ok(Availability::Unavailable {
                motivo: self.motivo.filter(|m| !m.trim().is_empty()),
            });
        }
        match self.horario_id {
            Some(horario_id) => Ok(Availability::Available {
                fecha,
                horas: self.horas,
                horario_id,
            }),
            None => Err(BackendError::Unexpected {
                status: 200,
                body: "disponible sin horario_id".to_string(),
            }),
        }
    }
}

/// Lists and records arrive either bare or wrapped in `data`.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Bare(T),
    Wrapped { data: T },
}

impl<T> Envelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            Envelope::Bare(inner) | Envelope::Wrapped { data: inner } => inner,
        }
    }
}

#[derive(Deserialize)]
pub struct ErrorsResponse {
    pub errors: ServerFieldErrors,
}

#[derive(Serialize)]
pub struct ChangeStatusRequest {
    pub estado: ReservationStatus,
}

#[derive(Serialize)]
pub struct ReprogramRequest<'a> {
    pub fecha: NaiveDate,
    pub hora: &'a str,
}
