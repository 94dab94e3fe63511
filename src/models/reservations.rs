use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{motos::MotoRef, services::ServiceRef};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClienteRef {
    pub id: u64,
    pub nombre: String,
}

/// A booked service appointment as the backend reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: u64,
    pub cliente: ClienteRef,
    pub moto: MotoRef,
    pub placa: String,
    #[serde(default)]
    pub servicios: Vec<ServiceRef>,
    pub fecha: NaiveDate,
    pub hora: String,
    #[serde(default)]
    pub detalles: String,
    pub estado: ReservationStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub horario_id: Option<u64>,
}

/// Body of a create or update call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewReservation {
    pub moto_id: u64,
    pub placa: String,
    pub servicio_id: u64,
    pub fecha: NaiveDate,
    pub hora: String,
    pub detalles: String,
    pub horario_id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pendiente,
    Confirmada,
    Completada,
    Cancelada,
}

impl ReservationStatus {
    pub const ALL: [ReservationStatus; 4] = [
        ReservationStatus::Pendiente,
        ReservationStatus::Confirmada,
        ReservationStatus::Completada,
        ReservationStatus::Cancelada,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pendiente => "pendiente",
            ReservationStatus::Confirmada => "confirmada",
            ReservationStatus::Completada => "completada",
            ReservationStatus::Cancelada => "cancelada",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL.iter().copied().find(|status| status.as_str() == s)
    }

    /// Badge text shown in list and detail views.
    pub fn label(&self) -> &'static str {
        match self {
            ReservationStatus::Pendiente => "Pendiente",
            ReservationStatus::Confirmada => "Confirmada",
            ReservationStatus::Completada => "Completada",
            ReservationStatus::Cancelada => "Cancelada",
        }
    }

    /// Statuses staff may move a reservation to from this one.
    pub fn allowed_transitions(&self) -> &'static [ReservationStatus] {
        match self {
            ReservationStatus::Pendiente => {
                &[ReservationStatus::Confirmada, ReservationStatus::Cancelada]
            }
            ReservationStatus::Confirmada => &[
                ReservationStatus::Completada,
                ReservationStatus::Cancelada,
                ReservationStatus::Pendiente,
            ],
            ReservationStatus::Completada => &[],
            ReservationStatus::Cancelada => &[ReservationStatus::Pendiente],
        }
    }

    pub fn can_transition_to(&self, to: ReservationStatus) -> bool {
        self.allowed_transitions().contains(&to)
    }

    pub fn can_reschedule(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Pendiente | ReservationStatus::Confirmada
        )
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
