pub mod http;
mod wire;

#[cfg(test)]
pub mod fake;

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{
    availability::Availability,
    motos::MotoRef,
    reservations::{NewReservation, Reservation, ReservationStatus},
    services::ServiceRef,
};

pub use self::http::HttpBackend;

/// Field name to messages, as the backend reports validation failures.
pub type ServerFieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Error de conexión con el servidor: {0}")]
    Transport(String),
    #[error("El servidor rechazó la solicitud")]
    Rejected(ServerFieldErrors),
    #[error("Recurso no encontrado")]
    NotFound,
    #[error("Respuesta inesperada del servidor ({status}): {body}")]
    Unexpected { status: u16, body: String },
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::Transport(err.to_string())
    }
}

pub type BackendResult<T> = Result<T, BackendError>;

/// The upstream booking system. It owns every record; this side only reads
/// and requests changes.
#[async_trait]
pub trait BookingBackend: Send + Sync {
    async fn fetch_availability(&self, fecha: NaiveDate) -> BackendResult<Availability>;
    async fn create_reservation(&self, reserva: &NewReservation) -> BackendResult<()>;
    async fn update_reservation(&self, id: u64, reserva: &NewReservation) -> BackendResult<()>;
    async fn change_status(&self, id: u64, estado: ReservationStatus)
        -> BackendResult<Reservation>;
    async fn reprogram(&self, id: u64, fecha: NaiveDate, hora: &str)
        -> BackendResult<Reservation>;
    async fn list_reservations(&self) -> BackendResult<Vec<Reservation>>;
    async fn get_reservation(&self, id: u64) -> BackendResult<Reservation>;
    async fn list_services(&self) -> BackendResult<Vec<ServiceRef>>;
    async fn list_motos(&self) -> BackendResult<Vec<MotoRef>>;
}
