use thiserror::Error;

use crate::{
    backend::BackendError,
    booking::validation::FieldErrors,
    models::reservations::ReservationStatus,
};

pub const GENERIC_FETCH_ERROR: &str =
    "No se pudo verificar la disponibilidad. Intente nuevamente.";
pub const GENERIC_SUBMIT_ERROR: &str =
    "No se pudo contactar al servidor. Intente nuevamente.";

/// Everything that can go wrong in the booking flows. All of it is
/// recoverable by editing and retrying.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("{}", .0.display_block())]
    Validation(FieldErrors),
    #[error("{}", .0.display_block())]
    Rejected(FieldErrors),
    #[error("{0}")]
    Unavailable(String),
    #[error("{0}")]
    Transport(String),
    #[error("No se puede cambiar el estado de {from} a {to}")]
    IllegalTransition {
        from: ReservationStatus,
        to: ReservationStatus,
    },
    #[error("Una reserva {0} no puede reprogramarse")]
    NotReschedulable(ReservationStatus),
    #[error("Estado desconocido: {0}")]
    UnknownStatus(String),
    #[error("Seleccione una fecha con horarios disponibles")]
    HourSelectDisabled,
    #[error("La hora {0} no está disponible para la fecha seleccionada")]
    HourNotAvailable(String),
    #[error("La motocicleta {0} no corresponde a la marca y año seleccionados")]
    UnknownMoto(u64),
    #[error("Servicio desconocido: {0}")]
    UnknownService(u64),
    #[error("La fecha no puede ser anterior a hoy")]
    PastDate,
    #[error("Hay una operación en curso")]
    Busy,
    #[error("La reserva {0} incluye varios servicios y no puede editarse aquí")]
    MultipleServices(u64),
        #[error("Formulario no encontrado")]
    FormNotFound(u64),
    #[error("Reserva no encontrada")]
    ReservationNotFound,
}

impl From<BackendError> for BookingError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Rejected(errors) => {
                BookingError::Rejected(FieldErrors::from_server(&errors))
            }
            BackendError::NotFound => BookingError::ReservationNotFound,
            err @ (BackendError::Transport(_) | BackendError::Unexpected { .. }) => {
                tracing::warn!(error = %err, "backend call failed");
                BookingError::Transport(GENERIC_SUBMIT_ERROR.to_string())
            }
        }
    }
}
