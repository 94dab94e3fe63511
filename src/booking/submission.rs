use chrono::NaiveDate;

use super::{
    form::ScheduleForm,
    validation::{validate, FieldErrors},
};
use crate::{
    backend::{BackendError, BookingBackend},
    error::{BookingError, GENERIC_SUBMIT_ERROR},
    models::reservations::NewReservation,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRequest {
    Create(NewReservation),
    Update(u64, NewReservation),
}

impl SubmitRequest {
    pub async fn send(&self, backend: &dyn BookingBackend) -> Result<(), BackendError> {
        match self {
            SubmitRequest::Create(reserva) => backend.create_reservation(reserva).await,
            SubmitRequest::Update(id, reserva) => backend.update_reservation(*id, reserva).await,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created,
    Updated(u64),
}

/// Validates and marks the form busy. On failure the form carries the field
/// errors and nothing must be sent.
pub fn prepare(form: &mut ScheduleForm, today: NaiveDate) -> Result<SubmitRequest, BookingError> {
    if form.submit_disabled() {
        return Err(BookingError::Busy);
    }

    match validate(form, today) {
        Ok(reserva) => {
            form.errors = FieldErrors::new();
            form.processing = true;
            Ok(match form.editing {
                Some(id) => SubmitRequest::Update(id, reserva),
                None => SubmitRequest::Create(reserva),
            })
        }
        Err(errors) => {
            form.errors = errors.clone();
            Err(BookingError::Validation(errors))
        }
    }
}

pub fn complete(
    form: &mut ScheduleForm,
    result: Result<(), BackendError>,
) -> Result<SubmitOutcome, BookingError> {
    form.processing = false;

    match result {
        Ok(()) => match form.editing {
            Some(id) => {
                form.errors = FieldErrors::new();
                form.completed = true;
                Ok(SubmitOutcome::Updated(id))
            }
            None => {
                form.reset();
                Ok(SubmitOutcome::Created)
            }
        },
        Err(BackendError::Rejected(server)) => {
            let errors = FieldErrors::from_server(&server);
            form.errors = errors.clone();
            Err(BookingError::Rejected(errors))
        }
        Err(err) => {
            let err = BookingError::from(err);
            let mut errors = FieldErrors::new();
            errors.push("general", GENERIC_SUBMIT_ERROR);
            form.errors = errors;
            Err(err)
        }
    }
}
