use chrono::NaiveDate;

use super::{draft::FormDraft, validation::FieldErrors};
use crate::{
    backend::BackendError,
    error::{BookingError, GENERIC_FETCH_ERROR},
    models::{
        availability::Availability,
        motos::{self, MotoRef},
        reservations::Reservation,
        services::ServiceRef,
    },
};

pub const GENERIC_UNAVAILABLE: &str = "No hay horarios disponibles para la fecha seleccionada";

/// Issued when a date change starts a fetch; only the latest ticket may
/// apply its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    fecha: NaiveDate,
}

impl FetchTicket {
    pub fn fecha(&self) -> NaiveDate {
        self.fecha
    }
}

/// In-progress reservation, new or being edited.
#[derive(Debug, Clone, Default)]
pub struct ScheduleForm {
    pub editing: Option<u64>,
    pub selected_year: Option<i32>,
    pub selected_brand: Option<String>,
    pub moto_id: Option<u64>,
    pub placa: String,
    pub servicio_id: Option<u64>,
    pub fecha: Option<NaiveDate>,
    pub hora: Option<String>,
    pub detalles: String,
    pub horario_id: Option<u64>,
    pub available_hours: Vec<String>,
    pub loading_hours: bool,
    pub date_error_message: String,
    pub processing: bool,
    pub completed: bool,
    pub errors: FieldErrors,
    pub(crate) fetch_seq: u64,
}

impl ScheduleForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an edit form. The stored slot is kept until the date is
    /// re-checked. The form carries a single service, so a reservation
    /// booked with several cannot be edited here.
    pub fn from_reservation(reserva: &Reservation) -> Result<Self, BookingError> {
        if reserva.servicios.len() > 1 {
            return Err(BookingError::MultipleServices(reserva.id));
        }
        Ok(Self {
            editing: Some(reserva.id),
            selected_year: Some(reserva.moto.year),
            selected_brand: Some(reserva.moto.brand.clone()),
            moto_id: Some(reserva.moto.id),
            placa: reserva.placa.clone(),
            servicio_id: reserva.servicios.first().map(|s| s.id),
            fecha: Some(reserva.fecha),
            hora: Some(reserva.hora.clone()),
            detalles: reserva.detalles.clone(),
            horario_id: reserva.horario_id,
            ..Default::default()
        })
    }

    pub fn select_year(&mut self, year: Option<i32>) {
        self.selected_year = year;
        self.moto_id = None;
    }

    pub fn select_brand(&mut self, brand: Option<String>) {
        self.selected_brand = brand.filter(|b| !b.trim().is_empty());
        self.moto_id = None;
    }

    pub fn model_options<'a>(&self, catalog: &'a [MotoRef]) -> Vec<&'a MotoRef> {
        motos::models(catalog, self.selected_brand.as_deref(), self.selected_year)
    }

    pub fn select_moto(&mut self, moto_id: Option<u64>, catalog: &[MotoRef]) -> Result<(), BookingError> {
        if let Some(id) = moto_id {
            if !self.model_options(catalog).iter().any(|m| m.id == id) {
                return Err(BookingError::UnknownMoto(id));
            }
        }
        self.moto_id = moto_id;
        Ok(())
    }

    pub fn set_placa(&mut self, placa: String) {
        self.placa = placa;
    }

    pub fn set_servicio(
        &mut self,
        servicio_id: Option<u64>,
        services: &[ServiceRef],
    ) -> Result<(), BookingError> {
        if let Some(id) = servicio_id {
            if !services.iter().any(|s| s.id == id) {
                return Err(BookingError::UnknownService(id));
            }
        }
        self.servicio_id = servicio_id;
        Ok(())
    }

    pub fn set_detalles(&mut self, detalles: String) {
        self.detalles = detalles;
    }

    /// Records the new date and clears the slot before any response arrives.
    pub fn begin_date_change(&mut self, fecha: NaiveDate) -> FetchTicket {
        self.fetch_seq += 1;
        self.fecha = Some(fecha);
        self.horario_id = None;
        self.date_error_message.clear();
        self.loading_hours = true;
        FetchTicket {
            seq: self.fetch_seq,
            fecha,
        }
    }

    /// Applies a fetch result. Returns false when a newer date change has
    /// superseded `ticket`.
    pub fn apply_availability(
        &mut self,
        ticket: FetchTicket,
        result: Result<Availability, BackendError>,
    ) -> bool {
        if ticket.seq != self.fetch_seq || self.fecha != Some(ticket.fecha) {
            tracing::debug!(fecha = %ticket.fecha, "dropping stale availability response");
            return false;
        }
        self.loading_hours = false;

        let result = match result {
            Ok(Availability::Available { fecha, .. }) if fecha != ticket.fecha => {
                Err(BackendError::Unexpected {
                    status: 200,
                    body: format!("horas para {} al consultar {}", fecha, ticket.fecha),
                })
            }
            other => other,
        };

        match result {
            Ok(Availability::Available {
                horas, horario_id, ..
            }) => {
                if let Some(hora) = &self.hora {
                    if !horas.contains(hora) {
                        self.hora = None;
                    }
                }
                self.available_hours = horas;
                self.horario_id = Some(horario_id);
                self.date_error_message.clear();
            }
            Ok(Availability::Unavailable { motivo }) => {
                self.close_hours(motivo.unwrap_or_else(|| GENERIC_UNAVAILABLE.to_string()));
            }
            Err(err) => {
                tracing::warn!(fecha = %ticket.fecha, error = %err, "availability fetch failed");
                self.close_hours(GENERIC_FETCH_ERROR.to_string());
            }
        }
        true
    }

    fn close_hours(&mut self, message: String) {
        self.available_hours.clear();
        self.hora = None;
        self.date_error_message = message;
    }

    pub fn hour_select_disabled(&self) -> bool {
        self.fecha.is_none() || self.loading_hours || self.available_hours.is_empty()
    }

    pub fn submit_disabled(&self) -> bool {
        self.processing || self.loading_hours
    }

    pub fn select_hora(&mut self, hora: &str) -> Result<(), BookingError> {
        if self.hour_select_disabled() {
            return Err(BookingError::HourSelectDisabled);
        }
        if !self.available_hours.iter().any(|h| h == hora) {
            return Err(BookingError::HourNotAvailable(hora.to_string()));
        }
        self.hora = Some(hora.to_string());
        Ok(())
    }

    /// Back to an empty form. Fetches still in flight no longer apply.
    pub fn reset(&mut self) {
        let fetch_seq = self.fetch_seq + 1;
        *self = Self::default();
        self.fetch_seq = fetch_seq;
    }

    pub fn to_draft(&self) -> FormDraft {
        FormDraft {
            selected_year: self.selected_year,
            selected_brand: self.selected_brand.clone(),
            moto_id: self.moto_id,
            placa: self.placa.clone(),
            servicio_id: self.servicio_id,
            fecha: self.fecha,
            hora: self.hora.clone(),
            detalles: self.detalles.clone(),
        }
    }

    /// Restores user-entered fields. Motorcycle and service go through the
    /// same checks as a fresh selection; ids missing from the current
    /// catalogue are dropped. Availability has to be fetched again.
    pub fn restore_draft(&mut self, draft: FormDraft, catalog: &[MotoRef], services: &[ServiceRef]) {
        self.select_year(draft.selected_year);
        self.select_brand(draft.selected_brand);
        if let Err(err) = self.select_moto(draft.moto_id, catalog) {
            tracing::debug!(error = %err, "dropping motorcycle from draft");
        }
        self.servicio_id = None;
        if let Err(err) = self.set_servicio(draft.servicio_id, services) {
            tracing::debug!(error = %err, "dropping service from draft");
        }
        self.set_placa(draft.placa);
        self.set_detalles(draft.detalles);
        self.fecha = draft.fecha;
        self.hora = draft.hora;
        self.horario_id = None;
        self.available_hours.clear();
    }
}
