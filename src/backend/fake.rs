//! In-memory stand-in for the booking backend used across unit tests.

use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;

use super::{BackendError, BackendResult, BookingBackend, ServerFieldErrors};
use crate::models::{
    availability::Availability,
    motos::{sample_catalog, MotoRef},
    reservations::{ClienteRef, NewReservation, Reservation, ReservationStatus},
    services::ServiceRef,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FetchAvailability(NaiveDate),
    Create(NewReservation),
    Update(u64, NewReservation),
    ChangeStatus(u64, ReservationStatus),
    Reprogram(u64, NaiveDate, String),
}

#[derive(Default)]
pub struct FakeBackend {
    pub availability: Mutex<HashMap<NaiveDate, Availability>>,
    pub reservations: Mutex<Vec<Reservation>>,
    pub reject_writes: Mutex<Option<ServerFieldErrors>>,
    pub offline: Mutex<bool>,
    pub calls: Mutex<Vec<Call>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hours(self, fecha: NaiveDate, horas: &[&str], horario_id: u64) -> Self {
        self.availability.lock().unwrap().insert(
            fecha,
            Availability::Available {
                fecha,
                horas: horas.iter().map(|h| h.to_string()).collect(),
                horario_id,
            },
        );
        self
    }

    pub fn closed_on(self, fecha: NaiveDate, motivo: Option<&str>) -> Self {
        self.availability.lock().unwrap().insert(
            fecha,
            Availability::Unavailable {
                motivo: motivo.map(str::to_string),
            },
        );
        self
    }

    pub fn with_reservation(self, reserva: Reservation) -> Self {
        self.reservations.lock().unwrap().push(reserva);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn write_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::FetchAvailability(_)))
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_online(&self) -> BackendResult<()> {
        if *self.offline.lock().unwrap() {
            return Err(BackendError::Transport("connection refused".to_string()));
        }
        Ok(())
    }

    fn check_write(&self) -> BackendResult<()> {
        self.check_online()?;
        match self.reject_writes.lock().unwrap().clone() {
            Some(errors) => Err(BackendError::Rejected(errors)),
            None => Ok(()),
        }
    }

    fn update_stored<F: FnOnce(&mut Reservation)>(&self, id: u64, f: F) -> BackendResult<Reservation> {
        let mut reservations = self.reservations.lock().unwrap();
        let reserva = reservations
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(BackendError::NotFound)?;
        f(reserva);
        Ok(reserva.clone())
    }
}

pub fn reservation(id: u64, estado: ReservationStatus, fecha: NaiveDate, hora: &str) -> Reservation {
    let moto = sample_catalog().remove(0);
    Reservation {
        id,
        cliente: ClienteRef {
            id: 3,
            nombre: "Rosa Quispe".to_string(),
        },
        moto,
        placa: "ABC-123".to_string(),
        servicios: vec![sample_services().remove(0)],
        fecha,
        hora: hora.to_string(),
        detalles: "Ruido en la cadena".to_string(),
        estado,
        created_at: None,
        updated_at: None,
        horario_id: Some(3),
    }
}

pub fn sample_services() -> Vec<ServiceRef> {
    vec![
        ServiceRef {
            id: 1,
            nombre: "Mantenimiento general".to_string(),
        },
        ServiceRef {
            id: 2,
            nombre: "Cambio de aceite".to_string(),
        },
    ]
}

#[async_trait]
impl BookingBackend for FakeBackend {
    async fn fetch_availability(&self, fecha: NaiveDate) -> BackendResult<Availability> {
        self.record(Call::FetchAvailability(fecha));
        self.check_online()?;
        Ok(self
            .availability
            .lock()
            .unwrap()
            .get(&fecha)
            .cloned()
            .unwrap_or(Availability::Unavailable { motivo: None }))
    }

    async fn create_reservation(&self, reserva: &NewReservation) -> BackendResult<()> {
        self.record(Call::Create(reserva.clone()));
        self.check_write()
    }

    async fn update_reservation(&self, id: u64, reserva: &NewReservation) -> BackendResult<()> {
        self.record(Call::Update(id, reserva.clone()));
        self.check_write()?;
        self.update_stored(id, |r| {
            r.fecha = reserva.fecha;
            r.hora = reserva.hora.clone();
            r.placa = reserva.placa.clone();
        })
        .map(|_| ())
    }

    async fn change_status(
        &self,
        id: u64,
        estado: ReservationStatus,
    ) -> BackendResult<Reservation> {
        self.record(Call::ChangeStatus(id, estado));
        self.check_online()?;
        self.update_stored(id, |r| r.estado = estado)
    }

    async fn reprogram(&self, id: u64, fecha: NaiveDate, hora: &str) -> BackendResult<Reservation> {
        self.record(Call::Reprogram(id, fecha, hora.to_string()));
        self.check_online()?;
        self.update_stored(id, |r| {
            r.fecha = fecha;
            r.hora = hora.to_string();
        })
    }

    async fn list_reservations(&self) -> BackendResult<Vec<Reservation>> {
        self.check_online()?;
        Ok(self.reservations.lock().unwrap().clone())
    }

    async fn get_reservation(&self, id: u64) -> BackendResult<Reservation> {
        self.check_online()?;
        self.reservations
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(BackendError::NotFound)
    }

    async fn list_services(&self) -> BackendResult<Vec<ServiceRef>> {
        self.check_online()?;
        Ok(sample_services())
    }

    async fn list_motos(&self) -> BackendResult<Vec<MotoRef>> {
        self.check_online()?;
        Ok(sample_catalog())
    }
}
