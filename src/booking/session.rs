use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex,
    },
    time::{Duration, Instant},
};

use chrono::NaiveDate;

use super::{
    form::ScheduleForm,
    submission::{self, SubmitOutcome},
};
use crate::{
    backend::BookingBackend,
    error::BookingError,
    models::{motos::MotoRef, services::ServiceRef},
};

pub const DEFAULT_FORM_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// A live form plus the reference data its selects are built from.
#[derive(Debug, Clone)]
pub struct FormSession {
    pub form: ScheduleForm,
    pub motos: Vec<MotoRef>,
    pub services: Vec<ServiceRef>,
}

struct Entry {
    session: FormSession,
    touched: Instant,
}

/// Live forms by id. The lock is only held for synchronous state changes,
/// never across a backend call. Forms left untouched for longer than the
/// idle timeout are dropped on the next open or access.
pub struct FormRegistry {
    next_id: AtomicU64,
    idle_timeout: Duration,
    sessions: Mutex<HashMap<u64, Entry>>,
}

impl FormRegistry {
    pub fn new() -> Self {
        Self::with_idle_timeout(DEFAULT_FORM_IDLE_TIMEOUT)
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            next_id: AtomicU64::new(0),
            idle_timeout,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn evict_idle(&self, sessions: &mut HashMap<u64, Entry>) {
        let before = sessions.len();
        sessions.retain(|_, entry| entry.touched.elapsed() <= self.idle_timeout);
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::debug!(evicted, "dropped idle booking forms");
        }
    }

    pub fn open(&self, session: FormSession) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        self.evict_idle(&mut sessions);
        sessions.insert(
            id,
            Entry {
                session,
                touched: Instant::now(),
            },
        );
        id
    }

    pub fn with<R, F: FnOnce(&mut FormSession) -> R>(&self, id: u64, f: F) -> Result<R, BookingError> {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        self.evict_idle(&mut sessions);
        let entry = sessions.get_mut(&id).ok_or(BookingError::FormNotFound(id))?;
        entry.touched = Instant::now();
        Ok(f(&mut entry.session))
    }

    pub fn snapshot(&self, id: u64) -> Result<FormSession, BookingError> {
        self.with(id, |s| s.clone())
    }

    pub fn close(&self, id: u64) -> bool {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        let sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.len()
    }
}

/// Opens a new form, or an edit form for `reserva_id` whose date is
/// re-checked right away.
pub async fn open_form(
    forms: &FormRegistry,
    backend: &dyn BookingBackend,
    reserva_id: Option<u64>,
) -> Result<u64, BookingError> {
    let motos = backend.list_motos().await?;
    let services = backend.list_services().await?;
    let form = match reserva_id {
        Some(id) => ScheduleForm::from_reservation(&backend.get_reservation(id).await?)?,
        None => ScheduleForm::new(),
    };
    let fecha = form.fecha;

    let id = forms.open(FormSession {
        form,
        motos,
        services,
    });
    tracing::debug!(form_id = id, ?reserva_id, live_forms = forms.len(), "opened booking form");

    if let Some(fecha) = fecha {
        change_date(forms, backend, id, fecha).await?;
    }
    Ok(id)
}

/// Returns whether this call's response was the one applied.
pub async fn change_date(
    forms: &FormRegistry,
    backend: &dyn BookingBackend,
    id: u64,
    fecha: NaiveDate,
) -> Result<bool, BookingError> {
    let ticket = forms.with(id, |s| s.form.begin_date_change(fecha))?;
    let result = backend.fetch_availability(ticket.fecha()).await;
    forms.with(id, |s| s.form.apply_availability(ticket, result))
}

pub async fn submit(
    forms: &FormRegistry,
    backend: &dyn BookingBackend,
    id: u64,
    today: NaiveDate,
) -> Result<SubmitOutcome, BookingError> {
    let request = forms.with(id, |s| submission::prepare(&mut s.form, today))??;
    let result = request.send(backend).await;
    let outcome = forms.with(id, |s| submission::complete(&mut s.form, result))?;
    match &outcome {
        Ok(done) => tracing::info!(form_id = id, outcome = ?done, "reservation submitted"),
        Err(err) => tracing::info!(form_id = id, error = %err, "reservation not accepted"),
    }
    outcome
}
