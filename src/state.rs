use std::{sync::Arc, time::Duration};

use crate::{backend::BookingBackend, booking::session::FormRegistry, store::KeyValueStore};

/// Shared by every worker.
pub struct AppState {
    pub backend: Arc<dyn BookingBackend>,
    pub store: Arc<dyn KeyValueStore>,
    pub forms: FormRegistry,
}

impl AppState {
    pub fn new(backend: Arc<dyn BookingBackend>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            store,
            forms: FormRegistry::new(),
        }
    }

    pub fn with_form_idle_timeout(mut self, timeout: Duration) -> Self {
        self.forms = FormRegistry::with_idle_timeout(timeout);
        self
    }
}
