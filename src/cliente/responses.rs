use serde::Serialize;

use crate::{
    booking::{session::FormSession, validation::FieldError},
    models::{motos, services::ServiceRef},
    utils::format_date_str_opt,
};

#[derive(Default, Serialize)]
pub struct ModelOption {
    pub id: u64,
    pub model: String,
}

/// Everything the booking form needs to render itself.
#[derive(Default, Serialize)]
pub struct FormView {
    pub editing: Option<u64>,
    pub selected_year: Option<i32>,
    pub selected_brand: Option<String>,
    pub moto_id: Option<u64>,
    pub placa: String,
    pub servicio_id: Option<u64>,
    pub fecha: String,
    pub hora: String,
    pub detalles: String,
    pub horario_id: Option<u64>,
    pub years: Vec<i32>,
    pub brands: Vec<String>,
    pub models: Vec<ModelOption>,
    pub services: Vec<ServiceRef>,
    pub available_hours: Vec<String>,
    pub loading_hours: bool,
    pub hour_select_disabled: bool,
    pub submit_disabled: bool,
    pub date_error_message: String,
    pub processing: bool,
    pub completed: bool,
    pub errors: Vec<FieldError>,
    pub error_block: String,
}

impl From<&FormSession> for FormView {
    fn from(session: &FormSession) -> Self {
        let form = &session.form;
        Self {
            editing: form.editing,
            selected_year: form.selected_year,
            selected_brand: form.selected_brand.clone(),
            moto_id: form.moto_id,
            placa: form.placa.clone(),
            servicio_id: form.servicio_id,
            fecha: format_date_str_opt(form.fecha.as_ref()),
            hora: form.hora.clone().unwrap_or_default(),
            detalles: form.detalles.clone(),
            horario_id: form.horario_id,
            years: motos::years(&session.motos),
            brands: motos::brands(&session.motos, form.selected_year),
            models: form
                .model_options(&session.motos)
                .into_iter()
                .map(|m| ModelOption {
                    id: m.id,
                    model: m.model.clone(),
                })
                .collect(),
            services: session.services.clone(),
            available_hours: form.available_hours.clone(),
            loading_hours: form.loading_hours,
            hour_select_disabled: form.hour_select_disabled(),
            submit_disabled: form.submit_disabled(),
            date_error_message: form.date_error_message.clone(),
            processing: form.processing,
            completed: form.completed,
            errors: form.errors.iter().cloned().collect(),
            error_block: form.errors.display_block(),
        }
    }
}

#[derive(Default, Serialize)]
pub struct FormResponse {
    pub success: bool,
    pub err: String,
    pub form_id: u64,
    /// "creada" or "actualizada" after an accepted submission.
    pub outcome: String,
    pub form: FormView,
}

crate::impl_err_response! {
    FormResponse,
}
