use chrono::NaiveDate;
use serde::Serialize;

use super::form::ScheduleForm;
use crate::{backend::ServerFieldErrors, models::reservations::NewReservation};

pub const MAX_PLACA_LEN: usize = 10;

/// Display label for a form field; unknown fields keep their raw name.
pub fn field_label(field: &str) -> &str {
    match field {
        "moto_id" => "Motocicleta",
        "placa" => "Placa",
        "servicio_id" => "Servicio",
        "fecha" => "Fecha",
        "hora" => "Hora",
        "horario_id" => "Horario",
        "detalles" => "Detalles",
        "general" => "General",
        other => other,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub label: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<S: Into<String>>(&mut self, field: &str, message: S) {
        self.0.push(FieldError {
            field: field.to_string(),
            label: field_label(field).to_string(),
            message: message.into(),
        });
    }

    pub fn from_server(errors: &ServerFieldErrors) -> Self {
        let mut mapped = Self::new();
        for (field, messages) in errors {
            for message in messages {
                mapped.push(field, message.clone());
            }
        }
        mapped
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// One line per failure, in rule order.
    pub fn display_block(&self) -> String {
        self.0
            .iter()
            .map(|e| format!("{}: {}", e.label, e.message))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Checks every required field and builds the request body. All failures are
/// collected; nothing is sent unless the list is empty.
pub fn validate(form: &ScheduleForm, today: NaiveDate) -> Result<NewReservation, FieldErrors> {
    let mut errors = FieldErrors::new();

    if form.moto_id.is_none() {
        errors.push("moto_id", "Debe seleccionar una motocicleta");
    }

    let placa = form.placa.trim();
    if placa.is_empty() {
        errors.push("placa", "La placa es obligatoria");
    } else if placa.chars().count() > MAX_PLACA_LEN {
        errors.push(
            "placa",
            format!("La placa no puede exceder {} caracteres", MAX_PLACA_LEN),
        );
    }

    if form.servicio_id.is_none() {
        errors.push("servicio_id", "Debe seleccionar un servicio");
    }

    match form.fecha {
        None => errors.push("fecha", "Debe seleccionar una fecha"),
        Some(fecha) if fecha < today => {
            errors.push("fecha", "La fecha no puede ser anterior a hoy")
        }
        Some(_) => {}
    }

    if form.hora.is_none() {
        errors.push("hora", "Debe seleccionar una hora");
    }

    if form.horario_id.is_none() {
        errors.push(
            "horario_id",
            "La disponibilidad de la fecha y hora no ha sido confirmada",
        );
    }

    match (form.moto_id, form.servicio_id, form.fecha, &form.hora, form.horario_id) {
        (Some(moto_id), Some(servicio_id), Some(fecha), Some(hora), Some(horario_id))
            if errors.is_empty() =>
        {
            Ok(NewReservation {
                moto_id,
                placa: placa.to_string(),
                servicio_id,
                fecha,
                hora: hora.clone(),
                detalles: form.detalles.trim().to_string(),
                horario_id,
            })
        }
        _ => Err(errors),
    }
}
