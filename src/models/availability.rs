use chrono::NaiveDate;

/// What the backend reports for a single date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Available {
        fecha: NaiveDate,
        horas: Vec<String>,
        horario_id: u64,
    },
    Unavailable {
        motivo: Option<String>,
    },
}
