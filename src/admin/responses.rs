use serde::Serialize;

use crate::{models::reservations::Reservation, protocol::StatusBadge, utils::format_date_str};

#[derive(Default, Serialize)]
pub struct ReservaItem {
    pub id: u64,
    pub cliente: String,
    pub moto: String,
    pub placa: String,
    pub servicios: Vec<String>,
    pub fecha: String,
    pub hora: String,
    pub estado: StatusBadge,
}

impl From<&Reservation> for ReservaItem {
    fn from(reserva: &Reservation) -> Self {
        Self {
            id: reserva.id,
            cliente: reserva.cliente.nombre.clone(),
            moto: format!(
                "{} {} ({})",
                reserva.moto.brand, reserva.moto.model, reserva.moto.year
            ),
            placa: reserva.placa.clone(),
            servicios: reserva.servicios.iter().map(|s| s.nombre.clone()).collect(),
            fecha: format_date_str(&reserva.fecha),
            hora: reserva.hora.clone(),
            estado: reserva.estado.into(),
        }
    }
}

#[derive(Default, Serialize)]
pub struct SearchReservasResponse {
    pub success: bool,
    pub err: String,
    pub reservas: Vec<ReservaItem>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
}

#[derive(Default, Serialize)]
pub struct RecentSearchesResponse {
    pub success: bool,
    pub err: String,
    pub searches: Vec<String>,
}

#[derive(Default, Serialize)]
pub struct ReservaDetailResponse {
    pub success: bool,
    pub err: String,
    pub reserva: ReservaItem,
    pub detalles: String,
    pub created_at: String,
    pub updated_at: String,
    /// Only the legal next statuses are offered.
    pub transiciones: Vec<StatusBadge>,
    pub can_reprogram: bool,
}

impl ReservaDetailResponse {
    pub fn from_reservation(reserva: &Reservation) -> Self {
        Self {
            success: true,
            err: String::new(),
            reserva: reserva.into(),
            detalles: reserva.detalles.clone(),
            created_at: reserva.created_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
            updated_at: reserva.updated_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
            transiciones: reserva
                .estado
                .allowed_transitions()
                .iter()
                .map(|s| (*s).into())
                .collect(),
            can_reprogram: reserva.estado.can_reschedule(),
        }
    }
}

crate::impl_err_response! {
    SearchReservasResponse,
    RecentSearchesResponse,
    ReservaDetailResponse,
}
