use anyhow::bail;

use crate::models::reservations::{Reservation, ReservationStatus};

pub const DEFAULT_PER_PAGE: usize = 10;
pub const MAX_PER_PAGE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    FechaAsc,
    FechaDesc,
    Cliente,
    Estado,
}

impl SortKey {
    pub fn parse(s: Option<&str>) -> anyhow::Result<Self> {
        match s.map(str::trim) {
            None | Some("") | Some("fecha_asc") => Ok(SortKey::FechaAsc),
            Some("fecha_desc") => Ok(SortKey::FechaDesc),
            Some("cliente") => Ok(SortKey::Cliente),
            Some("estado") => Ok(SortKey::Estado),
            Some(other) => bail!("Orden desconocido: {}", other),
        }
    }
}

/// Case-insensitive match over customer, plate, brand and model.
pub fn matches_query(reserva: &Reservation, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    [
        &reserva.cliente.nombre,
        &reserva.placa,
        &reserva.moto.brand,
        &reserva.moto.model,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&query))
}

pub fn search(
    reservas: Vec<Reservation>,
    query: Option<&str>,
    estado: Option<ReservationStatus>,
) -> Vec<Reservation> {
    reservas
        .into_iter()
        .filter(|r| query.map_or(true, |q| matches_query(r, q)))
        .filter(|r| estado.map_or(true, |e| r.estado == e))
        .collect()
}

pub fn sort(reservas: &mut [Reservation], key: SortKey) {
    match key {
        SortKey::FechaAsc => reservas.sort_by(|a, b| (a.fecha, &a.hora).cmp(&(b.fecha, &b.hora))),
        SortKey::FechaDesc => reservas.sort_by(|a, b| (b.fecha, &b.hora).cmp(&(a.fecha, &a.hora))),
        SortKey::Cliente => reservas.sort_by(|a, b| {
            a.cliente
                .nombre
                .to_lowercase()
                .cmp(&b.cliente.nombre.to_lowercase())
        }),
        SortKey::Estado => reservas.sort_by(|a, b| (a.estado, a.fecha).cmp(&(b.estado, b.fecha))),
    }
}

#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
}

/// 1-based; pages past the end come back empty.
pub fn paginate<T>(items: Vec<T>, page: Option<usize>, per_page: Option<usize>) -> Page<T> {
    let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
    let page = page.unwrap_or(1).max(1);
    let total = items.len();
    let total_pages = (total + per_page - 1) / per_page;
    let items = items
        .into_iter()
        .skip((page - 1).saturating_mul(per_page))
        .take(per_page)
        .collect();
    Page {
        items,
        total,
        page,
        per_page,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::backend::fake::reservation;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 1, day).unwrap()
    }

    fn sample() -> Vec<Reservation> {
        let mut a = reservation(1, ReservationStatus::Pendiente, date(9), "10:00");
        let mut b = reservation(2, ReservationStatus::Cancelada, date(8), "09:00");
        let mut c = reservation(3, ReservationStatus::Pendiente, date(8), "11:00");
        a.cliente.nombre = "Zoila Huamán".to_string();
        b.cliente.nombre = "andrés Soto".to_string();
        b.placa = "XYZ-987".to_string();
        c.moto.brand = "Yamaha".to_string();
        vec![a, b, c]
    }

    #[test]
    fn search_matches_plate_and_brand_case_insensitively() {
        let ids: Vec<u64> = search(sample(), Some("xyz"), None).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2]);
        let ids: Vec<u64> = search(sample(), Some("YAMAHA"), None).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn status_filter_combines_with_query() {
        let found = search(sample(), Some("   "), Some(ReservationStatus::Pendiente));
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn sorts_by_date_then_hour() {
        let mut reservas = sample();
        sort(&mut reservas, SortKey::FechaAsc);
        let ids: Vec<u64> = reservas.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);

        sort(&mut reservas, SortKey::FechaDesc);
        assert_eq!(reservas[0].id, 1);

        sort(&mut reservas, SortKey::Cliente);
        assert_eq!(reservas[0].id, 2);
    }

    #[test]
    fn unknown_sort_is_an_error() {
        assert!(SortKey::parse(Some("precio")).is_err());
        assert_eq!(SortKey::parse(None).unwrap(), SortKey::FechaAsc);
    }

    #[test]
    fn paginate_clamps_and_counts_pages() {
        let page = paginate((1..=25).collect::<Vec<_>>(), Some(3), None);
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.total_pages, 3);

        let page = paginate((1..=25).collect::<Vec<_>>(), Some(0), Some(1000));
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, MAX_PER_PAGE);
        assert_eq!(page.items.len(), 25);

        let page = paginate(Vec::<u8>::new(), Some(2), None);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
    }
}
