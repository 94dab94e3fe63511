mod requests;
mod responses;
mod utils;

use crate::{
    error::BookingError,
    models::{availability::Availability, reservations::ReservationStatus},
    protocol::SimpleResponse,
    state::AppState,
    store::recent,
};
use actix_web::{post, web, HttpResponse, Responder};
use anyhow::Context;

use self::{
    requests::*,
    responses::*,
    utils::{paginate, search, sort, SortKey},
};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(search_reservas)
        .service(recent_searches)
        .service(clear_recent_searches)
        .service(view_reserva)
        .service(change_estado)
        .service(reprogramar);
}

crate::post_funcs! {
    (search_reservas, "/search_reservas", SearchReservasRequest, SearchReservasResponse),
    (recent_searches, "/recent_searches", EmptyRequest, RecentSearchesResponse),
    (clear_recent_searches, "/clear_recent_searches", EmptyRequest, SimpleResponse),
    (view_reserva, "/view_reserva", ViewReservaRequest, ReservaDetailResponse),
    (change_estado, "/change_estado", ChangeEstadoRequest, ReservaDetailResponse),
    (reprogramar, "/reprogramar", ReprogramarRequest, ReservaDetailResponse),
}

fn parse_estado(estado: &str) -> Result<ReservationStatus, BookingError> {
    ReservationStatus::parse(estado).ok_or_else(|| BookingError::UnknownStatus(estado.to_string()))
}

async fn search_reservas_impl(
    state: web::Data<AppState>,
    info: web::Json<SearchReservasRequest>,
) -> anyhow::Result<SearchReservasResponse> {
    let info = info.into_inner();
    let estado = match info.estado.as_deref().map(str::trim) {
        Some("") | None => None,
        Some(estado) => Some(parse_estado(estado)?),
    };
    let sort_key = SortKey::parse(info.sort.as_deref())?;

    let reservas = state
        .backend
        .list_reservations()
        .await
        .map_err(BookingError::from)?;
    let mut found = search(reservas, info.query.as_deref(), estado);
    sort(&mut found, sort_key);
    let page = paginate(found, info.page, info.per_page);

    if let Some(query) = info.query.as_deref() {
        recent::record(state.store.as_ref(), query)
            .await
            .context("No se pudo guardar la búsqueda")?;
    }

    Ok(SearchReservasResponse {
        success: true,
        err: String::new(),
        reservas: page.items.iter().map(ReservaItem::from).collect(),
        total: page.total,
        page: page.page,
        per_page: page.per_page,
        total_pages: page.total_pages,
    })
}

async fn recent_searches_impl(
    state: web::Data<AppState>,
    _info: web::Json<EmptyRequest>,
) -> anyhow::Result<RecentSearchesResponse> {
    let searches = recent::list(state.store.as_ref()).await?;
    Ok(RecentSearchesResponse {
        success: true,
        err: String::new(),
        searches,
    })
}

async fn clear_recent_searches_impl(
    state: web::Data<AppState>,
    _info: web::Json<EmptyRequest>,
) -> anyhow::Result<SimpleResponse> {
    recent::clear(state.store.as_ref()).await?;
    Ok(SimpleResponse::ok())
}

async fn view_reserva_impl(
    state: web::Data<AppState>,
    info: web::Json<ViewReservaRequest>,
) -> anyhow::Result<ReservaDetailResponse> {
    let reserva = state
        .backend
        .get_reservation(info.id)
        .await
        .map_err(BookingError::from)?;
    Ok(ReservaDetailResponse::from_reservation(&reserva))
}

async fn change_estado_impl(
    state: web::Data<AppState>,
    info: web::Json<ChangeEstadoRequest>,
) -> anyhow::Result<ReservaDetailResponse> {
    let info = info.into_inner();
    let to = parse_estado(&info.estado)?;

    let current = state
        .backend
        .get_reservation(info.id)
        .await
        .map_err(BookingError::from)?;
    if !current.estado.can_transition_to(to) {
        return Err(BookingError::IllegalTransition {
            from: current.estado,
            to,
        }
        .into());
    }

    let updated = state
        .backend
        .change_status(info.id, to)
        .await
        .map_err(BookingError::from)?;
    tracing::info!(reserva = info.id, from = %current.estado, to = %updated.estado, "status changed");

    Ok(ReservaDetailResponse::from_reservation(&updated))
}

async fn reprogramar_impl(
    state: web::Data<AppState>,
    info: web::Json<ReprogramarRequest>,
) -> anyhow::Result<ReservaDetailResponse> {
    let info = info.into_inner();
    let fecha = crate::utils::parse_date_str(&info.fecha)?;
    if fecha < crate::utils::today() {
        return Err(BookingError::PastDate.into());
    }

    let current = state
        .backend
        .get_reservation(info.id)
        .await
        .map_err(BookingError::from)?;
    if !current.estado.can_reschedule() {
        return Err(BookingError::NotReschedulable(current.estado).into());
    }

    // re-check the slot right before asking for it
    let availability = state
        .backend
        .fetch_availability(fecha)
        .await
        .map_err(|err| {
            tracing::warn!(error = %err, %fecha, "availability fetch failed");
            BookingError::Transport(crate::error::GENERIC_FETCH_ERROR.to_string())
        })?;
    match availability {
        Availability::Available { horas, .. } if horas.contains(&info.hora) => {}
        Availability::Available { .. } => {
            return Err(BookingError::HourNotAvailable(info.hora).into());
        }
        Availability::Unavailable { motivo } => {
            return Err(BookingError::Unavailable(
                motivo.unwrap_or_else(|| crate::booking::form::GENERIC_UNAVAILABLE.to_string()),
            )
            .into());
        }
    }

    let updated = state
        .backend
        .reprogram(info.id, fecha, &info.hora)
        .await
        .map_err(BookingError::from)?;
    tracing::info!(reserva = info.id, %fecha, hora = %info.hora, "reservation rescheduled");

    Ok(ReservaDetailResponse::from_reservation(&updated))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{test, App};
    use chrono::NaiveDate;
    use serde_json::{json, Value};

    use super::*;
    use crate::{
        backend::fake::{reservation, Call, FakeBackend},
        store::MemoryStore,
    };

    macro_rules! post_json {
        ($app:expr, $uri:expr, $body:expr) => {{
            let req = test::TestRequest::post()
                .uri($uri)
                .set_json($body)
                .to_request();
            let resp: Value = test::call_and_read_body_json(&$app, req).await;
            resp
        }};
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 1, day).unwrap()
    }

    fn state_with(backend: FakeBackend) -> (Arc<FakeBackend>, web::Data<AppState>) {
        let backend = Arc::new(backend);
        let state = web::Data::new(AppState::new(
            backend.clone(),
            Arc::new(MemoryStore::new()),
        ));
        (backend, state)
    }

    fn backend_with_bookings() -> FakeBackend {
        let mut otra = reservation(13, ReservationStatus::Completada, date(9), "10:00");
        otra.placa = "XYZ-987".to_string();
        FakeBackend::new()
            .with_hours(date(10), &["09:00", "15:00"], 4)
            .closed_on(date(6), Some("Taller cerrado"))
            .with_reservation(reservation(12, ReservationStatus::Pendiente, date(8), "09:00"))
            .with_reservation(otra)
    }

    #[actix_web::test]
    async fn cancelling_updates_badge() {
        let (backend, state) = state_with(backend_with_bookings());
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .service(web::scope("/admin").configure(config)),
        )
        .await;

        let resp = post_json!(app, "/admin/view_reserva", json!({ "id": 12 }));
        assert_eq!(resp["reserva"]["estado"]["label"], "Pendiente");
        assert_eq!(
            resp["transiciones"],
            json!([
                { "estado": "confirmada", "label": "Confirmada" },
                { "estado": "cancelada", "label": "Cancelada" }
            ])
        );

        let resp = post_json!(
            app,
            "/admin/change_estado",
            json!({ "id": 12, "estado": "cancelada" })
        );
        assert_eq!(resp["success"], true);
        assert_eq!(resp["reserva"]["estado"]["label"], "Cancelada");
        assert_eq!(
            backend.write_calls(),
            vec![Call::ChangeStatus(12, ReservationStatus::Cancelada)]
        );
    }

    #[actix_web::test]
    async fn illegal_transition_never_reaches_backend() {
        let (backend, state) = state_with(backend_with_bookings());
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .service(web::scope("/admin").configure(config)),
        )
        .await;

        let resp = post_json!(
            app,
            "/admin/change_estado",
            json!({ "id": 13, "estado": "pendiente" })
        );
        assert_eq!(resp["success"], false);
        assert_eq!(
            resp["err"],
            "No se puede cambiar el estado de Completada a Pendiente"
        );

        let resp = post_json!(
            app,
            "/admin/change_estado",
            json!({ "id": 12, "estado": "archivada" })
        );
        assert_eq!(resp["success"], false);
        assert!(backend.write_calls().is_empty());
    }

    #[actix_web::test]
    async fn reschedule_checks_availability_first() {
        let (backend, state) = state_with(backend_with_bookings());
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .service(web::scope("/admin").configure(config)),
        )
        .await;

        let resp = post_json!(
            app,
            "/admin/reprogramar",
            json!({ "id": 12, "fecha": "2030-01-06", "hora": "09:00" })
        );
        assert_eq!(resp["err"], "Taller cerrado");

        let resp = post_json!(
            app,
            "/admin/reprogramar",
            json!({ "id": 12, "fecha": "2030-01-10", "hora": "18:00" })
        );
        assert_eq!(resp["success"], false);

        let resp = post_json!(
            app,
            "/admin/reprogramar",
            json!({ "id": 13, "fecha": "2030-01-10", "hora": "15:00" })
        );
        assert_eq!(resp["success"], false);

        let resp = post_json!(
            app,
            "/admin/reprogramar",
            json!({ "id": 12, "fecha": "2030-01-10", "hora": "15:00" })
        );
        assert_eq!(resp["success"], true);
        assert_eq!(resp["reserva"]["fecha"], "2030-01-10");
        assert_eq!(resp["reserva"]["hora"], "15:00");
        assert_eq!(
            backend.write_calls(),
            vec![Call::Reprogram(12, date(10), "15:00".to_string())]
        );
    }

    #[actix_web::test]
    async fn reschedule_to_past_date_is_refused_locally() {
        let (backend, state) = state_with(backend_with_bookings());
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .service(web::scope("/admin").configure(config)),
        )
        .await;

        let resp = post_json!(
            app,
            "/admin/reprogramar",
            json!({ "id": 12, "fecha": "2020-01-10", "hora": "09:00" })
        );
        assert_eq!(resp["success"], false);
        assert_eq!(resp["err"], "La fecha no puede ser anterior a hoy");
        assert!(backend.calls().is_empty());
    }

    #[actix_web::test]
    async fn search_filters_and_remembers_queries() {
        let (_backend, state) = state_with(backend_with_bookings());
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .service(web::scope("/admin").configure(config)),
        )
        .await;

        let resp = post_json!(app, "/admin/search_reservas", json!({}));
        assert_eq!(resp["total"], 2);
        assert_eq!(resp["reservas"][0]["id"], 12);

        let resp = post_json!(
            app,
            "/admin/search_reservas",
            json!({ "query": "xyz", "sort": "fecha_desc" })
        );
        assert_eq!(resp["total"], 1);
        assert_eq!(resp["reservas"][0]["placa"], "XYZ-987");
        assert_eq!(resp["reservas"][0]["estado"]["label"], "Completada");

        let resp = post_json!(
            app,
            "/admin/search_reservas",
            json!({ "estado": "pendiente", "per_page": 1, "page": 1 })
        );
        assert_eq!(resp["total"], 1);
        assert_eq!(resp["total_pages"], 1);

        let resp = post_json!(app, "/admin/recent_searches", json!({}));
        assert_eq!(resp["searches"], json!(["xyz"]));

        post_json!(app, "/admin/clear_recent_searches", json!({}));
        let resp = post_json!(app, "/admin/recent_searches", json!({}));
        assert_eq!(resp["searches"], json!([]));
    }
}
