mod requests;
mod responses;

use crate::{
    booking::{draft, session, submission::SubmitOutcome},
    error::BookingError,
    protocol::SimpleResponse,
    state::AppState,
    utils,
};
use actix_web::{post, web, HttpResponse, Responder};
use anyhow::Context;

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(new_form)
        .service(view_form)
        .service(select_year)
        .service(select_brand)
        .service(select_moto)
        .service(update_fields)
        .service(set_fecha)
        .service(select_hora)
        .service(submit)
        .service(save_draft)
        .service(close_form);
}

crate::post_funcs! {
    (new_form, "/new_form", NewFormRequest, FormResponse),
    (view_form, "/view_form", FormRequest, FormResponse),
    (select_year, "/select_year", SelectYearRequest, FormResponse),
    (select_brand, "/select_brand", SelectBrandRequest, FormResponse),
    (select_moto, "/select_moto", SelectMotoRequest, FormResponse),
    (update_fields, "/update_fields", UpdateFieldsRequest, FormResponse),
    (set_fecha, "/set_fecha", SetFechaRequest, FormResponse),
    (select_hora, "/select_hora", SelectHoraRequest, FormResponse),
    (submit, "/submit", SubmitFormRequest, FormResponse),
    (save_draft, "/save_draft", SaveDraftRequest, SimpleResponse),
    (close_form, "/close_form", FormRequest, SimpleResponse),
}

fn form_response(state: &AppState, form_id: u64) -> anyhow::Result<FormResponse> {
    let session = state.forms.snapshot(form_id)?;
    Ok(FormResponse {
        success: true,
        err: String::new(),
        form_id,
        outcome: String::new(),
        form: FormView::from(&session),
    })
}

async fn new_form_impl(
    state: web::Data<AppState>,
    info: web::Json<NewFormRequest>,
) -> anyhow::Result<FormResponse> {
    let info = info.into_inner();
    let form_id = session::open_form(&state.forms, state.backend.as_ref(), info.reserva_id).await?;

    // drafts only seed new reservations
    let draft_key = info
        .draft_key
        .filter(|k| !k.trim().is_empty() && info.reserva_id.is_none());
    if let Some(key) = draft_key {
        if let Some(draft) = draft::load(state.store.as_ref(), &key).await? {
            let fecha = draft.fecha;
            state
                .forms
                .with(form_id, |s| s.form.restore_draft(draft, &s.motos, &s.services))?;
            if let Some(fecha) = fecha {
                session::change_date(&state.forms, state.backend.as_ref(), form_id, fecha).await?;
            }
        }
    }

    form_response(&state, form_id)
}

async fn view_form_impl(
    state: web::Data<AppState>,
    info: web::Json<FormRequest>,
) -> anyhow::Result<FormResponse> {
    form_response(&state, info.form_id)
}

async fn select_year_impl(
    state: web::Data<AppState>,
    info: web::Json<SelectYearRequest>,
) -> anyhow::Result<FormResponse> {
    let info = info.into_inner();
    state
        .forms
        .with(info.form_id, |s| s.form.select_year(info.year))?;
    form_response(&state, info.form_id)
}

async fn select_brand_impl(
    state: web::Data<AppState>,
    info: web::Json<SelectBrandRequest>,
) -> anyhow::Result<FormResponse> {
    let info = info.into_inner();
    state
        .forms
        .with(info.form_id, |s| s.form.select_brand(info.brand))?;
    form_response(&state, info.form_id)
}

async fn select_moto_impl(
    state: web::Data<AppState>,
    info: web::Json<SelectMotoRequest>,
) -> anyhow::Result<FormResponse> {
    let info = info.into_inner();
    state
        .forms
        .with(info.form_id, |s| s.form.select_moto(info.moto_id, &s.motos))??;
    form_response(&state, info.form_id)
}

async fn update_fields_impl(
    state: web::Data<AppState>,
    info: web::Json<UpdateFieldsRequest>,
) -> anyhow::Result<FormResponse> {
    let info = info.into_inner();
    state.forms.with(info.form_id, |s| -> Result<(), BookingError> {
        if let Some(servicio_id) = info.servicio_id {
            s.form.set_servicio(Some(servicio_id), &s.services)?;
        }
        if let Some(placa) = info.placa {
            s.form.set_placa(placa);
        }
        if let Some(detalles) = info.detalles {
            s.form.set_detalles(detalles);
        }
        Ok(())
    })??;
    form_response(&state, info.form_id)
}

async fn set_fecha_impl(
    state: web::Data<AppState>,
    info: web::Json<SetFechaRequest>,
) -> anyhow::Result<FormResponse> {
    let info = info.into_inner();
    let fecha = utils::parse_date_str(&info.fecha)?;
    let applied =
        session::change_date(&state.forms, state.backend.as_ref(), info.form_id, fecha).await?;
    if !applied {
        tracing::debug!(form_id = info.form_id, %fecha, "a newer date superseded this one");
    }
    form_response(&state, info.form_id)
}

async fn select_hora_impl(
    state: web::Data<AppState>,
    info: web::Json<SelectHoraRequest>,
) -> anyhow::Result<FormResponse> {
    let info = info.into_inner();
    state
        .forms
        .with(info.form_id, |s| s.form.select_hora(&info.hora))??;
    form_response(&state, info.form_id)
}

async fn submit_impl(
    state: web::Data<AppState>,
    info: web::Json<SubmitFormRequest>,
) -> anyhow::Result<FormResponse> {
    let info = info.into_inner();
    let result = session::submit(
        &state.forms,
        state.backend.as_ref(),
        info.form_id,
        utils::today(),
    )
    .await;

    let outcome = match result {
        Ok(outcome) => outcome,
        // the form already carries these errors; show them alongside it
        Err(
            err @ (BookingError::Validation(_)
            | BookingError::Rejected(_)
            | BookingError::Transport(_)),
        ) => {
            let mut response = form_response(&state, info.form_id)?;
            response.success = false;
            response.err = err.to_string();
            return Ok(response);
        }
        Err(err) => return Err(err.into()),
    };

    if let (SubmitOutcome::Created, Some(key)) = (outcome, info.draft_key.as_deref()) {
        draft::discard(state.store.as_ref(), key)
            .await
            .context("No se pudo descartar el borrador")?;
    }

    let mut response = form_response(&state, info.form_id)?;
    response.outcome = match outcome {
        SubmitOutcome::Created => "creada".to_string(),
        SubmitOutcome::Updated(_) => "actualizada".to_string(),
    };
    Ok(response)
}

async fn save_draft_impl(
    state: web::Data<AppState>,
    info: web::Json<SaveDraftRequest>,
) -> anyhow::Result<SimpleResponse> {
    let info = info.into_inner();
    let draft = state.forms.with(info.form_id, |s| s.form.to_draft())?;
    draft::save(state.store.as_ref(), &info.draft_key, &draft).await?;
    Ok(SimpleResponse::ok())
}

async fn close_form_impl(
    state: web::Data<AppState>,
    info: web::Json<FormRequest>,
) -> anyhow::Result<SimpleResponse> {
    if !state.forms.close(info.form_id) {
        return Err(BookingError::FormNotFound(info.form_id).into());
    }
    Ok(SimpleResponse::ok())
}
