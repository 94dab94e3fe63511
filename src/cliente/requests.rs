use serde::Deserialize;

#[derive(Deserialize)]
pub struct NewFormRequest {
    #[serde(default)]
    pub reserva_id: Option<u64>,
    #[serde(default)]
    pub draft_key: Option<String>,
}

#[derive(Deserialize)]
pub struct FormRequest {
    pub form_id: u64,
}

#[derive(Deserialize)]
pub struct SelectYearRequest {
    pub form_id: u64,
    #[serde(default)]
    pub year: Option<i32>,
}

#[derive(Deserialize)]
pub struct SelectBrandRequest {
    pub form_id: u64,
    #[serde(default)]
    pub brand: Option<String>,
}

#[derive(Deserialize)]
pub struct SelectMotoRequest {
    pub form_id: u64,
    #[serde(default)]
    pub moto_id: Option<u64>,
}

#[derive(Deserialize)]
pub struct UpdateFieldsRequest {
    pub form_id: u64,
    pub placa: Option<String>,
    pub servicio_id: Option<u64>,
    pub detalles: Option<String>,
}

#[derive(Deserialize)]
pub struct SetFechaRequest {
    pub form_id: u64,
    pub fecha: String,
}

#[derive(Deserialize)]
pub struct SelectHoraRequest {
    pub form_id: u64,
    pub hora: String,
}

#[derive(Deserialize)]
pub struct SubmitFormRequest {
    pub form_id: u64,
    #[serde(default)]
    pub draft_key: Option<String>,
}

#[derive(Deserialize)]
pub struct SaveDraftRequest {
    pub form_id: u64,
    pub draft_key: String,
}
