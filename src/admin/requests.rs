use serde::Deserialize;

#[derive(Deserialize)]
pub struct SearchReservasRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub estado: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub per_page: Option<usize>,
}

#[derive(Deserialize)]
pub struct EmptyRequest {}

#[derive(Deserialize)]
pub struct ViewReservaRequest {
    pub id: u64,
}

#[derive(Deserialize)]
pub struct ChangeEstadoRequest {
    pub id: u64,
    pub estado: String,
}

#[derive(Deserialize)]
pub struct ReprogramarRequest {
    pub id: u64,
    pub fecha: String,
    pub hora: String,
}
