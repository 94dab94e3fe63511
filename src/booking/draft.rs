use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::store::{load_json, save_json, KeyValueStore};

/// User-entered fields worth keeping between visits. Availability is never
/// stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDraft {
    pub selected_year: Option<i32>,
    pub selected_brand: Option<String>,
    pub moto_id: Option<u64>,
    pub placa: String,
    pub servicio_id: Option<u64>,
    pub fecha: Option<NaiveDate>,
    pub hora: Option<String>,
    pub detalles: String,
}

fn draft_key(key: &str) -> String {
    format!("draft:{}", key)
}

pub async fn save(store: &dyn KeyValueStore, key: &str, draft: &FormDraft) -> anyhow::Result<()> {
    save_json(store, &draft_key(key), draft).await
}

pub async fn load(store: &dyn KeyValueStore, key: &str) -> anyhow::Result<Option<FormDraft>> {
    load_json(store, &draft_key(key)).await
}

pub async fn discard(store: &dyn KeyValueStore, key: &str) -> anyhow::Result<()> {
    store.clear(&draft_key(key)).await
}
