use super::{load_json, save_json, KeyValueStore};

pub const RECENT_SEARCHES_KEY: &str = "recent_searches";
pub const MAX_RECENT_SEARCHES: usize = 5;

/// Most recent first. A corrupted entry reads as empty.
pub async fn list(store: &dyn KeyValueStore) -> anyhow::Result<Vec<String>> {
    match load_json::<Vec<String>>(store, RECENT_SEARCHES_KEY).await {
        Ok(searches) => Ok(searches.unwrap_or_default()),
        Err(err) => {
            tracing::warn!(error = %err, "discarding unreadable recent searches");
            Ok(Vec::new())
        }
    }
}

pub async fn record(store: &dyn KeyValueStore, query: &str) -> anyhow::Result<Vec<String>> {
    let query = query.trim();
    let mut searches = list(store).await?;
    if query.is_empty() {
        return Ok(searches);
    }

    searches.retain(|s| s != query);
    searches.insert(0, query.to_string());
    searches.truncate(MAX_RECENT_SEARCHES);
    save_json(store, RECENT_SEARCHES_KEY, &searches).await?;

    Ok(searches)
}

pub async fn clear(store: &dyn KeyValueStore) -> anyhow::Result<()> {
    store.clear(RECENT_SEARCHES_KEY).await
}
