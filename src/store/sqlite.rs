use actix_web::web;
use anyhow::Context;
use async_trait::async_trait;
use diesel::prelude::*;

use super::KeyValueStore;
use crate::{
    database::{get_db_conn, DbPool},
    models::kv_entries::KvEntry,
};

pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        use crate::schema::kv_entries;

        let pool = self.pool.clone();
        let key = key.to_string();
        let value = web::block(move || -> anyhow::Result<Option<String>> {
            let conn = get_db_conn(&pool)?;
            kv_entries::table
                .find(key)
                .select(kv_entries::entry_value)
                .first::<String>(&conn)
                .optional()
                .context("DB error")
        })
        .await
        .context("DB error")??;

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        use crate::schema::kv_entries;

        let pool = self.pool.clone();
        let entry = KvEntry {
            entry_key: key.to_string(),
            entry_value: value.to_string(),
        };
        web::block(move || -> anyhow::Result<()> {
            let conn = get_db_conn(&pool)?;
            diesel::replace_into(kv_entries::table)
                .values(&entry)
                .execute(&conn)
                .context("DB error")?;
            Ok(())
        })
        .await
        .context("DB error")??;

        Ok(())
    }

    async fn clear(&self, key: &str) -> anyhow::Result<()> {
        use crate::schema::kv_entries;

        let pool = self.pool.clone();
        let key = key.to_string();
        web::block(move || -> anyhow::Result<()> {
            let conn = get_db_conn(&pool)?;
            diesel::delete(kv_entries::table.find(key))
                .execute(&conn)
                .context("DB error")?;
            Ok(())
        })
        .await
        .context("DB error")??;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::init_pool;

    fn temp_store() -> (tempfile::TempDir, SqliteStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.db");
        let pool = init_pool(path.to_str().unwrap()).unwrap();
        (dir, SqliteStore::new(pool))
    }

    #[actix_web::test]
    async fn set_overwrites_previous_value() {
        let (_dir, store) = temp_store();
        assert_eq!(store.get("recent_searches").await.unwrap(), None);

        store.set("recent_searches", "[\"honda\"]").await.unwrap();
        store.set("recent_searches", "[\"yamaha\"]").await.unwrap();
        assert_eq!(
            store.get("recent_searches").await.unwrap().as_deref(),
            Some("[\"yamaha\"]")
        );
    }

    #[actix_web::test]
    async fn clear_removes_only_the_given_key() {
        let (_dir, store) = temp_store();
        store.set("draft:a", "1").await.unwrap();
        store.set("draft:b", "2").await.unwrap();

        store.clear("draft:a").await.unwrap();
        assert_eq!(store.get("draft:a").await.unwrap(), None);
        assert_eq!(store.get("draft:b").await.unwrap().as_deref(), Some("2"));
    }

    #[actix_web::test]
    async fn reopening_keeps_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.db");
        let url = path.to_str().unwrap();

        SqliteStore::new(init_pool(url).unwrap())
            .set("k", "v")
            .await
            .unwrap();
        let reopened = SqliteStore::new(init_pool(url).unwrap());
        assert_eq!(reopened.get("k").await.unwrap().as_deref(), Some("v"));
    }
}
