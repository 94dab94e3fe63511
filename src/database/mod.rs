use anyhow::Context;
use diesel::{prelude::*, r2d2::ConnectionManager, SqliteConnection};
use r2d2::PooledConnection;

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

const CREATE_KV_ENTRIES: &str = "CREATE TABLE IF NOT EXISTS kv_entries (
    entry_key TEXT PRIMARY KEY NOT NULL,
    entry_value TEXT NOT NULL
)";

/// Opens the local store and creates its table when missing.
pub fn init_pool(database_url: &str) -> anyhow::Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = r2d2::Pool::builder()
        .build(manager)
        .with_context(|| format!("Failed to open store at {}", database_url))?;

    let conn = get_db_conn(&pool)?;
    diesel::sql_query(CREATE_KV_ENTRIES)
        .execute(&conn)
        .context("DB schema")?;

    Ok(pool)
}

pub fn get_db_conn(
    pool: &DbPool,
) -> anyhow::Result<PooledConnection<ConnectionManager<SqliteConnection>>> {
    pool.get().context("DB connection")
}
