#[macro_use]
extern crate diesel;

mod admin;
mod backend;
mod booking;
mod cliente;
mod config;
mod database;
mod error;
mod models;
mod protocol;
mod schema;
mod state;
mod store;
mod utils;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::{backend::HttpBackend, config::Settings, state::AppState, store::SqliteStore};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let settings = Settings::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .init();

    let pool = database::init_pool(&settings.store_database_url)?;
    let backend = HttpBackend::new(&settings.backend_url, settings.backend_timeout)?;
    let state = web::Data::new(
        AppState::new(Arc::new(backend), Arc::new(SqliteStore::new(pool)))
            .with_form_idle_timeout(settings.form_idle_timeout),
    );

    tracing::info!(
        bind = %settings.bind_addr,
        backend = %settings.backend_url,
        "taller-reservas starting"
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            // customer booking form
            .service(web::scope("/cliente").configure(cliente::config))
            // staff reservation views
            .service(web::scope("/admin").configure(admin::config))
    })
    .bind(&settings.bind_addr)
    .with_context(|| format!("Failed to bind {}", settings.bind_addr))?
    .run()
    .await
    .context("Server error")
}
