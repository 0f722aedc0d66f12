use std::time::Duration;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;

mod api;
mod auth;
mod budget;
mod calc;
mod client;
mod config;
mod docs;
mod error;
mod model;
mod models;
mod routes;
mod utils;

use crate::client::BackendClient;
use crate::docs::ApiDoc;
use crate::routes::Limiters;
use crate::utils::query_cache::QueryCache;
use config::Config;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(backend = %config.backend_url, "Server starting...");

    let client = BackendClient::new(&config.backend_url, Duration::from_secs(config.backend_timeout_secs))
        .context("failed to build backend HTTP client")?;
    let cache = QueryCache::new(Duration::from_secs(config.cache_ttl_secs), config.cache_max_capacity);
    let limiters = Limiters::new(&config)?;

    let server_addr = config.server_addr.clone();
    let client = Data::new(client);
    let cache = Data::new(cache);
    let config_data = Data::new(config);

    HttpServer::new(move || {
        let route_config = config_data.clone();
        let limiters = limiters.clone();
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // wildcard {_:.*} matches JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(config_data.clone())
            .app_data(client.clone())
            .app_data(cache.clone())
            .configure(move |cfg| routes::configure(cfg, &route_config, &limiters))
    })
    .bind(&server_addr)
    .with_context(|| format!("failed to bind {server_addr}"))?
    .run()
    .await?;

    Ok(())
}
