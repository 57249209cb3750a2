//! Bookshelf Recommendation Service
//!
//! Builds the catalog and similarity index once at startup, then serves a
//! health endpoint. Recommendation routing lives in the gateway layer; this
//! binary exists so the engine has a service-lifetime owner.

use actix_web::{web, App, HttpResponse, HttpServer};
use anyhow::Context;
use bookshelf_core::{load_dotenv, CatalogConfig, ConfigLoader, ServiceConfig};
use bookshelf_reco::{RecoConfig, RecoEngine};
use tracing::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .json()
        .init();

    let service_config = ServiceConfig::from_env().context("loading service config")?;
    service_config.validate().context("validating service config")?;
    let catalog_config = CatalogConfig::from_env().context("loading catalog config")?;
    catalog_config.validate().context("validating catalog config")?;

    info!(
        host = %service_config.host,
        port = service_config.port,
        "Starting Bookshelf Recommendation Service"
    );

    // One-time blocking startup cost; the engine is immutable afterwards.
    let engine = RecoEngine::from_source(
        &catalog_config.path,
        catalog_config.row_cap,
        RecoConfig::default(),
    );
    let engine = web::Data::new(engine);

    HttpServer::new(move || {
        App::new()
            .app_data(engine.clone())
            .route("/health", web::get().to(health_check))
    })
    .workers(service_config.workers)
    .bind((service_config.host.as_str(), service_config.port))?
    .run()
    .await?;

    Ok(())
}

async fn health_check(engine: web::Data<RecoEngine>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "reco-service",
        "version": env!("CARGO_PKG_VERSION"),
        "catalog_size": engine.catalog().len(),
        "index_ready": !engine.index().is_empty(),
    }))
}
