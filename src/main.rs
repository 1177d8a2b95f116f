// src/main.rs
mod config;
mod dtos;
mod error;
mod handlers;
mod middleware;
mod models;
mod pagination;
mod repositories;
mod services;
mod views;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::{from_fn, Logger};
use actix_web::{web, App, HttpServer};
use log::{error, info};

use crate::config::{AppConfig, StoreBackend};
use crate::middleware::session_cleanup::clear_stale_session;
use crate::repositories::{MemoryStore, PostgresStore, Store};
use crate::services::auth_services::AuthService;

fn mask_key(k: &str) -> String {
    let chars: Vec<char> = k.chars().collect();
    if chars.len() <= 8 {
        "[REDACTED]".to_string()
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}***{}", head, tail)
    }
}

pub struct AppState {
    pub store: Arc<dyn Store>,
}

async fn build_store(cfg: &AppConfig) -> anyhow::Result<Arc<dyn Store>> {
    match cfg.backend {
        StoreBackend::Postgres => {
            let pool = config::get_pg_pool()?;
            let store = PostgresStore::new(pool);
            store.migrate().await?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            info!("using in-memory store, data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let cfg = match AppConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    info!("Store backend: {:?}", cfg.backend);
    info!("Session secret: {}", mask_key(&cfg.session_secret));

    let store = match build_store(&cfg).await {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to open store: {:#}", e);
            std::process::exit(1);
        }
    };

    let state = web::Data::new(AppState { store });
    let auth_data = web::Data::new(AuthService::new(
        &cfg.session_secret,
        cfg.session_ttl_hours,
        cfg.cookie_secure,
    ));

    let allowed_origins = cfg.allowed_origins.clone();

    info!("Starting server on {}", cfg.bind_address);

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec!["content-type", "accept", "x-requested-with"])
            .supports_credentials()
            .max_age(3600);

        for origin in &allowed_origins {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .wrap(cors)
            .wrap(from_fn(clear_stale_session))
            .wrap(Logger::default())
            .app_data(state.clone())
            .app_data(auth_data.clone())
            .configure(handlers::configure)
    })
    .bind(&cfg.bind_address)?
    .run()
    .await
}
