#![deny(missing_docs)]
//! Elevora server executable.
//!
//! Loads website audit documents and serves the derived dashboard view.

mod loader;
mod openapi;
mod routes;

#[cfg(not(test))]
use actix_cors::Cors;
#[cfg(not(test))]
use actix_web::{App, HttpServer, http::header, web};
#[cfg(not(test))]
use dotenvy::dotenv;

#[allow(unused_imports)]
use std::str::FromStr;

#[cfg(not(test))]
use crate::loader::AuditLoader;
#[cfg(not(test))]
use crate::routes::{
    AppState, DashboardConfig, active_issues, current_view, load_view, openapi_json, run_audit,
    select_category,
};

#[cfg(not(test))]
fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let state = web::Data::new(AppState::new(
        AuditLoader::from_env(),
        DashboardConfig::from_env(),
    ));

    let origins = std::env::var("ELEVORA_UI_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:4200,http://localhost:5173".to_string());
    let allowed_origins: Vec<String> = origins
        .split(',')
        .map(|value| value.trim())
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect();

    let listen_addr = std::env::var("ELEVORA_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let listen_port =
        u16::from_str(&std::env::var("ELEVORA_PORT").unwrap_or_else(|_| "8080".to_string()))
            .map_err(|err| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("ELEVORA_PORT must be a u16 number: {err}"),
                )
            })?;
    log::info!("listening on {listen_addr}:{listen_port}");

    actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || {
            let mut cors = Cors::default()
                .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                .allowed_headers(vec![header::CONTENT_TYPE])
                .max_age(3600);
            for origin in &allowed_origins {
                cors = cors.allowed_origin(origin);
            }
            App::new()
                .wrap(actix_web::middleware::Logger::default())
                .wrap(cors)
                .app_data(state.clone())
                .service(run_audit)
                .service(load_view)
                .service(current_view)
                .service(select_category)
                .service(active_issues)
                .service(openapi_json)
        })
        .bind((listen_addr, listen_port))?
        .run()
        .await
    })
}

#[cfg(test)]
fn main() {}
