mod auth;
mod config;
mod csv;
mod database;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod service;
mod util;

#[cfg(test)]
pub mod test_utils;

pub use config::Config;
pub use database::postgres_repository::PostgresRepository;
pub use database::user::UserRepository;
pub use db::{init_pool, run_migrations};
pub use error::app_error::AppError;
pub use service::seed::{SeedSummary, seed_researches};

use crate::auth::SessionGate;
use crate::db::stage_db;
use crate::middleware::RequestLogger;
use crate::routes as app_routes;
use rocket::{Build, Rocket, catchers, http::Method};
use rocket_cors::{AllowedOrigins, CorsOptions};
use tracing_subscriber::EnvFilter;

fn init_tracing(log_level: &str, json_format: bool) {
    // RUST_LOG overrides the configured level for fine-grained control,
    // e.g. RUST_LOG=info,peta_riset::service=debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_line_number(true);

    if json_format {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

fn build_cors(cors_config: &config::CorsConfig) -> CorsOptions {
    let is_wildcard = cors_config.allowed_origins.len() == 1 && cors_config.allowed_origins[0] == "*";

    // Wildcard origins combined with credentialed cookies would let any site
    // ride the session; refuse the configuration outright.
    if is_wildcard && cors_config.allow_credentials {
        panic!(
            "Invalid CORS configuration: Cannot use wildcard origins (*) with credentials enabled. \
            Either set specific origins or disable credentials."
        );
    }

    let allowed_origins = if cors_config.allowed_origins.is_empty() {
        AllowedOrigins::some_exact::<&str>(&[])
    } else if is_wildcard {
        AllowedOrigins::all()
    } else {
        AllowedOrigins::some_exact(&cors_config.allowed_origins.iter().map(String::as_str).collect::<Vec<_>>())
    };

    CorsOptions {
        allowed_origins,
        allowed_methods: vec![Method::Get, Method::Post, Method::Put, Method::Delete, Method::Options]
            .into_iter()
            .map(From::from)
            .collect(),
        allowed_headers: rocket_cors::AllowedHeaders::some(&["Content-Type", "Accept"]),
        allow_credentials: cors_config.allow_credentials,
        ..Default::default()
    }
}

pub fn build_rocket(config: Config) -> Rocket<Build> {
    init_tracing(&config.logging.level, config.logging.json_format);

    let cors = build_cors(&config.cors).to_cors().expect("Failed to create CORS fairing");

    let figment = rocket::Config::figment()
        .merge(("address", config.server.address.clone()))
        .merge(("port", config.server.port));

    rocket::custom(figment)
        .attach(RequestLogger)
        .attach(SessionGate)
        .attach(cors)
        .attach(stage_db(config.database.clone()))
        .manage(config)
        .mount("/api/auth", app_routes::user::routes())
        .mount("/api/researches", app_routes::research::routes())
        .mount("/api/health", app_routes::health::routes())
        .register(
            "/api",
            catchers![
                app_routes::error::bad_request,
                app_routes::error::unauthorized,
                app_routes::error::forbidden,
                app_routes::error::not_found,
                app_routes::error::unprocessable,
            ],
        )
}
