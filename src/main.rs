// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, database, photo storage, and start HTTP server

mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod services;

use actix_cors::Cors;
use actix_multipart::form::MultipartFormConfig;
use actix_web::{middleware::Logger, web, App, HttpServer};
use config::Config;
use dotenv::dotenv;
use services::PhotoStorage;
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    }

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        // Use configured log level or default
        let log_level = if !config.log_level.is_empty() {
            &config.log_level
        } else {
            "info,actix_web=info,sqlx=warn"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    log::info!("Starting photodesk service...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Initialize database connection pool and schema
    let pool = match config::init_db_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    // 5. Initialize the photo tree on disk
    let storage = PhotoStorage::new(&config.photos_dir, &config.public_base_url);
    if let Err(e) = storage.ensure_dirs() {
        log::error!("Failed to prepare photo storage: {}", e);
        std::process::exit(1);
    }
    log::info!("Photo storage ready at {}", config.photos_dir);
    if config.review_workflow {
        log::info!("Review workflow enabled");
    }

    // 6. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let config_clone = config.clone();

    HttpServer::new(move || {
        let review_enabled = config_clone.review_workflow;
        let photos_dir = config_clone.photos_dir.clone();

        App::new()
            // Application state (database pool, config, and storage)
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config_clone.clone()))
            .app_data(web::Data::new(storage.clone()))
            // Multipart limits, surfaced in the standard error envelope
            .app_data(
                MultipartFormConfig::default()
                    .total_limit(config_clone.max_upload_bytes)
                    .error_handler(|err, _req| {
                        errors::PhotoError::ValidationError(err.to_string()).into()
                    }),
            )
            // Malformed urlencoded forms get the same envelope
            .app_data(web::FormConfig::default().error_handler(|err, _req| {
                errors::PhotoError::ValidationError(err.to_string()).into()
            }))
            // Middleware
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::photos_config)
            .configure(move |cfg| {
                if review_enabled {
                    handlers::review_config(cfg);
                }
            })
            // The stored tree, served read-only under the recorded URLs
            .service(actix_files::Files::new("/photos", photos_dir))
    })
    .bind(&server_addr)?
    .run()
    .await
}
