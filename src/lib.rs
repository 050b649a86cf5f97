#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, middleware, web};

#[cfg(feature = "server")]
use crate::db::{establish_connection_pool, run_migrations};
#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::repository::DieselRepository;
#[cfg(feature = "server")]
use crate::services::contacts::ContactService;

pub mod db;
pub mod domain;
pub mod dto;
mod error_conversions;
pub mod forms;
pub mod models;
pub mod pagination;
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
pub mod schema;
pub mod services;

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    // Establish Diesel connection pool for the SQLite database.
    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;

    run_migrations(&pool)
        .map_err(|e| std::io::Error::other(format!("Failed to run database migrations: {e}")))?;

    let service = web::Data::new(ContactService::new(
        DieselRepository::new(pool),
        server_config.page_size,
    ));

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!(
        "Serving contacts on {}:{} with page size {}",
        bind_address.0,
        bind_address.1,
        service.page_size()
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(routes::api_scope())
            .app_data(service.clone())
    })
    .bind(bind_address)?
    .run()
    .await
}
