#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the landcover map application.
//!
//! Serves the REST API the map frontend drives: ROI names from the
//! local catalog, the selectable year range, base/clipped
//! classification overlay descriptors, and the per-class area analysis
//! for one ROI and year. The frontend bundle (map, bar/pie charts,
//! result table) is served as static files.

mod handlers;
pub mod interactive;

use std::path::PathBuf;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use landcover_map_catalog::{CatalogCache, DEFAULT_CATALOG_PATH};
use landcover_map_stats::EeSession;

/// Shared application state.
pub struct AppState {
    /// Path the catalog cache was primed from.
    pub catalog_path: PathBuf,
    /// Memoized ROI catalog, loaded once at startup.
    pub catalog: CatalogCache,
    /// Authenticated session against the remote geospatial service.
    pub session: EeSession,
}

/// Starts the landcover map API server.
///
/// Loads the ROI catalog and bootstraps the remote service session
/// before binding; both are preconditions, so either failing halts
/// startup. This is a regular async function — the caller provides the
/// async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind
/// or encounters a runtime error.
///
/// # Panics
///
/// Panics if the ROI catalog cannot be loaded or the remote service
/// session cannot be bootstrapped.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    let catalog_path = PathBuf::from(
        std::env::var("ROI_CATALOG_PATH").unwrap_or_else(|_| DEFAULT_CATALOG_PATH.to_string()),
    );
    let catalog = CatalogCache::new();
    let loaded = catalog
        .get_or_load(&catalog_path)
        .expect("Failed to load ROI catalog");
    log::info!("{} ROI features available", loaded.len());

    let session = EeSession::from_env().expect("Failed to bootstrap remote service session");

    let state = web::Data::new(AppState {
        catalog_path,
        catalog,
        session,
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let frontend_dir =
        std::env::var("FRONTEND_DIR").unwrap_or_else(|_| "app/dist".to_string());

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/years", web::get().to(handlers::years))
                    .route("/regions", web::get().to(handlers::regions))
                    .route("/layer", web::get().to(handlers::layer))
                    .route("/analyze", web::post().to(handlers::analyze)),
            )
            // Serve frontend static files (production)
            .service(Files::new("/", frontend_dir.clone()).index_file("index.html"))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
