use actix_cors::Cors;
use actix_files::Files;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;

mod config;
mod controllers;
mod db;
mod error;
mod grammar;
mod models;
mod notes;
mod render;
mod storage;

use config::Config;
use db::Database;
use grammar::{GrammarChecker, LanguageToolClient};
use notes::NoteService;
use storage::DocumentStore;

pub struct AppState {
    pub notes: NoteService,
    /// Uploads larger than this are rejected while still streaming
    pub max_upload_bytes: usize,
    /// Server start time for uptime calculation
    pub started_at: std::time::Instant,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    log::info!("Marknote v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env();
    config::initialize_media(&config)?;

    log::info!("Opening database at {}", config.database_url);
    let db = Database::new(&config.database_url).map_err(|e| {
        log::error!("Failed to open database {}: {}", config.database_url, e);
        std::io::Error::other(e)
    })?;
    let db = Arc::new(db);

    // One checker for the whole process; every request shares it.
    let checker: Arc<dyn GrammarChecker> = match LanguageToolClient::new(&config.grammar) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            log::error!("Failed to build grammar checker client: {}", e);
            return Err(std::io::Error::other(e));
        }
    };
    log::info!(
        "Grammar checker: LanguageTool at {} ({})",
        config.grammar.languagetool_url,
        checker.language()
    );

    let state = web::Data::new(AppState {
        notes: NoteService::new(
            Arc::clone(&db),
            DocumentStore::new(config.media_dir.clone()),
            checker,
            config.max_upload_bytes,
        ),
        max_upload_bytes: config.max_upload_bytes,
        started_at: std::time::Instant::now(),
    });

    let media_dir = config.media_dir.clone();
    log::info!("Listening on http://{}:{}", config.bind_address, config.port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config_routes)
            .configure(controllers::notes::config)
            .configure(controllers::grammar::config)
            .service(Files::new(models::MEDIA_URL, media_dir.clone()))
    })
    .bind((config.bind_address.as_str(), config.port))?
    .run()
    .await
}
