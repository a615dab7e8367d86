use std::path::Path;
use std::sync::Arc;

use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use kiosk::analytics::{sheets::SheetsSink, AnalyticsSink};
use kiosk::chat::TurnController;
use kiosk::cli::{commands::Cli, commands::Commands, run_cli};
use kiosk::config::AppConfig;
use kiosk::knowledge::KnowledgeBase;
use kiosk::llm::ProviderFactory;
use kiosk::prompt::PromptComposer;
use kiosk::session::SessionStore;
use tracing::{error, info};

async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({"status": "healthy"}))
}

async fn index() -> impl Responder {
    let html = include_str!("../static/index.html");
    HttpResponse::Ok().content_type("text/html").body(html)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if !matches!(cli.command, Commands::Serve) {
        run_cli(cli.command, cli.config).await;
        return Ok(());
    }

    info!("Starting Kiosk chat server...");

    let config = match AppConfig::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let knowledge = match KnowledgeBase::load(Path::new(&config.knowledge.dir)) {
        Ok(kb) => Arc::new(kb),
        Err(e) => {
            error!("Failed to load knowledge base: {}", e);
            std::process::exit(1);
        }
    };

    let composer = PromptComposer::new(config.persona.clone(), knowledge);
    let provider = ProviderFactory::create_default(&config);

    let analytics: Option<Arc<dyn AnalyticsSink>> = match &config.analytics {
        Some(sheets) => {
            info!("Analytics sink enabled: worksheet '{}'", sheets.worksheet);
            Some(Arc::new(SheetsSink::new(sheets.clone())))
        }
        None => None,
    };

    let controller = Arc::new(TurnController::new(
        composer,
        provider,
        analytics,
        config.persona.priming,
    ));
    let store = Arc::new(SessionStore::new(config.quota.max_questions));

    let host = config.server.host.clone();
    let port = config.server.port;

    info!("Server listening on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(controller.clone()))
            .route("/", web::get().to(index))
            .route("/health", web::get().to(health))
            .configure(kiosk::api::routes::configure)
    })
    .bind((host, port))?
    .run()
    .await
}
