mod handlers;
mod pages;
mod state;

use std::sync::Mutex;

use actix_web::{middleware, web, App, HttpServer};
use clap::Parser;

use common::config::AppConfig;

use crate::handlers::StoreTarget;
use crate::state::ListState;

#[derive(Parser, Clone)]
#[command(name = "mock-admin")]
pub struct Args {
    #[arg(long, default_value = "8081")]
    pub port: u16,

    /// Base URL of the definition store; overrides the config file.
    #[arg(long)]
    pub store_url: Option<String>,

    #[arg(long, default_value = "mock-admin.toml")]
    pub config: String,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let port = args.port;

    let mut config = AppConfig::load(&args.config)?;
    if let Some(store_url) = args.store_url {
        config.store_url = store_url;
    }

    let client = reqwest::Client::new();
    let state = ListState::new(config.page_size, config.default_response_body.clone());
    let target = StoreTarget {
        base_url: config.store_url.clone(),
    };

    println!("Mock admin listening on http://localhost:{}", port);
    println!("Definition store at {}", config.store_url);

    let state_data = web::Data::new(Mutex::new(state));
    let client_data = web::Data::new(client);
    let target_data = web::Data::new(target);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::NormalizePath::trim())
            .app_data(state_data.clone())
            .app_data(client_data.clone())
            .app_data(target_data.clone())
            .route("/", web::get().to(handlers::index))
            .route("/definitions", web::get().to(handlers::definitions_page))
            .route("/definitions/new", web::post().to(handlers::create_definition))
            .route("/definitions/refresh", web::post().to(handlers::refresh))
            .route("/definitions/batch-delete", web::post().to(handlers::batch_delete))
            .route("/definitions/reorder", web::post().to(handlers::reorder_rows))
            .route("/definitions/select-page", web::post().to(handlers::select_page))
            .route("/definitions/{id}/toggle", web::post().to(handlers::toggle_row))
            .route("/definitions/{id}/edit", web::post().to(handlers::edit_row))
            .route("/definitions/{id}/save", web::post().to(handlers::save_row))
            .route("/definitions/{id}/select", web::post().to(handlers::select_row))
            .route("/definitions/{id}/delete", web::post().to(handlers::delete_row))
            .route("/definitions/{id}/headers", web::get().to(handlers::headers_editor))
            .route("/definitions/{id}/headers/format", web::post().to(handlers::headers_format))
            .route("/definitions/{id}/headers/save", web::post().to(handlers::headers_save))
            .route("/definitions/{id}/body", web::get().to(handlers::body_editor))
            .route("/definitions/{id}/body/format", web::post().to(handlers::body_format))
            .route("/definitions/{id}/body/save", web::post().to(handlers::body_save))
            .route("/definitions/{id}/logs", web::get().to(handlers::logs_page))
            .route("/definitions/{id}/logs/clear", web::post().to(handlers::logs_clear))
    })
    .workers(1)
    .bind(("0.0.0.0", port))?
    .run()
    .await?;

    Ok(())
}
