use std::path::Path;
use std::process;

use actix_web::{middleware, web, App, HttpServer};
use clap::Parser;
use log::{error, info, warn};

use photo_shelf::app_state::AppState;
use photo_shelf::config::{AppConfig, CliArgs, ServerMode};
use photo_shelf::{rest, rpc};

fn init_logging(config_file: &str) {
    if Path::new(config_file).exists() {
        match log4rs::init_file(config_file, Default::default()) {
            Ok(()) => return,
            Err(e) => eprintln!("Failed to load log configuration {}: {}", config_file, e),
        }
    }
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    warn!("Log configuration {} not usable, logging to stderr", config_file);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = CliArgs::parse();
    let config = match AppConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            process::exit(2);
        }
    };
    init_logging(&config.logging.config_file);

    // A half-opened engine must never serve requests.
    let state = match AppState::from_config(config.clone()) {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to open {} storage: {}", config.storage.backend, e);
            process::exit(1);
        }
    };

    let mode = config.server.mode;
    let address = (config.server.host.clone(), config.server.listen_port());
    info!("Starting {} server on {}:{}", mode, address.0, address.1);

    let data = web::Data::new(state);
    HttpServer::new(move || {
        let app = App::new()
            .wrap(middleware::Logger::default())
            .app_data(data.clone());
        match mode {
            ServerMode::Rest => app.configure(rest::configure),
            ServerMode::Rpc => app.configure(rpc::configure),
        }
    })
    .workers(config.server.workers)
    .bind(address)?
    .run()
    .await
}
