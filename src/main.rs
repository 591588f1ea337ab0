mod config;
mod metrics;
mod vllm;
mod web;

use actix_web::{middleware, App, HttpServer, web::Data};
use actix_files as fs;
use actix_multipart::form::MultipartFormConfig;
use dotenv::dotenv;
use log::{info, error, warn};
use tera::Tera;

use config::AppConfig;
use vllm::{RequestBuilder, VllmClient};
use web::routes;

// App state structure
struct AppState {
    tera: Tera,
    config: AppConfig,
    client: VllmClient,
    builder: RequestBuilder,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize environment
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting vision web application");

    let app_config = AppConfig::from_env();
    info!(
        "Inference backend: {} (model: {})",
        if app_config.base_url.is_empty() {
            "<unset>"
        } else {
            app_config.base_url.as_str()
        },
        app_config.model
    );
    if !app_config.api_key.is_empty() {
        warn!(
            "VLLM_API_KEY is set but request authentication is not implemented; \
             the key is not attached to backend calls"
        );
    }

    if app_config.metrics_port != 0 {
        crate::metrics::start_prometheus(&app_config.host, app_config.metrics_port);
        info!(
            "Prometheus metrics exposed on {}:{}",
            app_config.host, app_config.metrics_port
        );
    }

    // Initialize template engine
    let mut tera = match Tera::new("templates/**/*") {
        Ok(t) => t,
        Err(e) => {
            error!("Template parsing error: {}", e);
            std::process::exit(1);
        }
    };
    tera.autoescape_on(vec![".html"]);

    let client = VllmClient::new(app_config.base_url.clone());
    let builder = RequestBuilder::new(
        app_config.model.clone(),
        app_config.temperature,
        app_config.max_tokens,
    );

    let bind_addr = (app_config.host.clone(), app_config.port);
    let max_upload_bytes = app_config.max_upload_bytes;

    // Create app state
    let app_state = Data::new(AppState {
        tera,
        config: app_config,
        client,
        builder,
    });

    info!("Listening on {}:{}", bind_addr.0, bind_addr.1);

    // Start web server
    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(app_state.clone())
            .app_data(
                MultipartFormConfig::default()
                    .total_limit(max_upload_bytes)
                    .memory_limit(max_upload_bytes),
            )
            .configure(routes::configure)
            .service(fs::Files::new("/static", "./static"))
    })
    .bind(bind_addr)?
    .run()
    .await
}
