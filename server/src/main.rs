use actix_web::{middleware as actix_middleware, web, App, HttpServer};
use anyhow::Context;
use std::time::Duration;
use tokio::time;

use book_server::config::{AppConfig, DEFAULT_CONFIG_PATH};
use book_server::handlers;
use book_server::middleware::LoginThrottle;
use book_server::store::{seed_books, BookStore};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (for development)
    if dotenvy::dotenv().is_err() {
        dotenvy::from_filename("server/.env").ok();
    }

    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    log::info!("Starting book server...");

    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = AppConfig::load(&config_path)
        .with_context(|| format!("loading configuration from '{}'", config_path))?;

    let authenticator = config
        .build_authenticator()
        .context("initialising token authenticator")?;
    log::info!(
        "Tokens valid for {}s, accepted principal: {}",
        config.auth.token_ttl_secs,
        config.auth.username
    );

    let store = BookStore::with_seed(seed_books());
    log::info!("Book store seeded with {} books", store.len());

    let throttle = LoginThrottle::new(
        config.login_throttle.max_attempts,
        config.throttle_window(),
    );
    log::info!(
        "Login throttle: {} attempts per {}s",
        throttle.max_attempts(),
        config.login_throttle.window_secs
    );

    let throttle_clone = throttle.clone();
    tokio::spawn(async move {
        let mut interval = time::interval(Duration::from_secs(300));
        loop {
            interval.tick().await;
            let removed = throttle_clone.cleanup_old_entries();
            log::debug!("Background cleanup: released {} throttled clients", removed);
        }
    });

    let host = config.http.host.clone();
    let port = config.http.port;
    log::info!("Starting HTTP server at {}:{}...", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(authenticator.clone()))
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(throttle.clone()))
            .wrap(actix_middleware::Logger::default())
            .configure(handlers::configure)
    })
    .bind((host.as_str(), port))
    .with_context(|| format!("binding {}:{}", host, port))?
    .run()
    .await
    .context("HTTP server terminated")?;

    Ok(())
}
