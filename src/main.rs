use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use dotenvy::dotenv;
use std::sync::Arc;

mod api;
mod attendance;
mod auth;
mod config;
mod docs;
mod error;
mod model;
mod routes;
mod store;

use config::{Config, StoreBackend};
use store::file::{FileCredentialStore, FileSessionStore};
use store::mysql::{MySqlCredentialStore, MySqlSessionStore};
use store::{CredentialStore, SessionStore};

use crate::docs::ApiDoc;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "HR Attendance Dashboard"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let (credentials, sessions): (Arc<dyn CredentialStore>, Arc<dyn SessionStore>) =
        match config.store_backend {
            StoreBackend::File => (
                Arc::new(FileCredentialStore::new(&config.users_file)),
                Arc::new(FileSessionStore::new(&config.sessions_file)),
            ),
            StoreBackend::MySql => {
                let url = config
                    .database_url
                    .as_deref()
                    .expect("DATABASE_URL must be set for the mysql backend");
                let pool = sqlx::MySqlPool::connect(url)
                    .await
                    .expect("Failed to connect to credential database");
                (
                    Arc::new(MySqlCredentialStore::new(pool.clone())),
                    Arc::new(MySqlSessionStore::new(pool)),
                )
            }
        };

    // Parse the attendance export once up front so the first dashboard
    // request does not pay for it.
    let warmup_file = config.attendance_file.clone();
    let warmup_columns = config.columns.clone();
    actix_web::rt::spawn(async move {
        if let Err(e) = attendance::cache::warmup(&warmup_file, &warmup_columns).await {
            eprintln!("Failed to warm up attendance cache: {e:?}");
        }
    });

    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::from(credentials.clone()))
            .app_data(Data::from(sessions.clone()))
            .app_data(Data::new(config.clone()))
            .service(index)
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await
}
