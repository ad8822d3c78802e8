use std::{net::TcpListener, time::Duration};

use actix_cors::Cors;
use actix_web::{dev::Server, error::{JsonPayloadError, PathError}, http::header, web, App, HttpRequest, HttpServer};
use anyhow::Context;
use diesel::PgConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing_actix_web::TracingLogger;

use crate::{configuration::{CorsSettings, Settings}, error::ApiError, routes::{current_user, delete_address_by_id, delete_menu_item, get_addresses, get_my_restaurants, get_order, get_orders, get_restaurant, get_restaurants, health_check, login, logout, post_address, post_item, post_order, post_restaurant, put_restaurant, register, update_menu_item}, session_state::SessionConfig, session_store::{prune_expired_sessions, PgSessionStore}, telemetry::spawn_blocking_with_tracing, utils::{build_pool, DbPool}};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

pub async fn run_migrations(pool: &DbPool) -> Result<(), anyhow::Error> {
    let pool = pool.clone();

    spawn_blocking_with_tracing(move || -> Result<(), anyhow::Error> {
        let mut conn = pool.get()
            .context("Failed to get connection for migrations")?;
        let conn: &mut PgConnection = &mut conn;

        let applied = conn.run_pending_migrations(MIGRATIONS)
            .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;
        tracing::info!(applied = applied.len(), "Database migrations are up to date");

        Ok(())
    })
    .await
    .context("Failed due to threadpool error")?
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::info!(error = %err, "Rejected malformed json body");
    ApiError::BadRequest(err.to_string()).into()
}

// Every path parameter is an integer id, the first that does not parse is reported
fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
    let param = req.match_info()
        .iter()
        .find(|(_, value)| value.parse::<i32>().is_err())
        .map(|(name, _)| name.to_string())
        .unwrap_or_else(|| "id".to_string());

    tracing::info!(error = %err, param = %param, "Rejected non integer path id");
    let msg = format!("{} must be an integer", param);
    ApiError::field(param, msg).into()
}

// `/restaurants/mine` is registered ahead of `/restaurants/{id}`
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(health_check))
                .service(
                    web::scope("/auth")
                        .route("/register", web::post().to(register))
                        .route("/login", web::post().to(login))
                        .route("/logout", web::post().to(logout))
                )
                .route("/users/me", web::get().to(current_user))
                .service(
                    web::scope("/addresses")
                        .route("", web::get().to(get_addresses))
                        .route("", web::post().to(post_address))
                        .route("/{id}", web::delete().to(delete_address_by_id))
                )
                .service(
                    web::scope("/restaurants")
                        .route("", web::get().to(get_restaurants))
                        .route("", web::post().to(post_restaurant))
                        .route("/mine", web::get().to(get_my_restaurants))
                        .route("/{id}", web::get().to(get_restaurant))
                        .route("/{id}", web::put().to(put_restaurant))
                        .route("/{id}/items", web::post().to(post_item))
                        .route("/{restaurant_id}/items/{item_id}", web::put().to(update_menu_item))
                        .route("/{restaurant_id}/items/{item_id}", web::delete().to(delete_menu_item))
                )
                .service(
                    web::scope("/orders")
                        .route("", web::get().to(get_orders))
                        .route("", web::post().to(post_order))
                        .route("/{id}", web::get().to(get_order))
                )
        );
}

pub fn run(
    listener: TcpListener,
    pool: web::Data<DbPool>,
    session_config: SessionConfig,
    cors: CorsSettings
) -> Result<Server, anyhow::Error> {
    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&cors.allowed_origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_header(header::CONTENT_TYPE)
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(session_config.middleware(PgSessionStore::new(pool.clone())))
            .wrap(cors)
            .wrap(TracingLogger::default())
            .app_data(pool.clone())
            .configure(configure_routes)
    })
    .listen(listener)?
    .run();

    Ok(server)
}

pub struct Application{
    pub host: String,
    pub port: u16,
    pub server: Server
}

impl Application {
    // Port 0 binds a random free port, read it back from the listener
    pub async fn build(settings: Settings) -> Result<Self, anyhow::Error> {
        let pool = web::Data::new(build_pool(&settings.database));

        if settings.database.migrate_on_startup {
            run_migrations(&pool).await?;
        }

        let session_config = SessionConfig::new(&settings.session)?;
        actix_web::rt::spawn(prune_expired_sessions(
            pool.clone(),
            Duration::from_secs(settings.session.prune_interval_secs.max(1))
        ));

        let listener = TcpListener::bind((settings.application.host.as_str(), settings.application.port))
            .with_context(|| format!(
                "Failed to bind {}:{}",
                settings.application.host, settings.application.port
            ))?;
        let port = listener.local_addr()?.port();

        let server = run(
            listener,
            pool,
            session_config,
            settings.cors
        )?;

        Ok(Application{
            host: settings.application.host,
            port,
            server
        })
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}
