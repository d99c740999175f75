use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{App, HttpServer, web};
use anyhow::Context;
use tracing::{error, info};

use polls_server::application::auth_service::AuthService;
use polls_server::application::comment_service::CommentService;
use polls_server::application::post_service::PostService;
use polls_server::data::comment_repository::{CommentRepository, PostgresCommentRepository};
use polls_server::data::post_repository::{PostRepository, PostgresPostRepository};
use polls_server::data::user_repository::PostgresUserRepository;
use polls_server::infrastructure::config::AppConfig;
use polls_server::infrastructure::database::{create_pool, run_migrations};
use polls_server::infrastructure::logging::init_logging;
use polls_server::infrastructure::security::JwtKeys;
use polls_server::presentation::middleware::RequestContextMiddleware;
use polls_server::presentation::routes::api_scope;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let pool = create_pool(&config.database_url)
        .await
        .context("failed to connect to database")?;
    run_migrations(&pool)
        .await
        .context("failed to run migrations")?;

    let post_repo: Arc<dyn PostRepository> = Arc::new(PostgresPostRepository::new(pool.clone()));
    let comment_repo: Arc<dyn CommentRepository> =
        Arc::new(PostgresCommentRepository::new(pool.clone()));
    let user_repo = Arc::new(PostgresUserRepository::new(pool.clone()));

    let auth_service = AuthService::new(
        user_repo,
        JwtKeys::new(config.jwt_secret.clone(), config.jwt_ttl_seconds),
    );
    let post_service = PostService::new(
        Arc::clone(&post_repo),
        Arc::clone(&comment_repo),
        config.feed_settings(),
    );
    let comment_service = CommentService::new(post_repo, comment_repo);

    info!(host = %config.host, port = config.port, "HTTP server starting");

    let config_data = config.clone();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(RequestContextMiddleware)
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer"))
                    .add(("Permissions-Policy", "geolocation=()"))
                    .add(("Cross-Origin-Opener-Policy", "same-origin")),
            )
            .wrap(build_cors(&config_data))
            .app_data(web::Data::new(post_service.clone()))
            .app_data(web::Data::new(comment_service.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .service(api_scope())
    })
    .disable_signals()
    .bind((config.host.as_str(), config.port))?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("shutdown signal received");
                handle.stop(true).await;
            }
            Err(err) => error!(error = %err, "failed to listen for shutdown signal"),
        }
    });

    server.await?;

    info!("HTTP server stopped");
    Ok(())
}

fn build_cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::AUTHORIZATION,
        ])
        .supports_credentials()
        .max_age(3600);

    for origin in &config.cors_origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}
