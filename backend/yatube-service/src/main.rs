use actix_cors::Cors;
use actix_web::middleware::{NormalizePath, TrailingSlash};
use actix_web::{web, App, HttpResponse, HttpServer};
use anyhow::Context;
use db_pool::{create_pool, DbConfig};
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use yatube_service::cli::{self, Command};
use yatube_service::db::{run_migrations, Repositories};
use yatube_service::handlers::{self, HealthState};
use yatube_service::middleware::{CorrelationIdMiddleware, JwtValidator, MetricsMiddleware};
use yatube_service::models::NewGroup;
use yatube_service::openapi::ApiDoc;
use yatube_service::routes::api_scope;
use yatube_service::{AppState, Config};

async fn openapi_json(doc: web::Data<utoipa::openapi::OpenApi>) -> actix_web::Result<HttpResponse> {
    let body = serde_json::to_string(&*doc).map_err(|e| {
        tracing::error!("OpenAPI serialization failed: {}", e);
        actix_web::error::ErrorInternalServerError("OpenAPI serialization error")
    })?;

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .body(body))
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn other_error(msg: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::Other, msg.into())
}

async fn connect(service: &str) -> io::Result<sqlx::PgPool> {
    let db_config = DbConfig::from_env(service).map_err(other_error)?;
    db_config.log_config();
    let pool = create_pool(db_config)
        .await
        .map_err(|e| other_error(format!("Database connection failed: {}", e)))?;
    run_migrations(&pool)
        .await
        .map_err(|e| other_error(format!("Database migrations failed: {}", e)))?;
    Ok(pool)
}

async fn create_group(group: NewGroup) -> anyhow::Result<()> {
    let pool = connect("yatube-service-cli")
        .await
        .context("failed to open the database")?;
    let state = AppState::new(Repositories::postgres(pool));
    let created = state
        .groups
        .create_admin(group)
        .await
        .context("failed to create group")?;
    println!(
        "Created group {} (id {}, slug {})",
        created.title, created.id, created.slug
    );
    Ok(())
}

/// Yatube Service
///
/// # Routes
///
/// - `/api/v1/posts/*` - Posts and their comments
/// - `/api/v1/groups/*` - Read-only groups
/// - `/api/v1/follow/` - Subscriptions of the requester
/// - `/api/v1/health`, `/api/v1/health/live`, `/metrics`, `/api/v1/openapi.json`
#[actix_web::main]
async fn main() -> io::Result<()> {
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match cli::parse_args(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    match command {
        Command::Healthcheck => {
            return cli::healthcheck(config.app.port).await.map_err(|e| {
                eprintln!("{}", e);
                other_error("healthcheck failed")
            });
        }
        Command::CreateGroup(group) => {
            init_tracing();
            return create_group(group).await.map_err(|e| {
                eprintln!("ERROR: {:#}", e);
                other_error("create-group failed")
            });
        }
        Command::Serve => init_tracing(),
    }

    tracing::info!("Starting yatube-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let validator = match config.auth.jwt_public_key_pem.as_deref() {
        Some(pem) => JwtValidator::from_rsa_pem(pem.as_bytes())
            .map_err(|e| other_error(format!("Failed to initialize JWT validation: {}", e)))?,
        None => {
            return Err(other_error(
                "JWT_PUBLIC_KEY_PEM is not set; bearer tokens cannot be validated",
            ))
        }
    };
    let validator = Arc::new(validator);

    let db_pool = connect("yatube-service").await?;

    let app_state = web::Data::new(AppState::new(Repositories::postgres(db_pool.clone())));
    let health_state = web::Data::new(HealthState::new(db_pool.clone()));
    let openapi_doc = web::Data::new(ApiDoc::openapi());
    let origins = config.cors_origins();

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server on {}", bind_address);

    let server = HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in &origins {
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(app_state.clone())
            .app_data(health_state.clone())
            .app_data(openapi_doc.clone())
            .wrap(MetricsMiddleware)
            .wrap(CorrelationIdMiddleware::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .wrap(cors)
            .wrap(NormalizePath::new(TrailingSlash::Trim))
            .route("/metrics", web::get().to(actix_middleware::serve_metrics))
            .route("/api/v1/health", web::get().to(handlers::health_summary))
            .route("/api/v1/health/live", web::get().to(handlers::liveness_check))
            .route(ApiDoc::openapi_json_path(), web::get().to(openapi_json))
            .service(api_scope(validator.clone()))
    })
    .bind(&bind_address)?
    .disable_signals()
    .run();

    let handle = server.handle();
    tokio::select! {
        result = server => result,
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received, stopping HTTP server");
            handle.stop(true).await;
            Ok(())
        }
    }
}
