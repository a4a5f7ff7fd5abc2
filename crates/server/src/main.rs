//! festa-rs server entry point.

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, middleware};
use festa_api::{AppState, middleware::auth_middleware, router as api_router};
use festa_common::{Config, LocalStorage, StorageBackend, StorageConfig};
use festa_core::{
    AdminDirectory, AuthClient, DedupService, EmailClient, ExportService, NotificationService,
    RegistrationService, ReviewService, SenderConfig,
};
use festa_db::repositories::{
    AdminIdentityRepository, EmailLogRepository, EmailTemplateRepository, EventRepository,
    LegacyGroupRepository, MemberRepository, RegistrationRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

async fn build_storage(config: &Config) -> Result<Arc<dyn StorageBackend>, Box<dyn std::error::Error>> {
    match &config.storage {
        StorageConfig::Local {
            base_path,
            base_url,
        } => {
            info!(path = %base_path.display(), "Using local screenshot storage");
            Ok(Arc::new(LocalStorage::new(
                base_path.clone(),
                base_url.clone(),
            )))
        }
        #[cfg(feature = "s3")]
        StorageConfig::S3 {
            endpoint,
            bucket,
            region,
            access_key_id,
            secret_access_key,
            public_url,
            prefix,
        } => {
            info!(bucket = %bucket, "Using S3 screenshot storage");
            Ok(Arc::new(
                festa_common::storage::S3Storage::new(
                    endpoint,
                    bucket.clone(),
                    region,
                    access_key_id,
                    secret_access_key,
                    public_url.clone(),
                    prefix.clone(),
                )
                .await?,
            ))
        }
        #[cfg(not(feature = "s3"))]
        StorageConfig::S3 { .. } => {
            Err("S3 storage configured but the server was built without the `s3` feature".into())
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "festa=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting festa-rs server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = festa_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    festa_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let registration_repo = RegistrationRepository::new(Arc::clone(&db));
    let member_repo = MemberRepository::new(Arc::clone(&db));
    let event_repo = EventRepository::new(Arc::clone(&db));
    let legacy_group_repo = LegacyGroupRepository::new(Arc::clone(&db));
    let email_template_repo = EmailTemplateRepository::new(Arc::clone(&db));
    let email_log_repo = EmailLogRepository::new(Arc::clone(&db));
    let admin_identity_repo = AdminIdentityRepository::new(Arc::clone(&db));

    // Initialize screenshot storage
    let storage = build_storage(&config).await?;

    // Initialize email delivery
    let sender = SenderConfig::from_app_config(&config.email)?;
    match &sender {
        Some(s) => info!(provider = s.provider.name(), "Email delivery enabled"),
        None => info!("Email delivery disabled; notifications will be logged as failed"),
    }
    let email_client = EmailClient::new(sender);

    // Initialize services
    let dedup_service = DedupService::new(registration_repo.clone(), legacy_group_repo.clone());
    let notification_service = NotificationService::new(
        email_template_repo.clone(),
        email_log_repo.clone(),
        email_client,
    );
    let registration_service = RegistrationService::new(
        registration_repo.clone(),
        member_repo.clone(),
        event_repo.clone(),
        dedup_service,
        storage,
    );
    let review_service = ReviewService::new(
        registration_repo.clone(),
        member_repo.clone(),
        notification_service,
        config.festival.name.clone(),
    );
    let export_service = ExportService::new(
        registration_repo.clone(),
        member_repo.clone(),
        legacy_group_repo.clone(),
    );

    // Initialize the admin directory and warm its cache
    let cache_ttl = Duration::from_secs(config.admin.cache_ttl_secs);
    let admin_directory = AdminDirectory::new(admin_identity_repo, cache_ttl);
    admin_directory.refresh().await?;
    info!("Admin directory warmed");

    // Periodic background refresh so admin changes made directly in the
    // database are picked up without a restart.
    {
        let directory = admin_directory.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(cache_ttl);
            interval.tick().await;
            loop {
                interval.tick().await;
                if let Err(e) = directory.refresh().await {
                    tracing::warn!(error = %e, "Admin directory refresh failed");
                }
            }
        });
    }

    let auth_client = AuthClient::new(&config.auth);

    // Create app state
    let state = AppState {
        registration_service,
        review_service,
        export_service,
        admin_directory,
        auth_client,
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
