// backend/src/main.rs

use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nlp_service_backend::{
    backend::{init_redis_pool, JobBackend, MemoryBackend, RedisBackend},
    build_router,
    config::{BackendKind, ServiceConfig},
    engine::RuleBasedEngine,
    job_worker::{self, AnnotationExecutor},
    validation::ParamValidator,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Setup Logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nlp_service_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = ServiceConfig::from_env()?;
    tracing::info!(
        "Starting with role {:?}, {:?} backend, {} worker(s)",
        config.role,
        config.backend,
        config.worker_count
    );

    // 2. Setup Job Backend
    let backend: Arc<dyn JobBackend> = match config.backend {
        BackendKind::Redis => {
            let pool = init_redis_pool(&config.redis_url)?;
            Arc::new(RedisBackend::new(
                pool,
                config.queue_name.clone(),
                config.result_ttl,
            ))
        }
        BackendKind::Memory => Arc::new(MemoryBackend::with_result_ttl(config.result_ttl)),
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // 3. Start Background Worker System
    let workers = if config.role.runs_workers() {
        let executor = Arc::new(AnnotationExecutor::new(Arc::new(RuleBasedEngine::new())));
        let handles = job_worker::spawn_workers(
            config.worker_count,
            Arc::clone(&backend),
            executor,
            config.dequeue_timeout,
            shutdown_rx,
        );
        tracing::info!("{} background worker(s) spawned.", handles.len());
        handles
    } else {
        Vec::new()
    };

    // 4. Serve the API, or just wait for a signal in worker-only mode
    if config.role.runs_api() {
        let app_state = Arc::new(
            AppState::new(ParamValidator::from_config(&config), Arc::clone(&backend))
                .with_max_body_bytes(config.max_body_bytes),
        );
        let app = build_router(app_state);

        let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
        tracing::info!("Server running on {}", config.listen_addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
    } else {
        shutdown_signal().await;
    }

    // 5. Let workers finish the job in hand
    let _ = shutdown_tx.send(true);
    for handle in workers {
        if let Err(e) = handle.await {
            tracing::error!("Worker task ended abnormally: {}", e);
        }
    }
    tracing::info!("Shutdown complete.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received.");
}
