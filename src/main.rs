//! Entry point: load config, wire dependencies, and run the server.

use signup::cache::{CacheStore, CacheTtl, MemoryCache, RedisCache};
use signup::config::{CacheBackend, Config};
use signup::db;
use signup::directory::PgUserDirectory;
use signup::mail::{LogTransport, MailQueue, MailTransport, SmtpTransport};
use signup::services::{CodeMailTemplate, VerificationService};
use signup::{create_app, AppError, AppState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().map_err(AppError::from)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db_pool = db::create_pool(&config.database_url, config.database_max_connections).await?;
    db::ensure_schema(&db_pool).await?;
    let directory = Arc::new(PgUserDirectory::new(db_pool));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let ttl = CacheTtl::new(config.code_ttl, config.token_ttl);
    let mut purger = None;
    let cache: Arc<dyn CacheStore> = match config.cache_backend {
        CacheBackend::Redis => Arc::new(RedisCache::new(&config.redis_url, ttl)?),
        CacheBackend::Memory => {
            let memory = MemoryCache::new(ttl);
            purger = Some(memory.spawn_purger(config.code_ttl.min(config.token_ttl), shutdown_rx));
            Arc::new(memory)
        }
    };

    let transport: Arc<dyn MailTransport> = match &config.mail.smtp {
        Some(smtp) => {
            tracing::info!(host = %smtp.host, port = smtp.port, "using smtp relay");
            Arc::new(SmtpTransport::new(smtp)?)
        }
        None => {
            tracing::warn!("SMTP_HOST not set, verification mails will only be logged");
            Arc::new(LogTransport)
        }
    };
    let (mail_queue, mail_worker) = MailQueue::start(config.mail.queue_capacity, transport);

    let verification = VerificationService::new(
        cache,
        Arc::new(mail_queue),
        directory,
        CodeMailTemplate {
            sender: config.mail.sender.clone(),
            subject: config.mail.subject.clone(),
        },
    );
    let app = create_app(AppState::new(verification));

    tracing::info!(addr = %config.server_addr, cache = ?config.cache_backend, "listening");
    let listener = tokio::net::TcpListener::bind(config.server_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = shutdown_tx.send(true);
    if let Some(purger) = purger {
        if let Err(e) = purger.await {
            tracing::warn!(error = %e, "cache purger ended abnormally");
        }
    }

    // The router (and every queue handle in it) is gone; let the worker drain.
    if tokio::time::timeout(Duration::from_secs(10), mail_worker).await.is_err() {
        tracing::warn!("mail worker did not drain within 10s");
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
