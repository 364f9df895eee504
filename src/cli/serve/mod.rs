//! Serve command - runs the HTTP server

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use crate::api::{AppState, create_router};
use crate::config::{AppConfig, DegradedAction};
use crate::infrastructure::cache::{DegradedPolicy, RedisCache, RedisCacheConfig};
use crate::infrastructure::logging;

/// Run the HTTP server.
///
/// A cache construction failure (store unreachable, or unhealthy under the
/// configured degraded policy) propagates out of here; `main` turns it into
/// a non-zero exit before the listener ever binds.
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    let cache = connect_cache(&config).await?;
    let state = AppState::new(Arc::new(cache), config.store.ttl());
    let app = create_router(state);

    let addr = build_socket_addr(&config)?;
    info!("Starting server on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

async fn connect_cache(config: &AppConfig) -> anyhow::Result<RedisCache> {
    let degraded = match config.store.on_degraded {
        DegradedAction::Fail => DegradedPolicy::Fail,
        DegradedAction::Retry => DegradedPolicy::Retry {
            attempts: config.store.probe_attempts,
            backoff: Duration::from_secs(config.store.probe_backoff_secs),
        },
    };

    let redis_config = RedisCacheConfig::from_env()?.with_degraded_policy(degraded);

    Ok(RedisCache::connect(redis_config).await?)
}

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
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_socket_addr_from_defaults() {
        let addr = build_socket_addr(&AppConfig::default()).unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_build_socket_addr_rejects_bad_host() {
        let mut config = AppConfig::default();
        config.server.host = "not-an-ip".to_string();

        assert!(build_socket_addr(&config).is_err());
    }
}
