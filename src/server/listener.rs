//! Broker HTTP server
//!
//! Binds the listener and serves the router; axum spawns one task per
//! connection.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::error::Result;
use crate::registry::{RegistryConfig, TopicRegistry};
use crate::server::config::ServerConfig;
use crate::server::handler;

/// Broker server
pub struct BrokerServer {
    config: ServerConfig,
    registry: Arc<TopicRegistry>,
}

impl BrokerServer {
    /// Create a new server with default registry configuration
    pub fn new(config: ServerConfig) -> Self {
        Self::with_registry_config(config, RegistryConfig::default())
    }

    /// Create a new server with custom registry configuration
    pub fn with_registry_config(config: ServerConfig, registry_config: RegistryConfig) -> Self {
        Self::with_registry(config, Arc::new(TopicRegistry::with_config(registry_config)))
    }

    /// Create a new server around an existing registry
    pub fn with_registry(config: ServerConfig, registry: Arc<TopicRegistry>) -> Self {
        Self { config, registry }
    }

    /// Get a reference to the topic registry
    pub fn registry(&self) -> &Arc<TopicRegistry> {
        &self.registry
    }

    /// Build the HTTP router for this server
    pub fn router(&self) -> Router {
        handler::router(Arc::clone(&self.registry), &self.config)
    }

    /// Run the server
    ///
    /// This method blocks until the server fails.
    pub async fn run(&self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Run the server with graceful shutdown
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        let topics = self.registry.topic_count().await;
        tracing::info!(
            addr = %addr,
            topics = topics,
            "Broker listening"
        );

        // Spawn stats task for the topic registry
        let stats_handle = if self.config.stats_interval.is_zero() {
            None
        } else {
            Some(self.registry.spawn_stats_task(self.config.stats_interval))
        };

        let result = axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                shutdown.await;
                tracing::info!("Shutdown signal received");
            })
            .await;

        // Stop stats task on shutdown
        if let Some(handle) = stats_handle {
            handle.abort();
        }

        result?;
        tracing::info!(addr = %addr, "Broker stopped");
        Ok(())
    }

    /// Get the bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }
}
