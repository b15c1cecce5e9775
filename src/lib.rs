//! In-memory topic message broker over HTTP
//!
//! Producers publish a message to a named topic; consumers wait, up to a
//! timeout, for the next message on that topic. Each topic is a bounded FIFO
//! queue and every message is delivered to at most one consumer.
//!
//! ```no_run
//! use topic_broker::{BrokerServer, RegistryConfig, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> topic_broker::Result<()> {
//!     let server = BrokerServer::with_registry_config(
//!         ServerConfig::default(),
//!         RegistryConfig::default().capacity(1024),
//!     );
//!     server.run_until(async { let _ = tokio::signal::ctrl_c().await; }).await
//! }
//! ```

pub mod error;
pub mod registry;
pub mod server;
pub mod stats;

pub use error::{Error, Result};
pub use registry::{
    BackpressurePolicy, Message, QueueState, RegistryConfig, RegistryError, TopicName,
    TopicQueue, TopicRegistry,
};
pub use server::{BrokerServer, ServerConfig};
pub use stats::{BrokerStats, TopicStats};
