//! Broker binary
//!
//! Run with: topic-broker [--bind ADDR] [--capacity N] [--topics a,b] ...
//!
//!   curl -X PUT 'http://localhost:8080/pet?v=dog'
//!   curl 'http://localhost:8080/pet?timeout=1'

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use topic_broker::{BackpressurePolicy, BrokerServer, RegistryConfig, ServerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "In-memory topic message broker over HTTP", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "BROKER_BIND", default_value = "0.0.0.0:8080")]
    bind: SocketAddr,

    /// Maximum buffered messages per topic
    #[arg(long, env = "BROKER_CAPACITY", default_value_t = 8192)]
    capacity: usize,

    /// Topics created at startup
    #[arg(long, env = "BROKER_TOPICS", value_delimiter = ',', default_value = "pet,role")]
    topics: Vec<String>,

    /// Fail publishes to a full topic instead of waiting
    #[arg(long, env = "BROKER_REJECT_WHEN_FULL")]
    reject_when_full: bool,

    /// Consume timeout in seconds when the request gives none
    #[arg(long, env = "BROKER_DEFAULT_TIMEOUT", default_value_t = 5)]
    default_timeout: u64,

    /// Stats log interval in seconds (0 disables)
    #[arg(long, env = "BROKER_STATS_INTERVAL", default_value_t = 30)]
    stats_interval: u64,

    /// Enable debug logging
    #[arg(short, long, env = "BROKER_DEBUG")]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // RUST_LOG wins over --debug when set
    let default_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let backpressure = if args.reject_when_full {
        BackpressurePolicy::Reject
    } else {
        BackpressurePolicy::Block
    };

    let registry_config = RegistryConfig::default()
        .capacity(args.capacity)
        .initial_topics(args.topics)
        .backpressure(backpressure);

    let server_config = ServerConfig::default()
        .bind(args.bind)
        .default_consume_timeout(Duration::from_secs(args.default_timeout))
        .stats_interval(Duration::from_secs(args.stats_interval));

    info!(
        bind = %args.bind,
        capacity = registry_config.capacity,
        backpressure = ?registry_config.backpressure,
        "Starting broker"
    );

    let server = BrokerServer::with_registry_config(server_config, registry_config);

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await?;

    Ok(())
}
