//! HTTP server for the broker
//!
//! Thin layer over [`TopicRegistry`](crate::registry::TopicRegistry):
//!
//! | Method | Path       | Query           | Success                | Failure          |
//! |--------|------------|-----------------|------------------------|------------------|
//! | PUT    | `/{topic}` | `v=<message>`   | 200                    | 400, 503         |
//! | GET    | `/{topic}` | `timeout=<s>`   | 200, body = message    | 400, 404 timeout |
//! | other  | any        |                 |                        | 405              |

pub mod config;
pub mod handler;
pub mod listener;

pub use config::ServerConfig;
pub use handler::{router, ApiError};
pub use listener::BrokerServer;
