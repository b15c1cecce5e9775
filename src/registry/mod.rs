//! Topic registry for publish/consume routing
//!
//! The registry owns one bounded FIFO queue per topic and hands messages from
//! publishers to consumers. Each message reaches at most one consumer.
//!
//! # Architecture
//!
//! ```text
//!                          Arc<TopicRegistry>
//!                     ┌─────────────────────────┐
//!                     │ topics: RwLock<HashMap< │
//!                     │   TopicName,            │
//!                     │   Arc<TopicQueue>,      │
//!                     │ >>                      │
//!                     └───────────┬─────────────┘
//!                                 │ lookup-or-create, lock released
//!         ┌───────────────────────┼───────────────────────┐
//!         │                       │                       │
//!         ▼                       ▼                       ▼
//!    [Publisher]             [Consumer]              [Consumer]
//!    queue.push()          queue.timed_pop()       queue.timed_pop()
//! ```
//!
//! The map lock is only held to find or insert a queue. All waiting happens
//! on the queue's own semaphores, so traffic on one topic never blocks
//! another.

pub mod config;
pub mod error;
pub mod queue;
pub mod store;
pub mod topic;

pub use config::{BackpressurePolicy, RegistryConfig};
pub use error::RegistryError;
pub use queue::{QueueState, TopicQueue};
pub use store::TopicRegistry;
pub use topic::{Message, TopicName};
