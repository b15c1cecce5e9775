//! Topic registry implementation
//!
//! The central registry that owns every topic queue and routes messages
//! from publishers to consumers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::stats::{BrokerStats, TopicStats};

use super::config::{BackpressurePolicy, RegistryConfig};
use super::error::RegistryError;
use super::queue::TopicQueue;
use super::topic::{Message, TopicName};

/// Central registry for all topics
///
/// The `RwLock` only guards the name-to-queue map. It is held long enough to
/// find or insert a queue and is always released before a publish or consume
/// waits, so a congested topic never stalls lookups of other topics.
pub struct TopicRegistry {
    /// Map of topic name to its queue
    topics: RwLock<HashMap<TopicName, Arc<TopicQueue>>>,

    /// Configuration
    config: RegistryConfig,
}

impl TopicRegistry {
    /// Create a new topic registry with default configuration
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a new topic registry with custom configuration
    ///
    /// Topics listed in `initial_topics` are created immediately.
    pub fn with_config(config: RegistryConfig) -> Self {
        let mut topics = HashMap::new();

        for name in &config.initial_topics {
            match TopicName::new(name.as_str()) {
                Ok(topic) => {
                    let queue = TopicQueue::new(topic.clone(), config.capacity);
                    topics.insert(topic, Arc::new(queue));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping initial topic");
                }
            }
        }

        tracing::debug!(
            topics = topics.len(),
            capacity = config.capacity,
            backpressure = ?config.backpressure,
            "Topic registry created"
        );

        Self {
            topics: RwLock::new(topics),
            config,
        }
    }

    /// Get the registry configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Get the queue for a topic, creating it if absent
    ///
    /// Concurrent callers for the same unseen name all receive the same
    /// queue instance.
    pub async fn queue(&self, topic: &TopicName) -> Arc<TopicQueue> {
        if let Some(queue) = self.topics.read().await.get(topic) {
            return Arc::clone(queue);
        }

        let mut topics = self.topics.write().await;

        // Another caller may have inserted it between the read and write lock
        let queue = topics.entry(topic.clone()).or_insert_with(|| {
            tracing::info!(topic = %topic, capacity = self.config.capacity, "Topic created");
            Arc::new(TopicQueue::new(topic.clone(), self.config.capacity))
        });

        Arc::clone(queue)
    }

    /// Publish a message to the tail of a topic
    ///
    /// Under `BackpressurePolicy::Block` this waits while the topic is full.
    /// Under `BackpressurePolicy::Reject` it fails with `CapacityExceeded`
    /// and the message is not stored.
    pub async fn publish(&self, topic: &TopicName, message: Message) -> Result<(), RegistryError> {
        let queue = self.queue(topic).await;
        let size = message.len();

        let result = match self.config.backpressure {
            BackpressurePolicy::Block => queue.push(message).await,
            BackpressurePolicy::Reject => queue.try_push(message),
        };

        match &result {
            Ok(()) => {
                tracing::debug!(topic = %topic, bytes = size, depth = queue.len(), "Published");
            }
            Err(e) => {
                tracing::warn!(topic = %topic, error = %e, "Publish rejected");
            }
        }

        result
    }

    /// Consume the head message of a topic
    ///
    /// Waits up to `timeout` for a message. The topic is created if absent so
    /// a consumer can wait on a topic no producer has used yet.
    pub async fn consume(
        &self,
        topic: &TopicName,
        timeout: Duration,
    ) -> Result<Message, RegistryError> {
        if timeout.is_zero() {
            return Err(RegistryError::InvalidRequest(
                "timeout must be positive".into(),
            ));
        }

        let queue = self.queue(topic).await;

        match queue.timed_pop(timeout).await {
            Some(message) => {
                tracing::debug!(topic = %topic, bytes = message.len(), "Consumed");
                Ok(message)
            }
            None => {
                tracing::debug!(
                    topic = %topic,
                    timeout = ?timeout,
                    "Consume timed out"
                );
                Err(RegistryError::Timeout(topic.clone()))
            }
        }
    }

    /// Check if a topic exists
    pub async fn contains(&self, topic: &TopicName) -> bool {
        self.topics.read().await.contains_key(topic)
    }

    /// Get total number of topics
    pub async fn topic_count(&self) -> usize {
        self.topics.read().await.len()
    }

    /// Names of all topics, sorted
    pub async fn topic_names(&self) -> Vec<TopicName> {
        let mut names: Vec<_> = self.topics.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get statistics for one topic
    pub async fn topic_stats(&self, topic: &TopicName) -> Option<TopicStats> {
        self.topics.read().await.get(topic).map(|queue| queue.stats())
    }

    /// Get statistics for every topic
    pub async fn stats(&self) -> BrokerStats {
        let topics = self.topics.read().await;
        BrokerStats::new(topics.values().map(|queue| queue.stats()).collect())
    }

    /// Spawn background task logging broker statistics
    ///
    /// Returns a handle that can be used to abort the task. `interval` must
    /// be non-zero.
    pub fn spawn_stats_task(self: &Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        let registry = Arc::clone(self);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // First tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let stats = registry.stats().await;

                tracing::info!(
                    topics = stats.topic_count(),
                    buffered = stats.total_depth(),
                    published = stats.total_published(),
                    consumed = stats.total_consumed(),
                    "Broker stats"
                );

                for topic in stats.full_topics() {
                    tracing::warn!(
                        topic = %topic.topic,
                        capacity = topic.capacity,
                        "Topic at capacity"
                    );
                }
            }
        })
    }
}

impl Default for TopicRegistry {
    fn default() -> Self {
        Self::new()
    }
}
