//! Registry configuration

/// Default per-topic capacity
pub const DEFAULT_CAPACITY: usize = 8192;

/// Topics created when the registry is built
pub const DEFAULT_TOPICS: [&str; 2] = ["pet", "role"];

/// What `publish` does when a topic is full
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackpressurePolicy {
    /// Wait until a consumer frees a slot
    #[default]
    Block,
    /// Fail immediately with `CapacityExceeded`
    Reject,
}

/// Topic registry configuration options
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Maximum buffered messages per topic
    pub capacity: usize,

    /// Topics pre-created at startup
    pub initial_topics: Vec<String>,

    /// Behaviour of `publish` on a full topic
    pub backpressure: BackpressurePolicy,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            initial_topics: DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect(),
            backpressure: BackpressurePolicy::Block,
        }
    }
}

impl RegistryConfig {
    /// Set per-topic capacity (minimum 1)
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Replace the set of pre-created topics
    pub fn initial_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.initial_topics = topics.into_iter().map(Into::into).collect();
        self
    }

    /// Set the backpressure policy
    pub fn backpressure(mut self, policy: BackpressurePolicy) -> Self {
        self.backpressure = policy;
        self
    }

    /// Shorthand for `backpressure(BackpressurePolicy::Reject)`
    pub fn reject_when_full(self) -> Self {
        self.backpressure(BackpressurePolicy::Reject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegistryConfig::default();

        assert_eq!(config.capacity, 8192);
        assert_eq!(config.initial_topics, vec!["pet", "role"]);
        assert_eq!(config.backpressure, BackpressurePolicy::Block);
    }

    #[test]
    fn test_builder_capacity_minimum() {
        let config = RegistryConfig::default().capacity(0);

        assert_eq!(config.capacity, 1);
    }

    #[test]
    fn test_builder_chaining() {
        let config = RegistryConfig::default()
            .capacity(16)
            .initial_topics(["orders"])
            .reject_when_full();

        assert_eq!(config.capacity, 16);
        assert_eq!(config.initial_topics, vec!["orders"]);
        assert_eq!(config.backpressure, BackpressurePolicy::Reject);
    }
}
