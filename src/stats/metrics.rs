//! Statistics for topics and the broker as a whole

use std::time::Duration;

use crate::registry::{QueueState, TopicName};

/// Topic-level statistics
#[derive(Debug, Clone)]
pub struct TopicStats {
    /// Topic name
    pub topic: TopicName,
    /// Messages currently buffered
    pub depth: usize,
    /// Maximum buffered messages
    pub capacity: usize,
    /// Fill state
    pub state: QueueState,
    /// Messages accepted
    pub published: u64,
    /// Messages handed to a consumer
    pub consumed: u64,
    /// Publishes refused because the topic was full
    pub rejected: u64,
    /// Consumes that gave up waiting
    pub timed_out: u64,
    /// Time since the topic was created
    pub age: Duration,
}

impl TopicStats {
    /// Fraction of capacity in use, from 0.0 to 1.0
    pub fn fill_ratio(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.depth as f64 / self.capacity as f64
        }
    }
}

/// Broker-wide statistics
#[derive(Debug, Clone, Default)]
pub struct BrokerStats {
    /// Per-topic snapshots, sorted by topic name
    pub topics: Vec<TopicStats>,
}

impl BrokerStats {
    /// Build from per-topic snapshots
    pub fn new(mut topics: Vec<TopicStats>) -> Self {
        topics.sort_by(|a, b| a.topic.cmp(&b.topic));
        Self { topics }
    }

    /// Number of known topics
    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    /// Messages buffered across all topics
    pub fn total_depth(&self) -> usize {
        self.topics.iter().map(|t| t.depth).sum()
    }

    /// Messages accepted across all topics
    pub fn total_published(&self) -> u64 {
        self.topics.iter().map(|t| t.published).sum()
    }

    /// Messages consumed across all topics
    pub fn total_consumed(&self) -> u64 {
        self.topics.iter().map(|t| t.consumed).sum()
    }

    /// Topics currently at capacity
    pub fn full_topics(&self) -> impl Iterator<Item = &TopicStats> {
        self.topics.iter().filter(|t| t.state == QueueState::Full)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(name: &str, depth: usize, published: u64, consumed: u64) -> TopicStats {
        TopicStats {
            topic: TopicName::new(name).unwrap(),
            depth,
            capacity: 4,
            state: match depth {
                0 => QueueState::Empty,
                4 => QueueState::Full,
                _ => QueueState::Partial,
            },
            published,
            consumed,
            rejected: 0,
            timed_out: 0,
            age: Duration::ZERO,
        }
    }

    #[test]
    fn test_fill_ratio() {
        assert_eq!(stats("a", 0, 0, 0).fill_ratio(), 0.0);
        assert_eq!(stats("a", 2, 2, 0).fill_ratio(), 0.5);
        assert_eq!(stats("a", 4, 4, 0).fill_ratio(), 1.0);
    }

    #[test]
    fn test_broker_stats_new_sorts_topics() {
        let broker = BrokerStats::new(vec![stats("role", 0, 0, 0), stats("pet", 0, 0, 0)]);

        assert_eq!(broker.topics[0].topic.as_str(), "pet");
        assert_eq!(broker.topics[1].topic.as_str(), "role");
    }

    #[test]
    fn test_broker_stats_totals() {
        let broker = BrokerStats::new(vec![
            stats("a", 1, 5, 4),
            stats("b", 4, 10, 6),
            stats("c", 0, 0, 0),
        ]);

        assert_eq!(broker.topic_count(), 3);
        assert_eq!(broker.total_depth(), 5);
        assert_eq!(broker.total_published(), 15);
        assert_eq!(broker.total_consumed(), 10);

        let full: Vec<_> = broker.full_topics().map(|t| t.topic.as_str()).collect();
        assert_eq!(full, vec!["b"]);
    }

    #[test]
    fn test_broker_stats_default_is_empty() {
        let broker = BrokerStats::default();

        assert_eq!(broker.topic_count(), 0);
        assert_eq!(broker.total_depth(), 0);
    }
}
