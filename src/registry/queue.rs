//! Bounded per-topic FIFO queue
//!
//! Each topic owns one `TopicQueue`. The buffer itself sits behind a short
//! lived mutex that is never held across an await point. Waiting is done on
//! two semaphores instead:
//!
//! ```text
//!   publisher                                      consumer
//!       │                                              │
//!   slots.acquire() ──► buffer.push_back() ──► items.add_permits(1)
//!                                                      │
//!   slots.add_permits(1) ◄── buffer.pop_front() ◄── items.acquire()
//! ```
//!
//! Permits on `items` never exceed the buffered message count, so a consumer
//! holding one always finds a message. Tokio semaphores queue waiters in
//! arrival order and hand back partially acquired permits when a waiter is
//! dropped, which gives FIFO-by-arrival fairness and lets a timed out or
//! disconnected consumer leave without disturbing the buffer.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::Semaphore;

use crate::stats::TopicStats;

use super::error::RegistryError;
use super::topic::{Message, TopicName};

/// Fill state of a topic queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueState {
    /// No buffered messages
    Empty,
    /// Some messages buffered, free slots remain
    Partial,
    /// Buffered messages equal capacity
    Full,
}

/// Bounded multi-producer multi-consumer FIFO for a single topic
pub struct TopicQueue {
    name: TopicName,
    capacity: usize,
    buffer: Mutex<VecDeque<Message>>,

    /// Free slots; publishers wait here when full
    slots: Semaphore,

    /// Buffered messages; consumers wait here when empty
    items: Semaphore,

    published: AtomicU64,
    consumed: AtomicU64,
    rejected: AtomicU64,
    timed_out: AtomicU64,
    created_at: Instant,
}

impl TopicQueue {
    /// Create an empty queue holding at most `capacity` messages
    ///
    /// `capacity` is clamped to `1..=Semaphore::MAX_PERMITS`.
    pub fn new(name: TopicName, capacity: usize) -> Self {
        let capacity = capacity.clamp(1, Semaphore::MAX_PERMITS);

        Self {
            name,
            capacity,
            buffer: Mutex::new(VecDeque::new()),
            slots: Semaphore::new(capacity),
            items: Semaphore::new(0),
            published: AtomicU64::new(0),
            consumed: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            timed_out: AtomicU64::new(0),
            created_at: Instant::now(),
        }
    }

    /// Topic this queue belongs to
    pub fn name(&self) -> &TopicName {
        &self.name
    }

    /// Maximum number of buffered messages
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of buffered messages
    pub fn len(&self) -> usize {
        self.buffer.lock().len()
    }

    /// Whether no messages are buffered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether buffered messages have reached capacity
    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    /// Current fill state
    pub fn state(&self) -> QueueState {
        match self.len() {
            0 => QueueState::Empty,
            n if n >= self.capacity => QueueState::Full,
            _ => QueueState::Partial,
        }
    }

    /// Append a message without waiting
    ///
    /// Fails with `CapacityExceeded` when the queue is full (or when other
    /// publishers are already waiting for a slot). The message is dropped.
    pub fn try_push(&self, message: Message) -> Result<(), RegistryError> {
        match self.slots.try_acquire() {
            Ok(permit) => {
                permit.forget();
                self.enqueue(message);
                Ok(())
            }
            Err(_) => {
                self.rejected.fetch_add(1, Ordering::Relaxed);
                Err(RegistryError::CapacityExceeded(self.name.clone()))
            }
        }
    }

    /// Append a message, waiting for a free slot while the queue is full
    ///
    /// Dropping the returned future before it completes leaves the queue
    /// untouched.
    pub async fn push(&self, message: Message) -> Result<(), RegistryError> {
        let permit = self
            .slots
            .acquire()
            .await
            .map_err(|_| RegistryError::CapacityExceeded(self.name.clone()))?;
        permit.forget();

        self.enqueue(message);
        Ok(())
    }

    /// Remove the head message without waiting
    pub fn try_pop(&self) -> Option<Message> {
        let permit = self.items.try_acquire().ok()?;
        permit.forget();

        self.dequeue()
    }

    /// Remove the head message, waiting up to `timeout` for one to arrive
    ///
    /// Returns `None` on timeout, in which case the queue is unchanged.
    pub async fn timed_pop(&self, timeout: Duration) -> Option<Message> {
        match tokio::time::timeout(timeout, self.items.acquire()).await {
            Ok(Ok(permit)) => {
                permit.forget();
                self.dequeue()
            }
            // Semaphore closed; never happens while the queue is alive
            Ok(Err(_)) => None,
            Err(_) => {
                self.timed_out.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Snapshot of this queue's counters
    pub fn stats(&self) -> TopicStats {
        TopicStats {
            topic: self.name.clone(),
            depth: self.len(),
            capacity: self.capacity,
            state: self.state(),
            published: self.published.load(Ordering::Relaxed),
            consumed: self.consumed.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            timed_out: self.timed_out.load(Ordering::Relaxed),
            age: self.created_at.elapsed(),
        }
    }

    fn enqueue(&self, message: Message) {
        self.buffer.lock().push_back(message);
        self.published.fetch_add(1, Ordering::Relaxed);
        self.items.add_permits(1);
    }

    fn dequeue(&self) -> Option<Message> {
        let message = self.buffer.lock().pop_front();
        if message.is_some() {
            self.consumed.fetch_add(1, Ordering::Relaxed);
            self.slots.add_permits(1);
        }
        message
    }
}

impl std::fmt::Debug for TopicQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TopicQueue")
            .field("name", &self.name)
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio_test::{assert_pending, assert_ready, task};

    use super::*;

    fn queue(capacity: usize) -> TopicQueue {
        TopicQueue::new(TopicName::new("test").unwrap(), capacity)
    }

    fn msg(text: &str) -> Message {
        Message::new(text).unwrap()
    }

    #[test]
    fn test_fifo_order() {
        let queue = queue(8);

        queue.try_push(msg("m1")).unwrap();
        queue.try_push(msg("m2")).unwrap();
        queue.try_push(msg("m3")).unwrap();

        assert_eq!(queue.try_pop(), Some(msg("m1")));
        assert_eq!(queue.try_pop(), Some(msg("m2")));
        assert_eq!(queue.try_pop(), Some(msg("m3")));
        assert_eq!(queue.try_pop(), None);
    }

    #[test]
    fn test_state_transitions() {
        let queue = queue(2);
        assert_eq!(queue.state(), QueueState::Empty);

        queue.try_push(msg("a")).unwrap();
        assert_eq!(queue.state(), QueueState::Partial);

        queue.try_push(msg("b")).unwrap();
        assert_eq!(queue.state(), QueueState::Full);
        assert!(queue.is_full());

        queue.try_pop().unwrap();
        assert_eq!(queue.state(), QueueState::Partial);

        queue.try_pop().unwrap();
        assert_eq!(queue.state(), QueueState::Empty);
    }

    #[test]
    fn test_try_push_rejects_when_full() {
        let queue = queue(1);
        queue.try_push(msg("kept")).unwrap();

        let result = queue.try_push(msg("dropped"));
        assert!(matches!(result, Err(RegistryError::CapacityExceeded(_))));

        // Nothing was lost or overwritten
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.try_pop(), Some(msg("kept")));
        assert_eq!(queue.try_pop(), None);
        assert_eq!(queue.stats().rejected, 1);
    }

    #[test]
    fn test_push_waits_for_free_slot() {
        let queue = queue(1);
        queue.try_push(msg("a")).unwrap();

        let mut blocked = task::spawn(queue.push(msg("b")));
        assert_pending!(blocked.poll());

        assert_eq!(queue.try_pop(), Some(msg("a")));
        assert!(blocked.is_woken());
        assert_ready!(blocked.poll()).unwrap();

        assert_eq!(queue.try_pop(), Some(msg("b")));
    }

    #[test]
    fn test_dropped_push_does_not_enqueue() {
        let queue = queue(1);
        queue.try_push(msg("a")).unwrap();

        let mut blocked = task::spawn(queue.push(msg("b")));
        assert_pending!(blocked.poll());
        drop(blocked);

        assert_eq!(queue.try_pop(), Some(msg("a")));
        assert_eq!(queue.try_pop(), None);

        // Slot freed by the pop is still available
        queue.try_push(msg("c")).unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_pop_times_out() {
        let queue = queue(4);
        let start = tokio::time::Instant::now();

        assert_eq!(queue.timed_pop(Duration::from_secs(1)).await, None);

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(1));
        assert!(elapsed < Duration::from_millis(1100));
        assert_eq!(queue.stats().timed_out, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_leaves_queue_unchanged() {
        let queue = Arc::new(queue(4));

        // Nothing arrives for the first consumer
        assert_eq!(queue.timed_pop(Duration::from_millis(100)).await, None);

        queue.try_push(msg("later")).unwrap();
        assert_eq!(
            queue.timed_pop(Duration::from_millis(100)).await,
            Some(msg("later"))
        );
    }

    #[tokio::test]
    async fn test_timed_pop_receives_later_push() {
        let queue = Arc::new(queue(4));

        let consumer = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.timed_pop(Duration::from_secs(5)).await })
        };

        tokio::task::yield_now().await;
        queue.push(msg("hello")).await.unwrap();

        assert_eq!(consumer.await.unwrap(), Some(msg("hello")));
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_waiting_consumers_served_in_arrival_order() {
        let queue = queue(4);

        let mut first = task::spawn(queue.timed_pop(Duration::from_secs(5)));
        let mut second = task::spawn(queue.timed_pop(Duration::from_secs(5)));
        assert_pending!(first.poll());
        assert_pending!(second.poll());

        queue.try_push(msg("a")).unwrap();
        queue.try_push(msg("b")).unwrap();

        assert_eq!(assert_ready!(first.poll()), Some(msg("a")));
        assert_eq!(assert_ready!(second.poll()), Some(msg("b")));
    }

    #[tokio::test]
    async fn test_dropped_consumer_does_not_lose_message() {
        let queue = queue(4);

        let mut abandoned = task::spawn(queue.timed_pop(Duration::from_secs(5)));
        assert_pending!(abandoned.poll());

        queue.try_push(msg("survivor")).unwrap();

        // The waiter was handed the permit but is dropped before running
        drop(abandoned);

        assert_eq!(queue.try_pop(), Some(msg("survivor")));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_each_message_delivered_once() {
        let queue = Arc::new(queue(64));
        let total = 200;

        let mut consumers = Vec::new();
        for _ in 0..8 {
            let queue = Arc::clone(&queue);
            consumers.push(tokio::spawn(async move {
                let mut received = Vec::new();
                while let Some(m) = queue.timed_pop(Duration::from_millis(200)).await {
                    received.push(m.as_str().to_string());
                }
                received
            }));
        }

        for i in 0..total {
            queue.push(msg(&format!("m{i}"))).await.unwrap();
        }

        let mut all = Vec::new();
        for consumer in consumers {
            all.extend(consumer.await.unwrap());
        }

        all.sort();
        all.dedup();
        assert_eq!(all.len(), total);
        assert_eq!(queue.stats().consumed, total as u64);
    }
}
