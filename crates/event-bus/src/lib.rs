use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::trace;

use wander_core_types::WanderError;

/// Trait implemented by payload types that can be carried on the bus.
pub trait Event: Clone + Send + Sync + std::fmt::Debug + 'static {}

impl<T> Event for T where T: Clone + Send + Sync + std::fmt::Debug + 'static {}

#[async_trait]
pub trait EventBus<E>: Send + Sync
where
    E: Event,
{
    /// Publish to every live subscriber. Publishing with nobody listening is not an error.
    async fn publish(&self, event: E) -> Result<(), WanderError>;
    fn subscribe(&self) -> broadcast::Receiver<E>;
}

/// Broadcast-backed bus shared by the orchestrator and its observers.
pub struct InMemoryBus<E>
where
    E: Event,
{
    sender: broadcast::Sender<E>,
}

impl<E> InMemoryBus<E>
where
    E: Event,
{
    pub fn new(capacity: usize) -> Arc<Self> {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Arc::new(Self { sender })
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[async_trait]
impl<E> EventBus<E> for InMemoryBus<E>
where
    E: Event,
{
    async fn publish(&self, event: E) -> Result<(), WanderError> {
        if self.sender.receiver_count() == 0 {
            trace!(?event, "event dropped, no subscribers");
            return Ok(());
        }
        self.sender
            .send(event)
            .map(|_| ())
            .map_err(|err| WanderError::new(err.to_string()))
    }

    fn subscribe(&self) -> broadcast::Receiver<E> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_without_subscribers_is_ok() {
        let bus = InMemoryBus::<u32>::new(4);
        assert_eq!(bus.subscriber_count(), 0);
        bus.publish(1).await.unwrap();
    }

    #[tokio::test]
    async fn subscribers_receive_in_order() {
        let bus = InMemoryBus::<&'static str>::new(8);
        let mut rx = bus.subscribe();
        bus.publish("a").await.unwrap();
        bus.publish("b").await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), "a");
        assert_eq!(rx.recv().await.unwrap(), "b");
    }
}
