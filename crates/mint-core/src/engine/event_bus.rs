//! Event bus for notifying the presentation layer.
//!
//! The session, reader and orchestrator publish [`MintEvent`]s here; front
//! ends subscribe and re-render from the shared state when one arrives.

use mint_types::MintEvent;
use tokio::sync::broadcast;

/// Broadcast-based event bus.
///
/// Publishing never blocks. Slow subscribers lose the oldest events once
/// the channel capacity is exceeded.
pub struct EventBus {
	sender: broadcast::Sender<MintEvent>,
}

impl EventBus {
	/// Creates a bus buffering up to `capacity` events per subscriber.
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity);
		Self { sender }
	}

	/// Creates a new subscriber; it only sees events published afterwards.
	pub fn subscribe(&self) -> broadcast::Receiver<MintEvent> {
		self.sender.subscribe()
	}

	/// Publishes an event to all current subscribers.
	///
	/// Returns an error if nobody is listening, which callers may ignore.
	pub fn publish(&self, event: MintEvent) -> Result<(), broadcast::error::SendError<MintEvent>> {
		self.sender.send(event)?;
		Ok(())
	}
}

impl Clone for EventBus {
	fn clone(&self) -> Self {
		Self {
			sender: self.sender.clone(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::Address;
	use mint_types::MintPhase;

	#[test]
	fn test_subscribe_creates_receiver() {
		let event_bus = EventBus::new(10);
		assert_eq!(event_bus.sender.receiver_count(), 0);

		let _receiver1 = event_bus.subscribe();
		let _receiver2 = event_bus.subscribe();
		assert_eq!(event_bus.sender.receiver_count(), 2);
	}

	#[tokio::test]
	async fn test_multiple_subscribers_receive_same_event() {
		let event_bus = EventBus::new(10);
		let mut receiver1 = event_bus.subscribe();
		let mut receiver2 = event_bus.subscribe();

		let event = MintEvent::AccountChanged(Some(Address::repeat_byte(0x11)));
		event_bus.publish(event.clone()).unwrap();

		assert_eq!(receiver1.recv().await.unwrap(), event);
		assert_eq!(receiver2.recv().await.unwrap(), event);
	}

	#[test]
	fn test_publish_with_no_subscribers() {
		let event_bus = EventBus::new(10);
		{
			let _receiver = event_bus.subscribe();
		}

		let result = event_bus.publish(MintEvent::PhaseChanged(MintPhase::Idle));
		assert!(result.is_err());
	}

	#[tokio::test]
	async fn test_late_subscriber_misses_previous_events() {
		let event_bus = EventBus::new(10);
		let mut early = event_bus.subscribe();

		event_bus
			.publish(MintEvent::StatusChanged("first".into()))
			.unwrap();
		let mut late = event_bus.subscribe();
		event_bus
			.publish(MintEvent::StatusChanged("second".into()))
			.unwrap();

		assert_eq!(
			early.recv().await.unwrap(),
			MintEvent::StatusChanged("first".into())
		);
		assert_eq!(
			early.recv().await.unwrap(),
			MintEvent::StatusChanged("second".into())
		);
		assert_eq!(
			late.recv().await.unwrap(),
			MintEvent::StatusChanged("second".into())
		);
	}

	#[tokio::test]
	async fn test_cloned_event_bus_shares_channel() {
		let event_bus1 = EventBus::new(10);
		let event_bus2 = event_bus1.clone();
		let mut receiver = event_bus1.subscribe();

		event_bus2
			.publish(MintEvent::PhaseChanged(MintPhase::Validating))
			.unwrap();

		assert_eq!(
			receiver.recv().await.unwrap(),
			MintEvent::PhaseChanged(MintPhase::Validating)
		);
		assert_eq!(event_bus2.sender.receiver_count(), 1);
	}
}
