use super::event::{Event, Priority};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Pending events, served by priority and then in arrival order.
///
/// The heap is keyed on `(priority, arrival)` so a progress notification
/// queued before a click is still dispatched after it.
#[derive(Default)]
pub struct EventQueue {
	pending: BinaryHeap<Pending>,
	arrivals: u64,
}

struct Pending {
	key: Reverse<(Priority, u64)>,
	event: Event,
}

impl PartialEq for Pending {
	fn eq(&self, other: &Self) -> bool {
		self.key == other.key
	}
}

impl Eq for Pending {}

impl PartialOrd for Pending {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Pending {
	fn cmp(&self, other: &Self) -> Ordering {
		self.key.cmp(&other.key)
	}
}

impl EventQueue {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, event: Event) {
		let arrival = self.arrivals;
		self.arrivals += 1;
		self.pending.push(Pending {
			key: Reverse((event.priority(), arrival)),
			event,
		});
	}

	pub fn pop(&mut self) -> Option<Event> {
		self.pending.pop().map(|pending| pending.event)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::reactor::event::{BinderEvent, SourceInput, SurfaceEvent, TransportEvent};

	fn drain(queue: &mut EventQueue) -> Vec<Event> {
		std::iter::from_fn(|| queue.pop()).collect()
	}

	#[test]
	fn user_input_is_served_before_notifications() {
		// given
		let mut queue = EventQueue::new();
		queue.push(Event::Transport(TransportEvent::PositionChanged));
		queue.push(Event::Surface(SurfaceEvent::ImageReady));
		queue.push(Event::Binder(BinderEvent::MediaInput(SourceInput::Url(
			"talk.mp4".into(),
		))));

		// when
		let order = drain(&mut queue);

		// then
		assert!(matches!(order[0], Event::Binder(_)));
		assert!(matches!(order[1], Event::Surface(SurfaceEvent::ImageReady)));
		assert!(matches!(
			order[2],
			Event::Transport(TransportEvent::PositionChanged)
		));
		assert!(queue.pop().is_none());
	}

	#[test]
	fn equal_priority_events_keep_arrival_order() {
		// given
		let mut queue = EventQueue::new();
		for position in [3.0, 1.0, 2.0] {
			queue.push(Event::Transport(TransportEvent::Seek { position }));
		}
		queue.push(Event::Transport(TransportEvent::Toggle));

		// when
		let order = drain(&mut queue);

		// then
		let positions: Vec<f64> = order
			.iter()
			.filter_map(|event| match event {
				Event::Transport(TransportEvent::Seek { position }) => Some(*position),
				_ => None,
			})
			.collect();
		assert_eq!(positions, vec![3.0, 1.0, 2.0]);
		assert_eq!(order.len(), 4);
	}
}
