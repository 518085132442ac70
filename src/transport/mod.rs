use crate::reactor::{ComponentResponse, Event, TransportEvent};
use crate::types::{MediaSource, PlaybackPosition, TransportState, describe_source};

/// Host playback capability the transport drives.
///
/// Implementations are expected to clamp `set_position` into `[0, duration]`
/// and report `is_paused` once playback reaches the end.
pub trait MediaElement {
	fn play(&mut self);
	fn pause(&mut self);
	fn is_paused(&self) -> bool;
	/// Elapsed time in seconds
	fn position(&self) -> f64;
	fn set_position(&mut self, seconds: f64);
	/// Total time in seconds, 0 until known
	fn duration(&self) -> f64;
}

/// Creates the hidden element for a bound media source
pub trait ElementMounter {
	fn mount(&mut self, source: &MediaSource) -> Box<dyn MediaElement>;
}

struct Mounted {
	source: MediaSource,
	element: Box<dyn MediaElement>,
}

pub struct Transport {
	mounted: Option<Mounted>,
	state: TransportState,
	position: PlaybackPosition,
}

impl Transport {
	pub fn new() -> Self {
		Self {
			mounted: None,
			state: TransportState::Unbound,
			position: PlaybackPosition::default(),
		}
	}

	pub fn handle(&mut self, event: &Event) -> ComponentResponse {
		match event {
			Event::Transport(TransportEvent::Toggle) => {
				self.toggle();
			}
			Event::Transport(TransportEvent::Seek { position }) => {
				self.seek(*position);
			}
			Event::Transport(TransportEvent::PositionChanged) => {
				self.on_position_changed();
			}
			_ => {}
		}
		ComponentResponse::none()
	}

	/// Emits a progress notification while the element has something new to report.
	pub fn poll(&self) -> ComponentResponse {
		let Some(mounted) = &self.mounted else {
			return ComponentResponse::none();
		};
		let element = &mounted.element;
		let playing = !element.is_paused();
		let state_drifted = Self::state_of(&**element) != self.state;
		let duration_changed = element.duration() != self.position.duration;

		if playing || state_drifted || duration_changed {
			ComponentResponse::emit(Event::Transport(TransportEvent::PositionChanged))
		} else {
			ComponentResponse::none()
		}
	}

	pub fn bind(&mut self, source: MediaSource, element: Box<dyn MediaElement>) {
		log::info!(
			"[Transport] Mounting {} element for {}",
			source.kind.label(),
			describe_source(&source.src)
		);
		self.mounted = Some(Mounted { source, element });
		self.state = TransportState::Paused;
		self.position = PlaybackPosition::default();
	}

	pub fn unbind(&mut self) {
		if self.mounted.take().is_some() {
			log::info!("[Transport] Unmounted element");
		}
		self.state = TransportState::Unbound;
		self.position = PlaybackPosition::default();
	}

	pub fn toggle(&mut self) -> TransportState {
		let Some(mounted) = self.mounted.as_mut() else {
			log::debug!("[Transport] Toggle ignored, nothing bound");
			return TransportState::Unbound;
		};

		let element = &mut mounted.element;
		if element.is_paused() {
			element.play();
		} else {
			element.pause();
		}
		self.state = Self::state_of(&**element);
		log::debug!("[Transport] Toggled to {:?}", self.state);
		self.state
	}

	pub fn on_position_changed(&mut self) {
		let Some(mounted) = &self.mounted else {
			return;
		};
		let element = &mounted.element;
		self.position = PlaybackPosition {
			elapsed: element.position(),
			duration: element.duration(),
		};
		self.state = Self::state_of(&**element);
	}

	/// Write a new elapsed time, then mirror whatever the element accepted.
	pub fn seek(&mut self, value: f64) {
		let Some(mounted) = self.mounted.as_mut() else {
			return;
		};
		mounted.element.set_position(value);
		self.position.elapsed = mounted.element.position();
		log::trace!(
			"[Transport] Seek to {:.2}s, accepted {:.2}s",
			value,
			self.position.elapsed
		);
	}

	fn state_of(element: &dyn MediaElement) -> TransportState {
		if element.is_paused() {
			TransportState::Paused
		} else {
			TransportState::Playing
		}
	}

	pub fn state(&self) -> TransportState {
		self.state
	}

	pub fn position(&self) -> PlaybackPosition {
		self.position
	}

	pub fn is_bound(&self) -> bool {
		self.mounted.is_some()
	}

	pub fn mounted_source(&self) -> Option<&MediaSource> {
		self.mounted.as_ref().map(|m| &m.source)
	}
}

impl Default for Transport {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;
	use crate::types::MediaKind;
	use std::cell::RefCell;
	use std::rc::Rc;

	/// Observable state of a [`FakeElement`], shared with the test body
	#[derive(Debug, Default)]
	pub struct FakeState {
		pub paused: bool,
		pub position: f64,
		pub duration: f64,
	}

	pub struct FakeElement(pub Rc<RefCell<FakeState>>);

	impl FakeElement {
		pub fn new(duration: f64) -> (Self, Rc<RefCell<FakeState>>) {
			let state = Rc::new(RefCell::new(FakeState {
				paused: true,
				position: 0.0,
				duration,
			}));
			(Self(state.clone()), state)
		}
	}

	impl MediaElement for FakeElement {
		fn play(&mut self) {
			self.0.borrow_mut().paused = false;
		}

		fn pause(&mut self) {
			self.0.borrow_mut().paused = true;
		}

		fn is_paused(&self) -> bool {
			self.0.borrow().paused
		}

		fn position(&self) -> f64 {
			self.0.borrow().position
		}

		fn set_position(&mut self, seconds: f64) {
			let mut state = self.0.borrow_mut();
			state.position = PlaybackPosition::clamp(seconds, state.duration);
		}

		fn duration(&self) -> f64 {
			self.0.borrow().duration
		}
	}

	fn source(src: &str, kind: MediaKind) -> MediaSource {
		MediaSource {
			src: src.into(),
			kind,
		}
	}

	fn bound_transport(duration: f64) -> (Transport, Rc<RefCell<FakeState>>) {
		let mut transport = Transport::new();
		let (element, state) = FakeElement::new(duration);
		transport.bind(source("talk.mp4", MediaKind::Video), Box::new(element));
		(transport, state)
	}

	#[test]
	fn toggle_without_binding_is_a_no_op() {
		let mut transport = Transport::new();

		assert_eq!(transport.toggle(), TransportState::Unbound);
		assert_eq!(transport.state(), TransportState::Unbound);
	}

	#[test]
	fn binding_enters_paused() {
		let (transport, _) = bound_transport(60.0);

		assert_eq!(transport.state(), TransportState::Paused);
		assert_eq!(
			transport.mounted_source().map(|s| s.kind),
			Some(MediaKind::Video)
		);
	}

	#[test]
	fn two_toggles_restore_original_state() {
		// given
		let (mut transport, state) = bound_transport(60.0);

		// when
		let first = transport.toggle();
		let second = transport.toggle();

		// then
		assert_eq!(first, TransportState::Playing);
		assert_eq!(second, TransportState::Paused);
		assert!(state.borrow().paused);

		// when starting from playing
		state.borrow_mut().paused = false;
		transport.on_position_changed();
		transport.toggle();
		transport.toggle();

		// then
		assert_eq!(transport.state(), TransportState::Playing);
	}

	#[test]
	fn seek_mirrors_clamped_position() {
		// given
		let (mut transport, _) = bound_transport(90.0);

		// when / then
		transport.seek(-12.0);
		assert_eq!(transport.position().elapsed, 0.0);

		transport.seek(30.5);
		assert_eq!(transport.position().elapsed, 30.5);

		transport.seek(1000.0);
		assert_eq!(transport.position().elapsed, 90.0);
	}

	#[test]
	fn position_notifications_copy_element_state() {
		// given
		let (mut transport, state) = bound_transport(0.0);
		{
			let mut state = state.borrow_mut();
			state.duration = 245.0;
			state.position = 12.25;
			state.paused = false;
		}

		// when
		transport.on_position_changed();

		// then
		assert_eq!(
			transport.position(),
			PlaybackPosition {
				elapsed: 12.25,
				duration: 245.0
			}
		);
		assert_eq!(transport.state(), TransportState::Playing);
	}

	#[test]
	fn end_of_media_is_picked_up_by_poll() {
		// given
		let (mut transport, state) = bound_transport(10.0);
		transport.toggle();
		transport.on_position_changed();
		assert_eq!(transport.poll().events.len(), 1);

		// when
		{
			let mut state = state.borrow_mut();
			state.paused = true;
			state.position = 10.0;
		}
		let response = transport.poll();
		for event in &response.events {
			transport.handle(event);
		}

		// then
		assert_eq!(response.events.len(), 1);
		assert_eq!(transport.state(), TransportState::Paused);
		assert_eq!(transport.position().elapsed, 10.0);
		assert!(transport.poll().events.is_empty());
	}

	#[test]
	fn unbind_returns_to_unbound() {
		let (mut transport, _) = bound_transport(10.0);
		transport.toggle();

		transport.unbind();

		assert_eq!(transport.state(), TransportState::Unbound);
		assert!(!transport.is_bound());
		assert_eq!(transport.position(), PlaybackPosition::default());
	}
}
