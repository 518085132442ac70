use crate::types::{ImageSource, MediaSource};
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub enum Event {
	Binder(BinderEvent),
	Transport(TransportEvent),
	Surface(SurfaceEvent),
}

impl Event {
	pub fn priority(&self) -> Priority {
		match self {
			Event::Binder(_) => Priority::High,
			Event::Transport(TransportEvent::PositionChanged) => Priority::Low,
			Event::Transport(_) => Priority::High,
			Event::Surface(_) => Priority::Normal,
		}
	}
}

/// Dispatch order; variants declared first are served first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
	High,
	Normal,
	Low,
}

/// What the user handed to one of the two input groups
#[derive(Clone, Debug, PartialEq)]
pub enum SourceInput {
	Url(String),
	File(PathBuf),
}

#[derive(Clone, Debug)]
pub enum BinderEvent {
	ImageInput(SourceInput),
	MediaInput(SourceInput),
}

#[derive(Clone, Debug)]
pub enum TransportEvent {
	Toggle,
	Seek { position: f64 },
	/// Progress notification from the mounted element
	PositionChanged,
}

#[derive(Clone, Debug)]
pub enum SurfaceEvent {
	ImageBound { source: Option<ImageSource> },
	MediaBound { source: Option<MediaSource> },
	ImageReady,
}

/// Response from component.handle()
#[derive(Default)]
pub struct ComponentResponse {
	/// Events to dispatch immediately
	pub events: Vec<Event>,
}

impl ComponentResponse {
	pub fn none() -> Self {
		Self::default()
	}

	pub fn emit(event: Event) -> Self {
		Self {
			events: vec![event],
		}
	}

	pub fn emit_many(events: Vec<Event>) -> Self {
		Self { events }
	}
}
