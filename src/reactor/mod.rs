pub mod event;
pub mod queue;

pub use event::{
	BinderEvent, ComponentResponse, Event, SourceInput, SurfaceEvent, TransportEvent,
};
pub use queue::EventQueue;

use crate::binder::{FileReader, MediaBinder};
use crate::media::ImageStore;
use crate::settings::Settings;
use crate::transport::{ElementMounter, Transport};
use crate::types::TransportState;
use crate::view::ViewManager;
use eframe::egui;
use std::sync::Arc;
use std::time::Duration;

pub struct Reactor {
	queue: EventQueue,
	mounter: Box<dyn ElementMounter>,
	notify_interval: Duration,

	pub binder: MediaBinder,
	pub images: ImageStore,
	pub transport: Transport,
	pub view: ViewManager,
	pub settings: Settings,
}

impl Reactor {
	pub fn new(
		ctx: &egui::Context,
		settings: Settings,
		reader: Arc<dyn FileReader>,
		mounter: Box<dyn ElementMounter>,
	) -> Self {
		log::info!("Initializing all components");
		Self {
			queue: EventQueue::new(),
			mounter,
			notify_interval: Duration::from_millis(settings.notify_interval_ms),
			binder: MediaBinder::new(reader),
			images: ImageStore::new(ctx),
			transport: Transport::new(),
			view: ViewManager::new(),
			settings,
		}
	}

	/// Queue an input as if it had been typed into one of the input groups
	pub fn submit(&mut self, event: BinderEvent) {
		self.view.mirror_input(&event);
		self.queue.push(Event::Binder(event));
	}

	fn process_response(&mut self, response: ComponentResponse) {
		for e in response.events {
			self.queue.push(e);
		}
	}

	/// Poll async components and drain the event queue
	pub fn process(&mut self) {
		let binder_response = self.binder.poll();
		let images_response = self.images.poll();
		let transport_response = self.transport.poll();
		self.process_response(binder_response);
		self.process_response(images_response);
		self.process_response(transport_response);

		let mut iterations = 0;
		while let Some(event) = self.queue.pop() {
			log::trace!("Processing event: {:?}", event);
			let response = self.route(&event);
			self.process_response(response);

			iterations += 1;
			if iterations > 1000 {
				log::warn!("Event loop exceeded 1000 iterations, breaking");
				break;
			}
		}
	}

	pub fn tick(&mut self, ctx: &egui::Context) {
		self.process();

		let events = self
			.view
			.render(ctx, &self.binder, &self.images, &self.transport, &self.settings);

		// Process any events from rendering immediately
		for event in events {
			log::trace!("Processing render event: {:?}", event);
			let response = self.route(&event);
			self.process_response(response);
		}

		if self.transport.state() == TransportState::Playing || self.binder.pending_reads() > 0 {
			ctx.request_repaint_after(self.notify_interval);
		}
	}

	fn route(&mut self, event: &Event) -> ComponentResponse {
		match event {
			Event::Binder(_) => self.binder.handle(event),
			Event::Transport(_) => self.transport.handle(event),
			Event::Surface(SurfaceEvent::ImageBound { .. }) => {
				let response = self.images.handle(event);
				self.sync_mount();
				response
			}
			Event::Surface(SurfaceEvent::MediaBound { .. }) => {
				self.sync_mount();
				ComponentResponse::none()
			}
			Event::Surface(SurfaceEvent::ImageReady) => ComponentResponse::none(),
		}
	}

	/// Mount an element iff both sources are bound; remount when the media source changes.
	fn sync_mount(&mut self) {
		match (self.binder.image(), self.binder.media()) {
			(Some(_), Some(media)) => {
				if self.transport.mounted_source() != Some(media) {
					let element = self.mounter.mount(media);
					self.transport.bind(media.clone(), element);
				}
			}
			_ => {
				if self.transport.is_bound() {
					self.transport.unbind();
				}
			}
		}
	}
}

impl eframe::App for Reactor {
	fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
		self.tick(ctx);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::binder::FsReader;
	use crate::transport::MediaElement;
	use crate::transport::tests::{FakeElement, FakeState};
	use crate::types::{MediaKind, MediaSource};
	use std::cell::RefCell;
	use std::rc::Rc;

	/// Hands out fake elements with a fixed duration and remembers what it mounted
	#[derive(Clone, Default)]
	struct FakeMounter {
		mounted: Rc<RefCell<Vec<(MediaSource, Rc<RefCell<FakeState>>)>>>,
	}

	impl ElementMounter for FakeMounter {
		fn mount(&mut self, source: &MediaSource) -> Box<dyn MediaElement> {
			let (element, state) = FakeElement::new(1834.5);
			self.mounted.borrow_mut().push((source.clone(), state));
			Box::new(element)
		}
	}

	fn reactor(mounter: &FakeMounter) -> Reactor {
		Reactor::new(
			&egui::Context::default(),
			Settings::default(),
			Arc::new(FsReader),
			Box::new(mounter.clone()),
		)
	}

	fn url(value: &str) -> SourceInput {
		SourceInput::Url(value.to_owned())
	}

	#[tokio::test]
	async fn image_and_video_url_mount_a_video_element() {
		// given
		let mounter = FakeMounter::default();
		let mut reactor = reactor(&mounter);

		// when
		reactor.submit(BinderEvent::ImageInput(url("pic.jpg")));
		reactor.submit(BinderEvent::MediaInput(url("talk.mp4")));
		reactor.process();

		// then
		assert_eq!(reactor.transport.mounted_source().map(|s| s.kind), Some(MediaKind::Video));
		assert_eq!(reactor.transport.state(), TransportState::Paused);
		assert_eq!(mounter.mounted.borrow().len(), 1);

		// when the image is clicked
		reactor.queue.push(Event::Transport(TransportEvent::Toggle));
		reactor.process();
		reactor.process();

		// then
		assert_eq!(reactor.transport.state(), TransportState::Playing);
		assert!(!mounter.mounted.borrow()[0].1.borrow().paused);
		assert_eq!(reactor.transport.position().duration, 1834.5);
	}

	#[tokio::test]
	async fn media_alone_does_not_mount() {
		let mounter = FakeMounter::default();
		let mut reactor = reactor(&mounter);

		reactor.submit(BinderEvent::MediaInput(url("song.mp3")));
		reactor.process();

		assert!(!reactor.transport.is_bound());
		assert_eq!(reactor.transport.state(), TransportState::Unbound);
		reactor.queue.push(Event::Transport(TransportEvent::Toggle));
		reactor.process();
		assert_eq!(reactor.transport.state(), TransportState::Unbound);
	}

	#[tokio::test]
	async fn changing_media_remounts_and_clearing_image_unmounts() {
		// given
		let mounter = FakeMounter::default();
		let mut reactor = reactor(&mounter);
		reactor.submit(BinderEvent::ImageInput(url("pic.jpg")));
		reactor.submit(BinderEvent::MediaInput(url("talk.mp4")));
		reactor.process();

		// when
		reactor.submit(BinderEvent::MediaInput(url("song.mp3")));
		reactor.process();

		// then
		assert_eq!(reactor.transport.mounted_source().map(|s| s.kind), Some(MediaKind::Audio));
		assert_eq!(mounter.mounted.borrow().len(), 2);

		// when
		reactor.submit(BinderEvent::ImageInput(url("")));
		reactor.process();

		// then
		assert!(!reactor.transport.is_bound());
	}

	#[tokio::test]
	async fn rebinding_the_same_image_keeps_the_element() {
		let mounter = FakeMounter::default();
		let mut reactor = reactor(&mounter);
		reactor.submit(BinderEvent::ImageInput(url("pic.jpg")));
		reactor.submit(BinderEvent::MediaInput(url("talk.mp4")));
		reactor.process();

		reactor.submit(BinderEvent::ImageInput(url("other.png")));
		reactor.process();

		assert_eq!(mounter.mounted.borrow().len(), 1);
		assert!(reactor.transport.is_bound());
	}
}
