use crate::reactor::{BinderEvent, ComponentResponse, Event, SourceInput, SurfaceEvent};
use crate::types::{ImageSource, MediaSource, describe_source};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

pub mod classify;
pub mod embed;

pub use classify::{kind_from_mime, kind_from_url};
pub use embed::{EmbeddedFile, FileReader, FsReader};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
	Image,
	Media,
}

/// Completion of a file read spawned on the blocking pool
struct ReadMessage {
	slot: Slot,
	generation: u64,
	path: PathBuf,
	result: anyhow::Result<EmbeddedFile>,
}

/// Resolves user input into the current image and media bindings.
///
/// Every input bumps the generation of its slot; reads that complete for an
/// older generation are dropped, so the latest input always wins.
pub struct MediaBinder {
	reader: Arc<dyn FileReader>,
	sender: mpsc::UnboundedSender<ReadMessage>,
	receiver: mpsc::UnboundedReceiver<ReadMessage>,
	image: Option<ImageSource>,
	media: Option<MediaSource>,
	image_generation: u64,
	media_generation: u64,
	pending_reads: usize,
}

impl MediaBinder {
	pub fn new(reader: Arc<dyn FileReader>) -> Self {
		log::info!("[Binder] Initializing");
		let (sender, receiver) = mpsc::unbounded_channel();
		Self {
			reader,
			sender,
			receiver,
			image: None,
			media: None,
			image_generation: 0,
			media_generation: 0,
			pending_reads: 0,
		}
	}

	pub fn handle(&mut self, event: &Event) -> ComponentResponse {
		match event {
			Event::Binder(BinderEvent::ImageInput(input)) => self.bind_image(input),
			Event::Binder(BinderEvent::MediaInput(input)) => self.bind_media(input),
			_ => ComponentResponse::none(),
		}
	}

	pub fn poll(&mut self) -> ComponentResponse {
		let mut responses = Vec::new();
		while let Ok(msg) = self.receiver.try_recv() {
			self.pending_reads = self.pending_reads.saturating_sub(1);
			let current = match msg.slot {
				Slot::Image => self.image_generation,
				Slot::Media => self.media_generation,
			};
			if msg.generation != current {
				log::debug!(
					"[Binder] Discarding superseded read of {}",
					msg.path.display()
				);
				continue;
			}

			let embedded = match msg.result {
				Ok(embedded) => embedded,
				Err(e) => {
					log::warn!("[Binder] Read failed: {:#}", e);
					continue;
				}
			};
			log::info!(
				"[Binder] Read complete: {} ({})",
				msg.path.display(),
				embedded.mime
			);

			match msg.slot {
				Slot::Image => {
					self.image = Some(ImageSource(embedded.data_uri));
					responses.push(self.image_bound());
				}
				Slot::Media => {
					let kind = kind_from_mime(&embedded.mime);
					self.media = Some(MediaSource {
						src: embedded.data_uri,
						kind,
					});
					responses.push(self.media_bound());
				}
			}
		}

		if responses.is_empty() {
			ComponentResponse::none()
		} else {
			ComponentResponse::emit_many(responses)
		}
	}

	fn bind_image(&mut self, input: &SourceInput) -> ComponentResponse {
		self.image_generation += 1;
		match input {
			SourceInput::Url(url) => {
				log::debug!("[Binder] Image URL: {}", describe_source(url));
				self.image = non_empty(url).map(ImageSource);
				ComponentResponse::emit(self.image_bound())
			}
			SourceInput::File(path) => {
				self.spawn_read(Slot::Image, self.image_generation, path.clone());
				ComponentResponse::none()
			}
		}
	}

	fn bind_media(&mut self, input: &SourceInput) -> ComponentResponse {
		self.media_generation += 1;
		match input {
			SourceInput::Url(url) => {
				let kind = kind_from_url(url);
				log::debug!(
					"[Binder] Media URL: {} ({})",
					describe_source(url),
					kind.label()
				);
				self.media = non_empty(url).map(|src| MediaSource { src, kind });
				ComponentResponse::emit(self.media_bound())
			}
			SourceInput::File(path) => {
				self.spawn_read(Slot::Media, self.media_generation, path.clone());
				ComponentResponse::none()
			}
		}
	}

	fn spawn_read(&mut self, slot: Slot, generation: u64, path: PathBuf) {
		log::info!("[Binder] Reading {:?} file: {}", slot, path.display());
		self.pending_reads += 1;
		let reader = self.reader.clone();
		let sender = self.sender.clone();

		tokio::task::spawn_blocking(move || {
			let result = reader.read_embedded(&path);
			let _ = sender.send(ReadMessage {
				slot,
				generation,
				path,
				result,
			});
		});
	}

	fn image_bound(&self) -> Event {
		Event::Surface(SurfaceEvent::ImageBound {
			source: self.image.clone(),
		})
	}

	fn media_bound(&self) -> Event {
		Event::Surface(SurfaceEvent::MediaBound {
			source: self.media.clone(),
		})
	}

	pub fn image(&self) -> Option<&ImageSource> {
		self.image.as_ref()
	}

	pub fn media(&self) -> Option<&MediaSource> {
		self.media.as_ref()
	}

	pub fn pending_reads(&self) -> usize {
		self.pending_reads
	}
}

fn non_empty(value: &str) -> Option<String> {
	if value.is_empty() {
		None
	} else {
		Some(value.to_owned())
	}
}
