use crate::reactor::{ComponentResponse, Event, SurfaceEvent};
use crate::types::{ImageSource, describe_source};
use eframe::egui;
use tokio::sync::mpsc;

pub mod element;
pub mod fetch;

pub use element::RodioMounter;

pub enum ImageMessage {
	Loaded {
		generation: u64,
		result: Result<egui::ColorImage, String>,
	},
}

/// Texture for the currently bound image source
pub struct ImageStore {
	texture: Option<egui::TextureHandle>,
	current: Option<ImageSource>,
	generation: u64,
	loading: bool,
	sender: mpsc::Sender<ImageMessage>,
	receiver: mpsc::Receiver<ImageMessage>,
	egui_ctx: egui::Context,
}

impl ImageStore {
	pub fn new(ctx: &egui::Context) -> Self {
		log::info!("[Images] Initializing");
		let (sender, receiver) = mpsc::channel(16);
		Self {
			texture: None,
			current: None,
			generation: 0,
			loading: false,
			sender,
			receiver,
			egui_ctx: ctx.clone(),
		}
	}

	pub fn poll(&mut self) -> ComponentResponse {
		let mut responses = Vec::new();
		while let Ok(msg) = self.receiver.try_recv() {
			match msg {
				ImageMessage::Loaded { generation, result } => {
					if generation != self.generation {
						log::debug!("[Images] Dropping stale image (generation {})", generation);
						continue;
					}
					self.loading = false;
					match result {
						Ok(color_image) => {
							log::info!(
								"[Images] Image ready: {}x{}",
								color_image.size[0],
								color_image.size[1]
							);
							self.texture = Some(self.egui_ctx.load_texture(
								"bound_image",
								color_image,
								egui::TextureOptions::LINEAR,
							));
							responses.push(Event::Surface(SurfaceEvent::ImageReady));
						}
						Err(error) => {
							log::warn!("[Images] Image load failed: {}", error);
						}
					}
				}
			}
		}

		if responses.is_empty() {
			ComponentResponse::none()
		} else {
			ComponentResponse::emit_many(responses)
		}
	}

	pub fn handle(&mut self, event: &Event) -> ComponentResponse {
		if let Event::Surface(SurfaceEvent::ImageBound { source }) = event {
			if self.current.as_ref() == source.as_ref() && (self.texture.is_some() || self.loading)
			{
				return ComponentResponse::none();
			}
			self.generation += 1;
			self.texture = None;
			self.current = source.clone();
			self.loading = false;
			if let Some(source) = source {
				self.spawn_image_load(source.as_str().to_owned());
			}
		}
		ComponentResponse::none()
	}

	fn spawn_image_load(&mut self, src: String) {
		log::debug!("[Images] Spawning image load: {}", describe_source(&src));
		self.loading = true;
		let generation = self.generation;
		let sender = self.sender.clone();
		let ctx = self.egui_ctx.clone();

		tokio::spawn(async move {
			let result = async {
				let bytes = fetch::load_bytes(&src).await?;
				let img = image::load_from_memory(&bytes)?;
				let size = [img.width() as usize, img.height() as usize];
				let img_buffer = img.to_rgba8();
				let pixels = img_buffer.as_flat_samples();
				let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
				Ok::<_, anyhow::Error>(color_image)
			}
			.await;

			let _ = sender
				.send(ImageMessage::Loaded {
					generation,
					result: result.map_err(|e| e.to_string()),
				})
				.await;
			ctx.request_repaint();
		});
	}

	pub fn texture(&self) -> Option<&egui::TextureHandle> {
		self.texture.as_ref()
	}

	pub fn is_loading(&self) -> bool {
		self.loading
	}
}
