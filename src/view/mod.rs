use crate::binder::MediaBinder;
use crate::media::ImageStore;
use crate::reactor::{BinderEvent, Event, SourceInput, TransportEvent};
use crate::settings::Settings;
use crate::transport::Transport;
use eframe::egui;

pub mod layout;

use layout::{SURFACE_ASPECT, cover_uv, format_clock};

const ACCENT: egui::Color32 = egui::Color32::from_rgb(0x4b, 0x2e, 0x83);
const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(0xf0, 0xf0, 0xf0);

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];
const MEDIA_EXTENSIONS: [&str; 12] = [
	"mp3", "wav", "flac", "aac", "m4a", "oga", "opus", "mp4", "m4v", "webm", "ogg", "mov",
];

/// Which input group a widget belongs to
#[derive(Clone, Copy)]
enum InputGroup {
	Image,
	Media,
}

impl InputGroup {
	fn event(self, input: SourceInput) -> Event {
		match self {
			InputGroup::Image => Event::Binder(BinderEvent::ImageInput(input)),
			InputGroup::Media => Event::Binder(BinderEvent::MediaInput(input)),
		}
	}
}

pub struct ViewManager {
	image_url: String,
	media_url: String,
}

impl ViewManager {
	pub fn new() -> Self {
		Self {
			image_url: String::new(),
			media_url: String::new(),
		}
	}

	/// Reflect an input submitted outside the UI in the matching text field
	pub fn mirror_input(&mut self, event: &BinderEvent) {
		match event {
			BinderEvent::ImageInput(SourceInput::Url(url)) => self.image_url = url.clone(),
			BinderEvent::MediaInput(SourceInput::Url(url)) => self.media_url = url.clone(),
			_ => {}
		}
	}

	/// Main render function of the whole thing
	pub fn render(
		&mut self,
		ctx: &egui::Context,
		binder: &MediaBinder,
		images: &ImageStore,
		transport: &Transport,
		settings: &Settings,
	) -> Vec<Event> {
		let mut events = Vec::new();
		let surface_visible = binder.image().is_some() && binder.media().is_some();

		let is_typing = ctx.memory(|m| m.focused().is_some());
		if surface_visible && !is_typing && ctx.input(|i| i.key_pressed(egui::Key::Space)) {
			events.push(Event::Transport(TransportEvent::Toggle));
		}

		egui::CentralPanel::default()
			.frame(egui::Frame::none().fill(BACKGROUND).inner_margin(20.0))
			.show(ctx, |ui| {
				egui::ScrollArea::vertical().show(ui, |ui| {
					ui.vertical_centered(|ui| {
						self.render_header(ui, settings);
						self.render_input_group(ui, InputGroup::Image, &mut events);
						self.render_input_group(ui, InputGroup::Media, &mut events);

						if surface_visible {
							self.render_surface(ui, images, transport, settings, &mut events);
						}

						self.render_footer(ui, settings);
					});
				});
			});

		events
	}

	fn render_header(&self, ui: &mut egui::Ui, settings: &Settings) {
		ui.label(
			egui::RichText::new(&settings.title)
				.size(32.0)
				.color(ACCENT),
		);
		ui.label(
			egui::RichText::new(&settings.subtitle)
				.size(18.0)
				.italics()
				.color(ACCENT),
		);
		ui.add_space(30.0);
	}

	fn render_input_group(&mut self, ui: &mut egui::Ui, group: InputGroup, events: &mut Vec<Event>) {
		let (label, hint, buffer) = match group {
			InputGroup::Image => ("Image URL or Upload:", "Image URL", &mut self.image_url),
			InputGroup::Media => (
				"Audio/Video URL or Upload:",
				"Audio/Video URL",
				&mut self.media_url,
			),
		};

		ui.label(label);
		ui.horizontal(|ui| {
			let response = ui.add(
				egui::TextEdit::singleline(buffer)
					.hint_text(hint)
					.desired_width(320.0),
			);
			if response.changed() {
				events.push(group.event(SourceInput::Url(buffer.clone())));
			}

			if ui.button("Browse…").clicked() {
				if let Some(path) = pick_file(group) {
					events.push(group.event(SourceInput::File(path)));
				}
			}
		});
		ui.add_space(20.0);
	}

	fn render_surface(
		&self,
		ui: &mut egui::Ui,
		images: &ImageStore,
		transport: &Transport,
		settings: &Settings,
		events: &mut Vec<Event>,
	) {
		egui::Frame::none()
			.fill(ACCENT)
			.inner_margin(20.0)
			.rounding(8.0)
			.show(ui, |ui| {
				ui.vertical_centered(|ui| {
					let width = ui.available_width();
					let box_size = egui::vec2(width, width / SURFACE_ASPECT);

					if image_surface(ui, images, box_size).clicked() {
						events.push(Event::Transport(TransportEvent::Toggle));
					}

					ui.add_space(15.0);
					ui.label(
						egui::RichText::new(&settings.caption)
							.size(18.0)
							.color(egui::Color32::WHITE),
					);
					ui.add_space(10.0);

					let position = transport.position();
					let mut elapsed = position.elapsed;
					ui.spacing_mut().slider_width = width * 0.8;
					let slider = ui.add(
						egui::Slider::new(&mut elapsed, 0.0..=position.duration).show_value(false),
					);
					if slider.changed() {
						events.push(Event::Transport(TransportEvent::Seek { position: elapsed }));
					}
					ui.label(
						egui::RichText::new(format!(
							"{} / {}",
							format_clock(position.elapsed),
							format_clock(position.duration)
						))
						.monospace()
						.color(egui::Color32::LIGHT_GRAY),
					);
				});
			});
	}

	fn render_footer(&self, ui: &mut egui::Ui, settings: &Settings) {
		ui.add_space(20.0);
		ui.label(
			egui::RichText::new(&settings.footer)
				.size(16.0)
				.color(ACCENT),
		);
	}
}

impl Default for ViewManager {
	fn default() -> Self {
		Self::new()
	}
}

/// The bound image cropped to cover `size`, or a same-sized placeholder.
/// Either one toggles playback when clicked.
fn image_surface(ui: &mut egui::Ui, images: &ImageStore, size: egui::Vec2) -> egui::Response {
	let response = match images.texture() {
		Some(texture) => ui.add(
			egui::Image::new(texture)
				.uv(cover_uv(texture.size_vec2(), size))
				.fit_to_exact_size(size)
				.rounding(20.0)
				.sense(egui::Sense::click()),
		),
		None => {
			let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());
			if images.is_loading() {
				ui.put(rect, egui::Spinner::new().size(32.0));
			}
			response
		}
	};
	response.on_hover_cursor(egui::CursorIcon::PointingHand)
}

fn pick_file(group: InputGroup) -> Option<std::path::PathBuf> {
	let dialog = rfd::FileDialog::new();
	let dialog = match group {
		InputGroup::Image => dialog.add_filter("Images", &IMAGE_EXTENSIONS),
		InputGroup::Media => dialog.add_filter("Audio and video", &MEDIA_EXTENSIONS),
	};
	let picked = dialog.pick_file();
	if let Some(path) = &picked {
		log::debug!("Picked file: {}", path.display());
	}
	picked
}
