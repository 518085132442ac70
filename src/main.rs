#![windows_subsystem = "windows"]

mod binder;
mod media;
mod reactor;
mod settings;
mod transport;
mod types;
mod view;

use binder::FsReader;
use clap::Parser;
use media::RodioMounter;
use reactor::{BinderEvent, Reactor, SourceInput};
use settings::Settings;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(version, about = "Play audio or video behind a still image")]
struct Cli {
	/// Settings file to use instead of the per-user one
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// Image URL or path to bind on startup
	#[arg(long)]
	image: Option<String>,

	/// Audio/video URL or path to bind on startup
	#[arg(long)]
	media: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let args = Cli::parse();
	let settings = Settings::load(args.config.as_deref())?;

	let native_options = eframe::NativeOptions {
		viewport: eframe::egui::ViewportBuilder::default()
			.with_title(settings.title.clone())
			.with_inner_size(settings.window_size),
		..Default::default()
	};

	let title = settings.title.clone();
	eframe::run_native(
		&title,
		native_options,
		Box::new(move |cc| {
			let mounter = RodioMounter::new(settings.volume);
			let mut reactor =
				Reactor::new(&cc.egui_ctx, settings, Arc::new(FsReader), Box::new(mounter));
			if let Some(image) = args.image {
				reactor.submit(BinderEvent::ImageInput(SourceInput::Url(image)));
			}
			if let Some(media) = args.media {
				reactor.submit(BinderEvent::MediaInput(SourceInput::Url(media)));
			}
			Ok(Box::new(reactor))
		}),
	)
	.map_err(|e| anyhow::anyhow!("UI failed: {e}"))
}
