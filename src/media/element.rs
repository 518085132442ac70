use super::fetch;
use crate::transport::{ElementMounter, MediaElement};
use crate::types::{MediaSource, PlaybackPosition, describe_source};
use parking_lot::Mutex;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use symphonia::core::{
	formats::FormatOptions, io::MediaSourceStream, meta::MetadataOptions, probe::Hint,
};
use tokio::task::JoinHandle;

/// Something that hands out fresh sinks to play into
pub trait SinkOutput: Send + Sync {
	fn new_sink(&self) -> anyhow::Result<Sink>;
}

impl SinkOutput for OutputStreamHandle {
	fn new_sink(&self) -> anyhow::Result<Sink> {
		Ok(Sink::try_new(self)?)
	}
}

/// Default audio output; must stay alive for as long as anything plays
pub struct AudioOutput {
	_stream: OutputStream,
	handle: Arc<dyn SinkOutput>,
}

impl AudioOutput {
	pub fn open() -> anyhow::Result<Self> {
		let (stream, handle) = OutputStream::try_default()?;
		log::info!("[Element] Opened default audio output");
		Ok(Self {
			_stream: stream,
			handle: Arc::new(handle),
		})
	}
}

/// Mounts rodio-backed elements on the default output
pub struct RodioMounter {
	output: Option<AudioOutput>,
	volume: f32,
}

impl RodioMounter {
	pub fn new(volume: f32) -> Self {
		let output = match AudioOutput::open() {
			Ok(output) => Some(output),
			Err(e) => {
				log::warn!("[Element] No audio output available: {}", e);
				None
			}
		};
		Self { output, volume }
	}
}

impl ElementMounter for RodioMounter {
	fn mount(&mut self, source: &MediaSource) -> Box<dyn MediaElement> {
		let output = self.output.as_ref().map(|o| o.handle.clone());
		Box::new(RodioElement::load(source, output, self.volume))
	}
}

/// A seek the sink has applied but not yet reported through `get_pos`
#[derive(Clone, Copy)]
struct Seeked {
	target: f64,
	reported_before: f64,
}

#[derive(Default)]
struct Slot {
	sink: Option<Sink>,
	bytes: Option<Arc<[u8]>>,
	output: Option<Arc<dyn SinkOutput>>,
	volume: f32,
	duration: f64,
	/// Requested play state, applied once the source is decoded
	want_playing: bool,
	pending_seek: Option<f64>,
	seeked: Option<Seeked>,
	/// Source could not be fetched or decoded; the element stays inert
	failed: bool,
}

impl Slot {
	fn ended(&self) -> bool {
		self.sink.as_ref().is_some_and(Sink::empty)
	}

	/// Rebuild the sink from the retained bytes after the previous one drained.
	fn requeue(&mut self) {
		let (Some(output), Some(bytes)) = (&self.output, &self.bytes) else {
			return;
		};
		match open_sink(output.as_ref(), bytes.clone(), self.volume) {
			Ok((sink, _)) => {
				self.sink = Some(sink);
				self.seeked = None;
			}
			Err(e) => log::warn!("[Element] Failed to restart source: {:#}", e),
		}
	}

	/// Seek the live sink and remember the target until the sink reports it.
	fn seek_sink(&mut self, seconds: f64) {
		let Some(sink) = &self.sink else {
			return;
		};
		match sink.try_seek(Duration::from_secs_f64(seconds)) {
			Ok(()) => {
				self.seeked = Some(Seeked {
					target: seconds,
					reported_before: sink.get_pos().as_secs_f64(),
				});
			}
			Err(e) => log::debug!("[Element] Seek to {:.2}s failed: {}", seconds, e),
		}
	}

	fn fail(&mut self) {
		self.failed = true;
		self.want_playing = false;
	}
}

/// Hidden playback element: decodes the audio track of any source, shows nothing.
///
/// Loading happens in the background; until it completes the element is
/// inert and reports paused unless `play()` was already requested. A source
/// that fails to load keeps the element paused for good.
pub struct RodioElement {
	slot: Arc<Mutex<Slot>>,
	task: JoinHandle<()>,
}

impl RodioElement {
	pub fn load(source: &MediaSource, output: Option<Arc<dyn SinkOutput>>, volume: f32) -> Self {
		let slot = Arc::new(Mutex::new(Slot {
			output: output.clone(),
			volume,
			..Default::default()
		}));

		let src = source.src.clone();
		let kind = source.kind;
		let task_slot = slot.clone();
		let task = tokio::spawn(async move {
			let name = describe_source(&src);
			let bytes: Arc<[u8]> = match fetch::load_bytes(&src).await {
				Ok(bytes) => bytes.into(),
				Err(e) => {
					log::warn!("[Element] Failed to load {}: {}", name, e);
					task_slot.lock().fail();
					return;
				}
			};
			let Some(output) = output else {
				log::debug!("[Element] Loaded {} but there is no output", name);
				task_slot.lock().fail();
				return;
			};

			let (sink, duration) = match open_sink(output.as_ref(), bytes.clone(), volume) {
				Ok(opened) => opened,
				Err(e) => {
					log::warn!("[Element] Cannot decode {} as {}: {:#}", name, kind.label(), e);
					task_slot.lock().fail();
					return;
				}
			};

			let mut slot = task_slot.lock();
			slot.duration = duration;
			slot.bytes = Some(bytes);
			slot.sink = Some(sink);
			if let Some(seconds) = slot.pending_seek.take() {
				let seconds = PlaybackPosition::clamp(seconds, slot.duration);
				slot.seek_sink(seconds);
			}
			if slot.want_playing {
				if let Some(sink) = &slot.sink {
					sink.play();
				}
			}
			log::info!("[Element] Ready: {} ({:.1}s)", name, slot.duration);
		});

		Self { slot, task }
	}
}

fn open_sink(output: &dyn SinkOutput, bytes: Arc<[u8]>, volume: f32) -> anyhow::Result<(Sink, f64)> {
	let decoder = Decoder::new(Cursor::new(bytes.clone()))?;
	let duration = container_duration(bytes).unwrap_or_else(|| {
		// the sub-second part rodio reports is unreliable
		decoder
			.total_duration()
			.map(|d| d.as_secs() as f64)
			.unwrap_or_default()
	});
	let sink = output.new_sink()?;
	sink.pause();
	sink.set_volume(volume);
	sink.append(decoder);
	Ok((sink, duration))
}

/// Length of the default track from its frame count, in seconds.
fn container_duration(bytes: Arc<[u8]>) -> Option<f64> {
	let stream = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());
	let opened = symphonia::default::get_probe()
		.format(
			&Hint::new(),
			stream,
			&FormatOptions::default(),
			&MetadataOptions::default(),
		)
		.ok()?;
	let params = &opened.format.default_track()?.codec_params;
	let frames = params.n_frames?;

	match (params.time_base, params.sample_rate) {
		(Some(time_base), _) => {
			let time = time_base.calc_time(frames);
			Some(time.seconds as f64 + time.frac)
		}
		(None, Some(rate)) if rate > 0 => Some(frames as f64 / rate as f64),
		_ => None,
	}
}

impl MediaElement for RodioElement {
	fn play(&mut self) {
		let mut slot = self.slot.lock();
		if slot.failed {
			return;
		}
		slot.want_playing = true;
		if slot.ended() {
			slot.requeue();
		}
		if let Some(sink) = &slot.sink {
			sink.play();
		}
	}

	fn pause(&mut self) {
		let mut slot = self.slot.lock();
		slot.want_playing = false;
		if let Some(sink) = &slot.sink {
			sink.pause();
		}
	}

	fn is_paused(&self) -> bool {
		let slot = self.slot.lock();
		match &slot.sink {
			Some(sink) => sink.is_paused() || sink.empty(),
			None => slot.failed || !slot.want_playing,
		}
	}

	fn position(&self) -> f64 {
		let mut slot = self.slot.lock();
		if slot.ended() {
			return slot.duration;
		}
		let Some(sink) = &slot.sink else {
			// duration is unknown before decoding, so any position clamps to 0
			return 0.0;
		};

		let reported = sink.get_pos().as_secs_f64();
		let seeked = slot.seeked;
		match seeked {
			// the sink applied the seek but has not published its position yet
			Some(seeked) if reported == seeked.reported_before => seeked.target,
			Some(_) => {
				slot.seeked = None;
				reported
			}
			None => reported,
		}
	}

	fn set_position(&mut self, seconds: f64) {
		let mut slot = self.slot.lock();
		if slot.sink.is_none() {
			if !slot.failed {
				slot.pending_seek = Some(seconds.max(0.0));
			}
			return;
		}

		let seconds = PlaybackPosition::clamp(seconds, slot.duration);
		if slot.ended() {
			// an ended element stays paused when seeked
			slot.want_playing = false;
			slot.requeue();
		}
		slot.seek_sink(seconds);
	}

	fn duration(&self) -> f64 {
		self.slot.lock().duration
	}
}

impl Drop for RodioElement {
	fn drop(&mut self) {
		self.task.abort();
		if let Some(sink) = self.slot.lock().sink.take() {
			sink.stop();
		}
	}
}
