/// Classification of the hidden playback element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
	Audio,
	Video,
}

impl MediaKind {
	pub fn label(&self) -> &'static str {
		match self {
			MediaKind::Audio => "audio",
			MediaKind::Video => "video",
		}
	}
}

/// Image reference: remote URL, local path or embedded `data:` URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource(pub String);

impl ImageSource {
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

/// Playable reference plus the kind decided when it was bound
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSource {
	pub src: String,
	pub kind: MediaKind,
}

/// Elapsed and total time of the mounted element, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackPosition {
	pub elapsed: f64,
	pub duration: f64,
}

impl PlaybackPosition {
	/// Position a host element accepts for a requested seek.
	pub fn clamp(value: f64, duration: f64) -> f64 {
		if !value.is_finite() {
			return 0.0;
		}
		value.clamp(0.0, duration.max(0.0))
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportState {
	#[default]
	Unbound,
	Paused,
	Playing,
}

/// Shortened form of a source string for log output; data URIs can be megabytes long.
pub fn describe_source(src: &str) -> String {
	if let Some(rest) = src.strip_prefix("data:") {
		let header = rest.split(',').next().unwrap_or_default();
		return format!("data:{},<{} bytes>", header, src.len());
	}
	src.to_owned()
}
