use crate::types::MediaKind;

/// Extensions that mount a video element when typed as a URL
const VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "webm", "ogg", "mov"];

/// Classify a typed URL by the text after its last period.
///
/// Anything outside [`VIDEO_EXTENSIONS`] is treated as audio, including URLs
/// without an extension at all.
pub fn kind_from_url(url: &str) -> MediaKind {
	let extension = url.rsplit('.').next().unwrap_or_default().to_lowercase();
	if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
		MediaKind::Video
	} else {
		MediaKind::Audio
	}
}

/// Classify an uploaded file by its declared MIME type.
pub fn kind_from_mime(mime: &str) -> MediaKind {
	if mime.starts_with("audio") {
		MediaKind::Audio
	} else {
		MediaKind::Video
	}
}
