use anyhow::Context;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use std::path::Path;

/// Declared type used when the extension is not recognised
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// File bytes encoded as a self-contained `data:` URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedFile {
	pub mime: String,
	pub data_uri: String,
}

/// Host capability that turns a picked file into an embedded source.
pub trait FileReader: Send + Sync {
	fn read_embedded(&self, path: &Path) -> anyhow::Result<EmbeddedFile>;
}

/// Reads from the local filesystem and declares the type from the extension
pub struct FsReader;

impl FileReader for FsReader {
	fn read_embedded(&self, path: &Path) -> anyhow::Result<EmbeddedFile> {
		let bytes =
			std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
		let mime = mime_from_path(path);
		Ok(EmbeddedFile {
			data_uri: encode_data_uri(mime, &bytes),
			mime: mime.to_owned(),
		})
	}
}

pub fn mime_from_path(path: &Path) -> &'static str {
	let extension = path
		.extension()
		.and_then(|e| e.to_str())
		.map(str::to_lowercase)
		.unwrap_or_default();

	match extension.as_str() {
		"png" => "image/png",
		"jpg" | "jpeg" => "image/jpeg",
		"gif" => "image/gif",
		"webp" => "image/webp",
		"bmp" => "image/bmp",
		"svg" => "image/svg+xml",
		"mp3" => "audio/mpeg",
		"wav" => "audio/wav",
		"flac" => "audio/flac",
		"aac" => "audio/aac",
		"m4a" => "audio/mp4",
		"oga" | "opus" => "audio/ogg",
		"weba" => "audio/webm",
		"mp4" | "m4v" => "video/mp4",
		"webm" => "video/webm",
		"ogv" | "ogg" => "video/ogg",
		"mov" => "video/quicktime",
		"mkv" => "video/x-matroska",
		_ => FALLBACK_MIME,
	}
}

pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
	format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Split a `data:` URI into its declared type and payload bytes.
///
/// Returns `None` when `uri` is not a data URI or the base64 payload is malformed.
pub fn decode_data_uri(uri: &str) -> Option<(String, Vec<u8>)> {
	let rest = uri.strip_prefix("data:")?;
	let (header, payload) = rest.split_once(',')?;
	match header.strip_suffix(";base64") {
		Some(mime) => {
			let bytes = STANDARD.decode(payload.trim()).ok()?;
			Some((mime.to_owned(), bytes))
		}
		None => Some((header.to_owned(), payload.as_bytes().to_vec())),
	}
}
