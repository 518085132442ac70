use crate::binder::embed::decode_data_uri;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
	#[error("malformed data URI")]
	InvalidDataUri,
	#[error("HTTP status {0}")]
	HttpStatus(reqwest::StatusCode),
	#[error("network error: {0}")]
	Network(#[from] reqwest::Error),
	#[error("failed to read {path}: {source}")]
	Io {
		path: String,
		source: std::io::Error,
	},
}

/// Resolve an image or media source string to its bytes.
///
/// Accepts embedded `data:` URIs, `http(s)` URLs and local paths (with or
/// without a `file://` prefix).
pub async fn load_bytes(src: &str) -> Result<Vec<u8>, SourceError> {
	if src.starts_with("data:") {
		let (_, bytes) = decode_data_uri(src).ok_or(SourceError::InvalidDataUri)?;
		return Ok(bytes);
	}

	if src.starts_with("http://") || src.starts_with("https://") {
		let resp = reqwest::get(src).await?;
		if !resp.status().is_success() {
			return Err(SourceError::HttpStatus(resp.status()));
		}
		return Ok(resp.bytes().await?.to_vec());
	}

	let path = src.strip_prefix("file://").unwrap_or(src);
	tokio::fs::read(path).await.map_err(|source| SourceError::Io {
		path: path.to_owned(),
		source,
	})
}
