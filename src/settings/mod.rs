use anyhow::Context;
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
	fs::File,
	io::Read,
	path::{Path, PathBuf},
};

const SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
	pub title: String,
	pub subtitle: String,
	pub caption: String,
	pub footer: String,
	/// Output volume, 0.0 to 1.0
	pub volume: f32,
	pub window_size: [f32; 2],
	/// Repaint cadence while playing; drives position notifications
	pub notify_interval_ms: u64,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			title: "Prabhupad Zoom Lecture".to_owned(),
			subtitle: "\"Engage in the divine teachings of Srila Prabhupad.\"".to_owned(),
			caption: "Click on the image to play/pause the lecture".to_owned(),
			footer: "\"Hearing and chanting about the transcendental pastimes of the Lord purifies the heart.\" – Srila Prabhupad".to_owned(),
			volume: 1.0,
			window_size: [1280.0, 720.0],
			notify_interval_ms: 250,
		}
	}
}

impl Settings {
	pub fn read(file: &mut impl Read) -> anyhow::Result<Self> {
		let mut contents = String::new();
		file.read_to_string(&mut contents)
			.context("Failed to read settings file")?;

		let mut settings: Settings =
			toml::from_str(&contents).context("Failed to parse settings file")?;
		if !settings.volume.is_finite() {
			settings.volume = Settings::default().volume;
		}
		settings.volume = settings.volume.clamp(0.0, 1.0);
		settings.notify_interval_ms = settings.notify_interval_ms.max(15);
		Ok(settings)
	}

	pub fn read_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
		let path = path.as_ref();
		let mut file = File::open(path)
			.with_context(|| format!("Failed to open settings file {}", path.display()))?;
		Self::read(&mut file)
	}

	/// Explicit path if given, else the per-user config directory, else defaults.
	pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
		if let Some(path) = explicit {
			log::info!("Using settings file {}", path.display());
			return Self::read_path(path);
		}

		match Self::default_path() {
			Some(path) if path.exists() => {
				log::info!("Using settings file {}", path.display());
				Self::read_path(path)
			}
			_ => {
				log::info!("No settings file found; using defaults");
				Ok(Self::default())
			}
		}
	}

	pub fn default_path() -> Option<PathBuf> {
		ProjectDirs::from("", "", "stillcast").map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Cursor;

	const TEST_SETTINGS: &str = r#"
title = "Sunday Class"
volume = 0.5
window_size = [800.0, 600.0]
"#;

	#[test]
	fn should_parse_settings_and_fill_defaults() {
		// given
		let mut file = Cursor::new(TEST_SETTINGS);

		// when
		let settings = Settings::read(&mut file).unwrap();

		// then
		assert_eq!(
			settings,
			Settings {
				title: "Sunday Class".to_owned(),
				volume: 0.5,
				window_size: [800.0, 600.0],
				..Settings::default()
			}
		);
	}

	#[test]
	fn should_clamp_out_of_range_values() {
		let mut file = Cursor::new("volume = 3.0\nnotify_interval_ms = 0\n");

		let settings = Settings::read(&mut file).unwrap();

		assert_eq!(settings.volume, 1.0);
		assert_eq!(settings.notify_interval_ms, 15);
	}

	#[test]
	fn should_fall_back_to_default_volume_when_not_finite() {
		for text in ["volume = nan\n", "volume = inf\n", "volume = -inf\n"] {
			let mut file = Cursor::new(text);

			let settings = Settings::read(&mut file).unwrap();

			assert_eq!(settings.volume, Settings::default().volume, "{text}");
		}
	}

	#[test]
	fn should_return_error_on_invalid_syntax() {
		// given
		let mut file = Cursor::new("volume = ");

		// when
		let result = Settings::read(&mut file);

		// then
		assert!(result.is_err());
	}

	#[test]
	fn should_read_explicit_path() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("custom.toml");
		std::fs::write(&path, "caption = \"Tap to listen\"").unwrap();

		let settings = Settings::load(Some(&path)).unwrap();

		assert_eq!(settings.caption, "Tap to listen");
		assert_eq!(settings.title, Settings::default().title);
	}

	#[test]
	fn should_fail_on_missing_explicit_path() {
		let dir = tempfile::tempdir().unwrap();

		let result = Settings::load(Some(&dir.path().join("missing.toml")));

		assert!(result.is_err());
	}
}
