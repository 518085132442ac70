use eframe::egui;

/// Width over height of the image surface
pub const SURFACE_ASPECT: f32 = 16.0 / 9.0;

/// UV rectangle that crops a texture to fill `box_size` without distortion,
/// keeping the centre of the image.
pub fn cover_uv(texture_size: egui::Vec2, box_size: egui::Vec2) -> egui::Rect {
	let full = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
	if texture_size.x <= 0.0 || texture_size.y <= 0.0 || box_size.x <= 0.0 || box_size.y <= 0.0 {
		return full;
	}

	let texture_aspect = texture_size.x / texture_size.y;
	let box_aspect = box_size.x / box_size.y;

	if texture_aspect > box_aspect {
		// wider than the box: trim left and right
		let visible = box_aspect / texture_aspect;
		let margin = (1.0 - visible) / 2.0;
		egui::Rect::from_min_max(egui::pos2(margin, 0.0), egui::pos2(1.0 - margin, 1.0))
	} else {
		let visible = texture_aspect / box_aspect;
		let margin = (1.0 - visible) / 2.0;
		egui::Rect::from_min_max(egui::pos2(0.0, margin), egui::pos2(1.0, 1.0 - margin))
	}
}

/// `m:ss`, or `h:mm:ss` past the hour
pub fn format_clock(seconds: f64) -> String {
	let total = if seconds.is_finite() && seconds > 0.0 {
		seconds as u64
	} else {
		0
	};
	let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
	if h > 0 {
		format!("{}:{:02}:{:02}", h, m, s)
	} else {
		format!("{}:{:02}", m, s)
	}
}
