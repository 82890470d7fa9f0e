//! Colours used by the background effects.
//!
//! The palette is deliberately muted: three slate greys that sit behind
//! page content without competing with it.

use serde::{Serialize, Serializer};

/// RGB color representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
	/// Red channel
	pub r: u8,
	/// Green channel
	pub g: u8,
	/// Blue channel
	pub b: u8,
}

impl Color {
	/// Build a color from its channels.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b }
	}

	/// `#rrggbb` form for canvas styles.
	pub fn to_css(self) -> String {
		format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
	}
}

impl Serialize for Color {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.to_css())
	}
}

/// Fill colors particles are drawn from.
#[derive(Clone, Debug, Serialize)]
#[serde(transparent)]
pub struct Palette {
	/// Candidates, picked uniformly
	pub colors: Vec<Color>,
}

impl Palette {
	/// Slate greys (default)
	pub fn slate() -> Self {
		Self {
			colors: vec![
				Color::rgb(0x37, 0x41, 0x51), // Gray 700
				Color::rgb(0x4b, 0x55, 0x63), // Gray 600
				Color::rgb(0x6b, 0x72, 0x80), // Gray 500
			],
		}
	}
}

/// Stroke color for connection lines.
pub const LINE_COLOR: Color = Color::rgb(0x4b, 0x55, 0x63);

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn css_is_lowercase_hex() {
		assert_eq!(Color::rgb(0x4b, 0x55, 0x63).to_css(), "#4b5563");
		assert_eq!(LINE_COLOR.to_css(), "#4b5563");
	}

	#[test]
	fn colors_serialize_as_css() {
		let json = serde_json::to_string(&Palette::slate()).unwrap();
		assert_eq!(json, r##"["#374151","#4b5563","#6b7280"]"##);
	}
}
