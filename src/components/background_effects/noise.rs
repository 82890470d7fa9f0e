//! Procedural noise for the background texture.

use super::config::TextureConfig;

/// Hash-style value noise in [-1, 1].
///
/// Not smooth and not continuous: adjacent integer coordinates are
/// uncorrelated, which is what a film-grain texture wants.
pub fn noise(x: f64, y: f64) -> f64 {
	let n = (x * 12.9898 + y * 78.233).sin() * 43758.5453;
	(n - n.floor()) * 2.0 - 1.0
}

/// Sum `octaves` layers of [`noise`], doubling frequency and halving
/// amplitude each layer. Returns the absolute value of the sum.
pub fn fractal(x: f64, y: f64, frequency: f64, octaves: u32) -> f64 {
	let mut value = 0.0;
	let mut amplitude = 1.0;
	let mut frequency = frequency;

	for _ in 0..octaves {
		value += noise(x * frequency, y * frequency) * amplitude;
		amplitude *= 0.5;
		frequency *= 2.0;
	}

	value.abs()
}

/// Fill a `size`x`size` RGBA buffer with greyscale noise at constant alpha.
pub fn texture_pixels(config: &TextureConfig) -> Vec<u8> {
	let size = config.size as usize;
	let alpha = (config.intensity * 255.0).floor().clamp(0.0, 255.0) as u8;
	let mut data = Vec::with_capacity(size * size * 4);

	for i in 0..size * size {
		let (x, y) = ((i % size) as f64, (i / size) as f64);
		let n = fractal(x, y, config.frequency, config.octaves);
		let value = (n * 255.0).floor().clamp(0.0, 255.0) as u8;
		data.extend_from_slice(&[value, value, value, alpha]);
	}

	data
}
