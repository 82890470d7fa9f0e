//! Effect configuration.
//!
//! Everything here is compile-time defaults. The only runtime knobs are
//! [`EffectsConfig::apply_intensity`] and the particle count; the rest is
//! exposed read-only so hosts can inspect what is running.

use serde::Serialize;

use super::particles::Shape;
use super::theme::Palette;

/// Particle opacity ceiling at full intensity.
pub const DEFAULT_PARTICLE_OPACITY: f64 = 0.5;
/// Connection line opacity at full intensity.
pub const DEFAULT_LINE_OPACITY: f64 = 0.12;
/// Texture alpha at full intensity.
pub const DEFAULT_TEXTURE_INTENSITY: f64 = 0.015;
/// Canvas element opacity at full intensity.
pub const DEFAULT_SURFACE_OPACITY: f64 = 0.7;
/// Largest ambient particle count accepted from script hosts.
pub const MAX_PARTICLE_COUNT: usize = 1000;

/// Particle pool configuration.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticleConfig {
	/// Number of ambient particles kept alive
	pub count: usize,
	/// Minimum particle size
	pub min_size: f64,
	/// Maximum particle size
	pub max_size: f64,
	/// Full width of the initial velocity range
	pub speed: f64,
	/// Opacity ceiling for particles not boosted by the pointer
	pub opacity: f64,
	/// Fill colors
	pub colors: Palette,
	/// Shapes ambient particles are drawn from
	pub shapes: Vec<Shape>,
	/// Maximum distance at which two particles are connected
	pub connect_distance: f64,
	/// Connection line opacity at zero distance
	pub line_opacity: f64,
}

/// Background noise texture configuration.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextureConfig {
	/// Alpha of every texture pixel (0.0 - 1.0)
	pub intensity: f64,
	/// Base sampling frequency of the first octave
	pub frequency: f64,
	/// Number of noise layers summed
	pub octaves: u32,
	/// Edge length of the square texture tile in pixels
	pub size: u32,
}

/// Complete configuration.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectsConfig {
	/// Particle pool and connection lines
	pub particles: ParticleConfig,
	/// Body background texture
	pub texture: TextureConfig,
	/// Opacity of the canvas element itself
	pub surface_opacity: f64,
}

impl Default for EffectsConfig {
	fn default() -> Self {
		Self {
			particles: ParticleConfig {
				count: 32,
				min_size: 1.5,
				max_size: 3.5,
				speed: 0.3,
				opacity: DEFAULT_PARTICLE_OPACITY,
				colors: Palette::slate(),
				shapes: vec![Shape::Circle],
				connect_distance: 110.0,
				line_opacity: DEFAULT_LINE_OPACITY,
			},
			texture: TextureConfig {
				intensity: DEFAULT_TEXTURE_INTENSITY,
				frequency: 0.9,
				octaves: 2,
				size: 200,
			},
			surface_opacity: DEFAULT_SURFACE_OPACITY,
		}
	}
}

impl EffectsConfig {
	/// Scale every opacity-like setting by `level`, clamped to [0, 1].
	/// Returns the clamped level.
	pub fn apply_intensity(&mut self, level: f64) -> f64 {
		let level = if level.is_nan() { 0.0 } else { level.clamp(0.0, 1.0) };
		self.particles.opacity = DEFAULT_PARTICLE_OPACITY * level;
		self.particles.line_opacity = DEFAULT_LINE_OPACITY * level;
		self.texture.intensity = DEFAULT_TEXTURE_INTENSITY * level;
		self.surface_opacity = DEFAULT_SURFACE_OPACITY * level;
		level
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn zero_intensity_silences_everything() {
		let mut config = EffectsConfig::default();
		assert_eq!(config.apply_intensity(0.0), 0.0);
		assert_eq!(config.particles.opacity, 0.0);
		assert_eq!(config.particles.line_opacity, 0.0);
		assert_eq!(config.texture.intensity, 0.0);
		assert_eq!(config.surface_opacity, 0.0);
	}

	#[test]
	fn full_intensity_restores_defaults() {
		let mut config = EffectsConfig::default();
		config.apply_intensity(0.2);
		config.apply_intensity(1.0);
		assert_eq!(config.particles.opacity, 0.5);
		assert_eq!(config.surface_opacity, 0.7);
		assert_eq!(config.particles.line_opacity, 0.12);
	}

	#[test]
	fn intensity_is_clamped() {
		let mut config = EffectsConfig::default();
		assert_eq!(config.apply_intensity(3.0), 1.0);
		assert_eq!(config.apply_intensity(-1.0), 0.0);
		assert_eq!(config.apply_intensity(f64::NAN), 0.0);
	}

	#[test]
	fn serializes_camel_case() {
		let json = serde_json::to_value(EffectsConfig::default()).unwrap();
		assert_eq!(json["particles"]["count"], 32);
		assert_eq!(json["particles"]["connectDistance"], 110.0);
		assert_eq!(json["particles"]["shapes"][0], "circle");
		assert_eq!(json["surfaceOpacity"], 0.7);
	}
}
