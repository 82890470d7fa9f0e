//! Ambient and burst particles.
//!
//! Ambient particles drift, pulse, and wrap around the viewport forever;
//! the pool tops them back up to the configured count every frame. Burst
//! particles are spawned by clicks, fall under gravity, fade, and are
//! culled when their countdown expires.

use std::f64::consts::TAU;

use rand::Rng;
use serde::Serialize;

use super::config::ParticleConfig;
use super::theme::{Color, LINE_COLOR};

/// Distance outside the viewport a particle may travel before wrapping.
pub const WRAP_MARGIN: f64 = 10.0;
/// Frames a burst particle lives for.
pub const BURST_LIFE: u32 = 60;

const LIFE_STEP: f64 = 0.5;
const PULSE_STEP: f64 = 0.03;
const PULSE_DEPTH: f64 = 0.25;
const DAMPING: f64 = 0.999;
const BURST_FADE: f64 = 0.98;
const BURST_DRAG: f64 = 0.97;
const GRAVITY: f64 = 0.1;

/// Particle outline.
///
/// Only circles are generated by the default configuration; squares and
/// triangles are still drawn correctly if configured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
	/// Filled circle of radius `size`
	Circle,
	/// Square with edge `2 * size`
	Square,
	/// Triangle pointing up, inscribed in the circle of radius `size`
	Triangle,
}

/// Whether a particle is long-lived or a transient click burst.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleKind {
	/// Lives forever and wraps at the viewport edges.
	Ambient,
	/// Frames left before the particle is culled.
	Burst { remaining: u32 },
}

/// Visible area the simulation runs in, in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	/// Width in CSS pixels
	pub width: f64,
	/// Height in CSS pixels
	pub height: f64,
}

/// A single particle.
#[derive(Clone, Debug)]
pub struct Particle {
	/// Position in CSS pixels
	pub x: f64,
	/// Position in CSS pixels
	pub y: f64,
	/// Horizontal velocity per frame
	pub speed_x: f64,
	/// Vertical velocity per frame
	pub speed_y: f64,
	/// Radius (or half edge) in CSS pixels
	pub size: f64,
	/// Fill color
	pub color: Color,
	/// Outline drawn
	pub shape: Shape,
	/// Current angle in radians
	pub rotation: f64,
	/// Angle added every frame
	pub rotation_speed: f64,
	/// Opacity drawn this frame
	pub opacity: f64,
	/// Opacity the pulse oscillates around
	pub base_opacity: f64,
	/// Age counter feeding the drift
	pub life: f64,
	/// Drives the opacity pulse
	pub pulse_phase: f64,
	/// Ambient or burst
	pub kind: ParticleKind,
}

/// A random element of `items`, or `None` when it is empty.
pub(super) fn pick<T: Copy, R: Rng>(items: &[T], rng: &mut R) -> Option<T> {
	if items.is_empty() {
		None
	} else {
		Some(items[rng.gen_range(0..items.len())])
	}
}

/// Base opacity in [0.2 * ceiling, ceiling).
fn random_base_opacity<R: Rng>(ceiling: f64, rng: &mut R) -> f64 {
	rng.r#gen::<f64>() * ceiling * 0.8 + ceiling * 0.2
}

impl Particle {
	/// A freshly randomized ambient particle somewhere inside the viewport.
	pub fn ambient<R: Rng>(config: &ParticleConfig, viewport: Viewport, rng: &mut R) -> Self {
		Self {
			x: rng.r#gen::<f64>() * viewport.width,
			y: rng.r#gen::<f64>() * viewport.height,
			speed_x: (rng.r#gen::<f64>() - 0.5) * config.speed,
			speed_y: (rng.r#gen::<f64>() - 0.5) * config.speed,
			size: rng.r#gen::<f64>() * (config.max_size - config.min_size) + config.min_size,
			color: pick(&config.colors.colors, rng).unwrap_or(LINE_COLOR),
			shape: pick(&config.shapes, rng).unwrap_or(Shape::Circle),
			rotation: rng.r#gen::<f64>() * TAU,
			rotation_speed: (rng.r#gen::<f64>() - 0.5) * 0.02,
			opacity: rng.r#gen::<f64>() * config.opacity,
			base_opacity: random_base_opacity(config.opacity, rng),
			life: rng.r#gen::<f64>() * 100.0,
			pulse_phase: rng.r#gen::<f64>() * TAU,
			kind: ParticleKind::Ambient,
		}
	}

	/// Whether this particle came from a click.
	pub fn is_burst(&self) -> bool {
		matches!(self.kind, ParticleKind::Burst { .. })
	}

	/// Advance one frame. Returns `false` once the particle should be culled.
	///
	/// Opacity ends the frame within `[0, ceiling]` for both kinds, so a
	/// burst spawned before the ceiling dropped is dimmed right away.
	fn step(&mut self, viewport: Viewport, ceiling: f64) -> bool {
		self.x += self.speed_x;
		self.y += self.speed_y;
		self.life += LIFE_STEP;
		self.rotation += self.rotation_speed;
		self.pulse_phase += PULSE_STEP;

		match self.kind {
			ParticleKind::Burst { remaining } => {
				let remaining = remaining.saturating_sub(1);
				self.kind = ParticleKind::Burst { remaining };
				self.opacity = (self.opacity * BURST_FADE).clamp(0.0, ceiling.max(0.0));
				self.speed_x *= BURST_DRAG;
				self.speed_y *= BURST_DRAG;
				self.speed_y += GRAVITY;
				remaining > 0
			}
			ParticleKind::Ambient => {
				self.wrap(viewport);

				let pulse = (self.pulse_phase.sin() + 1.0) * 0.5;
				self.opacity = (self.base_opacity + pulse * self.base_opacity * PULSE_DEPTH)
					.clamp(0.0, ceiling.max(0.0));

				// Slow organic drift
				self.speed_y += (self.life * 0.01).sin() * 0.001;
				self.speed_x += (self.life * 0.008).cos() * 0.0008;

				self.speed_x *= DAMPING;
				self.speed_y *= DAMPING;
				true
			}
		}
	}

	fn wrap(&mut self, viewport: Viewport) {
		if self.x < -WRAP_MARGIN {
			self.x = viewport.width + WRAP_MARGIN;
		} else if self.x > viewport.width + WRAP_MARGIN {
			self.x = -WRAP_MARGIN;
		}
		if self.y < -WRAP_MARGIN {
			self.y = viewport.height + WRAP_MARGIN;
		} else if self.y > viewport.height + WRAP_MARGIN {
			self.y = -WRAP_MARGIN;
		}
	}
}

/// The live set of particles.
#[derive(Clone, Debug, Default)]
pub struct ParticlePool {
	/// Ambient and burst particles in spawn order
	pub particles: Vec<Particle>,
}

impl ParticlePool {
	/// A pool holding `config.count` fresh ambient particles.
	pub fn new<R: Rng>(config: &ParticleConfig, viewport: Viewport, rng: &mut R) -> Self {
		let mut pool = Self {
			particles: Vec::with_capacity(config.count),
		};
		pool.replenish(config, viewport, rng);
		pool
	}

	/// Discard every particle, bursts included, and start over.
	pub fn regenerate<R: Rng>(&mut self, config: &ParticleConfig, viewport: Viewport, rng: &mut R) {
		self.particles.clear();
		self.replenish(config, viewport, rng);
	}

	/// Advance every particle one frame, cull expired bursts, then top
	/// ambient particles back up to the configured count.
	pub fn update<R: Rng>(&mut self, config: &ParticleConfig, viewport: Viewport, rng: &mut R) {
		self.particles
			.retain_mut(|p| p.step(viewport, config.opacity));
		self.replenish(config, viewport, rng);
	}

	fn replenish<R: Rng>(&mut self, config: &ParticleConfig, viewport: Viewport, rng: &mut R) {
		let missing = config.count.saturating_sub(self.ambient_count());
		self.particles
			.extend((0..missing).map(|_| Particle::ambient(config, viewport, rng)));
	}

	/// Pick a new base opacity for every ambient particle under `ceiling`.
	pub fn rerandomize_base_opacity<R: Rng>(&mut self, ceiling: f64, rng: &mut R) {
		for p in self.particles.iter_mut().filter(|p| !p.is_burst()) {
			p.base_opacity = random_base_opacity(ceiling, rng);
		}
	}

	/// Particles that are not bursts.
	pub fn ambient_count(&self) -> usize {
		self.particles.iter().filter(|p| !p.is_burst()).count()
	}

	/// Burst particles still alive.
	pub fn burst_count(&self) -> usize {
		self.particles.len() - self.ambient_count()
	}

	pub(crate) fn len(&self) -> usize {
		self.particles.len()
	}
}
