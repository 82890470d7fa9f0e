//! Canvas rendering for the particle field.
//!
//! Each frame is drawn in two passes:
//! 1. Connection lines between every pair of nearby particles
//! 2. Particle shapes on top
//!
//! The connection pass compares every unordered pair, so it is O(n²) in the
//! pool size. That is fine at a few dozen particles and is the main reason
//! the particle count should stay small.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::config::ParticleConfig;
use super::particles::{Particle, ParticlePool, Shape, Viewport};
use super::theme::LINE_COLOR;

const LINE_WIDTH: f64 = 0.5;
const TRIANGLE_HALF_WIDTH: f64 = 0.866;

/// The drawing primitives the renderer needs from a 2D surface.
///
/// Method names follow `CanvasRenderingContext2d`.
pub trait DrawSurface {
	/// Erase `[0, width) x [0, height)`.
	fn clear(&self, width: f64, height: f64);
	/// Push the drawing state.
	fn save(&self);
	/// Pop the drawing state.
	fn restore(&self);
	/// Alpha applied to everything drawn next.
	fn set_global_alpha(&self, alpha: f64);
	/// Fill color as a CSS string.
	fn set_fill_color(&self, css: &str);
	/// Stroke color as a CSS string.
	fn set_stroke_color(&self, css: &str);
	/// Stroke width in CSS pixels.
	fn set_line_width(&self, width: f64);
	/// Move the origin.
	fn translate(&self, x: f64, y: f64);
	/// Rotate around the origin, in radians.
	fn rotate(&self, angle: f64);
	/// Start a new path.
	fn begin_path(&self);
	/// Start a subpath at a point.
	fn move_to(&self, x: f64, y: f64);
	/// Straight segment to a point.
	fn line_to(&self, x: f64, y: f64);
	/// Close the current subpath.
	fn close_path(&self);
	/// Full circle.
	fn arc(&self, x: f64, y: f64, radius: f64);
	/// Axis-aligned rectangle.
	fn rect(&self, x: f64, y: f64, width: f64, height: f64);
	/// Fill the current path.
	fn fill(&self);
	/// Stroke the current path.
	fn stroke(&self);
}

impl DrawSurface for CanvasRenderingContext2d {
	fn clear(&self, width: f64, height: f64) {
		self.clear_rect(0.0, 0.0, width, height);
	}

	fn save(&self) {
		CanvasRenderingContext2d::save(self);
	}

	fn restore(&self) {
		CanvasRenderingContext2d::restore(self);
	}

	fn set_global_alpha(&self, alpha: f64) {
		CanvasRenderingContext2d::set_global_alpha(self, alpha);
	}

	fn set_fill_color(&self, css: &str) {
		self.set_fill_style_str(css);
	}

	fn set_stroke_color(&self, css: &str) {
		self.set_stroke_style_str(css);
	}

	fn set_line_width(&self, width: f64) {
		CanvasRenderingContext2d::set_line_width(self, width);
	}

	fn translate(&self, x: f64, y: f64) {
		let _ = CanvasRenderingContext2d::translate(self, x, y);
	}

	fn rotate(&self, angle: f64) {
		let _ = CanvasRenderingContext2d::rotate(self, angle);
	}

	fn begin_path(&self) {
		CanvasRenderingContext2d::begin_path(self);
	}

	fn move_to(&self, x: f64, y: f64) {
		CanvasRenderingContext2d::move_to(self, x, y);
	}

	fn line_to(&self, x: f64, y: f64) {
		CanvasRenderingContext2d::line_to(self, x, y);
	}

	fn close_path(&self) {
		CanvasRenderingContext2d::close_path(self);
	}

	fn arc(&self, x: f64, y: f64, radius: f64) {
		let _ = CanvasRenderingContext2d::arc(self, x, y, radius, 0.0, PI * 2.0);
	}

	fn rect(&self, x: f64, y: f64, width: f64, height: f64) {
		CanvasRenderingContext2d::rect(self, x, y, width, height);
	}

	fn fill(&self) {
		CanvasRenderingContext2d::fill(self);
	}

	fn stroke(&self) {
		CanvasRenderingContext2d::stroke(self);
	}
}

/// Line alpha for two particles `distance` apart.
///
/// Falls off linearly from `line_opacity` at zero distance to nothing at
/// `connect_distance`.
pub fn connection_alpha(distance: f64, config: &ParticleConfig) -> f64 {
	if config.connect_distance <= 0.0 || distance >= config.connect_distance {
		return 0.0;
	}
	(1.0 - distance / config.connect_distance) * config.line_opacity
}

/// Renders one frame of the particle field.
pub fn render<S: DrawSurface + ?Sized>(
	surface: &S,
	pool: &ParticlePool,
	config: &ParticleConfig,
	viewport: Viewport,
) {
	surface.clear(viewport.width, viewport.height);
	draw_connections(surface, &pool.particles, config);
	for p in &pool.particles {
		draw_particle(surface, p);
	}
}

fn draw_connections<S: DrawSurface + ?Sized>(
	surface: &S,
	particles: &[Particle],
	config: &ParticleConfig,
) {
	let line_color = LINE_COLOR.to_css();

	for (i, p1) in particles.iter().enumerate() {
		for p2 in &particles[i + 1..] {
			let (dx, dy) = (p1.x - p2.x, p1.y - p2.y);
			let distance = (dx * dx + dy * dy).sqrt();
			let alpha = connection_alpha(distance, config);
			if alpha <= 0.0 {
				continue;
			}

			surface.save();
			surface.set_global_alpha(alpha);
			surface.set_stroke_color(&line_color);
			surface.set_line_width(LINE_WIDTH);
			surface.begin_path();
			surface.move_to(p1.x, p1.y);
			surface.line_to(p2.x, p2.y);
			surface.stroke();
			surface.restore();
		}
	}
}

fn draw_particle<S: DrawSurface + ?Sized>(surface: &S, p: &Particle) {
	surface.save();
	surface.set_global_alpha(p.opacity);
	surface.set_fill_color(&p.color.to_css());
	surface.translate(p.x, p.y);
	surface.rotate(p.rotation);

	surface.begin_path();
	trace_shape(surface, p.shape, p.size);
	surface.fill();

	surface.restore();
}

/// Trace `shape` centred on the origin of the current transform.
fn trace_shape<S: DrawSurface + ?Sized>(surface: &S, shape: Shape, size: f64) {
	match shape {
		Shape::Circle => surface.arc(0.0, 0.0, size),
		Shape::Square => surface.rect(-size, -size, size * 2.0, size * 2.0),
		Shape::Triangle => {
			surface.move_to(0.0, -size);
			surface.line_to(-size * TRIANGLE_HALF_WIDTH, size * 0.5);
			surface.line_to(size * TRIANGLE_HALF_WIDTH, size * 0.5);
			surface.close_path();
		}
	}
}
