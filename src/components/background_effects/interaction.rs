//! Pointer and click effects on the particle pool.

use std::f64::consts::TAU;

use rand::Rng;

use super::config::ParticleConfig;
use super::particles::{BURST_LIFE, Particle, ParticleKind, ParticlePool, Shape, pick};
use super::theme::LINE_COLOR;

/// Pointer influence radius in CSS pixels.
pub const POINTER_RADIUS: f64 = 110.0;
/// Opacity cap for particles lit up by the pointer.
pub const POINTER_OPACITY_CAP: f64 = 0.65;
/// Number of particles spawned per click.
pub const BURST_COUNT: usize = 6;

const POINTER_FORCE: f64 = 0.002;
const POINTER_BOOST: f64 = 0.6;
const ROTATION_DAMPING: f64 = 0.95;
const BURST_OPACITY: f64 = 0.5;

/// Pull nearby particles toward the pointer and brighten them.
///
/// Rotation speed is damped once per call for every particle, so damping
/// follows pointer event frequency rather than frame rate.
pub fn attract(pool: &mut ParticlePool, pointer_x: f64, pointer_y: f64) {
	for p in &mut pool.particles {
		let (dx, dy) = (pointer_x - p.x, pointer_y - p.y);
		let distance = (dx * dx + dy * dy).sqrt();

		if distance < POINTER_RADIUS {
			let proximity = (POINTER_RADIUS - distance) / POINTER_RADIUS;
			let force = proximity * POINTER_FORCE;
			p.speed_x += dx * force;
			p.speed_y += dy * force;
			p.opacity = (p.base_opacity * (1.0 + proximity * POINTER_BOOST))
				.clamp(0.0, POINTER_OPACITY_CAP);
		}

		p.rotation_speed *= ROTATION_DAMPING;
	}
}

/// Spawn a ring of [`BURST_COUNT`] burst particles at the click point,
/// evenly spaced in angle.
pub fn burst<R: Rng>(pool: &mut ParticlePool, x: f64, y: f64, config: &ParticleConfig, rng: &mut R) {
	let opacity = BURST_OPACITY.min(config.opacity.max(0.0));

	for i in 0..BURST_COUNT {
		let angle = i as f64 / BURST_COUNT as f64 * TAU;
		let speed = 1.0 + rng.r#gen::<f64>() * 2.0;
		let color = pick(&config.colors.colors, rng).unwrap_or(LINE_COLOR);

		pool.particles.push(Particle {
			x,
			y,
			speed_x: angle.cos() * speed,
			speed_y: angle.sin() * speed,
			size: rng.r#gen::<f64>() * 1.5 + 1.0,
			color,
			shape: Shape::Circle,
			rotation: 0.0,
			rotation_speed: 0.0,
			opacity,
			base_opacity: opacity,
			life: 0.0,
			pulse_phase: rng.r#gen::<f64>() * TAU,
			kind: ParticleKind::Burst {
				remaining: BURST_LIFE,
			},
		});
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::background_effects::config::EffectsConfig;
	use crate::components::background_effects::particles::Viewport;
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	fn pool_with_one(x: f64, y: f64) -> (ParticlePool, SmallRng) {
		let config = EffectsConfig::default().particles;
		let mut rng = SmallRng::seed_from_u64(11);
		let viewport = Viewport {
			width: 800.0,
			height: 600.0,
		};
		let mut p = Particle::ambient(&config, viewport, &mut rng);
		p.x = x;
		p.y = y;
		p.speed_x = 0.0;
		p.speed_y = 0.0;
		p.base_opacity = 0.5;
		p.opacity = 0.5;
		p.rotation_speed = 0.01;
		(
			ParticlePool {
				particles: vec![p],
			},
			rng,
		)
	}

	#[test]
	fn nearby_particle_is_pulled_toward_pointer() {
		let (mut pool, _) = pool_with_one(100.0, 100.0);
		attract(&mut pool, 150.0, 100.0);
		let p = &pool.particles[0];
		// (110 - 50) / 110 * 0.002 * 50
		let expected = 60.0 / 110.0 * 0.002 * 50.0;
		assert!((p.speed_x - expected).abs() < 1e-12);
		assert_eq!(p.speed_y, 0.0);
	}

	#[test]
	fn pointer_boost_is_capped() {
		let (mut pool, _) = pool_with_one(100.0, 100.0);
		attract(&mut pool, 100.0, 101.0);
		assert_eq!(pool.particles[0].opacity, POINTER_OPACITY_CAP);
	}

	#[test]
	fn distant_particle_only_loses_spin() {
		let (mut pool, _) = pool_with_one(100.0, 100.0);
		attract(&mut pool, 100.0, 400.0);
		let p = &pool.particles[0];
		assert_eq!((p.speed_x, p.speed_y, p.opacity), (0.0, 0.0, 0.5));
		assert!((p.rotation_speed - 0.0095).abs() < 1e-12);
	}

	#[test]
	fn rotation_damps_per_event() {
		let (mut pool, _) = pool_with_one(0.0, 0.0);
		for _ in 0..10 {
			attract(&mut pool, 500.0, 500.0);
		}
		let expected = 0.01 * 0.95f64.powi(10);
		assert!((pool.particles[0].rotation_speed - expected).abs() < 1e-12);
	}

	#[test]
	fn click_spawns_even_ring_of_bursts() {
		let (mut pool, mut rng) = pool_with_one(0.0, 0.0);
		let config = EffectsConfig::default().particles;
		burst(&mut pool, 320.0, 240.0, &config, &mut rng);

		let bursts: Vec<_> = pool.particles.iter().filter(|p| p.is_burst()).collect();
		assert_eq!(bursts.len(), BURST_COUNT);

		for (i, p) in bursts.iter().enumerate() {
			assert_eq!((p.x, p.y), (320.0, 240.0));
			assert_eq!(p.kind, ParticleKind::Burst { remaining: 60 });
			assert_eq!(p.shape, Shape::Circle);
			assert_eq!((p.rotation, p.rotation_speed), (0.0, 0.0));
			assert_eq!(p.opacity, 0.5);

			let speed = p.speed_x.hypot(p.speed_y);
			assert!((1.0..3.0).contains(&speed));

			let angle = p.speed_y.atan2(p.speed_x).rem_euclid(TAU);
			let expected = (i as f64 * 60.0).to_radians();
			assert!((angle - expected).abs() < 1e-9, "burst {i}: {angle}");
		}
	}

	#[test]
	fn burst_opacity_never_exceeds_ceiling() {
		let (mut pool, mut rng) = pool_with_one(0.0, 0.0);
		let mut config = EffectsConfig::default().particles;
		config.opacity = 0.1;
		burst(&mut pool, 1.0, 1.0, &config, &mut rng);
		assert!(pool.particles.iter().filter(|p| p.is_burst()).all(|p| p.opacity == 0.1));
	}

	#[test]
	fn empty_palette_bursts_in_line_color() {
		let (mut pool, mut rng) = pool_with_one(0.0, 0.0);
		let mut config = EffectsConfig::default().particles;
		config.colors.colors.clear();
		burst(&mut pool, 1.0, 1.0, &config, &mut rng);
		assert!(pool.particles.iter().filter(|p| p.is_burst()).all(|p| p.color == LINE_COLOR));
	}
}
