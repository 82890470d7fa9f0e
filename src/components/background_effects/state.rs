//! Effect state and the frame loop state machine.
//!
//! [`EffectsState`] owns everything the simulation needs (configuration,
//! viewport, particle pool, random source, and the frame loop) and has no
//! DOM dependencies, so the browser controller is a thin shell around it.

use log::debug;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::config::EffectsConfig;
use super::interaction;
use super::particles::{ParticlePool, Viewport};
use super::render::{self, DrawSurface};

/// Something that can call back once per display refresh.
pub trait FrameScheduler {
	/// Request the next callback. Returns a handle usable with `cancel`.
	fn request(&self) -> Option<i32>;
	/// Cancel a previously requested callback.
	fn cancel(&self, handle: i32);
}

/// Whether the update/draw loop is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopState {
	/// No callback pending; frames that still arrive are ignored.
	#[default]
	Stopped,
	/// `pending` is the scheduled callback, if the scheduler returned one.
	Running { pending: Option<i32> },
}

/// Drives one update+draw pass per display refresh.
#[derive(Clone, Debug, Default)]
pub struct FrameLoop {
	state: LoopState,
}

impl FrameLoop {
	/// Current loop state.
	pub fn state(&self) -> LoopState {
		self.state
	}

	/// Whether frames are being scheduled.
	pub fn is_running(&self) -> bool {
		matches!(self.state, LoopState::Running { .. })
	}

	/// (Re)start the loop. A callback already pending is cancelled first.
	pub fn start<S: FrameScheduler + ?Sized>(&mut self, scheduler: &S) {
		self.cancel_pending(scheduler);
		self.state = LoopState::Running {
			pending: scheduler.request(),
		};
	}

	/// Stop the loop and cancel the pending callback.
	pub fn stop<S: FrameScheduler + ?Sized>(&mut self, scheduler: &S) {
		self.cancel_pending(scheduler);
		self.state = LoopState::Stopped;
	}

	/// Called from inside a frame callback after the pass has run.
	/// Schedules the next callback while running; does nothing once stopped.
	pub fn rearm<S: FrameScheduler + ?Sized>(&mut self, scheduler: &S) {
		if self.is_running() {
			self.state = LoopState::Running {
				pending: scheduler.request(),
			};
		}
	}

	fn cancel_pending<S: FrameScheduler + ?Sized>(&mut self, scheduler: &S) {
		if let LoopState::Running {
			pending: Some(handle),
		} = self.state
		{
			scheduler.cancel(handle);
		}
	}
}

/// Everything the effect needs between frames.
pub struct EffectsState {
	/// Live configuration, intensity already applied
	pub config: EffectsConfig,
	/// Area particles move in
	pub viewport: Viewport,
	/// Ambient and burst particles
	pub pool: ParticlePool,
	/// Update/draw loop
	pub frame_loop: FrameLoop,
	/// Whether the surface is shown. Hidden surfaces never animate.
	pub enabled: bool,
	rng: SmallRng,
}

impl EffectsState {
	/// Fresh state with a full pool; the frame loop starts stopped.
	pub fn new(config: EffectsConfig, viewport: Viewport, seed: u64) -> Self {
		let mut rng = SmallRng::seed_from_u64(seed);
		let pool = ParticlePool::new(&config.particles, viewport, &mut rng);
		Self {
			config,
			viewport,
			pool,
			frame_loop: FrameLoop::default(),
			enabled: true,
			rng,
		}
	}

	/// Advance the simulation one frame.
	pub fn update(&mut self) {
		self.pool
			.update(&self.config.particles, self.viewport, &mut self.rng);
	}

	/// One update+draw pass.
	pub fn frame<S: DrawSurface + ?Sized>(&mut self, surface: &S) {
		self.update();
		render::render(surface, &self.pool, &self.config.particles, self.viewport);
	}

	/// Body of a scheduled frame callback: one pass, then the next request.
	/// A callback that fires after the loop stopped does nothing. Returns
	/// whether a pass ran.
	pub fn scheduled_frame<D, S>(&mut self, surface: &D, scheduler: &S) -> bool
	where
		D: DrawSurface + ?Sized,
		S: FrameScheduler + ?Sized,
	{
		if !self.frame_loop.is_running() {
			return false;
		}
		self.frame(surface);
		self.frame_loop.rearm(scheduler);
		true
	}

	/// Adopt a new viewport and regenerate the whole pool for it.
	pub fn resize(&mut self, viewport: Viewport) {
		debug!(
			"background-effects: resize to {}x{}",
			viewport.width, viewport.height
		);
		self.viewport = viewport;
		self.regenerate();
	}

	/// Pointer moved to (`x`, `y`) in viewport coordinates.
	pub fn pointer_move(&mut self, x: f64, y: f64) {
		interaction::attract(&mut self.pool, x, y);
	}

	/// Spawn a burst at (`x`, `y`).
	pub fn click(&mut self, x: f64, y: f64) {
		interaction::burst(&mut self.pool, x, y, &self.config.particles, &mut self.rng);
	}

	/// Scale all opacities by `level` and give ambient particles new base
	/// opacities under the new ceiling. Returns the clamped level.
	pub fn set_intensity(&mut self, level: f64) -> f64 {
		let level = self.config.apply_intensity(level);
		self.pool
			.rerandomize_base_opacity(self.config.particles.opacity, &mut self.rng);
		debug!("background-effects: intensity {level}");
		level
	}

	/// Change the ambient particle target and regenerate the pool.
	pub fn set_particle_count(&mut self, count: usize) {
		self.config.particles.count = count;
		self.regenerate();
		debug!("background-effects: particle count {count}");
	}

	/// Resolve a toggle request: `None` flips the current visibility.
	/// Returns the new visibility.
	pub fn toggle(&mut self, enabled: Option<bool>) -> bool {
		self.enabled = enabled.unwrap_or(!self.enabled);
		self.enabled
	}

	fn regenerate(&mut self) {
		self.pool
			.regenerate(&self.config.particles, self.viewport, &mut self.rng);
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;

	use super::*;
	use crate::components::background_effects::interaction::{BURST_COUNT, POINTER_OPACITY_CAP};

	#[derive(Default)]
	struct FakeScheduler {
		next: RefCell<i32>,
		cancelled: RefCell<Vec<i32>>,
	}

	impl FrameScheduler for FakeScheduler {
		fn request(&self) -> Option<i32> {
			let mut next = self.next.borrow_mut();
			*next += 1;
			Some(*next)
		}

		fn cancel(&self, handle: i32) {
			self.cancelled.borrow_mut().push(handle);
		}
	}

	/// Counts clears, one per drawn frame.
	#[derive(Default)]
	struct CountingSurface {
		clears: RefCell<u32>,
	}

	impl DrawSurface for CountingSurface {
		fn clear(&self, _: f64, _: f64) {
			*self.clears.borrow_mut() += 1;
		}
		fn save(&self) {}
		fn restore(&self) {}
		fn set_global_alpha(&self, _: f64) {}
		fn set_fill_color(&self, _: &str) {}
		fn set_stroke_color(&self, _: &str) {}
		fn set_line_width(&self, _: f64) {}
		fn translate(&self, _: f64, _: f64) {}
		fn rotate(&self, _: f64) {}
		fn begin_path(&self) {}
		fn move_to(&self, _: f64, _: f64) {}
		fn line_to(&self, _: f64, _: f64) {}
		fn close_path(&self) {}
		fn arc(&self, _: f64, _: f64, _: f64) {}
		fn rect(&self, _: f64, _: f64, _: f64, _: f64) {}
		fn fill(&self) {}
		fn stroke(&self) {}
	}

	fn state() -> EffectsState {
		EffectsState::new(
			EffectsConfig::default(),
			Viewport {
				width: 1024.0,
				height: 768.0,
			},
			42,
		)
	}

	#[test]
	fn loop_starts_stopped() {
		assert_eq!(FrameLoop::default().state(), LoopState::Stopped);
	}

	#[test]
	fn start_schedules_a_frame() {
		let scheduler = FakeScheduler::default();
		let mut frame_loop = FrameLoop::default();
		frame_loop.start(&scheduler);
		assert_eq!(frame_loop.state(), LoopState::Running { pending: Some(1) });
		assert!(scheduler.cancelled.borrow().is_empty());
	}

	#[test]
	fn restart_cancels_pending_frame() {
		let scheduler = FakeScheduler::default();
		let mut frame_loop = FrameLoop::default();
		frame_loop.start(&scheduler);
		frame_loop.start(&scheduler);
		assert_eq!(*scheduler.cancelled.borrow(), vec![1]);
		assert_eq!(frame_loop.state(), LoopState::Running { pending: Some(2) });
	}

	#[test]
	fn stop_cancels_and_prevents_rearm() {
		let scheduler = FakeScheduler::default();
		let mut frame_loop = FrameLoop::default();
		frame_loop.start(&scheduler);
		frame_loop.stop(&scheduler);
		assert_eq!(*scheduler.cancelled.borrow(), vec![1]);

		frame_loop.rearm(&scheduler);
		assert_eq!(frame_loop.state(), LoopState::Stopped);
		assert_eq!(*scheduler.next.borrow(), 1);
	}

	#[test]
	fn rearm_keeps_running() {
		let scheduler = FakeScheduler::default();
		let mut frame_loop = FrameLoop::default();
		frame_loop.start(&scheduler);
		for expected in 2..5 {
			frame_loop.rearm(&scheduler);
			assert_eq!(
				frame_loop.state(),
				LoopState::Running {
					pending: Some(expected)
				}
			);
		}
	}

	#[test]
	fn stop_when_stopped_cancels_nothing() {
		let scheduler = FakeScheduler::default();
		let mut frame_loop = FrameLoop::default();
		frame_loop.stop(&scheduler);
		assert!(scheduler.cancelled.borrow().is_empty());
	}

	#[test]
	fn intensity_zero_and_back() {
		let mut state = state();
		state.set_intensity(0.0);
		assert_eq!(state.config.particles.opacity, 0.0);
		assert_eq!(state.config.surface_opacity, 0.0);
		assert!(state.pool.particles.iter().all(|p| p.base_opacity == 0.0));

		state.set_intensity(1.0);
		assert_eq!(state.config.particles.opacity, 0.5);
		assert_eq!(state.config.surface_opacity, 0.7);
		assert!(
			state
				.pool
				.particles
				.iter()
				.all(|p| (0.1..0.5).contains(&p.base_opacity))
		);
	}

	#[test]
	fn intensity_zero_keeps_particles_invisible() {
		let mut state = state();
		state.set_intensity(0.0);
		for _ in 0..20 {
			state.update();
		}
		assert!(state.pool.particles.iter().all(|p| p.opacity == 0.0));
	}

	#[test]
	fn lowering_intensity_dims_live_bursts() {
		let mut state = state();
		state.click(100.0, 100.0);
		state.set_intensity(0.0);
		state.update();
		let ceiling = state.config.particles.opacity;
		for p in state.pool.particles.iter().filter(|p| p.is_burst()) {
			assert!(p.opacity <= ceiling, "burst opacity {} above {ceiling}", p.opacity);
		}

		state.set_intensity(0.3);
		state.click(100.0, 100.0);
		for _ in 0..5 {
			state.update();
			let ceiling = state.config.particles.opacity;
			assert!(state.pool.particles.iter().all(|p| p.opacity <= ceiling));
		}
	}

	#[test]
	fn scheduled_frame_draws_and_rearms_while_running() {
		let (scheduler, surface) = (FakeScheduler::default(), CountingSurface::default());
		let mut state = state();
		state.frame_loop.start(&scheduler);

		assert!(state.scheduled_frame(&surface, &scheduler));
		assert_eq!(*surface.clears.borrow(), 1);
		assert_eq!(state.frame_loop.state(), LoopState::Running { pending: Some(2) });
	}

	#[test]
	fn late_frame_after_stop_does_nothing() {
		let (scheduler, surface) = (FakeScheduler::default(), CountingSurface::default());
		let mut state = state();
		state.frame_loop.start(&scheduler);
		state.frame_loop.stop(&scheduler);
		let before: Vec<_> = state.pool.particles.iter().map(|p| (p.x, p.y)).collect();

		assert!(!state.scheduled_frame(&surface, &scheduler));
		assert_eq!(*surface.clears.borrow(), 0);
		assert_eq!(state.frame_loop.state(), LoopState::Stopped);
		assert_eq!(*scheduler.next.borrow(), 1);
		let after: Vec<_> = state.pool.particles.iter().map(|p| (p.x, p.y)).collect();
		assert_eq!(before, after);
	}

	#[test]
	fn particle_count_change_applies_after_one_update() {
		let mut state = state();
		state.click(10.0, 10.0);
		state.set_particle_count(12);
		state.update();
		assert_eq!(state.pool.ambient_count(), 12);
		assert_eq!(state.pool.len(), 12);
	}

	#[test]
	fn resize_regenerates_inside_new_bounds() {
		let mut state = state();
		state.resize(Viewport {
			width: 100.0,
			height: 50.0,
		});
		assert_eq!(state.pool.len(), 32);
		assert!(
			state
				.pool
				.particles
				.iter()
				.all(|p| p.x < 100.0 && p.y < 50.0)
		);
	}

	#[test]
	fn click_adds_bursts_without_touching_ambient() {
		let mut state = state();
		state.click(500.0, 400.0);
		assert_eq!(state.pool.burst_count(), BURST_COUNT);
		assert_eq!(state.pool.ambient_count(), 32);
	}

	#[test]
	fn pointer_boost_stays_under_cap() {
		let mut state = state();
		for p in &mut state.pool.particles {
			p.x = 200.0;
			p.y = 200.0;
		}
		state.pointer_move(205.0, 200.0);
		assert!(
			state
				.pool
				.particles
				.iter()
				.all(|p| (0.0..=POINTER_OPACITY_CAP).contains(&p.opacity))
		);
	}

	#[test]
	fn toggle_without_argument_flips() {
		let mut state = state();
		assert!(!state.toggle(None));
		assert!(state.toggle(None));
		assert!(!state.toggle(Some(false)));
		assert!(!state.toggle(Some(false)));
		assert!(state.toggle(Some(true)));
	}
}
