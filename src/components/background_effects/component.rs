//! Leptos component running the background effects while mounted.
//!
//! The component renders nothing itself: the controller appends its own
//! fixed canvas to the body. Reactive props map onto the controller's
//! control methods, and unmounting tears the effects down.

use leptos::prelude::*;
use log::info;

use super::config::EffectsConfig;
use super::controller::Controller;

/// Decorative particle field and noise texture behind the page.
///
/// Does nothing when the user prefers reduced motion.
#[component]
pub fn BackgroundEffects(
	/// Effect strength in [0, 1]. Defaults to full strength.
	#[prop(into, optional)]
	intensity: Option<Signal<f64>>,
	/// Whether the particle field is shown and animating.
	#[prop(into, optional)]
	enabled: Option<Signal<bool>>,
	/// Number of ambient particles. Defaults to 32.
	#[prop(into, optional)]
	particle_count: Option<Signal<usize>>,
) -> impl IntoView {
	let controller = StoredValue::new_local(None::<Controller>);

	Effect::new(move |_| {
		if controller.with_value(Option::is_some) {
			return;
		}

		let mut config = EffectsConfig::default();
		if let Some(count) = particle_count {
			config.particles.count = count.get_untracked();
		}

		match Controller::init(config) {
			Ok(c) => {
				if let Some(level) = intensity {
					c.set_intensity(level.get_untracked());
				}
				if let Some(enabled) = enabled {
					c.toggle(Some(enabled.get_untracked()));
				}
				controller.set_value(Some(c));
			}
			Err(e) => info!("background-effects: not started: {e}"),
		}
	});

	if let Some(intensity) = intensity {
		Effect::new(move |_| {
			let level = intensity.get();
			controller.with_value(|c| {
				if let Some(c) = c {
					c.set_intensity(level);
				}
			});
		});
	}

	if let Some(enabled) = enabled {
		Effect::new(move |_| {
			let enabled = enabled.get();
			controller.with_value(|c| {
				if let Some(c) = c {
					c.toggle(Some(enabled));
				}
			});
		});
	}

	if let Some(count) = particle_count {
		Effect::new(move |_| {
			let count = count.get();
			controller.with_value(|c| {
				if let Some(c) = c {
					c.set_particle_count(count);
				}
			});
		});
	}

	on_cleanup(move || {
		// Dropping the controller removes the canvas and listeners.
		controller.try_update_value(Option::take);
	});
}
