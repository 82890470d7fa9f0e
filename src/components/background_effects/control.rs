//! JavaScript handle for pages that embed the effects without Leptos.
//!
//! ```js
//! import init, { startBackgroundEffects } from "./ambient_field.js";
//!
//! await init();
//! const effects = startBackgroundEffects();
//! effects?.setIntensity(0.5);
//! ```

use log::info;
use wasm_bindgen::prelude::*;

use super::config::{EffectsConfig, MAX_PARTICLE_COUNT};
use super::controller::Controller;

/// Control surface returned by `startBackgroundEffects`.
///
/// Every method is a no-op after `destroy`.
#[wasm_bindgen]
pub struct BackgroundControl {
	controller: Option<Controller>,
}

/// Start the background effects on the current page.
///
/// Returns `undefined` when the user prefers reduced motion or the page
/// cannot host the effects.
#[wasm_bindgen(js_name = startBackgroundEffects)]
pub fn start_background_effects() -> Option<BackgroundControl> {
	crate::init_logging();
	match Controller::init(EffectsConfig::default()) {
		Ok(controller) => Some(BackgroundControl {
			controller: Some(controller),
		}),
		Err(e) => {
			info!("background-effects: not started: {e}");
			None
		}
	}
}

/// Convert a script-supplied count into a pool size in
/// `[0, MAX_PARTICLE_COUNT]`, truncating fractions.
fn particle_count(count: f64) -> usize {
	if count.is_nan() || count <= 0.0 {
		0
	} else {
		count.min(MAX_PARTICLE_COUNT as f64) as usize
	}
}

#[wasm_bindgen]
impl BackgroundControl {
	/// Scale effect strength, `level` in [0, 1].
	#[wasm_bindgen(js_name = setIntensity)]
	pub fn set_intensity(&self, level: f64) {
		if let Some(c) = &self.controller {
			c.set_intensity(level);
		}
	}

	/// Show or hide the effects; omit `enabled` to flip. Returns the new state.
	pub fn toggle(&self, enabled: Option<bool>) -> bool {
		self.controller
			.as_ref()
			.is_some_and(|c| c.toggle(enabled))
	}

	/// The current configuration as a plain object.
	#[wasm_bindgen(js_name = getConfig)]
	pub fn get_config(&self) -> Result<JsValue, JsValue> {
		let Some(c) = &self.controller else {
			return Ok(JsValue::UNDEFINED);
		};
		let json =
			serde_json::to_string(&c.config()).map_err(|e| JsValue::from_str(&e.to_string()))?;
		js_sys::JSON::parse(&json)
	}

	/// Change the number of ambient particles. Negative or non-numeric
	/// counts mean none; large ones are capped.
	#[wasm_bindgen(js_name = setParticleCount)]
	pub fn set_particle_count(&self, count: f64) {
		if let Some(c) = &self.controller {
			c.set_particle_count(particle_count(count));
		}
	}

	/// Remove the effects from the page.
	pub fn destroy(&mut self) {
		if let Some(c) = self.controller.take() {
			c.destroy();
		}
	}
}
