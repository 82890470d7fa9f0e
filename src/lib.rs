//! ambient-field: decorative particle field and noise texture for web pages.
//!
//! This crate provides a WASM background effect that renders drifting,
//! pointer-aware particles on a canvas behind page content and layers a
//! procedural grain texture into the page background.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info};

pub mod components;

pub use components::background_effects::{
	BackgroundControl, BackgroundEffects, Controller, EffectsConfig, EffectsState, InitError,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("ambient-field: logging initialized");
}

/// Demo page: some foreground content over the background effects, with
/// controls for pausing and dimming them.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let (intensity, set_intensity) = signal(1.0);
	let (enabled, set_enabled) = signal(true);

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Ambient Field" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<BackgroundEffects intensity=intensity enabled=enabled />

		<main class="page-content">
			<h1>"Ambient Field"</h1>
			<p class="subtitle">"Move the pointer to draw particles in. Click to scatter a burst."</p>
			<div class="controls">
				<button on:click=move |_| set_enabled.update(|e| *e = !*e)>
					{move || if enabled.get() { "Pause effects" } else { "Resume effects" }}
				</button>
				<label>
					"Intensity "
					<input
						type="range"
						min="0"
						max="1"
						step="0.05"
						prop:value=move || intensity.get()
						on:input=move |ev| {
							if let Ok(level) = event_target_value(&ev).parse::<f64>() {
								set_intensity.set(level);
							}
						}
					/>
				</label>
			</div>
		</main>
	}
}
