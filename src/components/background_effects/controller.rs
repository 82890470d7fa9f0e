//! Browser wiring for the background effects.
//!
//! [`Controller`] owns the full-viewport canvas, the texture layer on the
//! page body, the DOM event listeners, and the `requestAnimationFrame`
//! callback. State is shared between those closures through
//! `Rc<RefCell<..>>`; everything runs on the single browser thread, so a
//! closure never observes another one mid-update.
//!
//! Dropping the controller (or calling [`Controller::destroy`]) stops the
//! loop, detaches every listener, removes the canvas, and restores the
//! page background.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Math;
use log::{info, warn};
use thiserror::Error;
use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{
	CanvasRenderingContext2d, Document, Event, EventTarget, HtmlCanvasElement, HtmlElement,
	ImageData, MouseEvent, Window,
};

use super::config::{EffectsConfig, TextureConfig};
use super::noise;
use super::particles::Viewport;
use super::state::{EffectsState, FrameScheduler};

const CANVAS_ID: &str = "background-canvas";
const CANVAS_STYLE: &str = "position: fixed; top: 0; left: 0; width: 100%; height: 100%; \
	pointer-events: none; z-index: -1;";
const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// Why the effects declined to start.
#[derive(Debug, Error)]
pub enum InitError {
	/// `prefers-reduced-motion: reduce` matched.
	#[error("user prefers reduced motion")]
	ReducedMotion,
	/// Not running in a browser window.
	#[error("no global window")]
	NoWindow,
	/// Window without a document.
	#[error("window has no document")]
	NoDocument,
	/// Document without a body yet.
	#[error("document has no body")]
	NoBody,
	/// Canvas 2D context unavailable.
	#[error("2d canvas context unavailable")]
	NoContext,
	/// A DOM call threw.
	#[error("DOM call failed: {0}")]
	Dom(String),
}

impl From<JsValue> for InitError {
	fn from(value: JsValue) -> Self {
		Self::Dom(format!("{value:?}"))
	}
}

/// Simulation state plus the context it is drawn with.
struct Shared {
	state: EffectsState,
	ctx: CanvasRenderingContext2d,
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// `requestAnimationFrame` as a [`FrameScheduler`].
#[derive(Clone)]
struct AnimationFrames {
	window: Window,
	callback: FrameCallback,
}

impl FrameScheduler for AnimationFrames {
	fn request(&self) -> Option<i32> {
		let callback = self.callback.borrow();
		let cb = callback.as_ref()?;
		self.window
			.request_animation_frame(cb.as_ref().unchecked_ref())
			.ok()
	}

	fn cancel(&self, handle: i32) {
		let _ = self.window.cancel_animation_frame(handle);
	}
}

/// An attached DOM listener, removed again on drop.
struct Listener {
	target: EventTarget,
	event: &'static str,
	callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
	fn new(
		target: &EventTarget,
		event: &'static str,
		handler: impl FnMut(Event) + 'static,
	) -> Result<Self, InitError> {
		let callback = Closure::<dyn FnMut(Event)>::new(handler);
		target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
		Ok(Self {
			target: target.clone(),
			event,
			callback,
		})
	}
}

impl Drop for Listener {
	fn drop(&mut self) {
		let _ = self
			.target
			.remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
	}
}

/// The noise texture appended to the body's inline background layers.
struct TextureLayer {
	body: HtmlElement,
	/// Inline `background-image` before the texture was added.
	original: String,
}

impl TextureLayer {
	fn new(body: HtmlElement) -> Self {
		let original = body
			.style()
			.get_property_value("background-image")
			.unwrap_or_default();
		Self { body, original }
	}

	/// Render the texture and put it behind the page's own layers,
	/// replacing any texture applied earlier.
	fn apply(&self, document: &Document, config: &TextureConfig) {
		let url = match texture_data_url(document, config) {
			Ok(url) => url,
			Err(e) => {
				warn!("background-effects: texture generation failed: {:?}", e);
				return;
			}
		};
		let layer = format!("url({url})");
		let value = if self.original.is_empty() || self.original == "none" {
			layer
		} else {
			format!("{}, {}", self.original, layer)
		};
		let _ = self.body.style().set_property("background-image", &value);
	}

	fn restore(&self) {
		let style = self.body.style();
		let _ = if self.original.is_empty() {
			style.remove_property("background-image").map(drop)
		} else {
			style.set_property("background-image", &self.original)
		};
	}
}

/// Encode the noise texture as a PNG data URL via an offscreen canvas.
fn texture_data_url(document: &Document, config: &TextureConfig) -> Result<String, JsValue> {
	let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
	canvas.set_width(config.size);
	canvas.set_height(config.size);

	let ctx: CanvasRenderingContext2d = canvas
		.get_context("2d")?
		.ok_or_else(|| JsValue::from_str("2d context unavailable"))?
		.dyn_into()?;

	let pixels = noise::texture_pixels(config);
	let image =
		ImageData::new_with_u8_clamped_array_and_sh(Clamped(pixels.as_slice()), config.size, config.size)?;
	ctx.put_image_data(&image, 0.0, 0.0)?;
	canvas.to_data_url()
}

fn prefers_reduced_motion(window: &Window) -> bool {
	window
		.match_media(REDUCED_MOTION_QUERY)
		.ok()
		.flatten()
		.is_some_and(|query| query.matches())
}

/// Current viewport in CSS pixels and the device pixel ratio.
fn measure(window: &Window) -> (Viewport, f64) {
	let dimension = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
	let viewport = Viewport {
		width: dimension(window.inner_width()),
		height: dimension(window.inner_height()),
	};
	let dpr = window.device_pixel_ratio();
	(viewport, if dpr > 0.0 { dpr } else { 1.0 })
}

/// Size the backing store for the pixel ratio and draw in CSS pixels.
fn fit_canvas(
	canvas: &HtmlCanvasElement,
	ctx: &CanvasRenderingContext2d,
	viewport: Viewport,
	dpr: f64,
) {
	canvas.set_width((viewport.width * dpr) as u32);
	canvas.set_height((viewport.height * dpr) as u32);
	let style = canvas.style();
	let _ = style.set_property("width", &format!("{}px", viewport.width));
	let _ = style.set_property("height", &format!("{}px", viewport.height));
	let _ = ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
}

fn client_position(event: &Event) -> Option<(f64, f64)> {
	let event = event.dyn_ref::<MouseEvent>()?;
	Some((event.client_x() as f64, event.client_y() as f64))
}

/// Owns the running background effects.
pub struct Controller {
	shared: Rc<RefCell<Shared>>,
	frames: AnimationFrames,
	document: Document,
	canvas: HtmlCanvasElement,
	texture: TextureLayer,
	listeners: Vec<Listener>,
}

impl Controller {
	/// Create the canvas and texture, attach listeners, and start animating.
	///
	/// Declines to start (without touching the page) when the user prefers
	/// reduced motion or the browser lacks what the effect needs.
	pub fn init(config: EffectsConfig) -> Result<Self, InitError> {
		let window = web_sys::window().ok_or(InitError::NoWindow)?;
		if prefers_reduced_motion(&window) {
			return Err(InitError::ReducedMotion);
		}
		let document = window.document().ok_or(InitError::NoDocument)?;
		let body = document.body().ok_or(InitError::NoBody)?;

		let canvas: HtmlCanvasElement = document
			.create_element("canvas")?
			.dyn_into()
			.map_err(|e| InitError::from(JsValue::from(e)))?;
		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")?
			.and_then(|ctx| ctx.dyn_into().ok())
			.ok_or(InitError::NoContext)?;

		canvas.set_id(CANVAS_ID);
		canvas.style().set_css_text(CANVAS_STYLE);
		let _ = canvas
			.style()
			.set_property("opacity", &config.surface_opacity.to_string());
		body.append_child(&canvas)?;

		let (viewport, dpr) = measure(&window);
		fit_canvas(&canvas, &ctx, viewport, dpr);

		let texture = TextureLayer::new(body);
		texture.apply(&document, &config.texture);

		let seed = (Math::random() * u64::MAX as f64) as u64;
		let shared = Rc::new(RefCell::new(Shared {
			state: EffectsState::new(config, viewport, seed),
			ctx,
		}));

		let frames = AnimationFrames {
			window: window.clone(),
			callback: Rc::new(RefCell::new(None)),
		};

		let (shared_anim, frames_anim) = (shared.clone(), frames.clone());
		*frames.callback.borrow_mut() = Some(Closure::new(move || {
			let mut guard = shared_anim.borrow_mut();
			let shared = &mut *guard;
			shared.state.scheduled_frame(&shared.ctx, &frames_anim);
		}));

		let mut controller = Self {
			shared,
			frames,
			document,
			canvas,
			texture,
			listeners: Vec::with_capacity(4),
		};
		// Dropping `controller` on error detaches whatever was attached so far.
		controller.attach_listeners(&window)?;

		let count = {
			let mut shared = controller.shared.borrow_mut();
			shared.state.frame_loop.start(&controller.frames);
			shared.state.pool.len()
		};
		info!("background-effects: initialized with {count} particles");
		Ok(controller)
	}

	fn attach_listeners(&mut self, window: &Window) -> Result<(), InitError> {
		let (shared, window_r, canvas) = (self.shared.clone(), window.clone(), self.canvas.clone());
		self.listeners.push(Listener::new(window, "resize", move |_| {
			let (viewport, dpr) = measure(&window_r);
			let mut shared = shared.borrow_mut();
			fit_canvas(&canvas, &shared.ctx, viewport, dpr);
			shared.state.resize(viewport);
		})?);

		let (shared, frames, document) =
			(self.shared.clone(), self.frames.clone(), self.document.clone());
		self.listeners.push(Listener::new(&self.document, "visibilitychange", move |_| {
			let mut shared = shared.borrow_mut();
			if document.hidden() {
				shared.state.frame_loop.stop(&frames);
			} else if shared.state.enabled {
				shared.state.frame_loop.start(&frames);
			}
		})?);

		let shared = self.shared.clone();
		self.listeners.push(Listener::new(&self.document, "mousemove", move |event| {
			if let Some((x, y)) = client_position(&event) {
				shared.borrow_mut().state.pointer_move(x, y);
			}
		})?);

		let shared = self.shared.clone();
		self.listeners.push(Listener::new(&self.document, "click", move |event| {
			if let Some((x, y)) = client_position(&event) {
				shared.borrow_mut().state.click(x, y);
			}
		})?);

		Ok(())
	}

	/// Scale particle, line, texture, and canvas opacity by `level` in [0, 1].
	pub fn set_intensity(&self, level: f64) {
		let mut shared = self.shared.borrow_mut();
		shared.state.set_intensity(level);
		let _ = self
			.canvas
			.style()
			.set_property("opacity", &shared.state.config.surface_opacity.to_string());
		self.texture.apply(&self.document, &shared.state.config.texture);
	}

	/// Show or hide the canvas and start or stop the loop. `None` flips the
	/// current visibility. Returns whether the effects are now enabled.
	pub fn toggle(&self, enabled: Option<bool>) -> bool {
		let mut shared = self.shared.borrow_mut();
		let enabled = shared.state.toggle(enabled);
		let _ = self
			.canvas
			.style()
			.set_property("display", if enabled { "block" } else { "none" });
		if enabled {
			shared.state.frame_loop.start(&self.frames);
		} else {
			shared.state.frame_loop.stop(&self.frames);
		}
		enabled
	}

	/// Change the ambient particle count and regenerate the pool.
	pub fn set_particle_count(&self, count: usize) {
		self.shared.borrow_mut().state.set_particle_count(count);
	}

	/// Snapshot of the current configuration.
	pub fn config(&self) -> EffectsConfig {
		self.shared.borrow().state.config.clone()
	}

	/// Whether the frame loop is active.
	pub fn is_running(&self) -> bool {
		self.shared.borrow().state.frame_loop.is_running()
	}

	/// Click-burst particles currently alive.
	pub fn burst_count(&self) -> usize {
		self.shared.borrow().state.pool.burst_count()
	}

	/// Tear everything down. Equivalent to dropping the controller.
	pub fn destroy(self) {
		drop(self);
	}
}

impl Drop for Controller {
	fn drop(&mut self) {
		if let Ok(mut shared) = self.shared.try_borrow_mut() {
			shared.state.frame_loop.stop(&self.frames);
		}
		self.listeners.clear();
		// Breaks the closure <-> scheduler reference cycle.
		self.frames.callback.borrow_mut().take();
		self.canvas.remove();
		self.texture.restore();
		info!("background-effects: destroyed");
	}
}
