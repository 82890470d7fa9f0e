//! Ambient background effects.
//!
//! Draws a slowly drifting particle field on a fixed full-viewport canvas
//! behind the page, with:
//! - Connection lines between nearby particles
//! - Pointer attraction and brightening
//! - Click bursts that fall and fade
//! - A procedural noise texture layered into the body background
//!
//! The simulation ([`EffectsState`]) is plain Rust; [`Controller`] wires it
//! into the browser. Leptos apps mount [`BackgroundEffects`], other pages
//! call `startBackgroundEffects()` from JavaScript.
//!
//! # Example
//!
//! ```ignore
//! use ambient_field::BackgroundEffects;
//!
//! let (intensity, set_intensity) = signal(0.6);
//! view! { <BackgroundEffects intensity=intensity /> }
//! ```

mod component;
pub mod config;
mod control;
mod controller;
mod interaction;
pub mod noise;
pub mod particles;
pub mod render;
pub mod state;
pub mod theme;

pub use component::BackgroundEffects;
pub use config::EffectsConfig;
pub use control::{BackgroundControl, start_background_effects};
pub use controller::{Controller, InitError};
pub use state::EffectsState;
