//! UI components.

pub mod background_effects;
