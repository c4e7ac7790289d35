//! Ambient particle background.
//!
//! Renders a decorative particle animation on an HTML canvas:
//! - Streaks that travel at right angles leaving short trails ("circuit")
//! - Spinning shapes bouncing off the viewport edges ("hyper geometry")
//! - Pointer repulsion
//! - Population rebuilt for the new viewport after resizing settles
//!
//! # Example
//!
//! ```ignore
//! use ambient_particles::{AmbientParticles, EngineConfig};
//!
//! view! { <AmbientParticles config=EngineConfig::hyper_geometry() /> }
//! ```
//!
//! Without Leptos, [`attach`] binds to any existing canvas by id.

mod component;
pub mod config;
mod engine;
pub mod particles;
pub mod render;
mod resize;
pub mod simulation;
mod state;
pub mod theme;

pub use component::AmbientParticles;
pub use config::{EngineConfig, Preset};
pub use engine::{EngineHandle, attach};
pub use theme::{Color, Palette};
