//! UI components.

pub mod ambient_particles;
pub mod scroll_reveal;
