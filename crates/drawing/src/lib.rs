//! Glowdraw drawing engine - free-hand strokes on a 3D ground plane
//!
//! This crate turns pointer input into persistent colored strokes and
//! everything derived from them:
//! - [`types`] - points, colors and strokes
//! - [`store`] - stroke collection with linear undo history
//! - [`eraser`] - whole-stroke proximity eraser
//! - [`raycast`] / [`surface`] - camera rays and pointer-to-surface mapping
//! - [`particles`] - glow particles emitted while drawing
//! - [`mesh`] - display and export geometry for strokes
//! - [`scene`] - rendering boundary traits
//! - [`export`] - GLB model and PNG image export
//! - [`session`] - the session object input and frame callbacks go through

pub mod eraser;
pub mod export;
pub mod mesh;
pub mod particles;
pub mod raycast;
pub mod scene;
pub mod session;
pub mod store;
pub mod surface;
pub mod types;

pub use export::{ExportBlob, ExportError};
pub use mesh::*;
pub use particles::*;
pub use raycast::*;
pub use scene::*;
pub use session::*;
pub use store::*;
pub use surface::*;
pub use types::*;
