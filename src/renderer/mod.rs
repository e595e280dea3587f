//! Rendering module
//!
//! The scene builder turns game state into a pixel-space triangle list;
//! the WebGPU pipeline uploads and presents it.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod starfield;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{SceneView, build_frame};
pub use starfield::Starfield;
pub use vertex::Vertex;
