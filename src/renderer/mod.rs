//! WebGPU rendering module
//!
//! Each frame is rebuilt on the CPU as a flat-coloured triangle list in
//! logical window pixels and uploaded in one draw call.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod text;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{fps_overlay, kingdom_frame, shooter_frame};
pub use vertex::Vertex;
