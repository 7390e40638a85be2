//! Rendering module
//!
//! Scene code draws through the [`Surface`] contract into a [`DrawList`];
//! the WebGPU backend renders that list with SDFs in the fragment shader.

pub mod scene;
pub mod sdf_pipeline;
pub mod surface;
pub mod viewport;

pub use scene::draw_scene;
pub use sdf_pipeline::SdfRenderState;
pub use surface::{DrawList, Paint, Primitive, Surface};
pub use viewport::Viewport;
