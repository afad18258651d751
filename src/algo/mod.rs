//! Mesh editing algorithms.
//!
//! - **Subdivision**: linear and Catmull-Clark subdivision, with optional
//!   face-point translation ([`subdivide`])
//! - **Face transforms**: extrusion, offsetting and parametric splitting of
//!   single faces, plus mesh-wide wrappers ([`transform`])
//! - **Colouring**: scalar-to-hue face decorators ([`colorize`])

pub mod colorize;
pub mod progress;
pub mod subdivide;
pub mod transform;

pub use progress::Progress;
