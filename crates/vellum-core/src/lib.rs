#![forbid(unsafe_code)]

//! `vellum-core` is the host-agnostic surface model for the Vellum bridge.
//!
//! Design goals:
//! - **No transport, no DOM**: the surface is a deterministic in-memory model
//!   that a thin browser shim can mirror; all I/O lives in `vellum-web`.
//! - **Deterministic queries**: content extents, markup, and coordinate
//!   mapping are pure functions of surface state.
//! - **Opaque tagged nodes**: elements carry a tag, a host-assigned logical
//!   name, and merged attribute/style/text state; no nested structure.

pub mod geometry;
pub mod markup;
pub mod node;
pub mod surface;
pub mod transform;

pub use geometry::BBox;
pub use node::{ElementNode, NodeId};
pub use surface::{Dimension, Surface, SurfaceParams};
pub use transform::Transform2d;
