//! Curve geometry: Bezier segments and elliptic arcs.

pub mod arc;
pub mod bezier;

pub use arc::Arc;
pub use bezier::{Bezier, subdivide};
