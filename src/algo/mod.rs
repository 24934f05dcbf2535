//! Mesh processing algorithms.
//!
//! - **Subdivision**: Loop and modified Butterfly, each pass producing a new table
//! - **Decimation**: quadric-error edge collapse over sampled candidates, in place
//!
//! Both require a closed manifold whose vertices all have degree at least 3.

pub mod decimate;
pub mod progress;
pub mod subdivide;

pub use progress::Progress;
