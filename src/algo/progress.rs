//! Progress reporting for subdivision and decimation.
//!
//! # Example
//!
//! ```
//! use winged::algo::progress::Progress;
//! use winged::algo::subdivide::{subdivide_with_progress, SubdivideOptions, Scheme};
//! use winged::mesh::build_from_triangles;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//! let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
//! let table = build_from_triangles(&vertices, &faces).unwrap();
//!
//! let progress = Progress::new(|current, total, message| {
//!     println!("[{}/{}] {}", current, total, message);
//! });
//! subdivide_with_progress(&table, &SubdivideOptions::new(Scheme::Loop, 2), &progress).unwrap();
//! ```

/// A progress callback that receives updates during long-running operations.
///
/// The callback receives the steps completed so far, the total number of
/// steps, and a short description of the running operation.
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
}

impl Progress {
    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report progress.
    #[inline]
    pub fn report(&self, current: usize, total: usize, message: &str) {
        (self.callback)(current, total, message);
    }

    /// Create a no-op progress reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}
