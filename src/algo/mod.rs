//! Mesh editing algorithms.
//!
//! - **Deletion**: remove vertices together with every face touching them
//! - **Rebuild**: re-insert the live part of a mesh into a fresh one
//! - **Boundary**: find the border loops (holes) and classify them by size
//! - **Pipeline**: all of the above as one call, with per-stage statistics
//!
//! Long-running steps can be measured through a [`TimingHook`].

pub mod boundary;
pub mod delete;
pub mod pipeline;
pub mod rebuild;
pub mod timing;

pub use timing::TimingHook;
