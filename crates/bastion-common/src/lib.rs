//! # Bastion Common
//!
//! Common types, utilities, and shared abstractions for Bastion.
//!
//! This crate provides foundational types used across all Bastion subsystems:
//! - Chunk coordinates and world-to-chunk mapping
//! - Geometry (rectangles, circles, segment tests, direction helpers)
//! - Intercept prediction for leading moving targets
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod error;
pub mod geometry;
pub mod prediction;

pub use glam::Vec2;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::error::*;
    pub use crate::geometry::*;
    pub use crate::prediction::*;
    pub use glam::Vec2;
}

pub use prelude::*;
