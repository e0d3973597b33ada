//! # Bastion World
//!
//! Level geometry for Bastion.
//!
//! This crate handles:
//! - Chunk storage (walls per grid cell)
//! - BSP wall generation and the spawn room
//! - Background chunk streaming around the camera

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod chunk;
pub mod generation;
pub mod streaming;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::chunk::*;
    pub use crate::generation::*;
    pub use crate::streaming::*;
}

pub use prelude::*;
