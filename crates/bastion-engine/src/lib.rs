//! # Bastion Engine
//!
//! Runs the Bastion boss fight.
//!
//! This crate ties together the level, the entities and the collision
//! resolver:
//! - World: fixed-tick simulation and round state
//! - Config: TOML game configuration
//! - Timing: fixed-rate tick accumulator
//! - Render: renderer contract, palettes and frame composition

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod render;
pub mod timing;
pub mod world;


/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::*;
    pub use crate::render::*;
    pub use crate::timing::*;
    pub use crate::world::*;
}

pub use prelude::*;
