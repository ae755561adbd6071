//! TokenSwap Common Types
//!
//! This crate contains shared types used across the TokenSwap workspace,
//! including identifiers, fixed-point amount types, swap requests and the
//! error taxonomy every component reports through.

pub mod identifiers;
pub mod monetary;
pub mod swap;
pub mod error;

pub use identifiers::*;
pub use monetary::*;
pub use swap::*;
pub use error::*;
