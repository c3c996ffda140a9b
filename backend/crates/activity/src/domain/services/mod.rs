//! Domain Services
//!
//! Pure functions over events: distances, filters and orderings.

pub mod distance;
pub mod filter;
pub mod sorting;
