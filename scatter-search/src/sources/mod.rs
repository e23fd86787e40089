//! Source implementations.
//!
//! Each module provides a struct implementing [`crate::source::Source`].

pub mod simulated;

pub use simulated::SimulatedSource;
