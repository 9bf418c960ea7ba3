//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and converter driver implementations.

pub mod load_cell;

pub use load_cell::LoadCell;
