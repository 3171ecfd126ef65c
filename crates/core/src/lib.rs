//! Placement tracker domain core.
//!
//! Pure types and rules shared by the persistence, tracker and HTTP crates.
//! Nothing in this crate performs I/O.

pub mod channels;
pub mod error;
pub mod participation;
pub mod policy;
pub mod roles;
pub mod stats;
pub mod types;
