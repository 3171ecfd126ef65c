//! Placement tracker event bus.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`] -- the event envelope, addressed to a named channel
//!   such as `student-42`.

pub mod bus;

pub use bus::{EventBus, PlatformEvent};
