//! Service layer: business logic orchestration.
//!
//! [`EventCoordinator`] is the only place the three collections are kept
//! consistent; it runs the derivation pipeline on every event write and
//! emits changes through the [`crate::domain::ChangeFeed`].

pub mod coordinator;

pub use coordinator::EventCoordinator;
