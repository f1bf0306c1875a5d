//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` pushes change events to clients in
//! real time, standing in for the hosted database's change
//! notifications. Clients subscribe per event ID or with a wildcard.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
