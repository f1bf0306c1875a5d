//! # olivemind-gateway
//!
//! REST API and WebSocket gateway for the Olive Mind Marketing staffing
//! workflow.
//!
//! Managers create calendar events (promotional gigs); each event write
//! derives a formatted confirmation message and one payment record per
//! assigned promoter, and keeps all three collections in sync across
//! edits and deletes. Supervisors read the same data. The derivation
//! pipeline runs once against a store abstraction, so the in-process and
//! PostgreSQL backends share identical semantics.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── EventCoordinator (service/)
//!     ├── ChangeFeed (domain/)
//!     │
//!     ├── WorkStore trait (store/)
//!     ├── MemoryStore │ PgStore
//!     │
//!     └── PostgreSQL (optional backend)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod store;
pub mod ws;
