//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::ChangeFeed;
use crate::service::EventCoordinator;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Lifecycle coordinator for all business logic.
    pub coordinator: Arc<EventCoordinator>,
    /// Change feed for WebSocket subscriptions.
    pub change_feed: ChangeFeed,
}
