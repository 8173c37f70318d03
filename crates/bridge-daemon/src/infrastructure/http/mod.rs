//! The loopback HTTP gateway.
//!
//! A small axum router over one shared [`AppState`].  All routes are GET
//! with query parameters and JSON responses — the clients are local app
//! pages driving the bridge with plain `fetch` calls, not a REST surface.
//!
//! The gateway binds to loopback only; permission is enforced per request
//! by the [`PermissionGate`](crate::application::PermissionGate), not by
//! transport identity.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use crate::application::{PermissionGate, PluginRegistry, ShutdownSupervisor};
use crate::infrastructure::pointer::VirtualPointer;
use crate::infrastructure::serial::link::SerialLinkPlugin;
use crate::infrastructure::store::{CatalogStore, ConnectionStore};
use crate::infrastructure::stubs::{LedPlugin, TempPlugin};

pub mod error;
pub mod handlers;

pub use error::ApiError;

/// Everything the handlers need, shared as one `Arc`.
///
/// Concrete plugin operations (LED, temperature, serial diagnostics) go
/// through typed handles to the same instances that sit in the registry as
/// `Arc<dyn Plugin>`; the registry itself is only consulted for lifecycle
/// and description.
pub struct AppState {
    pub registry: PluginRegistry,
    pub connections: Arc<ConnectionStore>,
    pub catalog: Arc<CatalogStore>,
    pub gate: PermissionGate,
    pub supervisor: ShutdownSupervisor,
    pub pointer: Arc<VirtualPointer>,
    pub serial: Arc<SerialLinkPlugin>,
    pub led: Arc<LedPlugin>,
    pub temp: Arc<TempPlugin>,
}

/// Builds the full route table.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/status", get(handlers::status))
        .route("/connect", get(handlers::connect))
        .route("/disconnect", get(handlers::disconnect))
        .route("/shutdown", get(handlers::shutdown))
        .route("/plugin/toggle", get(handlers::plugin_toggle))
        .route("/mouse/move", get(handlers::mouse_move))
        .route("/mouse/click", get(handlers::mouse_click))
        .route("/led/set", get(handlers::led_set))
        .route("/temp/read", get(handlers::temp_read))
        .fallback(handlers::not_found)
        .with_state(state)
}
