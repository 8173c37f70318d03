//! Route handlers for the HTTP gateway.
//!
//! Parameters arrive as a raw string map and are validated by hand so every
//! rejection produces the structured 400 body, with no side effect having
//! happened yet.  Privileged routes check the permission gate before
//! touching any device.
//!
//! Handlers never block on serial I/O: the serial plugin exposes only its
//! last-line diagnostic, and pointer emissions are sub-millisecond device
//! writes.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde_json::{json, Value};
use tracing::warn;

use bridge_core::{clamp_delta, API_MOVE_LIMIT};

use super::{ApiError, AppState};

type Params = Query<HashMap<String, String>>;

fn require<'a>(params: &'a HashMap<String, String>, key: &str) -> Result<&'a str, ApiError> {
    params
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("missing required parameter '{key}'")))
}

fn require_int(params: &HashMap<String, String>, key: &str) -> Result<i32, ApiError> {
    require(params, key)?
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("parameter '{key}' must be an integer")))
}

/// Boolean flags on the wire are literal `0` / `1`.
fn require_flag(params: &HashMap<String, String>, key: &str) -> Result<bool, ApiError> {
    match require(params, key)? {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(ApiError::BadRequest(format!(
            "parameter '{key}' must be 0 or 1"
        ))),
    }
}

/// `GET /status` — full observable state in one poll.
pub async fn status(State(state): State<Arc<AppState>>) -> Json<Value> {
    let plugins = state.registry.describe_all();
    let enabled = plugins.iter().filter(|p| p.enabled).count();
    let connectable = state
        .catalog
        .connectable_apps(|id| state.connections.is_connected(id));

    Json(json!({
        "plugins": plugins,
        "enabled_plugins": enabled,
        "serial_data": state.serial.last_line().unwrap_or_else(|| "None".to_string()),
        "connectable_apps": connectable,
        "connections": state.connections.snapshot(),
    }))
}

/// `GET /connect?app_id=` — mark an app connected.
pub async fn connect(
    State(state): State<Arc<AppState>>,
    Query(params): Params,
) -> Result<Json<Value>, ApiError> {
    let app_id = require(&params, "app_id")?;
    state.connections.connect(app_id);
    Ok(Json(json!({ "ok": true, "app_id": app_id, "connected": true })))
}

/// `GET /disconnect?app_id=` — mark an app disconnected; arm the shutdown
/// supervisor when nobody is left.
pub async fn disconnect(
    State(state): State<Arc<AppState>>,
    Query(params): Params,
) -> Result<Json<Value>, ApiError> {
    let app_id = require(&params, "app_id")?;
    let armed = disconnect_and_maybe_arm(&state, app_id);
    Ok(Json(
        json!({ "ok": true, "app_id": app_id, "connected": false, "shutdown_armed": armed }),
    ))
}

/// `GET /shutdown?app_id=` — explicit leave notification from a closing
/// app page.  Same semantics as `/disconnect`; the separate route lets the
/// client say what it means.
pub async fn shutdown(
    State(state): State<Arc<AppState>>,
    Query(params): Params,
) -> Result<Json<Value>, ApiError> {
    let app_id = require(&params, "app_id")?;
    let armed = disconnect_and_maybe_arm(&state, app_id);
    Ok(Json(json!({ "ok": true, "shutdown_armed": armed })))
}

fn disconnect_and_maybe_arm(state: &AppState, app_id: &str) -> bool {
    state.connections.disconnect(app_id);
    let armed = state.connections.count_connected() == 0;
    if armed {
        state.supervisor.arm();
    }
    armed
}

/// `GET /plugin/toggle?id=&enabled=` — lifecycle control from the trusted
/// local UI; no `app_id` gate.
pub async fn plugin_toggle(
    State(state): State<Arc<AppState>>,
    Query(params): Params,
) -> Result<Json<Value>, ApiError> {
    let id = require(&params, "id")?;
    let enabled = require_flag(&params, "enabled")?;
    state.registry.set_enabled(id, enabled)?;
    Ok(Json(json!({ "ok": true, "id": id, "enabled": enabled })))
}

/// `GET /mouse/move?app_id=&dx=&dy=` — privileged relative move.
pub async fn mouse_move(
    State(state): State<Arc<AppState>>,
    Query(params): Params,
) -> Result<Json<Value>, ApiError> {
    let app_id = require(&params, "app_id")?;
    let dx = require_int(&params, "dx")?;
    let dy = require_int(&params, "dy")?;
    state.gate.check_privileged(app_id)?;

    let dx = clamp_delta(dx, API_MOVE_LIMIT);
    let dy = clamp_delta(dy, API_MOVE_LIMIT);
    state.pointer.move_rel(dx, dy).map_err(|e| {
        warn!("api pointer move failed: {e}");
        ApiError::Internal(e.to_string())
    })?;
    Ok(Json(json!({ "ok": true, "dx": dx, "dy": dy })))
}

/// `GET /mouse/click?app_id=` — privileged left click.
pub async fn mouse_click(
    State(state): State<Arc<AppState>>,
    Query(params): Params,
) -> Result<Json<Value>, ApiError> {
    let app_id = require(&params, "app_id")?;
    state.gate.check_privileged(app_id)?;

    state.pointer.click().map_err(|e| {
        warn!("api pointer click failed: {e}");
        ApiError::Internal(e.to_string())
    })?;
    Ok(Json(json!({ "ok": true })))
}

/// `GET /led/set?app_id=&on=` — privileged LED stub.
pub async fn led_set(
    State(state): State<Arc<AppState>>,
    Query(params): Params,
) -> Result<Json<Value>, ApiError> {
    let app_id = require(&params, "app_id")?;
    let on = require_flag(&params, "on")?;
    state.gate.check_privileged(app_id)?;

    state.led.set_led(on);
    Ok(Json(json!({ "ok": true, "on": on })))
}

/// `GET /temp/read?app_id=` — privileged stub temperature read.
pub async fn temp_read(
    State(state): State<Arc<AppState>>,
    Query(params): Params,
) -> Result<Json<Value>, ApiError> {
    let app_id = require(&params, "app_id")?;
    state.gate.check_privileged(app_id)?;

    let temp = state.temp.read_temp();
    Ok(Json(json!({ "ok": true, "temp": temp })))
}

/// Fallback for unknown routes: same JSON error shape as everything else.
pub async fn not_found() -> ApiError {
    ApiError::NotFound("no such route".to_string())
}
