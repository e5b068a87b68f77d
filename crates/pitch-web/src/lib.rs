//! WASM bridge: mounts a tactical board on a DOM element and exports
//! free functions for the page to drive it.
//!
//! wasm-bindgen cannot export a stateful struct with DOM closures attached,
//! so the mounted board lives in a `thread_local!` and every export goes
//! through `with_mount`.

pub mod listeners;
pub mod mount;

use std::cell::RefCell;

use pitch_engine::{DiagramKind, EntityId, InputEvent, TransitionStatus};
use wasm_bindgen::prelude::*;

pub use mount::Mount;

thread_local! {
    static MOUNT: RefCell<Option<Mount>> = const { RefCell::new(None) };
    static ON_METRICS: RefCell<Option<js_sys::Function>> = const { RefCell::new(None) };
}

fn with_mount<R>(f: impl FnOnce(&mut Mount) -> Result<R, JsValue>) -> Result<R, JsValue> {
    let (result, pending) = MOUNT.with(|cell| {
        let mut borrow = cell
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("board is busy"))?;
        let mount = borrow
            .as_mut()
            .ok_or_else(|| JsValue::from_str("board not mounted. Call board_mount() first."))?;
        let result = f(mount);
        Ok::<_, JsValue>((result, mount.take_pending()))
    })?;
    // The page callback may call back into the board, so it runs after the
    // borrow is released.
    if let Some(json) = pending {
        notify_metrics(&json);
    }
    result
}

fn notify_metrics(json: &str) {
    let callback = ON_METRICS.with(|cell| cell.borrow().clone());
    if let Some(callback) = callback {
        if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(json)) {
            log::warn!("metrics callback threw: {:?}", e);
        }
    }
}

/// Queue input from a DOM listener. Dropped with a warning if nothing is mounted.
pub(crate) fn push_input(event: InputEvent) {
    MOUNT.with(|cell| match cell.try_borrow_mut() {
        Ok(mut slot) => match slot.as_mut() {
            Some(mount) => mount.board_mut().push_input(event),
            None => log::warn!("input {:?} after unmount", event),
        },
        Err(_) => log::warn!("input {:?} dropped, board busy", event),
    });
}

pub(crate) fn resize_mounted() {
    if let Err(e) = with_mount(|m| m.resize()) {
        log::warn!("resize failed: {:?}", e);
    }
}

// ---- Lifecycle ----

/// Mount a board on `#container_id`. `kind` is "formation" or "set-piece".
/// Replaces any board already mounted.
#[wasm_bindgen]
pub fn board_mount(container_id: &str, kind: &str, preset: &str) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let kind = DiagramKind::parse(kind)
        .ok_or_else(|| JsValue::from_str(&format!("unknown diagram kind `{kind}`")))?;

    board_unmount();
    let mount = Mount::attach(container_id, kind, preset)?;
    MOUNT.with(|cell| *cell.borrow_mut() = Some(mount));
    Ok(())
}

/// Remove the board, its DOM elements and its listeners.
#[wasm_bindgen]
pub fn board_unmount() {
    let previous = MOUNT.with(|cell| cell.borrow_mut().take());
    if previous.is_some() {
        log::info!("board unmounted");
    }
    // `previous` drops here, outside the borrow.
}

// ---- Presets ----

/// Animate to `name`. Returns "started", "queued" or "completed".
#[wasm_bindgen]
pub fn board_switch_preset(name: &str) -> Result<String, JsValue> {
    with_mount(|m| {
        let status = m.board_mut().switch_preset(name).map_err(mount::to_js)?;
        Ok(match status {
            TransitionStatus::Started { .. } => "started",
            TransitionStatus::Queued => "queued",
            TransitionStatus::Completed => "completed",
        }
        .to_string())
    })
}

#[wasm_bindgen]
pub fn board_apply_preset(name: &str) -> Result<(), JsValue> {
    with_mount(|m| {
        m.board_mut().apply_preset_instant(name).map_err(mount::to_js)?;
        m.project()
    })
}

/// Preset names available for the mounted board, as a JSON array.
#[wasm_bindgen]
pub fn board_preset_names() -> Result<String, JsValue> {
    with_mount(|m| {
        let names = m.board().presets().names(m.board().kind());
        serde_json::to_string(&names).map_err(|e| JsValue::from_str(&e.to_string()))
    })
}

#[wasm_bindgen]
pub fn board_active_preset() -> Result<String, JsValue> {
    with_mount(|m| Ok(m.board().active_preset().to_string()))
}

// ---- Frame ----

/// Advance the board and refresh the DOM. Call once per animation frame.
#[wasm_bindgen]
pub fn board_tick(dt: f32) -> Result<(), JsValue> {
    with_mount(|m| {
        m.board_mut().tick(dt);
        m.project()
    })
}

#[wasm_bindgen]
pub fn board_remove_marker(id: u32) -> Result<bool, JsValue> {
    with_mount(|m| Ok(m.remove_marker(EntityId(id))))
}

// ---- Metrics ----

/// Register the page's metrics callback. It receives the snapshot as JSON.
#[wasm_bindgen]
pub fn board_on_metrics(callback: js_sys::Function) {
    ON_METRICS.with(|cell| *cell.borrow_mut() = Some(callback));
}

#[wasm_bindgen]
pub fn board_metrics_json() -> Result<String, JsValue> {
    with_mount(|m| serde_json::to_string(m.board().metrics()).map_err(|e| JsValue::from_str(&e.to_string())))
}

#[wasm_bindgen]
pub fn board_insight() -> Result<String, JsValue> {
    with_mount(|m| Ok(m.board().metrics().insight().to_string()))
}

// ---- Data accessors ----

/// Events since the last call, flattened to `[kind, a, b, c, ...]`.
#[wasm_bindgen]
pub fn board_drain_events() -> Result<js_sys::Float32Array, JsValue> {
    with_mount(|m| {
        let flat: Vec<f32> = m
            .board_mut()
            .drain_events()
            .iter()
            .flat_map(|e| [e.kind, e.a, e.b, e.c])
            .collect();
        Ok(js_sys::Float32Array::from(&flat[..]))
    })
}

#[wasm_bindgen]
pub fn get_markers_ptr() -> *const f32 {
    with_mount(|m| Ok(m.board_mut().markers().instances_ptr())).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_marker_count() -> u32 {
    with_mount(|m| Ok(m.board_mut().markers().count())).unwrap_or(0)
}
