use std::cell::RefCell;
use std::rc::Rc;

use pitch_engine::{
    Board, DiagramKind, DragState, EntityId, InputEvent, MarkerLayer, MetricsSnapshot,
};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Event, HtmlElement, KeyboardEvent, MouseEvent};

use crate::listeners::ListenerGuard;

const MARKER_ATTR: &str = "data-entity";

/// A board attached to a DOM container.
///
/// The board owns every position; the elements created here only mirror it
/// and are rewritten by `project` after each tick.
pub struct Mount {
    _listeners: ListenerGuard,
    board: Board,
    container: HtmlElement,
    markers: Vec<(EntityId, HtmlElement)>,
    zones: Vec<HtmlElement>,
    indicator: HtmlElement,
    pending: Rc<RefCell<Option<String>>>,
}

impl Mount {
    pub fn attach(container_id: &str, kind: DiagramKind, preset: &str) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let container: HtmlElement = document
            .get_element_by_id(container_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element #{container_id}")))?
            .dyn_into()?;

        let (width, height) = container_size(&container);
        let mut board = Board::mount_default(kind, width, height, preset).map_err(to_js)?;

        let pending = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&pending);
        board.subscribe(move |snapshot: &MetricsSnapshot| match serde_json::to_string(snapshot) {
            Ok(json) => *sink.borrow_mut() = Some(json),
            Err(e) => log::warn!("metrics not serializable: {e}"),
        });

        let mut zones = Vec::with_capacity(board.zones().len());
        for (index, zone) in board.zones().iter().enumerate() {
            let el = create_div(&document, "pitch-zone")?;
            el.set_attribute("data-zone", &index.to_string())?;
            el.set_attribute("title", &zone.label)?;
            let style = el.style();
            style.set_property("left", &percent(zone.center.x - zone.radius))?;
            style.set_property("top", &percent(zone.center.y - zone.radius))?;
            style.set_property("width", &percent(zone.radius * 2.0))?;
            style.set_property("height", &percent(zone.radius * 2.0))?;
            style.set_property("z-index", &MarkerLayer::Zones.z_index().to_string())?;
            container.append_child(&el)?;
            zones.push(el);
        }

        let mut markers = Vec::with_capacity(board.scene().len());
        for entity in board.scene().iter() {
            let el = create_div(&document, "pitch-marker")?;
            el.set_attribute(MARKER_ATTR, &entity.id.0.to_string())?;
            el.set_attribute("data-role", &entity.role)?;
            el.set_text_content(Some(&entity.role));
            container.append_child(&el)?;
            markers.push((entity.id, el));
        }

        let indicator = create_div(&document, "position-indicator")?;
        indicator.style().set_property("z-index", &MarkerLayer::Overlay.z_index().to_string())?;
        container.append_child(&indicator)?;

        let listeners = wire_listeners(&window, &document, &container)?;
        log::info!("mounted {} board on #{container_id} ({width}x{height})", kind.as_str());

        let mut mount = Self {
            _listeners: listeners,
            board,
            container,
            markers,
            zones,
            indicator,
            pending,
        };
        mount.project()?;
        Ok(mount)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// The latest metrics JSON, if it changed since the last call.
    pub fn take_pending(&self) -> Option<String> {
        self.pending.borrow_mut().take()
    }

    /// Write every marker position and the drag feedback into the DOM.
    pub fn project(&mut self) -> Result<(), JsValue> {
        let feedback = *self.board.feedback();
        let buffer = self.board.markers();

        for inst in &buffer.instances {
            let id = EntityId(inst.id as u32);
            let Some((_, el)) = self.markers.iter().find(|(m, _)| *m == id) else {
                continue;
            };
            let z = MarkerLayer::from_u8(inst.layer as u8).map_or(MarkerLayer::Markers.z_index(), MarkerLayer::z_index);
            let style = el.style();
            style.set_property("left", &percent(inst.x))?;
            style.set_property("top", &percent(inst.y))?;
            style.set_property("transform", &format!("translate(-50%, -50%) scale({})", inst.scale))?;
            style.set_property("z-index", &z.to_string())?;
            let classes = el.class_list();
            classes.toggle_with_force("dragging", inst.state == DragState::Dragging.as_u8() as f32)?;
            classes.toggle_with_force("transitioning", inst.state == DragState::Transitioning.as_u8() as f32)?;
        }

        for (index, el) in self.zones.iter().enumerate() {
            el.class_list().toggle_with_force("highlight", feedback.zone == Some(index))?;
        }

        match feedback.label() {
            Some(label) => {
                self.indicator.set_text_content(Some(label));
                self.indicator.class_list().add_1("visible")?;
            }
            None => {
                self.indicator.set_text_content(None);
                self.indicator.class_list().remove_1("visible")?;
            }
        }
        Ok(())
    }

    /// Re-read the container size after a layout change.
    pub fn resize(&mut self) -> Result<(), JsValue> {
        let (width, height) = container_size(&self.container);
        self.board.resize_surface(width, height).map_err(to_js)
    }

    pub fn remove_marker(&mut self, id: EntityId) -> bool {
        if !self.board.remove_entity(id) {
            return false;
        }
        if let Some(pos) = self.markers.iter().position(|(m, _)| *m == id) {
            let (_, el) = self.markers.remove(pos);
            el.remove();
        }
        true
    }
}

impl Drop for Mount {
    fn drop(&mut self) {
        self.board.teardown();
        for (_, el) in self.markers.drain(..) {
            el.remove();
        }
        for el in self.zones.drain(..) {
            el.remove();
        }
        self.indicator.remove();
    }
}

pub fn to_js(e: pitch_engine::BoardError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Entity id carried by a marker element's `data-entity` attribute.
pub fn parse_entity_id(value: &str) -> Option<EntityId> {
    value.trim().parse().ok().map(EntityId)
}

fn percent(v: f32) -> String {
    format!("{v:.3}%")
}

fn container_size(container: &HtmlElement) -> (f32, f32) {
    let rect = container.get_bounding_client_rect();
    let width = if rect.width() > 0.0 { rect.width() } else { container.client_width() as f64 };
    let height = if rect.height() > 0.0 { rect.height() } else { container.client_height() as f64 };
    ((width as f32).max(1.0), (height as f32).max(1.0))
}

fn create_div(document: &Document, class: &str) -> Result<HtmlElement, JsValue> {
    let el: HtmlElement = document.create_element("div")?.dyn_into()?;
    el.set_class_name(class);
    Ok(el)
}

/// Pointer position relative to the container's top-left corner, in pixels.
fn local_point(container: &HtmlElement, event: &MouseEvent) -> (f32, f32) {
    let rect = container.get_bounding_client_rect();
    (
        (event.client_x() as f64 - rect.left()) as f32,
        (event.client_y() as f64 - rect.top()) as f32,
    )
}

fn marker_under(event: &Event) -> Option<EntityId> {
    let target: Element = event.target()?.dyn_into().ok()?;
    let marker = target.closest(&format!("[{MARKER_ATTR}]")).ok()??;
    parse_entity_id(&marker.get_attribute(MARKER_ATTR)?)
}

fn wire_listeners(
    window: &web_sys::Window,
    document: &Document,
    container: &HtmlElement,
) -> Result<ListenerGuard, JsValue> {
    let mut guard = ListenerGuard::new();

    let surface = container.clone();
    guard.listen(container.as_ref(), "pointerdown", move |event: Event| {
        let Some(pointer) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        let (x, y) = local_point(&surface, pointer);
        let input = match marker_under(&event) {
            Some(entity) => {
                event.prevent_default();
                InputEvent::Grab { entity, x, y }
            }
            None => InputEvent::PointerDown { x, y },
        };
        crate::push_input(input);
    })?;

    // Move and release are tracked on the document so a drag survives the
    // pointer leaving the pitch.
    let surface = container.clone();
    guard.listen(document.as_ref(), "pointermove", move |event: Event| {
        if let Some(pointer) = event.dyn_ref::<MouseEvent>() {
            let (x, y) = local_point(&surface, pointer);
            crate::push_input(InputEvent::PointerMove { x, y });
        }
    })?;

    let surface = container.clone();
    guard.listen(document.as_ref(), "pointerup", move |event: Event| {
        if let Some(pointer) = event.dyn_ref::<MouseEvent>() {
            let (x, y) = local_point(&surface, pointer);
            crate::push_input(InputEvent::PointerUp { x, y });
        }
    })?;

    guard.listen(document.as_ref(), "pointercancel", |_event: Event| {
        crate::push_input(InputEvent::PointerCancel);
    })?;

    guard.listen(document.as_ref(), "keydown", |event: Event| {
        if let Some(key) = event.dyn_ref::<KeyboardEvent>() {
            crate::push_input(InputEvent::KeyDown { key_code: key.key_code() });
        }
    })?;

    guard.listen(window.as_ref(), "resize", |_event: Event| {
        crate::resize_mounted();
    })?;

    Ok(guard)
}
