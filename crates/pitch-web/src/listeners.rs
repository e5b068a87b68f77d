use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Event, EventTarget};

struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

/// DOM listeners owned by one mounted board.
///
/// Every registration is undone when the guard drops, so mounting and
/// unmounting repeatedly never leaves handlers behind on `document`.
#[derive(Default)]
pub struct ListenerGuard {
    listeners: Vec<Listener>,
}

impl ListenerGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `kind` events on `target`.
    pub fn listen(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<(), JsValue> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        self.listeners.push(Listener {
            target: target.clone(),
            kind,
            closure,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        for listener in self.listeners.drain(..) {
            if let Err(e) = listener
                .target
                .remove_event_listener_with_callback(listener.kind, listener.closure.as_ref().unchecked_ref())
            {
                log::warn!("failed to remove `{}` listener: {:?}", listener.kind, e);
            }
        }
    }
}
