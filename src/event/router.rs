//! Event subscription registry
//!
//! Maps an [`EventKind`] to an ordered list of subscriber closures.
//! Subscribers run in connection order; connect and disconnect hand out
//! plain id handles, no trait objects beyond the closure itself.
//!
//! The registry is generic over the context the handlers mutate so the
//! owner thread can route drained events straight into its screen state.

use std::collections::BTreeMap;

use log::trace;

use super::{Event, EventKind};

/// Handle identifying one connected subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotId(u64);

type Handler<C> = Box<dyn FnMut(&mut C, &Event)>;

/// Ordered per-kind subscriber registry.
pub struct EventRouter<C> {
    slots: BTreeMap<EventKind, Vec<(SlotId, Handler<C>)>>,
    next_id: u64,
}

impl<C> Default for EventRouter<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> EventRouter<C> {
    pub fn new() -> Self {
        Self { slots: BTreeMap::new(), next_id: 0 }
    }

    /// Register `handler` for `kind`. Handlers for the same kind run in
    /// the order they were connected.
    pub fn connect<F>(&mut self, kind: EventKind, handler: F) -> SlotId
    where
        F: FnMut(&mut C, &Event) + 'static,
    {
        self.next_id += 1;
        let id = SlotId(self.next_id);
        self.slots.entry(kind).or_default().push((id, Box::new(handler)));
        id
    }

    /// Remove a subscriber. Returns false if the handle is unknown
    /// (already disconnected).
    pub fn disconnect(&mut self, id: SlotId) -> bool {
        for handlers in self.slots.values_mut() {
            if let Some(pos) = handlers.iter().position(|(h, _)| *h == id) {
                handlers.remove(pos);
                return true;
            }
        }
        false
    }

    pub fn is_connected(&self, id: SlotId) -> bool {
        self.slots.values().any(|v| v.iter().any(|(h, _)| *h == id))
    }

    /// Invoke every subscriber registered for the event's kind.
    pub fn dispatch(&mut self, ctx: &mut C, event: &Event) {
        if let Some(handlers) = self.slots.get_mut(&event.kind()) {
            trace!("dispatch {:?} to {} handler(s)", event.kind(), handlers.len());
            for (_, handler) in handlers.iter_mut() {
                handler(ctx, event);
            }
        }
    }
}
