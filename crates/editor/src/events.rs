//! In-process event bus for panels and inspectors.
//!
//! Owned by one editor instance. Delivery is synchronous, to every current
//! subscriber, in subscription order.

use shared::ObjectId;

use crate::state::selection::PlaneSelection;

#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// A body entered the live scene
    ObjectAdded(ObjectId),
    /// A body left the live scene
    ObjectRemoved(ObjectId),
    /// Committed body selection, 0 or 1 ids
    SelectionChanged(Vec<ObjectId>),
    /// Committed plane selection
    PlaneSelected(Option<PlaneSelection>),
    /// Anything a display panel should re-render for
    Updated,
}

impl EditorEvent {
    pub fn name(&self) -> &'static str {
        match self {
            EditorEvent::ObjectAdded(_) => "object-added",
            EditorEvent::ObjectRemoved(_) => "object-removed",
            EditorEvent::SelectionChanged(_) => "selection-changed",
            EditorEvent::PlaneSelected(_) => "plane-selected",
            EditorEvent::Updated => "updated",
        }
    }
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&EditorEvent)>;

#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventBus {
    pub fn subscribe(&mut self, listener: impl FnMut(&EditorEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// False when the subscription was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, event: &EditorEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_delivery_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::default();
        for tag in ["first", "second"] {
            let log = log.clone();
            bus.subscribe(move |e| log.borrow_mut().push(format!("{tag}:{}", e.name())));
        }
        bus.emit(&EditorEvent::ObjectAdded("a".into()));
        assert_eq!(*log.borrow(), vec!["first:object-added", "second:object-added"]);
    }

    #[test]
    fn test_unsubscribe() {
        let count = Rc::new(RefCell::new(0));
        let mut bus = EventBus::default();
        let c = count.clone();
        let id = bus.subscribe(move |_| *c.borrow_mut() += 1);
        bus.emit(&EditorEvent::Updated);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.emit(&EditorEvent::Updated);
        assert_eq!(*count.borrow(), 1);
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn test_event_names() {
        assert_eq!(EditorEvent::SelectionChanged(vec![]).name(), "selection-changed");
        assert_eq!(EditorEvent::PlaneSelected(None).name(), "plane-selected");
        assert_eq!(EditorEvent::ObjectRemoved("x".into()).name(), "object-removed");
    }
}
