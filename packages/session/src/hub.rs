//! Draw-event subscription hub.
//!
//! Models the map drawing collaborator's event surface as explicit
//! subscribe/unsubscribe: [`DrawHub::subscribe`] returns a [`Subscription`]
//! guard that unregisters its callback when dropped, so a torn-down view
//! can never leak a handler.

use std::cell::RefCell;
use std::rc::Rc;

use satwatch_geometry::DrawEvent;

type Callback = Box<dyn FnMut(&DrawEvent)>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    callbacks: Vec<(u64, Callback)>,
}

/// Fan-out point for polygon-creation events.
///
/// The drawing collaborator emits exactly one event per completed polygon;
/// every live subscriber sees it in subscription order.
#[derive(Default, Clone)]
pub struct DrawHub {
    registry: Rc<RefCell<Registry>>,
}

impl DrawHub {
    /// Creates a hub with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` for future draw events.
    ///
    /// The callback stays registered exactly as long as the returned
    /// guard lives.
    #[must_use]
    pub fn subscribe(&self, callback: impl FnMut(&DrawEvent) + 'static) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        registry.next_id += 1;
        let id = registry.next_id;
        registry.callbacks.push((id, Box::new(callback)));

        Subscription {
            id,
            registry: Rc::clone(&self.registry),
        }
    }

    /// Delivers one completed-polygon event to every live subscriber.
    pub fn emit(&self, event: &DrawEvent) {
        for (_, callback) in &mut self.registry.borrow_mut().callbacks {
            callback(event);
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.registry.borrow().callbacks.len()
    }
}

/// RAII guard for a registered draw callback; dropping it unsubscribes.
pub struct Subscription {
    id: u64,
    registry: Rc<RefCell<Registry>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.registry
            .borrow_mut()
            .callbacks
            .retain(|(id, _)| *id != self.id);
    }
}

#[cfg(test)]
mod tests {
    use satwatch_geometry::LatLng;

    use super::*;

    fn event() -> DrawEvent {
        DrawEvent {
            points: vec![
                LatLng::new(0.0, 0.0),
                LatLng::new(0.0, 0.01),
                LatLng::new(0.01, 0.01),
            ],
            current_zoom: 14,
        }
    }

    #[test]
    fn subscriber_receives_events() {
        let hub = DrawHub::new();
        let seen = Rc::new(RefCell::new(0));
        let seen_in_callback = Rc::clone(&seen);

        let _subscription = hub.subscribe(move |_| {
            *seen_in_callback.borrow_mut() += 1;
        });

        hub.emit(&event());
        hub.emit(&event());
        assert_eq!(*seen.borrow(), 2);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let hub = DrawHub::new();
        let seen = Rc::new(RefCell::new(0));
        let seen_in_callback = Rc::clone(&seen);

        let subscription = hub.subscribe(move |_| {
            *seen_in_callback.borrow_mut() += 1;
        });
        assert_eq!(hub.subscriber_count(), 1);

        drop(subscription);
        assert_eq!(hub.subscriber_count(), 0);

        hub.emit(&event());
        assert_eq!(*seen.borrow(), 0);
    }

    #[test]
    fn other_subscribers_survive_a_drop() {
        let hub = DrawHub::new();
        let seen = Rc::new(RefCell::new(0));
        let seen_in_callback = Rc::clone(&seen);

        let first = hub.subscribe(|_| {});
        let _second = hub.subscribe(move |_| {
            *seen_in_callback.borrow_mut() += 1;
        });

        drop(first);
        hub.emit(&event());
        assert_eq!(*seen.borrow(), 1);
    }
}
