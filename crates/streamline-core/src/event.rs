//! Named, synchronous signals.
//!
//! A [`Signal`] holds an ordered list of handlers. [`Signal::emit`] calls
//! every handler in subscription order on the calling thread and returns
//! once all of them have run. Handlers must not emit the signal they are
//! subscribed to.

use std::cell::{Cell, RefCell};
use std::fmt;

/// Handle returned by [`Signal::connect`], used to disconnect later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<T> = Box<dyn FnMut(&T)>;

/// A synchronous single-threaded signal carrying `&T` to its handlers.
///
/// # Example
///
/// ```
/// use streamline_core::event::Signal;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let resized: Signal<(u32, u32)> = Signal::new("resized");
/// let seen = Rc::new(Cell::new((0, 0)));
///
/// let sink = seen.clone();
/// resized.connect(move |size| sink.set(*size));
/// resized.emit(&(640, 480));
///
/// assert_eq!(seen.get(), (640, 480));
/// ```
pub struct Signal<T> {
    name: &'static str,
    handlers: RefCell<Vec<(SubscriptionId, Handler<T>)>>,
    next_id: Cell<u64>,
}

impl<T> Signal<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            handlers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Subscribe a handler. Handlers run in subscription order.
    pub fn connect(&self, handler: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers.borrow_mut().push((id, Box::new(handler)));
        id
    }

    /// Remove a handler. Returns `false` if it was already gone.
    pub fn disconnect(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        handlers.len() != before
    }

    /// Call every handler with `value`.
    ///
    /// # Panics
    /// Panics if a handler re-emits this same signal.
    pub fn emit(&self, value: &T) {
        tracing::trace!(signal = self.name, "emit");
        let mut handlers = self.handlers.borrow_mut();
        for (_, handler) in handlers.iter_mut() {
            handler(value);
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Drop every handler.
    pub fn clear(&self) {
        self.handlers.borrow_mut().clear();
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("name", &self.name)
            .field("handlers", &self.handler_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_handlers_run_in_order() {
        let signal: Signal<u32> = Signal::new("updated");
        let log = Rc::new(RefCell::new(Vec::new()));

        let a = log.clone();
        signal.connect(move |v| a.borrow_mut().push(("a", *v)));
        let b = log.clone();
        signal.connect(move |v| b.borrow_mut().push(("b", *v)));

        signal.emit(&7);

        assert_eq!(*log.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn test_disconnect() {
        let signal: Signal<()> = Signal::new("updated");
        let count = Rc::new(RefCell::new(0));

        let c = count.clone();
        let id = signal.connect(move |_| *c.borrow_mut() += 1);
        signal.emit(&());
        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id));
        signal.emit(&());

        assert_eq!(*count.borrow(), 1);
        assert_eq!(signal.handler_count(), 0);
    }

    #[test]
    fn test_emit_without_handlers() {
        let signal: Signal<(u32, u32)> = Signal::new("resized");
        signal.emit(&(1, 1));
        assert_eq!(signal.name(), "resized");
    }
}
