//! Global key bindings.
//!
//! The window feeds every key press into [`KeyListeners::dispatch`]. Callers
//! subscribe with [`KeyListeners::listen`] and stay subscribed for as long as
//! they hold the returned [`KeyListener`].

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Callback = Rc<dyn Fn()>;

struct Binding {
    id: u64,
    key: String,
    callback: Callback,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    bindings: Vec<Binding>,
}

#[derive(Clone, Default)]
pub struct KeyListeners {
    registry: Rc<RefCell<Registry>>,
}

impl KeyListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listen(&self, key: &str, callback: impl Fn() + 'static) -> KeyListener {
        let mut registry = self.registry.borrow_mut();
        registry.next_id += 1;
        let id = registry.next_id;
        registry.bindings.push(Binding {
            id,
            key: key.to_string(),
            callback: Rc::new(callback),
        });
        KeyListener {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Runs the callbacks bound to `pressed`. Returns true if there were any.
    pub fn dispatch(&self, pressed: &str) -> bool {
        // collected first: a callback may drop its own listener
        let matching: Vec<Callback> = self
            .registry
            .borrow()
            .bindings
            .iter()
            .filter(|b| b.key.eq_ignore_ascii_case(pressed))
            .map(|b| b.callback.clone())
            .collect();

        for callback in &matching {
            callback();
        }
        !matching.is_empty()
    }

    pub fn len(&self) -> usize {
        self.registry.borrow().bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Subscription guard. Dropping it removes the binding.
#[must_use = "the binding is removed when the listener is dropped"]
pub struct KeyListener {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Drop for KeyListener {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().bindings.retain(|b| b.id != self.id);
        }
    }
}
