//! Change notification for cart views.
//!
//! Listeners are plain callbacks invoked synchronously with the post-mutation
//! snapshot. A [`Subscription`] handle controls how long a listener stays
//! registered.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use needledrop_core::CartItem;

type Callback = Box<dyn FnMut(&[CartItem])>;

struct Listener {
    active: Rc<Cell<bool>>,
    callback: Callback,
}

/// Registered listeners of one cart store.
#[derive(Default)]
pub(crate) struct Subscribers {
    listeners: Vec<Listener>,
}

impl Subscribers {
    pub(crate) fn add(&mut self, callback: Callback) -> Subscription {
        self.prune();
        let active = Rc::new(Cell::new(true));
        self.listeners.push(Listener {
            active: Rc::clone(&active),
            callback,
        });
        Subscription {
            active,
            detached: false,
        }
    }

    /// Call every live listener in registration order.
    ///
    /// A listener cancelled by an earlier listener in the same round is
    /// skipped.
    pub(crate) fn notify(&mut self, items: &[CartItem]) {
        self.prune();
        for listener in &mut self.listeners {
            if listener.active.get() {
                (listener.callback)(items);
            }
        }
    }

    /// Drop listeners whose handles were released, along with their captures.
    fn prune(&mut self) {
        self.listeners.retain(|listener| listener.active.get());
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners
            .iter()
            .filter(|listener| listener.active.get())
            .count()
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("active", &self.len())
            .finish()
    }
}

/// Handle to a registered cart listener.
///
/// Dropping the handle unsubscribes. Call [`Subscription::detach`] to keep the
/// listener for the lifetime of the store instead.
#[must_use = "dropping a Subscription unsubscribes the listener immediately"]
pub struct Subscription {
    active: Rc<Cell<bool>>,
    detached: bool,
}

impl Subscription {
    /// Stop receiving notifications.
    pub fn unsubscribe(self) {
        self.active.set(false);
    }

    /// Keep the listener registered after this handle is gone.
    pub fn detach(mut self) {
        self.detached = true;
    }

    /// Whether the listener still receives notifications.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if !self.detached {
            self.active.set(false);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .field("detached", &self.detached)
            .finish()
    }
}
