//! Multicast notifications.
//!
//! A [`Notifier`] is the smallest possible event primitive: an ordered
//! list of callbacks that all receive the same argument when the owner
//! calls [`fire`](Notifier::fire).

use std::fmt;

type Subscriber<T> = Box<dyn FnMut(&T) + Send>;

/// An ordered list of subscribers for events carrying a `T`.
///
/// ## Usage constraints
///
/// - Subscribers run synchronously, on the caller's task, in the order
///   they subscribed.
/// - Both [`subscribe`](Self::subscribe) and [`fire`](Self::fire) take
///   `&mut self`, so subscribing (or firing again) from inside a running
///   subscriber is rejected by the borrow checker instead of being
///   undefined at runtime.
/// - A panicking subscriber is not isolated: the panic propagates to the
///   caller of `fire` and later subscribers are skipped.
/// - There is no unsubscribe. Subscribers live as long as the notifier.
///
/// ```rust
/// use std::sync::{Arc, Mutex};
/// use gridwire_transport::Notifier;
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let mut on_result = Notifier::new();
///
/// let sink = Arc::clone(&seen);
/// on_result.subscribe(move |r: &u8| sink.lock().unwrap().push(*r));
///
/// on_result.fire(&2);
/// assert_eq!(*seen.lock().unwrap(), vec![2]);
/// ```
pub struct Notifier<T> {
    subscribers: Vec<Subscriber<T>>,
}

impl<T> Notifier<T> {
    /// Creates a notifier with no subscribers.
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    /// Appends a subscriber. It will run after every existing one.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&T) + Send + 'static,
    {
        self.subscribers.push(Box::new(callback));
    }

    /// Calls every subscriber with `args`, in subscription order.
    pub fn fire(&mut self, args: &T) {
        for subscriber in &mut self.subscribers {
            subscriber(args);
        }
    }

    /// Number of subscribers.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Returns `true` if nobody is listening.
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl<T> Default for Notifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Notifier<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
