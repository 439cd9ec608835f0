//! User-facing [`Notification`]s and their sinks.

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use derive_more::Display;

/// Severity of a [`Notification`].
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Level {
    /// Operation succeeded.
    #[display("success")]
    Success,

    /// Operation failed.
    #[display("error")]
    Error,
}

/// Transient message shown to a user.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
#[display("[{level}] {message}")]
pub struct Notification {
    /// [`Level`] of this [`Notification`].
    pub level: Level,

    /// Human-readable text of this [`Notification`].
    pub message: String,
}

impl Notification {
    /// Creates a new [`Level::Success`] [`Notification`].
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    /// Creates a new [`Level::Error`] [`Notification`].
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }
}

/// Sink of [`Notification`]s, injected into controllers.
pub trait Notifier {
    /// Emits the provided [`Notification`].
    fn notify(&self, notification: Notification);
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification);
    }
}

impl<T: Notifier + ?Sized> Notifier for Rc<T> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification);
    }
}

/// In-memory [`Notifier`] buffering [`Notification`]s until drained.
///
/// Meant to be created once per application session.
#[derive(Debug, Default)]
pub struct Queue(RefCell<VecDeque<Notification>>);

impl Queue {
    /// Takes all the buffered [`Notification`]s in emission order.
    pub fn drain(&self) -> Vec<Notification> {
        self.0.borrow_mut().drain(..).collect()
    }

    /// Indicates whether there are no buffered [`Notification`]s.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

impl Notifier for Queue {
    fn notify(&self, notification: Notification) {
        self.0.borrow_mut().push_back(notification);
    }
}

#[cfg(test)]
mod spec {
    use std::rc::Rc;

    use super::{Level, Notification, Notifier, Queue};

    #[test]
    fn drains_in_emission_order() {
        let queue = Rc::new(Queue::default());
        let sink: Rc<dyn Notifier> = queue.clone();

        sink.notify(Notification::error("failed"));
        queue.notify(Notification::success("done"));

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].level, Level::Error);
        assert_eq!(drained[1].to_string(), "[success] done");
        assert!(queue.is_empty());
        assert!(queue.drain().is_empty());
    }
}
