//! Unsubscribe handles shared by actors and atoms.

use parking_lot::Mutex;
use std::fmt;

type Teardown = Box<dyn FnOnce() + Send>;

/// Handle returned by every `subscribe` in this crate.
///
/// `unsubscribe` runs the teardown at most once, so calling it repeatedly
/// is harmless. Dropping the handle unsubscribes as well; use
/// [`Subscription::detach`] to keep a listener for the lifetime of its
/// source.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    teardown: Mutex<Option<Teardown>>,
}

impl Subscription {
    pub(crate) fn new<F>(teardown: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            teardown: Mutex::new(Some(Box::new(teardown))),
        }
    }

    /// Subscription with nothing to tear down.
    pub(crate) fn empty() -> Self {
        Self {
            teardown: Mutex::new(None),
        }
    }

    pub fn unsubscribe(&self) {
        // Take first so the teardown runs without the lock held.
        let teardown = self.teardown.lock().take();
        if let Some(teardown) = teardown {
            teardown();
        }
    }

    pub fn is_active(&self) -> bool {
        self.teardown.lock().is_some()
    }

    /// Forget the handle without unsubscribing.
    pub fn detach(self) {
        self.teardown.lock().take();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
