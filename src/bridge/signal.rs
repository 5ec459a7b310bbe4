//! Messages accepted by [`MachineBridge::dispatch`](crate::bridge::MachineBridge::dispatch).

use crate::core::Event;

/// Marker type of the restart signal. See [`RESTART`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Restart;

/// Dispatch this to discard the live actor and start a fresh one from the
/// bridge's factory.
///
/// The signal is a distinct type, so no domain event can be mistaken for it.
pub const RESTART: Restart = Restart;

/// Either a domain event for the live actor or the restart signal.
#[derive(Clone, Debug, PartialEq)]
pub enum Dispatch<E> {
    Event(E),
    Restart,
}

impl<E> Dispatch<E> {
    pub fn is_restart(&self) -> bool {
        matches!(self, Self::Restart)
    }
}

impl<E: Event> From<E> for Dispatch<E> {
    fn from(event: E) -> Self {
        Self::Event(event)
    }
}

impl<E> From<Restart> for Dispatch<E> {
    fn from(_: Restart) -> Self {
        Self::Restart
    }
}
