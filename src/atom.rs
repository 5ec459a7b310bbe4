//! Reactive container with a mount/unmount lifecycle.
//!
//! An [`Atom`] is built from a setup callback. The callback runs the first
//! time the atom is read or subscribed to; it produces the initial value,
//! receives a [`Setter`] for later updates and returns a cleanup. The
//! cleanup runs once the last subscriber detaches, or when the atom is
//! dropped. The next read or subscribe after that runs setup again.
//!
//! # Invariants
//!
//! 1. Setup runs at most once per mount, however many readers and
//!    subscribers arrive.
//! 2. Subscribers are notified in registration order, on the thread that
//!    called [`Setter::set`], before `set` returns.
//! 3. A setter handed to an earlier mount is inert: its writes are dropped.
//!    A write made while another is still notifying supersedes it; the
//!    older notification stops, so every subscriber's last value is the
//!    stored one.
//! 4. No lock is held while listeners, setup or cleanup callbacks run,
//!    except the mount lock around setup and cleanup.

use crate::subscription::Subscription;
use parking_lot::{Mutex, MutexGuard};
use std::convert::Infallible;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tracing::trace;

/// Cleanup returned from setup, run on unmount.
pub type Cleanup = Box<dyn FnOnce() + Send>;

type SetupFn<T, E> = Box<dyn Fn(Setter<T>) -> Result<Mounted<T>, E> + Send + Sync>;

/// Result of a successful setup.
pub struct Mounted<T> {
    initial: T,
    cleanup: Option<Cleanup>,
}

impl<T> Mounted<T> {
    pub fn new(initial: T) -> Self {
        Self {
            initial,
            cleanup: None,
        }
    }

    pub fn with_cleanup<F>(initial: T, cleanup: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            initial,
            cleanup: Some(Box::new(cleanup)),
        }
    }
}

struct Listener<T> {
    id: u64,
    active: AtomicBool,
    callback: Arc<dyn Fn(&T) + Send + Sync>,
}

struct Cell<T> {
    value: Option<T>,
    epoch: u64,
    /// Bumped on every write.
    version: u64,
    listeners: Vec<Arc<Listener<T>>>,
    next_listener: u64,
    /// Open [`Atom::pinned`] calls.
    pins: usize,
    unmount_deferred: bool,
}

struct Mount {
    cleanup: Option<Cleanup>,
}

struct AtomInner<T, E> {
    setup: SetupFn<T, E>,
    mount: Mutex<Option<Mount>>,
    cell: Arc<Mutex<Cell<T>>>,
}

/// Write handle given to setup.
///
/// Bound to the mount it was created for; once that mount is cleaned up,
/// `set` does nothing and returns `false`.
pub struct Setter<T> {
    cell: Weak<Mutex<Cell<T>>>,
    epoch: u64,
}

impl<T: Clone + Send + Sync + 'static> Setter<T> {
    /// Store `value` and notify subscribers. Returns whether the write landed.
    pub fn set(&self, value: T) -> bool {
        let Some(cell) = self.cell.upgrade() else {
            return false;
        };
        let (version, listeners) = {
            let mut state = cell.lock();
            if state.epoch != self.epoch {
                trace!(epoch = self.epoch, current = state.epoch, "write from a previous mount dropped");
                return false;
            }
            state.value = Some(value.clone());
            state.version += 1;
            (state.version, state.listeners.clone())
        };

        for listener in listeners {
            if cell.lock().version != version {
                trace!(version, "notification superseded by a newer write");
                break;
            }
            if listener.active.load(Ordering::SeqCst) {
                (listener.callback)(&value);
            }
        }
        true
    }

    pub fn is_current(&self) -> bool {
        self.cell
            .upgrade()
            .is_some_and(|cell| cell.lock().epoch == self.epoch)
    }
}

impl<T> Clone for Setter<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Weak::clone(&self.cell),
            epoch: self.epoch,
        }
    }
}

impl<T> fmt::Debug for Setter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setter").field("epoch", &self.epoch).finish()
    }
}

/// Observable value with lazy setup and automatic cleanup.
///
/// `E` is the setup error; reads and subscriptions surface it. Clones
/// share the same value and subscribers.
///
/// # Example
///
/// ```rust
/// use machine_atom::atom::{Atom, Mounted};
/// use std::convert::Infallible;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
///
/// let cleaned = Arc::new(AtomicBool::new(false));
/// let flag = Arc::clone(&cleaned);
/// let atom: Atom<u32> = Atom::new(move |_setter| {
///     let flag = Arc::clone(&flag);
///     Ok::<_, Infallible>(Mounted::with_cleanup(7, move || flag.store(true, Ordering::SeqCst)))
/// });
///
/// let sub = atom.subscribe(|value| println!("now {value}")).unwrap();
/// assert_eq!(atom.get().unwrap(), 7);
/// sub.unsubscribe();
/// assert!(cleaned.load(Ordering::SeqCst));
/// ```
pub struct Atom<T, E = Infallible> {
    inner: Arc<AtomInner<T, E>>,
}

impl<T, E> Atom<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: 'static,
{
    pub fn new<F>(setup: F) -> Self
    where
        F: Fn(Setter<T>) -> Result<Mounted<T>, E> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(AtomInner {
                setup: Box::new(setup),
                mount: Mutex::new(None),
                cell: Arc::new(Mutex::new(Cell {
                    value: None,
                    epoch: 0,
                    version: 0,
                    listeners: Vec::new(),
                    next_listener: 0,
                    pins: 0,
                    unmount_deferred: false,
                })),
            }),
        }
    }

    /// Current value, mounting the atom first if needed.
    pub fn get(&self) -> Result<T, E> {
        let _mount = self.mounted()?;
        let value = self.inner.cell.lock().value.clone();
        Ok(value.expect("a mounted atom always holds a value"))
    }

    /// Run `f` with the atom mounted, mounting it first if needed.
    ///
    /// Unmounting is held off until `f` returns: if the last subscriber
    /// leaves meanwhile, cleanup runs as this call exits.
    pub fn pinned<R>(&self, f: impl FnOnce() -> R) -> Result<R, E> {
        {
            let _mount = self.mounted()?;
            self.inner.cell.lock().pins += 1;
        }
        let _pin = PinGuard { atom: self };
        Ok(f())
    }

    /// Register a listener for every later write.
    ///
    /// Dropping or unsubscribing the last subscription unmounts the atom.
    pub fn subscribe<F>(&self, callback: F) -> Result<Subscription, E>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let _mount = self.mounted()?;
        let listener = {
            let mut cell = self.inner.cell.lock();
            let listener = Arc::new(Listener {
                id: cell.next_listener,
                active: AtomicBool::new(true),
                callback: Arc::new(callback),
            });
            cell.next_listener += 1;
            cell.listeners.push(Arc::clone(&listener));
            listener
        };

        let atom = Arc::downgrade(&self.inner);
        Ok(Subscription::new(move || {
            listener.active.store(false, Ordering::SeqCst);
            if let Some(inner) = atom.upgrade() {
                Atom { inner }.release(listener.id);
            }
        }))
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.mount.lock().is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.cell.lock().listeners.len()
    }

    fn mounted(&self) -> Result<MutexGuard<'_, Option<Mount>>, E> {
        let mut mount = self.inner.mount.lock();
        if mount.is_none() {
            let epoch = self.inner.cell.lock().epoch;
            let setter = Setter {
                cell: Arc::downgrade(&self.inner.cell),
                epoch,
            };
            let Mounted { initial, cleanup } = (self.inner.setup)(setter)?;
            let mut cell = self.inner.cell.lock();
            cell.value = Some(initial);
            cell.version += 1;
            drop(cell);
            *mount = Some(Mount { cleanup });
            trace!(epoch, "atom mounted");
        }
        Ok(mount)
    }

    fn release(&self, listener_id: u64) {
        let idle = {
            let mut cell = self.inner.cell.lock();
            cell.listeners.retain(|l| l.id != listener_id);
            cell.listeners.is_empty()
        };
        if idle {
            self.unmount_if_idle();
        }
    }

    fn unmount_if_idle(&self) {
        let mut mount = self.inner.mount.lock();
        {
            let mut cell = self.inner.cell.lock();
            if mount.is_none() || !cell.listeners.is_empty() {
                return;
            }
            if cell.pins > 0 {
                cell.unmount_deferred = true;
                trace!(pins = cell.pins, "unmount deferred until pinned calls return");
                return;
            }
            cell.epoch += 1;
            cell.value = None;
            trace!(epoch = cell.epoch, "atom unmounted");
        }
        if let Some(cleanup) = mount.take().and_then(|m| m.cleanup) {
            cleanup();
        }
    }
}

/// Releases one [`Atom::pinned`] call, running a deferred unmount.
struct PinGuard<'a, T, E>
where
    T: Clone + Send + Sync + 'static,
    E: 'static,
{
    atom: &'a Atom<T, E>,
}

impl<T, E> Drop for PinGuard<'_, T, E>
where
    T: Clone + Send + Sync + 'static,
    E: 'static,
{
    fn drop(&mut self) {
        let run_deferred = {
            let mut cell = self.atom.inner.cell.lock();
            cell.pins -= 1;
            let run = cell.pins == 0 && cell.unmount_deferred;
            if run {
                cell.unmount_deferred = false;
            }
            run
        };
        if run_deferred {
            self.atom.unmount_if_idle();
        }
    }
}

impl<T, E> Clone for Atom<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, E> fmt::Debug for Atom<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Atom")
            .field("mounted", &self.inner.mount.lock().is_some())
            .finish()
    }
}

impl<T, E> Drop for AtomInner<T, E> {
    fn drop(&mut self) {
        self.cell.lock().epoch += 1;
        if let Some(cleanup) = self.mount.get_mut().take().and_then(|m| m.cleanup) {
            cleanup();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct Probe {
        setups: Arc<AtomicUsize>,
        cleanups: Arc<AtomicUsize>,
        setter: Arc<Mutex<Option<Setter<u32>>>>,
    }

    fn probed() -> (Atom<u32>, Probe) {
        let probe = Probe {
            setups: Arc::new(AtomicUsize::new(0)),
            cleanups: Arc::new(AtomicUsize::new(0)),
            setter: Arc::new(Mutex::new(None)),
        };
        let setups = Arc::clone(&probe.setups);
        let cleanups = Arc::clone(&probe.cleanups);
        let slot = Arc::clone(&probe.setter);
        let atom = Atom::new(move |setter: Setter<u32>| {
            let n = setups.fetch_add(1, Ordering::SeqCst) as u32;
            *slot.lock() = Some(setter);
            let cleanups = Arc::clone(&cleanups);
            Ok(Mounted::with_cleanup(n * 100, move || {
                cleanups.fetch_add(1, Ordering::SeqCst);
            }))
        });
        (atom, probe)
    }

    fn set(probe: &Probe, value: u32) -> bool {
        let setter = probe.setter.lock().clone();
        setter.is_some_and(|s| s.set(value))
    }

    #[test]
    fn setup_is_lazy() {
        let (atom, probe) = probed();

        assert!(!atom.is_mounted());
        assert_eq!(probe.setups.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn read_then_subscribe_mounts_once() {
        let (atom, probe) = probed();

        assert_eq!(atom.get().unwrap(), 0);
        let _a = atom.subscribe(|_| {}).unwrap();
        let _b = atom.subscribe(|_| {}).unwrap();

        assert_eq!(probe.setups.load(Ordering::SeqCst), 1);
        assert_eq!(atom.subscriber_count(), 2);
    }

    #[test]
    fn set_updates_value_and_notifies_in_order() {
        let (atom, probe) = probed();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let first = Arc::clone(&seen);
        let second = Arc::clone(&seen);
        let _a = atom.subscribe(move |v| first.lock().push(("a", *v))).unwrap();
        let _b = atom.subscribe(move |v| second.lock().push(("b", *v))).unwrap();

        assert!(set(&probe, 5));

        assert_eq!(atom.get().unwrap(), 5);
        assert_eq!(*seen.lock(), vec![("a", 5), ("b", 5)]);
    }

    #[test]
    fn last_unsubscribe_runs_cleanup_once() {
        let (atom, probe) = probed();
        let a = atom.subscribe(|_| {}).unwrap();
        let b = atom.subscribe(|_| {}).unwrap();

        a.unsubscribe();
        assert_eq!(probe.cleanups.load(Ordering::SeqCst), 0);

        b.unsubscribe();
        b.unsubscribe();
        a.unsubscribe();
        assert_eq!(probe.cleanups.load(Ordering::SeqCst), 1);
        assert!(!atom.is_mounted());
    }

    #[test]
    fn remount_runs_setup_again_and_retires_old_setter() {
        let (atom, probe) = probed();
        let sub = atom.subscribe(|_| {}).unwrap();
        let stale = probe.setter.lock().clone().unwrap();
        drop(sub);

        assert_eq!(atom.get().unwrap(), 100);
        assert!(!stale.is_current());
        assert!(!stale.set(9));
        assert_eq!(atom.get().unwrap(), 100);
        assert_eq!(probe.setups.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn drop_runs_cleanup() {
        let (atom, probe) = probed();
        atom.get().unwrap();
        let cleanups = Arc::clone(&probe.cleanups);

        drop(atom);

        assert_eq!(cleanups.load(Ordering::SeqCst), 1);
        assert!(!set(&probe, 1));
    }

    #[test]
    fn listener_can_read_during_notification() {
        let (atom, probe) = probed();
        let reader = atom.clone();
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        let _sub = atom
            .subscribe(move |_| *sink.lock() = reader.get().ok())
            .unwrap();

        set(&probe, 42);

        assert_eq!(*seen.lock(), Some(42));
    }

    #[test]
    fn nested_write_supersedes_in_flight_notification() {
        let (atom, probe) = probed();
        let writer = Arc::clone(&probe.setter);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _first = atom
            .subscribe(move |v| {
                if *v == 1 {
                    let setter = writer.lock().clone();
                    if let Some(setter) = setter {
                        setter.set(2);
                    }
                }
            })
            .unwrap();
        let _second = atom.subscribe(move |v| sink.lock().push(*v)).unwrap();

        assert!(set(&probe, 1));

        assert_eq!(*seen.lock(), vec![2]);
        assert_eq!(atom.get().unwrap(), 2);
    }

    #[test]
    fn unmount_waits_for_pinned_call() {
        let (atom, probe) = probed();
        let sub = atom.subscribe(|_| {}).unwrap();

        atom.pinned(|| {
            sub.unsubscribe();
            assert!(atom.is_mounted());
            assert_eq!(probe.cleanups.load(Ordering::SeqCst), 0);
        })
        .unwrap();

        assert!(!atom.is_mounted());
        assert_eq!(probe.cleanups.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn pinned_call_mounts_and_leaves_mount_in_place() {
        let (atom, probe) = probed();

        let value = atom.pinned(|| 7).unwrap();

        assert_eq!(value, 7);
        assert!(atom.is_mounted());
        assert_eq!(probe.setups.load(Ordering::SeqCst), 1);
        assert_eq!(probe.cleanups.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn setup_error_leaves_atom_unmounted() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let atom: Atom<u32, String> = Atom::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Err("no backing value".to_string())
        });

        assert_eq!(atom.get(), Err("no backing value".to_string()));
        assert!(atom.subscribe(|_| {}).is_err());
        assert!(!atom.is_mounted());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }
}
