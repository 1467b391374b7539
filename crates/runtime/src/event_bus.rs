use std::cell::RefCell;
use std::rc::Rc;

use foundation::IdSource;

static LISTENER_KEYS: IdSource = IdSource::new();

/// Token returned by `Listeners::listen`, used to unsubscribe.
///
/// Keys are unique across every registry in the process, so a stale key
/// handed to the wrong registry is simply not found.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerKey(u64);

type Callback<E> = Rc<dyn Fn(&E)>;

struct Entry<E> {
    key: ListenerKey,
    once: bool,
    callback: Callback<E>,
}

/// Synchronous single-threaded publish/subscribe registry.
///
/// Dispatch contract:
/// - `emit` runs every callback to completion before returning, in
///   subscription order.
/// - The listener list is snapshotted when dispatch starts. A callback may
///   subscribe or unsubscribe (itself or others); listeners removed during
///   dispatch are skipped, listeners added during dispatch wait for the next
///   `emit`.
/// - A `listen_once` callback is unsubscribed right before it runs.
pub struct Listeners<E> {
    entries: RefCell<Vec<Entry<E>>>,
}

impl<E> Listeners<E> {
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
        }
    }

    pub fn listen(&self, callback: impl Fn(&E) + 'static) -> ListenerKey {
        self.add(false, Rc::new(callback))
    }

    pub fn listen_once(&self, callback: impl Fn(&E) + 'static) -> ListenerKey {
        self.add(true, Rc::new(callback))
    }

    fn add(&self, once: bool, callback: Callback<E>) -> ListenerKey {
        let key = ListenerKey(LISTENER_KEYS.next_id());
        self.entries.borrow_mut().push(Entry {
            key,
            once,
            callback,
        });
        key
    }

    /// Removes the listener registered under `key`.
    ///
    /// Returns `false` if it was already gone; that is not an error.
    pub fn unlisten(&self, key: ListenerKey) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|e| e.key != key);
        entries.len() != before
    }

    pub fn contains(&self, key: ListenerKey) -> bool {
        self.entries.borrow().iter().any(|e| e.key == key)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn emit(&self, event: &E) {
        let snapshot: Vec<(ListenerKey, bool, Callback<E>)> = self
            .entries
            .borrow()
            .iter()
            .map(|e| (e.key, e.once, Rc::clone(&e.callback)))
            .collect();

        for (key, once, callback) in snapshot {
            let live = if once {
                self.unlisten(key)
            } else {
                self.contains(key)
            };
            if live {
                callback(event);
            }
        }
    }
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.len())
            .finish()
    }
}
