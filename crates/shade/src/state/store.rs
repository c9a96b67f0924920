//! Single-slot observable store for one named theme state.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use super::record::ThemeRecord;
use crate::persist::PersistenceAdapter;
use crate::reconcile;
use crate::theme::{Theme, ThemeName};

type Listener<T> = Rc<dyn Fn(&ThemeRecord<T>)>;

struct Inner<T: ThemeName> {
    key: String,
    persistence: PersistenceAdapter,
    record: Cell<ThemeRecord<T>>,
    listeners: RefCell<Vec<(u64, Listener<T>)>>,
    next_id: Cell<u64>,
    queue: RefCell<VecDeque<ThemeRecord<T>>>,
    notifying: Cell<bool>,
}

impl<T: ThemeName> Inner<T> {
    fn is_subscribed(&self, id: u64) -> bool {
        self.listeners.borrow().iter().any(|(lid, _)| *lid == id)
    }
}

trait Detach {
    fn detach(&self, id: u64);
}

impl<T: ThemeName> Detach for Inner<T> {
    fn detach(&self, id: u64) {
        self.listeners.borrow_mut().retain(|(lid, _)| *lid != id);
    }
}

/// Resets the notifying flag even if a listener panics.
struct NotifyGuard<'a>(&'a Cell<bool>);

impl Drop for NotifyGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Handle to one named theme state.
///
/// The state owns a [`ThemeRecord`] and behaves as a single-slot observable:
/// [`set`](Self::set) replaces the whole record and synchronously notifies
/// every subscriber in registration order. Handles are cheap to clone and
/// all clones refer to the same record.
///
/// A `set` issued from inside a subscriber is queued and delivered once the
/// current round of notifications finishes, so every subscriber sees
/// records in the order they were committed.
///
/// # Example
///
/// ```rust
/// use shade::persist::PersistenceAdapter;
/// use shade::{Theme, ThemeState};
///
/// let state = ThemeState::<Theme>::new("theme", PersistenceAdapter::memory());
/// let seen = std::rc::Rc::new(std::cell::Cell::new(0));
///
/// let counter = seen.clone();
/// let subscription = state.subscribe(move |_| counter.set(counter.get() + 1));
///
/// state.set(state.get().with_current(Some(Theme::Dark)));
/// assert_eq!(seen.get(), 1);
/// assert_eq!(state.effective(), Theme::Dark);
///
/// subscription.unsubscribe();
/// subscription.unsubscribe(); // no-op
/// ```
pub struct ThemeState<T: ThemeName = Theme> {
    inner: Rc<Inner<T>>,
}

impl<T: ThemeName> ThemeState<T> {
    /// Creates the state for `key`, seeding the override from persistence.
    ///
    /// `current` and `previous` start out empty.
    pub fn new(key: impl Into<String>, persistence: PersistenceAdapter) -> Self {
        let key = key.into();
        let override_theme = persistence.load::<T>(&key);
        debug!(
            key = %key,
            override_theme = override_theme.map(|t| t.as_str()),
            "created theme state"
        );

        Self {
            inner: Rc::new(Inner {
                key,
                persistence,
                record: Cell::new(ThemeRecord::seeded(override_theme)),
                listeners: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                queue: RefCell::new(VecDeque::new()),
                notifying: Cell::new(false),
            }),
        }
    }

    /// The key this state is stored under.
    pub fn key(&self) -> &str {
        &self.inner.key
    }

    /// The adapter used to persist the override.
    pub fn persistence(&self) -> &PersistenceAdapter {
        &self.inner.persistence
    }

    /// Returns a snapshot of the record.
    pub fn get(&self) -> ThemeRecord<T> {
        self.inner.record.get()
    }

    /// Returns the reconciled theme for the current record.
    pub fn effective(&self) -> T {
        reconcile::effective(&self.get())
    }

    /// Replaces the record and notifies subscribers.
    pub fn set(&self, next: ThemeRecord<T>) {
        self.inner.record.set(next);
        self.inner.queue.borrow_mut().push_back(next);

        if self.inner.notifying.get() {
            trace!(key = %self.inner.key, "queued nested theme state update");
            return;
        }

        self.inner.notifying.set(true);
        let _guard = NotifyGuard(&self.inner.notifying);

        loop {
            let next = self.inner.queue.borrow_mut().pop_front();
            let Some(record) = next else { break };

            let listeners: Vec<(u64, Listener<T>)> = self
                .inner
                .listeners
                .borrow()
                .iter()
                .map(|(id, listener)| (*id, Rc::clone(listener)))
                .collect();

            trace!(
                key = %self.inner.key,
                subscribers = listeners.len(),
                effective = reconcile::effective(&record).as_str(),
                "notifying theme subscribers"
            );

            for (id, listener) in listeners {
                // Skip listeners removed by an earlier listener in this round.
                if self.inner.is_subscribed(id) {
                    listener(&record);
                }
            }
        }
    }

    /// Registers `listener` to be called with every committed record.
    ///
    /// The listener stays registered until the returned [`Subscription`] is
    /// unsubscribed or dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ThemeRecord<T>) + 'static,
    {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));

        let owner: Weak<dyn Detach> = Rc::downgrade(&self.inner) as Weak<dyn Detach>;
        Subscription {
            owner,
            id,
            active: Cell::new(true),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Returns true if both handles refer to the same state.
    pub fn same_state(&self, other: &ThemeState<T>) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: ThemeName> Clone for ThemeState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: ThemeName> fmt::Debug for ThemeState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeState")
            .field("key", &self.inner.key)
            .field("record", &self.inner.record.get())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Registration returned by [`ThemeState::subscribe`].
///
/// Unsubscribing is idempotent and also happens on drop.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    owner: Weak<dyn Detach>,
    id: u64,
    active: Cell<bool>,
}

impl Subscription {
    /// Removes the listener. Safe to call any number of times, including
    /// after the state itself is gone.
    pub fn unsubscribe(&self) {
        if !self.active.replace(false) {
            return;
        }
        if let Some(owner) = self.owner.upgrade() {
            owner.detach(self.id);
        }
    }

    /// Returns true until the first call to [`unsubscribe`](Self::unsubscribe).
    pub fn is_active(&self) -> bool {
        self.active.get()
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
            .field("id", &self.id)
            .field("active", &self.active.get())
            .finish()
    }
}
