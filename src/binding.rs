//! A two-way bound value shared between a control and its caller.
//!
//! Both sides hold a clone of the same [`Binding`]. Writes bump a version
//! counter so a reader can tell whether the value moved since it last looked,
//! and every write is pushed to subscribers. Everything runs on the UI thread,
//! so the cell is `Rc<RefCell<_>>` and the last writer wins.
//!
//! A subscriber may write the binding from inside its callback. That write is
//! queued and delivered to every subscriber once the current pass finishes,
//! so subscribers see writes in the order they happened.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

type Subscriber<T> = Box<dyn FnMut(T)>;

/// Handle returned by [`Binding::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Inner<T> {
    value: T,
    version: u64,
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Subscriber<T>)>,
    notifying: bool,
    pending: VecDeque<T>,
    // Removals requested while the list is out for notification.
    removed: Vec<SubscriptionId>,
}

pub struct Binding<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Binding")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .finish()
    }
}

impl<T: Copy> Binding<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                value,
                version: 0,
                next_id: 0,
                subscribers: Vec::new(),
                notifying: false,
                pending: VecDeque::new(),
                removed: Vec::new(),
            })),
        }
    }

    pub fn get(&self) -> T {
        self.inner.borrow().value
    }

    /// Store `value` and notify subscribers. Returns the new version.
    pub fn set(&self, value: T) -> u64 {
        let (version, mut subscribers) = {
            let mut inner = self.inner.borrow_mut();
            inner.value = value;
            inner.version += 1;
            if inner.notifying {
                inner.pending.push_back(value);
                return inner.version;
            }
            inner.notifying = true;
            // Take the subscribers out so a callback may read or write the binding.
            (inner.version, std::mem::take(&mut inner.subscribers))
        };

        let mut next = Some(value);
        while let Some(value) = next {
            for (id, subscriber) in subscribers.iter_mut() {
                if !self.inner.borrow().removed.contains(id) {
                    subscriber(value);
                }
            }
            let mut inner = self.inner.borrow_mut();
            subscribers.append(&mut inner.subscribers);
            let removed = std::mem::take(&mut inner.removed);
            subscribers.retain(|(id, _)| !removed.contains(id));
            next = inner.pending.pop_front();
        }

        let mut inner = self.inner.borrow_mut();
        inner.subscribers = subscribers;
        inner.notifying = false;
        version
    }

    /// Number of writes so far.
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    pub fn subscribe(&self, subscriber: impl FnMut(T) + 'static) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Drop a subscription. Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        if let Some(index) = inner.subscribers.iter().position(|(sid, _)| *sid == id) {
            inner.subscribers.remove(index);
            return true;
        }
        if inner.notifying && id.0 < inner.next_id && !inner.removed.contains(&id) {
            inner.removed.push(id);
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn clones_share_the_value() {
        let a = Binding::new(1.0);
        let b = a.clone();
        b.set(5.0);
        assert_eq!(a.get(), 5.0);
        assert_eq!(a.version(), 1);
    }

    #[test]
    fn subscribers_see_every_write() {
        let binding = Binding::new(0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        binding.subscribe(move |v| sink.borrow_mut().push(v));
        binding.set(1);
        binding.set(2);
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn subscriber_may_read_and_subscribe_during_notify() {
        let binding = Binding::new(0);
        let observed = Rc::new(Cell::new(-1));
        let reader = binding.clone();
        let out = Rc::clone(&observed);
        let late_calls = Rc::new(Cell::new(0));
        let late = Rc::clone(&late_calls);
        binding.subscribe(move |_| {
            out.set(reader.get());
            let late = Rc::clone(&late);
            reader.subscribe(move |_| late.set(late.get() + 1));
        });
        binding.set(7);
        assert_eq!(observed.get(), 7);
        binding.set(8);
        assert_eq!(late_calls.get(), 1);
    }

    #[test]
    fn write_from_a_subscriber_reaches_every_subscriber() {
        let binding = Binding::new(0);
        let clamp = binding.clone();
        binding.subscribe(move |v| {
            if v > 10 {
                clamp.set(10);
            }
        });
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        binding.subscribe(move |v| sink.borrow_mut().push(v));

        assert_eq!(binding.set(50), 1);
        assert_eq!(binding.get(), 10);
        assert_eq!(binding.version(), 2);
        assert_eq!(*seen.borrow(), vec![50, 10]);

        binding.set(3);
        assert_eq!(*seen.borrow(), vec![50, 10, 3]);
    }

    #[test]
    fn unsubscribed_callbacks_stop_receiving() {
        let binding = Binding::new(0);
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let id = binding.subscribe(move |_| counter.set(counter.get() + 1));
        binding.set(1);
        assert!(binding.unsubscribe(id));
        assert!(!binding.unsubscribe(id));
        binding.set(2);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn subscriber_may_unsubscribe_itself_during_notify() {
        let binding = Binding::new(0);
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let handle = binding.clone();
        let own_id = Rc::new(Cell::new(None));
        let id_slot = Rc::clone(&own_id);
        let id = binding.subscribe(move |_| {
            counter.set(counter.get() + 1);
            if let Some(id) = id_slot.get() {
                handle.unsubscribe(id);
            }
        });
        own_id.set(Some(id));
        binding.set(1);
        binding.set(2);
        assert_eq!(calls.get(), 1);
    }
}
