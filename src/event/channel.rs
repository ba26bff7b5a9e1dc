//! Lock-free single-producer/single-consumer event ring.
//!
//! The ring holds `capacity` slots and keeps one of them free so that
//! `head == tail` always means "empty". At most `capacity - 1` events can be
//! queued; a push into a full ring is rejected (drop-newest) and leaves the
//! ring untouched.
//!
//! Ordering contract:
//! - the producer writes the slot, then publishes `tail` with `Release`;
//!   the consumer loads `tail` with `Acquire` before reading the slot.
//! - the consumer publishes `head` with `Release` after copying the slot out;
//!   the producer loads `head` with `Acquire` before reusing a slot.
//!
//! Neither side locks, blocks, or allocates after construction, so
//! [`EventConsumer::pop`] is safe to call from the audio callback.

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::event::Event;
use crate::{Error, Result};

/// Keeps `head` and `tail` on separate cache lines.
#[repr(align(64))]
struct CachePadded<T>(T);

struct Ring {
    slots: Box<[UnsafeCell<Event>]>,
    /// Next slot to read; advanced only by the consumer.
    head: CachePadded<AtomicUsize>,
    /// Next slot to write; advanced only by the producer.
    tail: CachePadded<AtomicUsize>,
}

// SAFETY: a slot is written only by the producer while it lies outside
// [head, tail), and read only by the consumer while it lies inside. The
// acquire/release pairs on `head` and `tail` order those accesses.
unsafe impl Sync for Ring {}

impl Ring {
    #[inline]
    fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    fn advance(&self, index: usize) -> usize {
        let next = index + 1;
        if next == self.capacity() {
            0
        } else {
            next
        }
    }

    fn len(&self) -> usize {
        let head = self.head.0.load(Ordering::Acquire);
        let tail = self.tail.0.load(Ordering::Acquire);
        (tail + self.capacity() - head) % self.capacity()
    }
}

/// Create a connected producer/consumer pair with `capacity` slots.
///
/// ```
/// use zynthora::event::{self, Event};
///
/// let (mut tx, mut rx) = event::channel(4).unwrap();
/// assert!(tx.push(Event::note_on(60, 100)));
/// assert_eq!(rx.pop(), Some(Event::note_on(60, 100)));
/// assert_eq!(rx.pop(), None);
/// ```
pub fn channel(capacity: usize) -> Result<(EventProducer, EventConsumer)> {
    if capacity < 2 {
        return Err(Error::InvalidCapacity(capacity));
    }

    let slots = (0..capacity)
        .map(|_| UnsafeCell::new(Event::default()))
        .collect::<Vec<_>>()
        .into_boxed_slice();

    let ring = Arc::new(Ring {
        slots,
        head: CachePadded(AtomicUsize::new(0)),
        tail: CachePadded(AtomicUsize::new(0)),
    });

    Ok((
        EventProducer { ring: ring.clone() },
        EventConsumer { ring },
    ))
}

/// Control-context end of the channel.
pub struct EventProducer {
    ring: Arc<Ring>,
}

impl EventProducer {
    /// Enqueue an event. Returns `false` without touching the ring when it
    /// is full.
    pub fn push(&mut self, event: Event) -> bool {
        let ring = &*self.ring;
        let tail = ring.tail.0.load(Ordering::Relaxed);
        let next = ring.advance(tail);

        if next == ring.head.0.load(Ordering::Acquire) {
            return false;
        }

        // SAFETY: `tail` is outside [head, tail) so the consumer is not
        // reading it, and only this producer writes slots.
        unsafe {
            *ring.slots[tail].get() = event;
        }
        ring.tail.0.store(next, Ordering::Release);
        true
    }

    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Events currently queued (a snapshot; the consumer may be draining).
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() == self.capacity() - 1
    }
}

/// Render-context end of the channel.
pub struct EventConsumer {
    ring: Arc<Ring>,
}

impl EventConsumer {
    pub fn pop(&mut self) -> Option<Event> {
        let ring = &*self.ring;
        let head = ring.head.0.load(Ordering::Relaxed);

        if head == ring.tail.0.load(Ordering::Acquire) {
            return None;
        }

        // SAFETY: the acquire load of `tail` guarantees the producer's write
        // to `head`'s slot is visible, and the producer will not touch it
        // again until we publish the new head below.
        let event = unsafe { *ring.slots[head].get() };
        ring.head.0.store(ring.advance(head), Ordering::Release);
        Some(event)
    }

    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Anything the router can drain events from.
pub trait EventSource {
    fn pop(&mut self) -> Option<Event>;

    /// Upper bound on the events a single drain consumes.
    fn capacity(&self) -> usize;
}

impl EventSource for EventConsumer {
    fn pop(&mut self) -> Option<Event> {
        EventConsumer::pop(self)
    }

    fn capacity(&self) -> usize {
        EventConsumer::capacity(self)
    }
}

#[cfg(feature = "rtrb")]
impl EventSource for rtrb::Consumer<Event> {
    fn pop(&mut self) -> Option<Event> {
        rtrb::Consumer::pop(self).ok()
    }

    fn capacity(&self) -> usize {
        self.buffer().capacity()
    }
}
