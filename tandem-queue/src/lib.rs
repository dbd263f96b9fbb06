//! # tandem-queue
//!
//! A blocking multi-producer multi-consumer FIFO queue built on a mutex and
//! a condition variable.
//!
//! This is the coarse-grained counterpart to [`tandem-stack`]: every
//! operation runs inside a short critical section, and consumers that find
//! the queue empty can suspend on [`BlockingQueue::pop`] instead of
//! spinning. The queue is unbounded: `push` always succeeds and never
//! applies backpressure.
//!
//! [`tandem-stack`]: https://docs.rs/tandem-stack
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//!
//! use tandem_queue::BlockingQueue;
//!
//! let queue = Arc::new(BlockingQueue::new());
//!
//! // A consumer that sleeps until a value arrives.
//! let consumer = {
//!     let queue = Arc::clone(&queue);
//!     thread::spawn(move || queue.pop())
//! };
//!
//! queue.push(42u64);
//! assert_eq!(consumer.join().unwrap(), 42);
//! ```
//!
//! ## Design Notes
//!
//! - One mutex guards the element sequence; no operation ever observes a
//!   partially-mutated queue.
//! - `pop` waits on a condition variable and re-checks the non-empty
//!   predicate under the lock after every wakeup, so spurious wakeups and
//!   lost-wakeup races cannot produce stale or duplicate values.
//! - `len` and `is_empty` are snapshots: valid at the instant the lock was
//!   held, immediately stale under concurrent mutation.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_panics_doc)] // every operation shares the poisoning contract below

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard};

/// A thread-safe FIFO queue with blocking and non-blocking consumers.
///
/// All methods take `&self`; share the queue between threads with
/// [`std::sync::Arc`]. The queue is deliberately not `Clone`: one
/// instance, many handles.
///
/// Every operation panics if the internal mutex is poisoned, i.e. a peer
/// thread panicked while holding the lock. A poisoned queue is
/// unrecoverable: its sequence can no longer be trusted.
pub struct BlockingQueue<T> {
    inner: Mutex<VecDeque<T>>,
    not_empty: Condvar,
}

impl<T> BlockingQueue<T> {
    /// Creates a new, empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
            not_empty: Condvar::new(),
        }
    }

    /// Creates a queue pre-filled with `len` default-valued entries.
    ///
    /// # Example
    ///
    /// ```
    /// use tandem_queue::BlockingQueue;
    ///
    /// let queue = BlockingQueue::<u32>::with_len(3);
    /// assert_eq!(queue.len(), 3);
    /// assert_eq!(queue.try_pop(), Some(0));
    /// ```
    #[must_use]
    pub fn with_len(len: usize) -> Self
    where
        T: Default,
    {
        Self {
            inner: Mutex::new((0..len).map(|_| T::default()).collect()),
            not_empty: Condvar::new(),
        }
    }

    /// Appends a value at the tail and wakes one blocked consumer.
    ///
    /// Always succeeds; the queue is unbounded.
    ///
    /// # Example
    ///
    /// ```
    /// use tandem_queue::BlockingQueue;
    ///
    /// let queue = BlockingQueue::new();
    /// queue.push(1);
    /// queue.push(2);
    /// assert_eq!(queue.len(), 2);
    /// ```
    pub fn push(&self, value: T) {
        let mut data = self.lock();
        data.push_back(value);
        self.not_empty.notify_one();
    }

    /// Removes and returns the head element, or `None` if the queue is
    /// empty. Never blocks.
    ///
    /// # Example
    ///
    /// ```
    /// use tandem_queue::BlockingQueue;
    ///
    /// let queue = BlockingQueue::new();
    /// assert_eq!(queue.try_pop(), None);
    ///
    /// queue.push(7);
    /// assert_eq!(queue.try_pop(), Some(7));
    /// ```
    pub fn try_pop(&self) -> Option<T> {
        self.lock().pop_front()
    }

    /// Removes and returns the head element, blocking until one is
    /// available.
    ///
    /// The calling thread suspends on the queue's condition variable while
    /// empty (the lock is released for the duration of the wait). The
    /// non-empty predicate is re-checked under the lock after every
    /// wakeup, so a spurious wakeup (or losing the race for the element to
    /// another consumer) simply puts the thread back to sleep.
    ///
    /// There is no timeout; callers that need bounded waiting must layer
    /// it externally.
    pub fn pop(&self) -> T {
        let mut data = self.lock();
        loop {
            if let Some(value) = data.pop_front() {
                return value;
            }
            data = self
                .not_empty
                .wait(data)
                .expect("queue condvar wait poisoned");
        }
    }

    /// Returns a clone of the head element without removing it, or `None`
    /// if the queue is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use tandem_queue::BlockingQueue;
    ///
    /// let queue = BlockingQueue::new();
    /// queue.push(5);
    ///
    /// assert_eq!(queue.front(), Some(5));
    /// assert_eq!(queue.len(), 1); // still there
    /// ```
    #[must_use]
    pub fn front(&self) -> Option<T>
    where
        T: Clone,
    {
        self.lock().front().cloned()
    }

    /// Returns the number of elements in the queue.
    ///
    /// This is a snapshot taken under the lock: under concurrent mutation
    /// the value may be stale by the time the caller observes it. Do not
    /// treat it as exact under contention.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if the queue contains no elements.
    ///
    /// The same snapshot caveat as [`BlockingQueue::len`] applies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        // A poisoned lock means a peer thread panicked mid-critical-section;
        // the sequence can no longer be trusted.
        self.inner.lock().expect("queue mutex poisoned")
    }
}

impl<T> Default for BlockingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for BlockingQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockingQueue")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
