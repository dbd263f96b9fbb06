//! # tandem-stack
//!
//! An unbounded lock-free multi-producer multi-consumer stack.
//!
//! This is the classic Treiber stack: a singly-linked chain of nodes whose
//! head pointer is swapped with compare-and-swap. `push` and `pop` never
//! take a lock and never suspend; a failed CAS is retried with backoff
//! until it wins, so some thread always completes an operation in a
//! bounded number of steps (lock-freedom, not wait-freedom: an individual
//! thread can be starved by continuously-succeeding peers).
//!
//! ## Example
//!
//! ```
//! use tandem_stack::Stack;
//!
//! let stack = Stack::new();
//!
//! stack.push(1);
//! stack.push(2);
//! stack.push(3);
//!
//! assert_eq!(stack.pop(), Some(3));
//! assert_eq!(stack.pop(), Some(2));
//! assert_eq!(stack.pop(), Some(1));
//! assert_eq!(stack.pop(), None);
//! ```
//!
//! ## Memory reclamation
//!
//! A popped node becomes unreachable from `head`, but a concurrent `pop`
//! or `len` traversal may still hold a reference into it. Freeing the node
//! immediately would be a use-after-free, and recycling its address could
//! make a later CAS succeed on a stale comparison (the ABA hazard).
//!
//! Nodes are therefore handed to [`crossbeam_epoch`]'s collector on the
//! winning unlink CAS and freed only after every thread that was pinned at
//! unlink time has unpinned. No reader ever dereferences a reclaimed node,
//! and no address is recycled while a reader could still observe its old
//! linkage.
//!
//! ## Design Notes
//!
//! - `head` is the single point of synchronization; node payloads are
//!   never mutated between push and reclamation.
//! - LIFO order holds among operations that do not interleave with a
//!   conflicting CAS. There is no fairness guarantee.
//! - [`Stack::len`] walks the chain without synchronization against
//!   concurrent pushes and pops; it is diagnostic-only.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::fmt;
use std::mem::ManuallyDrop;
use std::ptr;
use std::sync::atomic::Ordering;

use crossbeam_epoch::{self as epoch, Atomic, Owned};
use crossbeam_utils::Backoff;

/// A node in the stack.
///
/// Owned by whichever link currently reaches it: `head` if it is the top,
/// otherwise the `next` field of the node above it. The payload lives in
/// `ManuallyDrop` so that a winning `pop` can move it out and leave the
/// node itself to the epoch collector without double-dropping.
struct Node<T> {
    value: ManuallyDrop<T>,
    next: Atomic<Node<T>>,
}

/// A lock-free LIFO stack shareable across any number of threads.
///
/// All methods take `&self`; share the stack between threads with
/// [`std::sync::Arc`].
pub struct Stack<T> {
    head: Atomic<Node<T>>,
}

// Safety: the stack owns its values. Moving the stack (or sharing it) moves
// access to T across threads, so T: Send is required; all shared-state
// coordination goes through the atomic head.
unsafe impl<T: Send> Send for Stack<T> {}
unsafe impl<T: Send> Sync for Stack<T> {}

impl<T> Stack<T> {
    /// Creates a new, empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self {
            head: Atomic::null(),
        }
    }

    /// Pushes a value onto the top of the stack.
    ///
    /// The node is allocated once; the CAS that installs it retries (with
    /// backoff) until it wins. Never blocks.
    pub fn push(&self, value: T) {
        let mut node = Owned::new(Node {
            value: ManuallyDrop::new(value),
            next: Atomic::null(),
        });

        let guard = epoch::pin();
        let backoff = Backoff::new();

        loop {
            let head = self.head.load(Ordering::Relaxed, &guard);
            node.next.store(head, Ordering::Relaxed);

            match self
                .head
                .compare_exchange(head, node, Ordering::Release, Ordering::Relaxed, &guard)
            {
                Ok(_) => return,
                Err(e) => {
                    // Lost the race; retry with the node we got back.
                    node = e.new;
                    backoff.spin();
                }
            }
        }
    }

    /// Pops the top value off the stack.
    ///
    /// Returns `None` only if `head` was observed null, i.e. the stack was
    /// truly empty at that instant. Otherwise the unlinking CAS is retried
    /// until it wins, tolerating arbitrary concurrent pushes and pops
    /// between the read and the CAS.
    pub fn pop(&self) -> Option<T> {
        let guard = epoch::pin();
        let backoff = Backoff::new();

        loop {
            let head = self.head.load(Ordering::Acquire, &guard);
            let node = unsafe { head.as_ref() }?;
            let next = node.next.load(Ordering::Relaxed, &guard);

            match self
                .head
                .compare_exchange(head, next, Ordering::Release, Ordering::Relaxed, &guard)
            {
                Ok(_) => unsafe {
                    // The node is unlinked: no traversal starting from head
                    // can reach it anymore. Move the payload out, then let
                    // the collector free the node once every thread pinned
                    // at unlink time has unpinned.
                    let value = ptr::read(&node.value);
                    guard.defer_destroy(head);
                    return Some(ManuallyDrop::into_inner(value));
                },
                Err(_) => backoff.spin(),
            }
        }
    }

    /// Returns `true` if the stack was empty at the instant `head` was
    /// read.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let guard = epoch::pin();
        self.head.load(Ordering::Acquire, &guard).is_null()
    }

    /// Counts the nodes currently reachable from `head`.
    ///
    /// This walks the whole chain and is **not atomic**: concurrent pushes
    /// and pops during the traversal make the result a bound, not an exact
    /// count. Use it for diagnostics only, e.g. checking for residual
    /// items after all producers and consumers have quiesced.
    #[must_use]
    pub fn len(&self) -> usize {
        let guard = epoch::pin();
        let mut count = 0;
        let mut curr = self.head.load(Ordering::Acquire, &guard);

        while let Some(node) = unsafe { curr.as_ref() } {
            count += 1;
            curr = node.next.load(Ordering::Acquire, &guard);
        }

        count
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack")
            .field("is_empty", &self.is_empty())
            .finish_non_exhaustive()
    }
}

impl<T> Drop for Stack<T> {
    fn drop(&mut self) {
        // &mut self: no other thread can touch the chain, so it can be
        // walked and freed without pinning.
        unsafe {
            let guard = epoch::unprotected();
            let mut curr = self.head.load(Ordering::Relaxed, guard);

            while !curr.is_null() {
                let mut node = curr.into_owned();
                ManuallyDrop::drop(&mut node.value);
                curr = node.next.load(Ordering::Relaxed, guard);
            }
        }
    }
}
