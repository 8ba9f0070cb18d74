//! Bounded work-stealing deque with a stamped top.
//!
//! One designated owner pushes and pops the bottom; any number of other
//! threads may pop the top ("steal"). The owner's operations need no
//! synchronization with each other (there is only ever one owner), but
//! every operation that touches `top` goes through the [`StampedIndex`]
//! CAS so a thief and the owner racing for the last element resolve to
//! exactly one winner.
//!
//! Capacity is fixed at construction; `push_bottom` past capacity is a
//! programmer error, not a runtime condition to recover from - callers
//! size each deque at `ceil(n / threads) + 1` so it cannot happen.

use crate::stamped_index::StampedIndex;
use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicI32, Ordering};

/// A fixed-capacity double-ended queue supporting one owner (bottom) and
/// many thieves (top).
pub struct Deque<T> {
    bottom: AtomicI32,
    top: StampedIndex,
    capacity: i32,
    slots: Box<[UnsafeCell<MaybeUninit<T>>]>,
}

// SAFETY: `slots` is only ever written by the owner and read by whichever
// side (owner or thief) wins the stamped-top CAS for that slot; the two
// never observe the same element as live simultaneously (see pop_bottom
// and pop_top below).
unsafe impl<T: Send> Sync for Deque<T> {}
unsafe impl<T: Send> Send for Deque<T> {}

impl<T> Deque<T> {
    /// Creates a deque with room for exactly `capacity` tasks.
    pub fn new(capacity: usize) -> Self {
        let slots = (0..capacity)
            .map(|_| UnsafeCell::new(MaybeUninit::uninit()))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self {
            bottom: AtomicI32::new(0),
            top: StampedIndex::new(0, 0),
            capacity: capacity as i32,
            slots,
        }
    }

    /// Pushes a task onto the bottom of the deque. Owner only.
    ///
    /// # Panics
    ///
    /// Panics if the deque is already at capacity.
    pub fn push_bottom(&self, task: T) {
        let b = self.bottom.load(Ordering::Relaxed);
        assert!(b < self.capacity, "push_bottom on a full deque");
        // SAFETY: only the owner writes, and only at index `b`, which no
        // thief can have claimed yet because `bottom` hasn't advanced.
        unsafe {
            (*self.slots[b as usize].get()).write(task);
        }
        self.bottom.store(b + 1, Ordering::Release);
    }

    /// Pops a task from the bottom of the deque. Owner only.
    pub fn pop_bottom(&self) -> Option<T> {
        let b = self.bottom.load(Ordering::SeqCst);
        if b == 0 {
            return None;
        }
        let b = b - 1;
        self.bottom.store(b, Ordering::SeqCst);

        // SAFETY: speculative read. It is only kept if this call goes on
        // to win the race for slot `b` below; on every losing path the
        // copy is forgotten without running its destructor so the real
        // owner (a thief, or nobody) is the only one who drops it.
        let task = unsafe { (*self.slots[b as usize].get()).assume_init_read() };
        let (old_top, old_stamp) = self.top.get();

        if b > old_top {
            return Some(task);
        }
        if b == old_top {
            let won = self.top.cas(old_top, 0, old_stamp, old_stamp + 1);
            self.bottom.store(0, Ordering::SeqCst);
            if won {
                return Some(task);
            }
            std::mem::forget(task);
            return None;
        }
        // b < old_top: a thief already drained past us.
        self.top.set(0, old_stamp + 1);
        self.bottom.store(0, Ordering::SeqCst);
        std::mem::forget(task);
        None
    }

    /// Pops a task from the top of the deque. Any thread may call this.
    pub fn pop_top(&self) -> Option<T> {
        let (old_top, old_stamp) = self.top.get();
        let b = self.bottom.load(Ordering::SeqCst);
        if b <= old_top {
            return None;
        }
        // SAFETY: see pop_bottom - kept only if the CAS below succeeds.
        let task = unsafe { (*self.slots[old_top as usize].get()).assume_init_read() };
        if self.top.cas(old_top, old_top + 1, old_stamp, old_stamp + 1) {
            Some(task)
        } else {
            std::mem::forget(task);
            None
        }
    }

    /// Snapshot check: `true` if no task is currently available to pop.
    ///
    /// A `false` result may go stale immediately under concurrent pops;
    /// callers that need a reliable answer must retry their `pop_*` call.
    pub fn is_empty(&self) -> bool {
        self.bottom.load(Ordering::SeqCst) <= self.top.value()
    }
}

impl<T> Drop for Deque<T> {
    fn drop(&mut self) {
        let b = *self.bottom.get_mut();
        let top = self.top.value();
        let lo = top.max(0);
        for i in lo..b {
            // SAFETY: [top, bottom) holds the still-live, not-yet-popped
            // elements; everything outside that range was already moved
            // out by a pop_bottom/pop_top call.
            unsafe {
                (*self.slots[i as usize].get()).assume_init_drop();
            }
        }
    }
}
