//! Memory allocation.
//!
//! Every byte the device claims (the disk image and the per-request contexts) goes through an
//! `Allocator`. Allocation is fallible here: running out of memory is a condition the queue must
//! survive, not a reason to abort.

use std::sync::atomic::{self, AtomicUsize};
use std::sync::Arc;

use Error;

/// The atomic ordering used for the budget counters.
const ORDERING: atomic::Ordering = atomic::Ordering::Relaxed;

/// A source of zeroed byte buffers.
pub trait Allocator {
    /// Allocate a zeroed buffer of `size` bytes.
    ///
    /// If the memory is not available, `Error::OutOfMemory` is returned.
    fn allocate(&self, size: usize) -> Result<Box<[u8]>, Error>;
}

impl<'a, A: Allocator + ?Sized> Allocator for &'a A {
    fn allocate(&self, size: usize) -> Result<Box<[u8]>, Error> {
        (**self).allocate(size)
    }
}

impl<A: Allocator + ?Sized> Allocator for Arc<A> {
    fn allocate(&self, size: usize) -> Result<Box<[u8]>, Error> {
        (**self).allocate(size)
    }
}

/// The global heap.
///
/// Unlike `vec![0; size]`, this reports failure instead of aborting the process.
#[derive(Debug, Default, Clone, Copy)]
pub struct Heap;

impl Allocator for Heap {
    fn allocate(&self, size: usize) -> Result<Box<[u8]>, Error> {
        let mut buf = Vec::new();
        // Reserve up front, so the resize below cannot reallocate.
        buf.try_reserve_exact(size).map_err(|_| Error::OutOfMemory { size: size })?;
        buf.resize(size, 0);

        Ok(buf.into_boxed_slice())
    }
}

/// An allocator with a fixed byte budget.
///
/// Each allocation draws from the budget, and fails once the budget cannot cover it. Memory is
/// not refunded when freed, so the budget bounds the total a device claims over its lifetime.
/// Lowering the budget to zero is also how memory pressure is simulated.
#[derive(Debug)]
pub struct Budget {
    /// The bytes left to hand out.
    remaining: AtomicUsize,
    /// The number of successful allocations so far.
    allocations: AtomicUsize,
}

impl Budget {
    /// Create an allocator which may hand out `bytes` bytes in total.
    pub fn new(bytes: usize) -> Budget {
        Budget {
            remaining: AtomicUsize::new(bytes),
            allocations: AtomicUsize::new(0),
        }
    }

    /// The bytes left in the budget.
    pub fn remaining(&self) -> usize {
        self.remaining.load(ORDERING)
    }

    /// Replace the remaining budget.
    pub fn set_remaining(&self, bytes: usize) {
        self.remaining.store(bytes, ORDERING);
    }

    /// The number of allocations served so far.
    pub fn allocations(&self) -> usize {
        self.allocations.load(ORDERING)
    }
}

impl Allocator for Budget {
    fn allocate(&self, size: usize) -> Result<Box<[u8]>, Error> {
        // Draw from the budget, unless it is too small.
        let mut remaining = self.remaining.load(ORDERING);
        loop {
            if remaining < size {
                return Err(Error::OutOfMemory { size: size });
            }

            match self.remaining.compare_exchange_weak(remaining, remaining - size, ORDERING, ORDERING) {
                Ok(_) => break,
                Err(actual) => remaining = actual,
            }
        }

        let buf = match Heap.allocate(size) {
            Ok(buf) => buf,
            Err(err) => {
                // Give the bytes back, since nothing was handed out.
                self.remaining.fetch_add(size, ORDERING);
                return Err(err);
            },
        };
        self.allocations.fetch_add(1, ORDERING);

        Ok(buf)
    }
}
