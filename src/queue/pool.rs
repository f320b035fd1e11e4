//! The reserved pool.
//!
//! The pool is a bounded free list of contexts staged when the queue is created. Drawing from it
//! never allocates, which is what lets the storage path make progress when nothing else can be
//! allocated.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::mem;

use crossbeam::queue::ArrayQueue;
use slog::Logger;

use {Error, Stats};
use alloc::Allocator;
use queue::Context;

/// The state shared by the pool and its outstanding slots.
struct Shared {
    /// The free contexts.
    free: ArrayQueue<Context>,
    /// The number of contexts staged.
    capacity: usize,
    /// The lifecycle counters.
    stats: Arc<Stats>,
    /// The logger.
    log: Logger,
}

impl Drop for Shared {
    fn drop(&mut self) {
        // Every slot has been returned by now, since each holds a reference to this.
        info!(self.log, "tearing down reserved pool"; "capacity" => self.capacity);

        while let Some(context) = self.free.pop() {
            context.teardown(&self.stats);
        }
    }
}

/// A bounded pool of pre-staged contexts.
pub struct Pool {
    /// The shared state.
    inner: Arc<Shared>,
}

impl Pool {
    /// Stage a pool of `capacity` contexts.
    ///
    /// An empty pool is refused with `Error::InvalidOptions`. If any context cannot be staged, the
    /// ones already staged are torn down and the error is returned.
    pub fn stage<A: Allocator>(capacity: usize, allocator: &A, stats: Arc<Stats>, log: Logger)
        -> Result<Pool, Error> {
        if capacity == 0 {
            return Err(Error::InvalidOptions { reason: "the reserved pool is empty" });
        }

        let shared = Shared {
            free: ArrayQueue::new(capacity),
            capacity: capacity,
            stats: stats,
            log: log,
        };

        for _ in 0..capacity {
            let context = match Context::stage(allocator, &shared.stats) {
                Ok(context) => context,
                Err(err) => {
                    error!(shared.log, "failed to stage reserved request";
                           "staged" => shared.free.len(),
                           "capacity" => capacity,
                           "error" => %err);
                    return Err(err);
                },
            };

            // The free list is sized to the capacity, so this never overflows.
            if let Err(context) = shared.free.push(context) {
                context.teardown(&shared.stats);
            }
        }

        info!(shared.log, "staged reserved pool"; "capacity" => capacity);

        Ok(Pool {
            inner: Arc::new(shared),
        })
    }

    /// Take a context from the pool.
    ///
    /// If every context is in use, `Error::PoolExhausted` is returned. The pool never grows.
    pub fn acquire(&self) -> Result<Reserved, Error> {
        match self.inner.free.pop() {
            Some(context) => {
                trace!(self.inner.log, "acquired reserved request"; "available" => self.available());

                Ok(Reserved {
                    context: context,
                    pool: self.inner.clone(),
                })
            },
            None => {
                error!(self.inner.log, "reserved pool exhausted"; "capacity" => self.inner.capacity);
                Err(Error::PoolExhausted { capacity: self.inner.capacity })
            },
        }
    }

    /// The number of contexts staged.
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// The number of contexts free for use.
    pub fn available(&self) -> usize {
        self.inner.free.len()
    }

    /// The number of contexts currently attached to requests.
    pub fn in_use(&self) -> usize {
        self.capacity() - self.available()
    }
}

/// A context drawn from the reserved pool.
///
/// When dropped, the context is recycled and returned to the pool it came from.
pub struct Reserved {
    /// The context.
    context: Context,
    /// The pool to return to.
    pool: Arc<Shared>,
}

impl Deref for Reserved {
    type Target = Context;

    fn deref(&self) -> &Context {
        &self.context
    }
}

impl DerefMut for Reserved {
    fn deref_mut(&mut self) -> &mut Context {
        &mut self.context
    }
}

impl Drop for Reserved {
    fn drop(&mut self) {
        let mut context = mem::replace(&mut self.context, Context::empty());
        context.recycle(&self.pool.stats);

        match self.pool.free.push(context) {
            Ok(()) => {
                self.pool.stats.record(&self.pool.stats.released);
                trace!(self.pool.log, "released reserved request"; "available" => self.pool.free.len());
            },
            Err(context) => {
                // Unreachable: slots only come from `acquire` on this pool, so there is always
                // room. The context is torn down rather than leaked should that ever change.
                error!(self.pool.log, "reserved pool overflow"; "capacity" => self.pool.capacity);
                context.teardown(&self.pool.stats);
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slog;
    use {Budget, Heap, Status};
    use control::STAGING_SIZE;

    fn log() -> Logger {
        slog::Logger::root(slog::Discard, o!())
    }

    #[test]
    fn capacity_is_a_hard_limit() {
        let stats = Arc::new(Stats::default());
        let pool = Pool::stage(3, &Heap, stats.clone(), log()).unwrap();

        let a = pool.acquire().unwrap();
        let b = pool.acquire().unwrap();
        let c = pool.acquire().unwrap();
        assert_eq!(pool.in_use(), 3);

        let err = pool.acquire().err().unwrap();
        assert_eq!(err, Error::PoolExhausted { capacity: 3 });
        assert_eq!(err.status(), Status::InsufficientResources);

        drop(b);
        assert_eq!(pool.available(), 1);
        let b = pool.acquire().unwrap();

        drop((a, b, c));
        assert_eq!(pool.available(), 3);
        assert_eq!(stats.staged(), 3);
        assert_eq!(stats.released(), 4);
    }

    #[test]
    fn reuse_without_allocation() {
        let budget = Budget::new(2 * STAGING_SIZE);
        let stats = Arc::new(Stats::default());
        let pool = Pool::stage(2, &budget, stats.clone(), log()).unwrap();
        assert_eq!(budget.remaining(), 0);

        for _ in 0..100 {
            let mut slot = pool.acquire().unwrap();
            assert!(slot.is_reserved());
            slot.staging()[0] = 0xFF;
        }

        let mut slot = pool.acquire().unwrap();
        assert!(slot.staging().iter().all(|&x| x == 0));
        drop(slot);

        assert_eq!(budget.allocations(), 2);
        assert_eq!(stats.recycled(), 101);
        assert_eq!(stats.torn_down(), 0);
    }

    #[test]
    fn teardown_once_after_last_slot() {
        let stats = Arc::new(Stats::default());
        let pool = Pool::stage(2, &Heap, stats.clone(), log()).unwrap();

        let slot = pool.acquire().unwrap();
        drop(pool);
        // The outstanding slot keeps the pool alive.
        assert_eq!(stats.torn_down(), 0);

        drop(slot);
        assert_eq!(stats.torn_down(), 2);
    }

    #[test]
    fn empty_pool_is_refused() {
        let stats = Arc::new(Stats::default());

        let err = Pool::stage(0, &Heap, stats.clone(), log()).err().unwrap();
        assert_eq!(err, Error::InvalidOptions { reason: "the reserved pool is empty" });
        assert_eq!(err.status(), Status::InvalidParameter);
        assert_eq!(stats.staged(), 0);
    }

    #[test]
    fn staging_failure() {
        let budget = Budget::new(2 * STAGING_SIZE);
        let stats = Arc::new(Stats::default());

        let err = Pool::stage(3, &budget, stats.clone(), log()).err().unwrap();
        assert_eq!(err.status(), Status::InsufficientResources);
        // The two contexts staged before the failure are torn down again.
        assert_eq!(stats.staged(), 2);
        assert_eq!(stats.torn_down(), 2);
    }
}
