//! Request contexts.

use {Error, Stats};
use alloc::Allocator;
use control::STAGING_SIZE;

/// The per-request state attached to every in-flight request.
///
/// A context carries the staging buffer control responses are assembled in. Normal contexts are
/// allocated when a request is admitted and torn down when it completes. Reserved contexts are
/// staged once, when the queue is created, and are recycled between uses instead.
pub struct Context {
    /// The staging buffer.
    staging: Box<[u8]>,
    /// Was this context staged into the reserved pool?
    reserved: bool,
}

impl Context {
    /// Stage a context for the reserved pool.
    ///
    /// This runs once per pool slot, when the queue is created.
    pub fn stage<A: Allocator>(allocator: &A, stats: &Stats) -> Result<Context, Error> {
        let context = Context {
            staging: allocator.allocate(STAGING_SIZE)?,
            reserved: true,
        };
        stats.record(&stats.staged);

        Ok(context)
    }

    /// Allocate a context for a single request.
    ///
    /// This runs on admission of every request, and is the allocation which fails under memory
    /// pressure.
    pub fn allocate<A: Allocator>(allocator: &A, stats: &Stats) -> Result<Context, Error> {
        let context = Context {
            staging: allocator.allocate(STAGING_SIZE)?,
            reserved: false,
        };
        stats.record(&stats.allocated);

        Ok(context)
    }

    /// A placeholder context owning no memory.
    pub(super) fn empty() -> Context {
        Context {
            staging: Vec::new().into_boxed_slice(),
            reserved: false,
        }
    }

    /// Is this a reserved context?
    pub fn is_reserved(&self) -> bool {
        self.reserved
    }

    /// The staging buffer.
    pub fn staging(&mut self) -> &mut [u8] {
        &mut self.staging
    }

    /// Prepare the context for its next use.
    ///
    /// The staging buffer is cleared in place, so nothing from the previous request leaks into the
    /// next one. Nothing is freed.
    pub fn recycle(&mut self, stats: &Stats) {
        for i in self.staging.iter_mut() {
            *i = 0;
        }
        stats.record(&stats.recycled);
    }

    /// Tear the context down, freeing its memory.
    pub fn teardown(self, stats: &Stats) {
        stats.record(&stats.torn_down);
    }
}
