//! The request queue.
//!
//! The queue owns the device and carries every request through its lifecycle:
//!
//! 1. **Admission.** A context is allocated for the request. If that fails, the admission policy
//!    decides whether the request may draw a reserved context from the pool, or is failed.
//! 2. **Execution.** The request is run against the device.
//! 3. **Completion.** The request is completed exactly once, with a status and a byte count.
//! 4. **Release.** Normal contexts are torn down. Reserved contexts are recycled and returned to
//!    the pool, and are only torn down with the queue itself.

mod context;
mod pool;

pub use self::context::Context;
pub use self::pool::{Pool, Reserved};

use std::sync::atomic::{self, AtomicUsize};
use std::sync::Arc;

use slog::Logger;

use {Completion, Device, Error, Options, Request};
use admission::{Action, MajorFunction, Policy};
use alloc::{Allocator, Heap};
use request::Operation;

/// The atomic ordering used for the lifecycle counters.
const ORDERING: atomic::Ordering = atomic::Ordering::Relaxed;

/// Lifecycle counters.
///
/// These count how often each lifecycle hook has run, which is how the host (and the tests) can
/// observe that reserved contexts are reused rather than reallocated.
#[derive(Debug, Default)]
pub struct Stats {
    /// Contexts staged into the reserved pool.
    staged: AtomicUsize,
    /// Contexts allocated on the normal path.
    allocated: AtomicUsize,
    /// Reserved contexts recycled after use.
    recycled: AtomicUsize,
    /// Reserved contexts returned to the pool.
    released: AtomicUsize,
    /// Contexts torn down.
    torn_down: AtomicUsize,
}

impl Stats {
    /// Increment a counter.
    fn record(&self, counter: &AtomicUsize) {
        counter.fetch_add(1, ORDERING);
    }

    /// The number of contexts staged into the reserved pool.
    pub fn staged(&self) -> usize {
        self.staged.load(ORDERING)
    }

    /// The number of contexts allocated on the normal path.
    pub fn allocated(&self) -> usize {
        self.allocated.load(ORDERING)
    }

    /// The number of times a reserved context was recycled.
    pub fn recycled(&self) -> usize {
        self.recycled.load(ORDERING)
    }

    /// The number of times a reserved context was returned to the pool.
    pub fn released(&self) -> usize {
        self.released.load(ORDERING)
    }

    /// The number of contexts torn down.
    pub fn torn_down(&self) -> usize {
        self.torn_down.load(ORDERING)
    }
}

/// The context attached to an admitted request.
pub enum Slot {
    /// A context allocated for this request alone.
    Normal(Context),
    /// A context drawn from the reserved pool.
    Reserved(Reserved),
}

impl Slot {
    /// Was the request admitted through the reserved pool?
    pub fn is_reserved(&self) -> bool {
        match *self {
            Slot::Normal(_) => false,
            Slot::Reserved(_) => true,
        }
    }

    /// The attached context.
    pub fn context(&mut self) -> &mut Context {
        match *self {
            Slot::Normal(ref mut context) => context,
            Slot::Reserved(ref mut reserved) => &mut **reserved,
        }
    }
}

/// A request queue serving a single device.
///
/// Requests are carried one at a time.
pub struct Queue<A: Allocator = Heap> {
    /// The device.
    device: Device,
    /// The reserved pool.
    pool: Pool,
    /// Which categories may use the reserved pool.
    policy: Policy,
    /// The allocator of normal contexts.
    allocator: A,
    /// The lifecycle counters.
    stats: Arc<Stats>,
    /// The logger.
    log: Logger,
}

impl<A: Allocator> Queue<A> {
    /// Create the device and its queue.
    ///
    /// This allocates the disk image and stages the reserved pool, both through `allocator`. If
    /// either fails, nothing is kept and the error is returned.
    pub fn new(options: &Options, allocator: A, log: Logger) -> Result<Queue<A>, Error> {
        options.validate()?;

        let stats = Arc::new(Stats::default());
        let device = Device::new(options, &allocator, log.new(o!("component" => "device")))?;
        let pool = Pool::stage(options.reserved_requests,
                               &allocator,
                               stats.clone(),
                               log.new(o!("component" => "pool")))?;

        info!(log, "queue ready";
              "disk_size" => options.disk_size,
              "reserved_requests" => options.reserved_requests);

        Ok(Queue {
            device: device,
            pool: pool,
            policy: options.policy,
            allocator: allocator,
            stats: stats,
            log: log,
        })
    }

    /// Attach a context to a request of category `major`.
    ///
    /// Normal allocation is tried first. When it fails, the admission policy decides: guaranteed
    /// categories draw from the reserved pool (failing with `PoolExhausted` if it is empty), and
    /// everything else fails with `Rejected`.
    pub fn admit(&self, major: MajorFunction) -> Result<Slot, Error> {
        let err = match Context::allocate(&self.allocator, &self.stats) {
            Ok(context) => return Ok(Slot::Normal(context)),
            Err(err) => err,
        };

        match self.policy.examine(major) {
            Action::UseReservedRequest => {
                warn!(self.log, "allocation failed; using reserved request";
                      "major" => ?major,
                      "error" => %err);
                self.pool.acquire().map(Slot::Reserved)
            },
            Action::FailRequest => {
                warn!(self.log, "allocation failed; rejecting request";
                      "major" => ?major,
                      "error" => %err);
                Err(Error::Rejected { major: major })
            },
        }
    }

    /// Execute an admitted request and complete it.
    ///
    /// The slot is released afterwards: a normal context is torn down, and a reserved one goes
    /// back to the pool.
    pub fn dispatch(&mut self, mut slot: Slot, request: Request) -> Completion {
        let major = request.major;

        let result = match request.operation {
            Operation::Read { offset, buf } => self.device.read(offset, buf),
            Operation::Write { offset, buf } => self.device.write(offset, buf),
            Operation::Control { code, input, output } => {
                self.device.control(code, input, output, slot.context().staging())
            },
            Operation::Unsupported => {
                debug!(self.log, "unsupported request"; "major" => ?major);
                Err(Error::Unsupported { major: major })
            },
        };

        let completion = Completion::from(result);
        debug!(self.log, "completing request";
               "major" => ?major,
               "reserved" => slot.is_reserved(),
               "status" => ?completion.status,
               "information" => completion.information);

        match slot {
            Slot::Normal(context) => context.teardown(&self.stats),
            // Dropping it returns it to the pool.
            Slot::Reserved(reserved) => drop(reserved),
        }

        completion
    }

    /// Admit, execute and complete a request.
    ///
    /// Admission failures complete the request too, so every request yields exactly one
    /// completion.
    pub fn submit(&mut self, request: Request) -> Completion {
        match self.admit(request.major) {
            Ok(slot) => self.dispatch(slot, request),
            Err(err) => {
                debug!(self.log, "failing request"; "major" => ?request.major, "error" => %err);
                err.into()
            },
        }
    }

    /// The device.
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// The reserved pool.
    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// The lifecycle counters.
    ///
    /// These are shared with the pool, and outlive the queue if cloned.
    pub fn stats(&self) -> &Arc<Stats> {
        &self.stats
    }

    /// The allocator.
    pub fn allocator(&self) -> &A {
        &self.allocator
    }
}

impl<A: Allocator> Drop for Queue<A> {
    fn drop(&mut self) {
        info!(self.log, "tearing down queue";
              "in_use" => self.pool.in_use(),
              "torn_down" => self.stats.torn_down());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slog;
    use {Budget, Status};
    use control::{code, STAGING_SIZE};
    use disk::SECTOR_SIZE;

    fn log() -> Logger {
        slog::Logger::root(slog::Discard, o!())
    }

    /// A queue whose allocator has exactly enough memory for the disk and the pool.
    fn starved(options: &Options) -> Queue<Arc<Budget>> {
        let budget = Arc::new(Budget::new(options.disk_size + options.reserved_requests * STAGING_SIZE));
        Queue::new(options, budget, log()).unwrap()
    }

    #[test]
    fn normal_path() {
        let mut queue = Queue::new(&Options::default(), Heap, log()).unwrap();

        let data = [0x5A; SECTOR_SIZE];
        let completion = queue.submit(Request::write(SECTOR_SIZE as i64, &data));
        assert_eq!(completion.status, Status::Success);
        assert_eq!(completion.information, SECTOR_SIZE);

        assert_eq!(queue.stats().allocated(), 1);
        assert_eq!(queue.stats().torn_down(), 1);
        assert_eq!(queue.stats().recycled(), 0);
    }

    #[test]
    fn admission_under_pressure() {
        let queue = starved(&Options::default());

        assert!(queue.admit(MajorFunction::Read).unwrap().is_reserved());
        assert!(queue.admit(MajorFunction::DeviceControl).unwrap().is_reserved());
        assert_eq!(queue.admit(MajorFunction::Create).err(), Some(Error::Rejected { major: MajorFunction::Create }));
        assert_eq!(queue.stats().allocated(), 0);
    }

    #[test]
    fn custom_policy() {
        let options = Options::default().policy(Policy::none().guarantee(MajorFunction::FlushBuffers));
        let queue = starved(&options);

        assert!(queue.admit(MajorFunction::FlushBuffers).unwrap().is_reserved());
        assert!(queue.admit(MajorFunction::Read).is_err());
    }

    #[test]
    fn rejected_request_completes() {
        let mut queue = starved(&Options::default());

        let completion = queue.submit(Request::other(MajorFunction::Cleanup));
        assert_eq!(completion.status, Status::InvalidDeviceRequest);
        assert_eq!(completion.information, 0);
        assert_eq!(queue.pool().in_use(), 0);
    }

    #[test]
    fn unsupported_request() {
        let mut queue = Queue::new(&Options::default(), Heap, log()).unwrap();

        let completion = queue.submit(Request::other(MajorFunction::Create));
        assert_eq!(completion.status, Status::InvalidDeviceRequest);
        assert_eq!(queue.stats().torn_down(), 1);
    }

    #[test]
    fn internal_control_shares_table() {
        let mut queue = starved(&Options::default());

        let mut out = [0; 8];
        let completion = queue.submit(Request::internal_device_control(code::DISK_GET_LENGTH_INFO, &[], &mut out));
        assert_eq!(completion.status, Status::Success);
        assert_eq!(completion.information, 8);
        assert_eq!(out, [0, 0, 0x10, 0, 0, 0, 0, 0]);
        assert_eq!(queue.stats().recycled(), 1);
    }

    #[test]
    fn creation_out_of_memory() {
        let options = Options::default();
        let budget = Budget::new(options.disk_size + STAGING_SIZE);

        let err = Queue::new(&options, &budget, log()).err().unwrap();
        assert_eq!(err.status(), Status::InsufficientResources);
    }
}
