//! A memory-backed block device.
//!
//! This crate implements a RAM disk served through a host I/O boundary: the host hands us
//! requests (reads, writes and device-control calls) and we complete each of them exactly once
//! with a status and a byte count.
//!
//! The interesting part is forward progress. Every in-flight request needs a context, and
//! allocating that context can fail when the system is short on memory. To keep the storage path
//! alive anyway, the queue stages a bounded pool of contexts up front, and requests whose major
//! category is guaranteed by the admission policy are served from this pool whenever normal
//! allocation fails.
//!
//! The layers, bottom to top:
//!
//! - `disk`: the backing image, its geometry and partition metadata.
//! - `control`: the control-plane dispatch table.
//! - `admission`: the classifier deciding which categories may use reserved contexts.
//! - `queue`: contexts, the reserved pool and the request lifecycle.

extern crate byteorder;
extern crate crossbeam;
#[macro_use]
extern crate quick_error;
#[macro_use]
extern crate slog;

#[macro_use]
mod macros;

pub mod admission;
pub mod alloc;
pub mod control;
pub mod disk;
mod device;
mod error;
mod options;
pub mod queue;
mod request;

pub use admission::{classify, Action, MajorFunction, Policy};
pub use alloc::{Allocator, Budget, Heap};
pub use device::Device;
pub use error::{Completion, Error, Reply, Status};
pub use options::{Options, DEFAULT_DISK_SIZE, MAX_RESERVED_REQUESTS};
pub use queue::{Context, Pool, Queue, Reserved, Slot, Stats};
pub use request::{Operation, Request};
