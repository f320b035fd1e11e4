//! Device options.

use std::u32;

use Error;
use admission::Policy;

/// The default size of the disk.
pub const DEFAULT_DISK_SIZE: usize = 1024 * 1024;
/// The default number of reserved requests.
///
/// This bounds the number of requests which can be in flight at once while memory is exhausted.
pub const MAX_RESERVED_REQUESTS: usize = 10;

/// Options for creating a device and its queue.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Options {
    /// The size of the disk in bytes.
    pub disk_size: usize,
    /// The capacity of the reserved pool.
    ///
    /// This should match the number of requests the device must be able to carry concurrently
    /// when no memory can be allocated.
    pub reserved_requests: usize,
    /// Which categories may use the reserved pool.
    pub policy: Policy,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            disk_size: DEFAULT_DISK_SIZE,
            reserved_requests: MAX_RESERVED_REQUESTS,
            policy: Policy::default(),
        }
    }
}

impl Options {
    /// Set the size of the disk.
    pub fn disk_size(mut self, disk_size: usize) -> Options {
        self.disk_size = disk_size;
        self
    }

    /// Set the capacity of the reserved pool.
    pub fn reserved_requests(mut self, reserved_requests: usize) -> Options {
        self.reserved_requests = reserved_requests;
        self
    }

    /// Set the admission policy.
    pub fn policy(mut self, policy: Policy) -> Options {
        self.policy = policy;
        self
    }

    /// Check that a device can be built from the options.
    pub fn validate(&self) -> Result<(), Error> {
        if self.disk_size == 0 {
            return Err(Error::InvalidOptions { reason: "the disk size is zero" });
        }
        // The host describes the disk size with a 32-bit field.
        if self.disk_size as u64 > u32::MAX as u64 {
            return Err(Error::InvalidOptions { reason: "the disk size does not fit in 32 bits" });
        }
        if self.reserved_requests == 0 {
            return Err(Error::InvalidOptions { reason: "the reserved pool is empty" });
        }

        Ok(())
    }
}
