//! Errors and completion outcomes.

use admission::MajorFunction;

/// The completion status of a request.
///
/// This is the status reported back to the host when a request is completed. Every request is
/// completed with exactly one of these.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Status {
    /// The request succeeded.
    Success,
    /// The fixed header of the response fit, but the variable-length payload did not.
    ///
    /// The header is valid, and lets the caller derive the size it needs.
    BufferOverflow,
    /// The offset or length of a transfer was out of bounds or misaligned.
    InvalidParameter,
    /// The caller's buffer cannot hold the response.
    BufferTooSmall,
    /// The request is not one this device handles.
    InvalidDeviceRequest,
    /// No resources were available to carry the request.
    InsufficientResources,
}

impl Status {
    /// The status value as understood by the host.
    pub fn code(self) -> u32 {
        match self {
            Status::Success => 0x0000_0000,
            Status::BufferOverflow => 0x8000_0005,
            Status::InvalidParameter => 0xC000_000D,
            Status::InvalidDeviceRequest => 0xC000_0010,
            Status::BufferTooSmall => 0xC000_0023,
            Status::InsufficientResources => 0xC000_009A,
        }
    }

    /// Did the request succeed?
    ///
    /// `BufferOverflow` is a warning, not an error, but it does not count as success either.
    pub fn is_success(self) -> bool {
        self == Status::Success
    }
}

quick_error! {
    /// A request failure.
    #[derive(Debug, PartialEq, Eq)]
    pub enum Error {
        /// The transfer was out of bounds or its length was not a multiple of the sector size.
        InvalidParameter {
            // The byte offset of the transfer.
            offset: i64,
            // The length of the transfer in bytes.
            length: usize
        } {
            display("Invalid transfer of {} bytes at offset {}.", length, offset)
            description("Invalid transfer parameters.")
        }
        /// The caller's buffer is smaller than the fixed size of the structure.
        BufferTooSmall {
            // The number of bytes required.
            required: usize
        } {
            display("Buffer too small; {} bytes required.", required)
            description("Buffer too small.")
        }
        /// The control code is not in the dispatch table.
        UnknownControlCode {
            // The control code.
            code: u32
        } {
            display("Unknown control code {:#x}.", code)
            description("Unknown control code.")
        }
        /// The control call needs input which the caller did not supply.
        MissingInput {
            // The number of input bytes required.
            required: usize
        } {
            display("Control call needs {} bytes of input.", required)
            description("Missing control input.")
        }
        /// The admission policy refused to serve this category from the reserved pool.
        Rejected {
            // The major category of the request.
            major: MajorFunction
        } {
            display("Refused {:?} request under memory pressure.", major)
            description("Request rejected by the admission policy.")
        }
        /// The device has no handler for this category.
        Unsupported {
            // The major category of the request.
            major: MajorFunction
        } {
            display("{:?} requests are not handled by the device.", major)
            description("Unsupported request category.")
        }
        /// Every reserved context is in use.
        PoolExhausted {
            // The capacity of the pool.
            capacity: usize
        } {
            display("All {} reserved requests are in use.", capacity)
            description("Reserved pool exhausted.")
        }
        /// An allocation failed.
        OutOfMemory {
            // The size of the allocation in bytes.
            size: usize
        } {
            display("Failed to allocate {} bytes.", size)
            description("Out of memory.")
        }
        /// The device options are unusable.
        InvalidOptions {
            // What is wrong with them.
            reason: &'static str
        } {
            display("Invalid options: {}.", reason)
            description("Invalid options.")
        }
    }
}

impl Error {
    /// The status this failure completes its request with.
    pub fn status(&self) -> Status {
        match *self {
            Error::InvalidParameter { .. } | Error::InvalidOptions { .. } => Status::InvalidParameter,
            Error::BufferTooSmall { .. } => Status::BufferTooSmall,
            Error::UnknownControlCode { .. }
            | Error::MissingInput { .. }
            | Error::Rejected { .. }
            | Error::Unsupported { .. } => Status::InvalidDeviceRequest,
            Error::PoolExhausted { .. } | Error::OutOfMemory { .. } => Status::InsufficientResources,
        }
    }

    /// The byte count reported alongside the failure.
    ///
    /// For size failures this is the size the caller needs to supply. Otherwise it is zero.
    pub fn information(&self) -> usize {
        match *self {
            Error::BufferTooSmall { required } | Error::MissingInput { required } => required,
            _ => 0,
        }
    }
}

/// A successful (or partially successful) outcome of an operation.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Reply {
    /// Either `Success` or `BufferOverflow`.
    pub status: Status,
    /// The number of bytes transferred or written to the output buffer.
    pub information: usize,
}

impl Reply {
    /// A successful reply transferring `information` bytes.
    pub fn success(information: usize) -> Reply {
        Reply {
            status: Status::Success,
            information: information,
        }
    }

    /// A reply whose header (of `information` bytes) fit, but whose payload was truncated.
    pub fn overflow(information: usize) -> Reply {
        Reply {
            status: Status::BufferOverflow,
            information: information,
        }
    }
}

/// The completion of a request.
///
/// This is what the host receives: one status and one byte count, on success as well as on
/// failure.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Completion {
    /// The completion status.
    pub status: Status,
    /// The number of bytes transferred, or the buffer size the caller needs.
    pub information: usize,
}

impl From<Reply> for Completion {
    fn from(reply: Reply) -> Completion {
        Completion {
            status: reply.status,
            information: reply.information,
        }
    }
}

impl From<Error> for Completion {
    fn from(err: Error) -> Completion {
        Completion {
            status: err.status(),
            information: err.information(),
        }
    }
}

impl From<Result<Reply, Error>> for Completion {
    fn from(result: Result<Reply, Error>) -> Completion {
        match result {
            Ok(reply) => reply.into(),
            Err(err) => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_failures_report_required_size() {
        let completion = Completion::from(Error::BufferTooSmall { required: 24 });
        assert_eq!(completion.status, Status::BufferTooSmall);
        assert_eq!(completion.information, 24);

        let completion = Completion::from(Error::MissingInput { required: 1 });
        assert_eq!(completion.status, Status::InvalidDeviceRequest);
        assert_eq!(completion.information, 1);
    }

    #[test]
    fn invalid_transfer_reports_nothing() {
        let completion = Completion::from(Error::InvalidParameter { offset: -512, length: 512 });
        assert_eq!(completion.status, Status::InvalidParameter);
        assert_eq!(completion.information, 0);
    }

    #[test]
    fn resource_failures() {
        assert_eq!(Error::PoolExhausted { capacity: 4 }.status(), Status::InsufficientResources);
        assert_eq!(Error::OutOfMemory { size: 64 }.status(), Status::InsufficientResources);
    }

    #[test]
    fn host_codes() {
        assert_eq!(Status::Success.code(), 0);
        assert_eq!(Status::BufferOverflow.code(), 0x8000_0005);
        assert_eq!(Status::BufferTooSmall.code(), 0xC000_0023);
        assert!(Status::Success.is_success());
        assert!(!Status::BufferOverflow.is_success());
    }
}
