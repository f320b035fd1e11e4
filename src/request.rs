//! Requests.

use admission::MajorFunction;

/// The operation a request carries.
pub enum Operation<'a> {
    /// Read from the disk into `buf`.
    Read {
        /// The byte offset on the disk.
        offset: i64,
        /// The destination. Its length is the transfer length.
        buf: &'a mut [u8],
    },
    /// Write `buf` to the disk.
    Write {
        /// The byte offset on the disk.
        offset: i64,
        /// The source. Its length is the transfer length.
        buf: &'a [u8],
    },
    /// A control call.
    Control {
        /// The control code.
        code: u32,
        /// The caller's input buffer.
        input: &'a [u8],
        /// The caller's output buffer.
        output: &'a mut [u8],
    },
    /// Anything the device does not handle.
    Unsupported,
}

/// A request from the host.
pub struct Request<'a> {
    /// The major category, which admission is decided by.
    pub major: MajorFunction,
    /// What to do.
    pub operation: Operation<'a>,
}

impl<'a> Request<'a> {
    /// A read of `buf.len()` bytes at `offset`.
    pub fn read(offset: i64, buf: &'a mut [u8]) -> Request<'a> {
        Request {
            major: MajorFunction::Read,
            operation: Operation::Read {
                offset: offset,
                buf: buf,
            },
        }
    }

    /// A write of `buf` at `offset`.
    pub fn write(offset: i64, buf: &'a [u8]) -> Request<'a> {
        Request {
            major: MajorFunction::Write,
            operation: Operation::Write {
                offset: offset,
                buf: buf,
            },
        }
    }

    /// A device control call.
    pub fn device_control(code: u32, input: &'a [u8], output: &'a mut [u8]) -> Request<'a> {
        Request {
            major: MajorFunction::DeviceControl,
            operation: Operation::Control {
                code: code,
                input: input,
                output: output,
            },
        }
    }

    /// An internal device control call.
    ///
    /// These are issued by other drivers rather than by applications, but are served from the
    /// same dispatch table.
    pub fn internal_device_control(code: u32, input: &'a [u8], output: &'a mut [u8]) -> Request<'a> {
        Request {
            major: MajorFunction::InternalDeviceControl,
            operation: Operation::Control {
                code: code,
                input: input,
                output: output,
            },
        }
    }

    /// A request of some other category, carrying nothing the device understands.
    pub fn other(major: MajorFunction) -> Request<'a> {
        Request {
            major: major,
            operation: Operation::Unsupported,
        }
    }
}
