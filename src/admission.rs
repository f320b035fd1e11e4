//! Request admission.
//!
//! When the host fails to allocate the context for a request, it asks us what to do about it.
//! The answer depends only on the major category of the request: categories whose failure would
//! stall the storage path (reads, writes and control calls) are served from the reserved pool,
//! everything else is failed outright rather than risk unbounded resource use.

/// The major category of a request.
///
/// The discriminants are the host's major function codes.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum MajorFunction {
    Create = 0x00,
    CreateNamedPipe = 0x01,
    Close = 0x02,
    Read = 0x03,
    Write = 0x04,
    QueryInformation = 0x05,
    SetInformation = 0x06,
    QueryEa = 0x07,
    SetEa = 0x08,
    FlushBuffers = 0x09,
    QueryVolumeInformation = 0x0A,
    SetVolumeInformation = 0x0B,
    DirectoryControl = 0x0C,
    FileSystemControl = 0x0D,
    DeviceControl = 0x0E,
    InternalDeviceControl = 0x0F,
    Shutdown = 0x10,
    LockControl = 0x11,
    Cleanup = 0x12,
    CreateMailslot = 0x13,
    QuerySecurity = 0x14,
    SetSecurity = 0x15,
    Power = 0x16,
    SystemControl = 0x17,
    DeviceChange = 0x18,
    QueryQuota = 0x19,
    SetQuota = 0x1A,
    Pnp = 0x1B,
}

/// Every major category, in code order.
pub const MAJOR_FUNCTIONS: [MajorFunction; 28] = [
    MajorFunction::Create,
    MajorFunction::CreateNamedPipe,
    MajorFunction::Close,
    MajorFunction::Read,
    MajorFunction::Write,
    MajorFunction::QueryInformation,
    MajorFunction::SetInformation,
    MajorFunction::QueryEa,
    MajorFunction::SetEa,
    MajorFunction::FlushBuffers,
    MajorFunction::QueryVolumeInformation,
    MajorFunction::SetVolumeInformation,
    MajorFunction::DirectoryControl,
    MajorFunction::FileSystemControl,
    MajorFunction::DeviceControl,
    MajorFunction::InternalDeviceControl,
    MajorFunction::Shutdown,
    MajorFunction::LockControl,
    MajorFunction::Cleanup,
    MajorFunction::CreateMailslot,
    MajorFunction::QuerySecurity,
    MajorFunction::SetSecurity,
    MajorFunction::Power,
    MajorFunction::SystemControl,
    MajorFunction::DeviceChange,
    MajorFunction::QueryQuota,
    MajorFunction::SetQuota,
    MajorFunction::Pnp,
];

impl MajorFunction {
    /// Look up the category with the host code `code`.
    ///
    /// This returns `None` for codes past the last known category.
    pub fn from_code(code: u8) -> Option<MajorFunction> {
        MAJOR_FUNCTIONS.get(code as usize).cloned()
    }

    /// The host code of the category.
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// What to do with a request whose context could not be allocated.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Action {
    /// Carry the request on a reserved context.
    UseReservedRequest,
    /// Complete the request with an error.
    FailRequest,
}

/// The admission policy.
///
/// This is the set of major categories guaranteed forward progress. The default policy
/// guarantees reads, writes, device control and internal device control.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Policy {
    /// One bit per major code.
    reserved: u32,
}

impl Default for Policy {
    fn default() -> Policy {
        Policy::none()
            .guarantee(MajorFunction::Read)
            .guarantee(MajorFunction::Write)
            .guarantee(MajorFunction::DeviceControl)
            .guarantee(MajorFunction::InternalDeviceControl)
    }
}

impl Policy {
    /// A policy which guarantees nothing.
    pub fn none() -> Policy {
        Policy {
            reserved: 0,
        }
    }

    /// Add `major` to the guaranteed categories.
    pub fn guarantee(mut self, major: MajorFunction) -> Policy {
        self.reserved |= 1 << major.code();
        self
    }

    /// Remove `major` from the guaranteed categories.
    pub fn revoke(mut self, major: MajorFunction) -> Policy {
        self.reserved &= !(1 << major.code());
        self
    }

    /// Is `major` guaranteed forward progress?
    pub fn is_guaranteed(&self, major: MajorFunction) -> bool {
        self.reserved & (1 << major.code()) != 0
    }

    /// Decide what to do with a request of category `major` under memory pressure.
    pub fn examine(&self, major: MajorFunction) -> Action {
        if self.is_guaranteed(major) {
            Action::UseReservedRequest
        } else {
            Action::FailRequest
        }
    }
}

/// Classify a request of category `major` with the default policy.
pub fn classify(major: MajorFunction) -> Action {
    match major {
        // Reads, writes and control calls would stall the storage path if they failed.
        MajorFunction::Read
        | MajorFunction::Write
        | MajorFunction::DeviceControl
        | MajorFunction::InternalDeviceControl => Action::UseReservedRequest,
        // Everything else can fail.
        _ => Action::FailRequest,
    }
}
