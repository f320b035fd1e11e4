//! Control codes.
//!
//! A control code packs the device type, the access required, the function number and the buffer
//! transfer method into 32 bits, in the same way the host does.

/// The device type of disks.
const DISK: u32 = 0x07;
/// The device type of generic storage.
const STORAGE: u32 = 0x2D;
/// The device type of mount manager queries.
const MOUNTDEV: u32 = 0x4D;

/// Buffered transfer.
const METHOD_BUFFERED: u32 = 0;

/// No access requirements.
const ANY_ACCESS: u32 = 0;
/// Read access required.
const READ_ACCESS: u32 = 1;
/// Write access required.
const WRITE_ACCESS: u32 = 2;

/// Build a control code.
pub const fn ctl_code(device_type: u32, function: u32, method: u32, access: u32) -> u32 {
    device_type << 16 | access << 14 | function << 2 | method
}

pub const DISK_GET_DRIVE_GEOMETRY: u32 = ctl_code(DISK, 0x0000, METHOD_BUFFERED, ANY_ACCESS);
pub const DISK_GET_PARTITION_INFO: u32 = ctl_code(DISK, 0x0001, METHOD_BUFFERED, READ_ACCESS);
pub const DISK_SET_PARTITION_INFO: u32 =
    ctl_code(DISK, 0x0002, METHOD_BUFFERED, READ_ACCESS | WRITE_ACCESS);
pub const DISK_IS_WRITABLE: u32 = ctl_code(DISK, 0x0009, METHOD_BUFFERED, ANY_ACCESS);
pub const DISK_GET_LENGTH_INFO: u32 = ctl_code(DISK, 0x0017, METHOD_BUFFERED, READ_ACCESS);
pub const DISK_CHECK_VERIFY: u32 = ctl_code(DISK, 0x0200, METHOD_BUFFERED, READ_ACCESS);
pub const DISK_MEDIA_REMOVAL: u32 = ctl_code(DISK, 0x0201, METHOD_BUFFERED, READ_ACCESS);
pub const DISK_GET_MEDIA_TYPES: u32 = ctl_code(DISK, 0x0300, METHOD_BUFFERED, ANY_ACCESS);

pub const STORAGE_CHECK_VERIFY: u32 = ctl_code(STORAGE, 0x0200, METHOD_BUFFERED, READ_ACCESS);
pub const STORAGE_MEDIA_REMOVAL: u32 = ctl_code(STORAGE, 0x0201, METHOD_BUFFERED, READ_ACCESS);
pub const STORAGE_GET_MEDIA_TYPES: u32 = ctl_code(STORAGE, 0x0300, METHOD_BUFFERED, ANY_ACCESS);
pub const STORAGE_GET_HOTPLUG_INFO: u32 = ctl_code(STORAGE, 0x0305, METHOD_BUFFERED, ANY_ACCESS);

pub const MOUNTDEV_QUERY_UNIQUE_ID: u32 = ctl_code(MOUNTDEV, 0, METHOD_BUFFERED, ANY_ACCESS);
pub const MOUNTDEV_QUERY_DEVICE_NAME: u32 = ctl_code(MOUNTDEV, 2, METHOD_BUFFERED, ANY_ACCESS);
