//! The control plane.
//!
//! Control calls are queries and commands which don't transfer disk data: geometry, partition
//! metadata, identity and so on. Each call is identified by a control code, which is looked up in
//! a fixed dispatch table.
//!
//! # Buffer contracts
//!
//! Every response has a fixed size, which the caller's output buffer is checked against before
//! anything is computed. If it is too small, the call fails with `BufferTooSmall`, reporting the
//! size needed.
//!
//! The identity queries have a second tier: their fixed header is a length field, followed by a
//! variable-length payload. If the header fits but the payload does not, the header alone is
//! written and the call completes with `BufferOverflow`, so the caller can learn the size it needs
//! from the header.

pub mod code;
mod output;
mod response;

pub use self::output::Output;
pub use self::response::{HotplugInfo, Identity, LengthInformation, PartitionInformation,
                         SetPartitionInformation, HOTPLUG_INFO_SIZE, IDENTITY_HEADER_SIZE,
                         LENGTH_INFORMATION_SIZE, MEDIA_REMOVAL_SIZE, PARTITION_INFORMATION_SIZE,
                         SET_PARTITION_INFORMATION_SIZE};

use {Device, Error, Reply};
use disk::GEOMETRY_SIZE;

/// The name of the device.
///
/// This is also the source of the unique ID.
pub const DEVICE_NAME: &'static str = "\\Device\\Ramdisk";
/// The size of the staging area responses are assembled in.
///
/// This must be at least the size of the largest response.
pub const STAGING_SIZE: usize = 64;

/// The arguments of a control call.
pub struct Call<'a> {
    /// The caller's input buffer.
    pub input: &'a [u8],
    /// The caller's output buffer.
    pub output: Output<'a>,
    /// Scratch space for assembling the response.
    ///
    /// This belongs to the context of the request, so assembling a response never allocates.
    pub staging: &'a mut [u8],
}

/// A control call handler.
pub type Handler = fn(&mut Device, &mut Call) -> Result<Reply, Error>;

/// An entry in the dispatch table.
pub struct Entry {
    /// The control code.
    pub code: u32,
    /// A human-readable name, for logging.
    pub name: &'static str,
    /// The handler.
    pub handler: Handler,
}

/// The dispatch table.
static TABLE: [Entry; 14] = [
    Entry { code: code::DISK_GET_PARTITION_INFO, name: "get-partition-info", handler: get_partition_info },
    Entry { code: code::DISK_SET_PARTITION_INFO, name: "set-partition-info", handler: set_partition_info },
    Entry { code: code::DISK_GET_DRIVE_GEOMETRY, name: "get-drive-geometry", handler: get_drive_geometry },
    Entry { code: code::DISK_GET_MEDIA_TYPES, name: "disk-get-media-types", handler: get_drive_geometry },
    Entry { code: code::STORAGE_GET_MEDIA_TYPES, name: "storage-get-media-types", handler: get_drive_geometry },
    Entry { code: code::DISK_CHECK_VERIFY, name: "disk-check-verify", handler: no_payload },
    Entry { code: code::STORAGE_CHECK_VERIFY, name: "storage-check-verify", handler: no_payload },
    Entry { code: code::DISK_IS_WRITABLE, name: "is-writable", handler: no_payload },
    Entry { code: code::MOUNTDEV_QUERY_DEVICE_NAME, name: "query-device-name", handler: query_identity },
    Entry { code: code::MOUNTDEV_QUERY_UNIQUE_ID, name: "query-unique-id", handler: query_identity },
    Entry { code: code::DISK_MEDIA_REMOVAL, name: "disk-media-removal", handler: media_removal },
    Entry { code: code::STORAGE_MEDIA_REMOVAL, name: "storage-media-removal", handler: media_removal },
    Entry { code: code::DISK_GET_LENGTH_INFO, name: "get-length-info", handler: get_length_info },
    Entry { code: code::STORAGE_GET_HOTPLUG_INFO, name: "get-hotplug-info", handler: get_hotplug_info },
];

/// Look up the table entry of `code`.
pub fn lookup(code: u32) -> Option<&'static Entry> {
    TABLE.iter().find(|entry| entry.code == code)
}

/// Report the partition spanning the disk.
fn get_partition_info(device: &mut Device, call: &mut Call) -> Result<Reply, Error> {
    require!(call.output.capacity(), PARTITION_INFORMATION_SIZE);

    let info = device.info();
    PartitionInformation::whole_disk(info.disk_size, info.partition_type)
        .encode(&mut call.staging[..PARTITION_INFORMATION_SIZE]);

    Ok(Reply::success(call.output.commit(&call.staging[..PARTITION_INFORMATION_SIZE])?))
}

/// Change the partition type.
fn set_partition_info(device: &mut Device, call: &mut Call) -> Result<Reply, Error> {
    require!(call.input.len(), SET_PARTITION_INFORMATION_SIZE);

    let update = SetPartitionInformation::decode(call.input);
    device.set_partition_type(update.partition_type);

    Ok(Reply::success(0))
}

/// Report the disk geometry.
///
/// This also answers the media type queries, as a disk supports exactly one media type: its own.
fn get_drive_geometry(device: &mut Device, call: &mut Call) -> Result<Reply, Error> {
    require!(call.output.capacity(), GEOMETRY_SIZE);

    device.geometry().encode(&mut call.staging[..GEOMETRY_SIZE]);

    Ok(Reply::success(call.output.commit(&call.staging[..GEOMETRY_SIZE])?))
}

/// Succeed without a response.
///
/// The media never changes and is always writable.
fn no_payload(_: &mut Device, _: &mut Call) -> Result<Reply, Error> {
    Ok(Reply::success(0))
}

/// Lock or unlock the medium.
///
/// There is nothing to lock, but the caller must still say what it wants.
fn media_removal(_: &mut Device, call: &mut Call) -> Result<Reply, Error> {
    if call.input.len() < MEDIA_REMOVAL_SIZE {
        return Err(Error::MissingInput { required: MEDIA_REMOVAL_SIZE });
    }

    Ok(Reply::success(0))
}

/// Report the identity of the device.
///
/// This answers both the device name and the unique ID queries.
fn query_identity(_: &mut Device, call: &mut Call) -> Result<Reply, Error> {
    let identity = Identity::new(DEVICE_NAME);

    // The header has to fit before anything else is looked at.
    require!(call.output.capacity(), IDENTITY_HEADER_SIZE);

    if call.output.capacity() < identity.len() {
        // Only the header fits. Hand it back, so the caller knows what size to retry with.
        identity.encode_header(&mut call.staging[..IDENTITY_HEADER_SIZE]);
        let written = call.output.commit(&call.staging[..IDENTITY_HEADER_SIZE])?;

        return Ok(Reply::overflow(written));
    }

    let len = identity.len();
    identity.encode(&mut call.staging[..len]);

    Ok(Reply::success(call.output.commit(&call.staging[..len])?))
}

/// Report the length of the disk.
fn get_length_info(device: &mut Device, call: &mut Call) -> Result<Reply, Error> {
    require!(call.output.capacity(), LENGTH_INFORMATION_SIZE);

    LengthInformation {
        length: device.info().disk_size as i64,
    }.encode(&mut call.staging[..LENGTH_INFORMATION_SIZE]);

    Ok(Reply::success(call.output.commit(&call.staging[..LENGTH_INFORMATION_SIZE])?))
}

/// Report that the device is not hotpluggable.
fn get_hotplug_info(_: &mut Device, call: &mut Call) -> Result<Reply, Error> {
    require!(call.output.capacity(), HOTPLUG_INFO_SIZE);

    HotplugInfo::fixed().encode(&mut call.staging[..HOTPLUG_INFO_SIZE]);

    Ok(Reply::success(call.output.commit(&call.staging[..HOTPLUG_INFO_SIZE])?))
}
