//! Control response structures.
//!
//! These are the fixed-size records handed back to the host. Every record is encoded
//! little-endian, with the layout the host expects.

use byteorder::{ByteOrder, LittleEndian};

/// The encoded size of a partition information record.
pub const PARTITION_INFORMATION_SIZE: usize = 32;
/// The encoded size of a partition update record.
pub const SET_PARTITION_INFORMATION_SIZE: usize = 1;
/// The encoded size of a length record.
pub const LENGTH_INFORMATION_SIZE: usize = 8;
/// The encoded size of a hotplug record.
pub const HOTPLUG_INFO_SIZE: usize = 8;
/// The fixed size of an identity record.
///
/// This is the length field plus the padded first element of the payload, which is what the host
/// considers the size of the structure.
pub const IDENTITY_HEADER_SIZE: usize = 4;
/// The size of the length field of an identity record.
pub const IDENTITY_LENGTH_SIZE: usize = 2;
/// The size of a media removal request.
pub const MEDIA_REMOVAL_SIZE: usize = 1;

/// Information on the (single) partition spanning the disk.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct PartitionInformation {
    /// The byte offset of the partition.
    pub starting_offset: i64,
    /// The length of the partition in bytes.
    pub partition_length: i64,
    /// The number of hidden sectors before the partition.
    pub hidden_sectors: u32,
    /// The number of the partition.
    pub partition_number: u32,
    /// The partition type byte.
    pub partition_type: u8,
    /// Is the partition bootable?
    pub boot_indicator: bool,
    /// Is the partition type recognized?
    pub recognized_partition: bool,
    /// Should the partition table entry be rewritten?
    pub rewrite_partition: bool,
}

impl PartitionInformation {
    /// The partition covering the whole of a disk of `disk_size` bytes.
    pub fn whole_disk(disk_size: usize, partition_type: u8) -> PartitionInformation {
        PartitionInformation {
            starting_offset: 0,
            partition_length: disk_size as i64,
            hidden_sectors: 1,
            // No partition number; the whole disk is one partition.
            partition_number: !0,
            partition_type: partition_type,
            boot_indicator: false,
            recognized_partition: true,
            rewrite_partition: false,
        }
    }

    /// Encode the record into the first `PARTITION_INFORMATION_SIZE` bytes of `buf`.
    pub fn encode(&self, buf: &mut [u8]) {
        LittleEndian::write_i64(&mut buf[0..8], self.starting_offset);
        LittleEndian::write_i64(&mut buf[8..16], self.partition_length);
        LittleEndian::write_u32(&mut buf[16..20], self.hidden_sectors);
        LittleEndian::write_u32(&mut buf[20..24], self.partition_number);
        buf[24] = self.partition_type;
        buf[25] = self.boot_indicator as u8;
        buf[26] = self.recognized_partition as u8;
        buf[27] = self.rewrite_partition as u8;
        // Padding.
        for i in &mut buf[28..PARTITION_INFORMATION_SIZE] {
            *i = 0;
        }
    }
}

/// A request to change the partition type.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct SetPartitionInformation {
    /// The new partition type.
    pub partition_type: u8,
}

impl SetPartitionInformation {
    /// Decode the record from the first `SET_PARTITION_INFORMATION_SIZE` bytes of `buf`.
    pub fn decode(buf: &[u8]) -> SetPartitionInformation {
        SetPartitionInformation {
            partition_type: buf[0],
        }
    }
}

/// The length of the disk.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct LengthInformation {
    /// The length in bytes.
    pub length: i64,
}

impl LengthInformation {
    /// Encode the record into the first `LENGTH_INFORMATION_SIZE` bytes of `buf`.
    pub fn encode(&self, buf: &mut [u8]) {
        LittleEndian::write_i64(&mut buf[..LENGTH_INFORMATION_SIZE], self.length);
    }
}

/// The hotplug capabilities of the device.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct HotplugInfo {
    /// Can the medium be removed?
    pub media_removable: bool,
    /// Can the medium be hotplugged?
    pub media_hotplug: bool,
    /// Can the device be hotplugged?
    pub device_hotplug: bool,
    /// Is the write cache forced on?
    pub write_cache_enable_override: bool,
}

impl HotplugInfo {
    /// A device which is neither removable nor hotpluggable.
    pub fn fixed() -> HotplugInfo {
        HotplugInfo {
            media_removable: false,
            media_hotplug: false,
            device_hotplug: false,
            write_cache_enable_override: false,
        }
    }

    /// Encode the record into the first `HOTPLUG_INFO_SIZE` bytes of `buf`.
    pub fn encode(&self, buf: &mut [u8]) {
        // The record starts with its own size.
        LittleEndian::write_u32(&mut buf[0..4], HOTPLUG_INFO_SIZE as u32);
        buf[4] = self.media_removable as u8;
        buf[5] = self.media_hotplug as u8;
        buf[6] = self.device_hotplug as u8;
        buf[7] = self.write_cache_enable_override as u8;
    }
}

/// A length-prefixed identity record.
///
/// This is the shape of both the device name and the unique ID: a 16-bit byte count followed by
/// that many bytes of payload. The payload is the device name in UTF-16LE.
pub struct Identity<'a> {
    /// The name the payload is derived from.
    name: &'a str,
}

impl<'a> Identity<'a> {
    /// An identity record carrying `name`.
    pub fn new(name: &'a str) -> Identity<'a> {
        Identity {
            name: name,
        }
    }

    /// The length of the payload in bytes.
    pub fn payload_len(&self) -> usize {
        self.name.encode_utf16().count() * 2
    }

    /// The size of the whole record.
    pub fn len(&self) -> usize {
        IDENTITY_LENGTH_SIZE + self.payload_len()
    }

    /// Encode the header into the first `IDENTITY_HEADER_SIZE` bytes of `buf`.
    ///
    /// The header is the length field, followed by zeroes. It is complete on its own, and tells the
    /// reader how large a buffer the whole record needs.
    pub fn encode_header(&self, buf: &mut [u8]) {
        LittleEndian::write_u16(&mut buf[..IDENTITY_LENGTH_SIZE], self.payload_len() as u16);
        for i in &mut buf[IDENTITY_LENGTH_SIZE..IDENTITY_HEADER_SIZE] {
            *i = 0;
        }
    }

    /// Encode the whole record into the first `self.len()` bytes of `buf`.
    pub fn encode(&self, buf: &mut [u8]) {
        LittleEndian::write_u16(&mut buf[..IDENTITY_LENGTH_SIZE], self.payload_len() as u16);
        for (n, unit) in self.name.encode_utf16().enumerate() {
            let at = IDENTITY_LENGTH_SIZE + 2 * n;
            LittleEndian::write_u16(&mut buf[at..at + 2], unit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_information() {
        let mut buf = [0xFF; PARTITION_INFORMATION_SIZE];
        PartitionInformation::whole_disk(0x10_0000, 0x07).encode(&mut buf);

        assert_eq!(&buf[0..8], &[0; 8]);
        assert_eq!(&buf[8..16], &[0, 0, 0x10, 0, 0, 0, 0, 0]);
        assert_eq!(&buf[16..20], &[1, 0, 0, 0]);
        assert_eq!(&buf[20..24], &[0xFF; 4]);
        assert_eq!(&buf[24..28], &[0x07, 0, 1, 0]);
        assert_eq!(&buf[28..32], &[0; 4]);
    }

    #[test]
    fn hotplug() {
        let mut buf = [0xFF; HOTPLUG_INFO_SIZE];
        HotplugInfo::fixed().encode(&mut buf);

        assert_eq!(buf, [8, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn length() {
        let mut buf = [0; LENGTH_INFORMATION_SIZE];
        LengthInformation { length: 0x0102_0304 }.encode(&mut buf);

        assert_eq!(buf, [4, 3, 2, 1, 0, 0, 0, 0]);
    }

    #[test]
    fn identity() {
        let identity = Identity::new("\\Dev");
        assert_eq!(identity.payload_len(), 8);
        assert_eq!(identity.len(), 10);

        let mut buf = [0xFF; 10];
        identity.encode(&mut buf);
        assert_eq!(buf, [8, 0, b'\\', 0, b'D', 0, b'e', 0, b'v', 0]);

        let mut header = [0xFF; IDENTITY_HEADER_SIZE];
        identity.encode_header(&mut header);
        assert_eq!(header, [8, 0, 0, 0]);
    }

    #[test]
    fn set_partition() {
        assert_eq!(SetPartitionInformation::decode(&[0x0C, 0xAA]).partition_type, 0x0C);
    }
}
