//! Disk parameters.

/// The mutable metadata of a disk.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct Info {
    /// The size of the disk in bytes.
    ///
    /// This is fixed when the device is created.
    pub disk_size: usize,
    /// The partition type byte.
    ///
    /// The device does not interpret this. It is reported back through the partition information
    /// and can be changed by the host.
    pub partition_type: u8,
}

impl Info {
    /// Create the metadata of a fresh disk of `disk_size` bytes.
    pub fn new(disk_size: usize) -> Info {
        Info {
            disk_size: disk_size,
            partition_type: 0,
        }
    }
}
