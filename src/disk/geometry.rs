//! Disk geometry.
//!
//! A RAM disk has no heads or platters, but consumers still ask for a cylinder/track/sector
//! geometry. We report a fixed, made-up layout and derive the number of cylinders from the size of
//! the disk.

use byteorder::{ByteOrder, LittleEndian};
use disk::{SECTOR_SIZE, SECTORS_PER_TRACK, TRACKS_PER_CYLINDER};

/// The encoded size of a geometry record.
pub const GEOMETRY_SIZE: usize = 24;

/// The type of the medium.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum MediaType {
    /// A fixed (non-removable) hard disk.
    Fixed = 12,
}

/// The geometry of a disk.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Geometry {
    /// The number of cylinders.
    pub cylinders: u64,
    /// The type of the medium.
    pub media_type: MediaType,
    /// The number of tracks in a cylinder.
    pub tracks_per_cylinder: u32,
    /// The number of sectors in a track.
    pub sectors_per_track: u32,
    /// The number of bytes in a sector.
    ///
    /// This is always a power of two.
    pub bytes_per_sector: u32,
}

impl Geometry {
    /// Derive the geometry of a disk of `disk_size` bytes.
    ///
    /// Partial cylinders are cut off, so the geometry never describes more bytes than the disk
    /// has.
    pub fn new(disk_size: usize) -> Geometry {
        let bytes_per_sector = SECTOR_SIZE as u32;

        Geometry {
            cylinders: disk_size as u64
                / bytes_per_sector as u64
                / SECTORS_PER_TRACK as u64
                / TRACKS_PER_CYLINDER as u64,
            media_type: MediaType::Fixed,
            tracks_per_cylinder: TRACKS_PER_CYLINDER,
            sectors_per_track: SECTORS_PER_TRACK,
            bytes_per_sector: bytes_per_sector,
        }
    }

    /// The number of bytes described by the geometry.
    pub fn capacity(&self) -> u64 {
        self.cylinders
            * self.tracks_per_cylinder as u64
            * self.sectors_per_track as u64
            * self.bytes_per_sector as u64
    }

    /// Encode the geometry into the first `GEOMETRY_SIZE` bytes of `buf`.
    ///
    /// The layout is: cylinders (i64), media type (u32), tracks per cylinder (u32), sectors per
    /// track (u32), bytes per sector (u32), all little-endian.
    pub fn encode(&self, buf: &mut [u8]) {
        LittleEndian::write_i64(&mut buf[0..8], self.cylinders as i64);
        LittleEndian::write_u32(&mut buf[8..12], self.media_type as u32);
        LittleEndian::write_u32(&mut buf[12..16], self.tracks_per_cylinder);
        LittleEndian::write_u32(&mut buf[16..20], self.sectors_per_track);
        LittleEndian::write_u32(&mut buf[20..24], self.bytes_per_sector);
    }
}
