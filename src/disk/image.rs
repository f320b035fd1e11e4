//! The disk image.

use Error;
use alloc::Allocator;
use disk::SECTOR_SIZE;

/// A contiguous in-memory disk image.
///
/// The image is allocated once, when the device is created, and never resized. Every transfer is
/// checked against its bounds before a single byte is copied.
pub struct Image {
    /// The raw bytes of the disk.
    buf: Box<[u8]>,
}

impl Image {
    /// Allocate a zeroed image of `size` bytes through `allocator`.
    pub fn new<A: Allocator>(size: usize, allocator: &A) -> Result<Image, Error> {
        Ok(Image {
            buf: allocator.allocate(size)?,
        })
    }

    /// The size of the image in bytes.
    pub fn size(&self) -> usize {
        self.buf.len()
    }

    /// Check the parameters of a transfer.
    ///
    /// A transfer of `length` bytes at `offset` is valid if the offset is non-negative, the range
    /// lies inside the image, and the length is a whole number of sectors. On success, the start
    /// of the range is returned.
    pub fn check(&self, offset: i64, length: usize) -> Result<usize, Error> {
        let invalid = Error::InvalidParameter { offset: offset, length: length };

        // Negative offsets are never valid.
        if offset < 0 {
            return Err(invalid);
        }
        // The sector size is a power of two, so this is a cheap modulo.
        if length & (SECTOR_SIZE - 1) != 0 {
            return Err(invalid);
        }
        // Compute the end of the range, without overflowing.
        match (offset as u64).checked_add(length as u64) {
            Some(end) if end <= self.buf.len() as u64 => Ok(offset as usize),
            _ => Err(invalid),
        }
    }

    /// Read from the image at `offset` into `buf`.
    ///
    /// This fills all of `buf`, and returns the number of bytes copied.
    pub fn read(&self, offset: i64, buf: &mut [u8]) -> Result<usize, Error> {
        let start = self.check(offset, buf.len())?;
        buf.copy_from_slice(&self.buf[start..start + buf.len()]);

        Ok(buf.len())
    }

    /// Write `buf` into the image at `offset`.
    ///
    /// This returns the number of bytes copied, which is all of `buf`.
    pub fn write(&mut self, offset: i64, buf: &[u8]) -> Result<usize, Error> {
        let start = self.check(offset, buf.len())?;
        self.buf[start..start + buf.len()].copy_from_slice(buf);

        Ok(buf.len())
    }
}
