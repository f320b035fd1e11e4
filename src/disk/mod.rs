//! The backing store.
//!
//! This module provides the in-memory disk image, along with the geometry and partition metadata
//! the control plane reports about it.
//!
//! The sector size is fixed to 512, since it can be emulated by virtually any consumer in use
//! today.

mod geometry;
mod image;
mod info;

pub use self::geometry::{Geometry, MediaType, GEOMETRY_SIZE};
pub use self::image::Image;
pub use self::info::Info;

/// The logical sector size.
pub const SECTOR_SIZE: usize = 512;
/// The number of sectors per track.
pub const SECTORS_PER_TRACK: u32 = 32;
/// The number of tracks per cylinder.
pub const TRACKS_PER_CYLINDER: u32 = 2;
