//! The device.

use slog::Logger;

use {Error, Options, Reply};
use alloc::Allocator;
use control::{self, Call, Output};
use disk::{Geometry, Image, Info};

/// A RAM disk.
///
/// This owns the disk image and the metadata reported about it. It is created once, when the
/// device is added, and lives until the queue serving it is torn down.
pub struct Device {
    /// The backing image.
    image: Image,
    /// The geometry derived from the disk size.
    geometry: Geometry,
    /// The mutable disk metadata.
    info: Info,
    /// The logger.
    log: Logger,
}

impl Device {
    /// Create a device from `options`, allocating the image through `allocator`.
    pub fn new<A: Allocator>(options: &Options, allocator: &A, log: Logger) -> Result<Device, Error> {
        options.validate()?;

        let image = Image::new(options.disk_size, allocator)?;
        let geometry = Geometry::new(options.disk_size);

        info!(log, "creating device";
              "disk_size" => options.disk_size,
              "cylinders" => geometry.cylinders,
              "tracks_per_cylinder" => geometry.tracks_per_cylinder,
              "sectors_per_track" => geometry.sectors_per_track,
              "bytes_per_sector" => geometry.bytes_per_sector);

        Ok(Device {
            image: image,
            geometry: geometry,
            info: Info::new(options.disk_size),
            log: log,
        })
    }

    /// The disk geometry.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// The disk metadata.
    pub fn info(&self) -> &Info {
        &self.info
    }

    /// Change the partition type.
    pub fn set_partition_type(&mut self, partition_type: u8) {
        info!(self.log, "setting partition type";
              "from" => self.info.partition_type,
              "to" => partition_type);

        self.info.partition_type = partition_type;
    }

    /// Read from the disk at `offset` into `buf`.
    pub fn read(&self, offset: i64, buf: &mut [u8]) -> Result<Reply, Error> {
        trace!(self.log, "reading"; "offset" => offset, "length" => buf.len());

        match self.image.read(offset, buf) {
            Ok(n) => Ok(Reply::success(n)),
            Err(err) => {
                warn!(self.log, "rejecting read"; "error" => %err);
                Err(err)
            },
        }
    }

    /// Write `buf` to the disk at `offset`.
    pub fn write(&mut self, offset: i64, buf: &[u8]) -> Result<Reply, Error> {
        trace!(self.log, "writing"; "offset" => offset, "length" => buf.len());

        match self.image.write(offset, buf) {
            Ok(n) => Ok(Reply::success(n)),
            Err(err) => {
                warn!(self.log, "rejecting write"; "error" => %err);
                Err(err)
            },
        }
    }

    /// Carry out a control call.
    ///
    /// The response is assembled in `staging` and then copied to `output`, if it fits.
    pub fn control(&mut self, code: u32, input: &[u8], output: &mut [u8], staging: &mut [u8])
        -> Result<Reply, Error> {
        let entry = match control::lookup(code) {
            Some(entry) => entry,
            None => {
                warn!(self.log, "unknown control code"; "code" => format!("{:#x}", code));
                return Err(Error::UnknownControlCode { code: code });
            },
        };

        debug!(self.log, "control call";
               "name" => entry.name,
               "input" => input.len(),
               "output" => output.len());

        let mut call = Call {
            input: input,
            output: Output::new(output),
            staging: staging,
        };

        (entry.handler)(self, &mut call)
    }
}
