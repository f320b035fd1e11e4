//! Output buffers.

use Error;

/// The caller's output buffer.
///
/// Responses are never written directly into the caller's memory. Instead they are committed
/// through this type, which refuses anything larger than the buffer it wraps.
pub struct Output<'a> {
    /// The caller's buffer.
    buf: &'a mut [u8],
}

impl<'a> Output<'a> {
    /// Wrap a caller buffer.
    pub fn new(buf: &'a mut [u8]) -> Output<'a> {
        Output {
            buf: buf,
        }
    }

    /// The number of bytes the caller can receive.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Copy `bytes` to the start of the caller's buffer.
    ///
    /// If they don't fit, nothing is written and `Error::BufferTooSmall` is returned. Otherwise,
    /// the number of bytes written is returned.
    pub fn commit(&mut self, bytes: &[u8]) -> Result<usize, Error> {
        require!(self.capacity(), bytes.len());
        self.buf[..bytes.len()].copy_from_slice(bytes);

        Ok(bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_fits() {
        let mut buf = [0; 8];
        {
            let mut output = Output::new(&mut buf);
            assert_eq!(output.capacity(), 8);
            assert_eq!(output.commit(&[1, 2, 3]), Ok(3));
        }
        assert_eq!(buf, [1, 2, 3, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn commit_refuses_overrun() {
        let mut buf = [0; 2];
        {
            let mut output = Output::new(&mut buf);
            assert_eq!(output.commit(&[1, 2, 3]), Err(Error::BufferTooSmall { required: 3 }));
        }
        assert_eq!(buf, [0, 0]);
    }
}
