/// Require a caller buffer to hold at least some number of bytes.
///
/// This returns early from the surrounding function with `Error::BufferTooSmall`, reporting
/// `$size` as the required size, if `$len` is smaller than `$size`.
///
/// # Example
///
/// ```ignore
/// require!(call.output.capacity(), GEOMETRY_SIZE);
/// ```
macro_rules! require {
    ($len:expr, $size:expr) => {
        if $len < $size {
            return Err($crate::Error::BufferTooSmall { required: $size });
        }
    };
}
