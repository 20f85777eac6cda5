//! Morton (Z-order) curve decoding.

/// Map a position `t` along a Morton curve over an `sx` x `sy` grid to the
/// row-major index `y * sx + x`.
///
/// Bits of `t` are handed out alternately to x and y, starting with x,
/// while the corresponding axis still has room. Sizes are powers of two.
pub fn morton2d(t: usize, sx: usize, sy: usize) -> usize {
    let mut bits = t;
    let (mut x, mut y) = (0, 0);
    let (mut x_bit, mut y_bit) = (1, 1);
    let (mut x_left, mut y_left) = (sx, sy);

    while x_left > 1 || y_left > 1 {
        if x_left > 1 {
            x += x_bit * (bits & 1);
            bits >>= 1;
            x_bit <<= 1;
            x_left >>= 1;
        }
        if y_left > 1 {
            y += y_bit * (bits & 1);
            bits >>= 1;
            y_bit <<= 1;
            y_left >>= 1;
        }
    }

    y * sx + x
}
