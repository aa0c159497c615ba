//! Fixed 3x3 convolution kernels.

/// An immutable 3x3 integer kernel with a normalization divisor.
///
/// Weights are stored row-major: index `(ky + 1) * 3 + (kx + 1)` for
/// offsets `ky, kx` in `-1..=1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kernel {
    weights: [i32; 9],
    divisor: i32,
}

impl Kernel {
    const fn new(weights: [i32; 9], divisor: i32) -> Self {
        Self { weights, divisor }
    }

    pub fn weights(&self) -> &[i32; 9] {
        &self.weights
    }

    pub fn divisor(&self) -> i32 {
        self.divisor
    }

    /// Distance from the center to the edge of the footprint.
    pub fn radius(&self) -> usize {
        1
    }

    /// Weight at offset `(kx, ky)`, both in `-1..=1`.
    #[inline]
    pub fn at(&self, kx: isize, ky: isize) -> i32 {
        self.weights[((ky + 1) * 3 + (kx + 1)) as usize]
    }
}

/// Uniform 3x3 average.
pub const BOX_BLUR: Kernel = Kernel::new([1, 1, 1, 1, 1, 1, 1, 1, 1], 9);

/// Unsharp 4-neighbour sharpen.
pub const SHARPEN: Kernel = Kernel::new([0, -1, 0, -1, 5, -1, 0, -1, 0], 1);

/// Horizontal gradient (responds to vertical edges).
pub const SOBEL_X: Kernel = Kernel::new([-1, 0, 1, -2, 0, 2, -1, 0, 1], 1);

/// Vertical gradient (responds to horizontal edges).
pub const SOBEL_Y: Kernel = Kernel::new([-1, -2, -1, 0, 0, 0, 1, 2, 1], 1);
