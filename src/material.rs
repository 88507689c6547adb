//! Surface color lookup used by primitives when they accept a hit.

use std::fmt::Debug;
use std::sync::Arc;

/// A surface material. The renderer owns the details; the index only needs
/// the color at a texture coordinate.
pub trait Material: Debug + Send + Sync {
    /// Returns the RGBA color at texture coordinate `(u, v)`.
    ///
    /// The coordinates are not clamped to `[0, 1]` and implementations must
    /// accept any finite value. An alpha of zero means the surface is fully
    /// transparent at that point and the hit is discarded.
    fn color(&self, u: f64, v: f64) -> [f32; 4];
}

/// Shared handle to a [`Material`], cheap to clone into packed primitives and rays.
pub type MaterialRef = Arc<dyn Material>;

/// A material with the same color everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidColor {
    /// The RGBA color.
    pub rgba: [f32; 4],
}

impl SolidColor {
    /// Creates a new [`SolidColor`].
    pub fn new(rgba: [f32; 4]) -> SolidColor {
        SolidColor { rgba }
    }
}

impl Material for SolidColor {
    fn color(&self, _u: f64, _v: f64) -> [f32; 4] {
        self.rgba
    }
}

/// A nearest-texel image material. Texture coordinates wrap around, so
/// `(1.25, -0.5)` samples the same texel as `(0.25, 0.5)`.
///
/// Texel rows are stored top to bottom while `v` grows upwards, matching
/// block textures.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    width: usize,
    height: usize,
    texels: Vec<[f32; 4]>,
}

impl Texture {
    /// Creates a texture of `width` by `height` texels stored row by row.
    /// Returns `None` when the dimensions are zero or do not match `texels`.
    pub fn new(width: usize, height: usize, texels: Vec<[f32; 4]>) -> Option<Texture> {
        if width == 0 || height == 0 || width.checked_mul(height)? != texels.len() {
            return None;
        }
        Some(Texture {
            width,
            height,
            texels,
        })
    }

    /// Width in texels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in texels.
    pub fn height(&self) -> usize {
        self.height
    }

    fn texel_index(coordinate: f64, size: usize) -> usize {
        let wrapped = coordinate.rem_euclid(1.0);
        // NaN and rounding up to 1.0 both land on a valid texel.
        let index = (wrapped * size as f64) as usize;
        index.min(size - 1)
    }
}

impl Material for Texture {
    fn color(&self, u: f64, v: f64) -> [f32; 4] {
        let x = Texture::texel_index(u, self.width);
        let y = self.height - 1 - Texture::texel_index(v, self.height);
        self.texels[y * self.width + x]
    }
}
