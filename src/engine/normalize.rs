// src/engine/normalize.rs
//
// Pixel buffer normalization: whatever channel order and row stride a backend
// produced, consumers only ever see tightly packed RGBA8 with an explicit
// alpha label.
//
// The alpha label is the backend's own convention, carried through untouched.
// Normalization never premultiplies or unpremultiplies; relabeling pixels with
// the wrong convention shows up as color fringing at semi-transparent edges.
// Hosts that mandate one convention call CanonicalBitmap::convert_alpha explicitly.

use crate::error::SvgDecodeError;
use fast_image_resize::{self as fir, MulDiv, PixelType};
use image::RgbaImage;

type NormalizeResult<T> = std::result::Result<T, SvgDecodeError>;

const BYTES_PER_PIXEL: usize = 4;

/// Byte order of one 4-byte pixel in a backend buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelOrder {
    Rgba,
    Bgra,
    Argb,
    Abgr,
}

impl ChannelOrder {
    /// Source byte index of R, G, B and A.
    #[inline]
    const fn rgba_indices(self) -> [usize; 4] {
        match self {
            ChannelOrder::Rgba => [0, 1, 2, 3],
            ChannelOrder::Bgra => [2, 1, 0, 3],
            ChannelOrder::Argb => [1, 2, 3, 0],
            ChannelOrder::Abgr => [3, 2, 1, 0],
        }
    }
}

/// Whether color channels are pre-scaled by alpha.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlphaMode {
    Premultiplied,
    Straight,
}

/// Pixels exactly as a backend produced them. Consumed by [`normalize`].
#[derive(Clone, Debug)]
pub struct RawPixelBuffer {
    pub width: u32,
    pub height: u32,
    pub bytes_per_row: usize,
    pub channel_order: ChannelOrder,
    pub alpha: AlphaMode,
    pub bytes: Vec<u8>,
}

impl RawPixelBuffer {
    pub fn new(
        width: u32,
        height: u32,
        bytes_per_row: usize,
        channel_order: ChannelOrder,
        alpha: AlphaMode,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            width,
            height,
            bytes_per_row,
            channel_order,
            alpha,
            bytes,
        }
    }

    /// Buffer without row padding.
    pub fn tight(
        width: u32,
        height: u32,
        channel_order: ChannelOrder,
        alpha: AlphaMode,
        bytes: Vec<u8>,
    ) -> Self {
        Self::new(
            width,
            height,
            width as usize * BYTES_PER_PIXEL,
            channel_order,
            alpha,
            bytes,
        )
    }
}

/// Tightly packed RGBA8 pixels. The only representation consumers ever see.
///
/// Invariant: `bytes().len() == width * height * 4`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanonicalBitmap {
    width: u32,
    height: u32,
    alpha: AlphaMode,
    bytes: Vec<u8>,
}

impl CanonicalBitmap {
    /// Wrap already-canonical RGBA8 bytes. Returns None when the length does not match.
    pub fn from_rgba(width: u32, height: u32, alpha: AlphaMode, bytes: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(BYTES_PER_PIXEL)?;
        (bytes.len() == expected).then_some(Self {
            width,
            height,
            alpha,
            bytes,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn alpha(&self) -> AlphaMode {
        self.alpha
    }

    pub fn is_premultiplied(&self) -> bool {
        self.alpha == AlphaMode::Premultiplied
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// RGBA at (x, y), or None when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        let px = &self.bytes[start..start + BYTES_PER_PIXEL];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Convert pixel values to `target` and relabel. No-op when already labeled `target`.
    pub fn convert_alpha(self, target: AlphaMode) -> NormalizeResult<Self> {
        if self.alpha == target {
            return Ok(self);
        }
        let (width, height) = (self.width, self.height);
        let mut image = fir::images::Image::from_vec_u8(width, height, self.bytes, PixelType::U8x4)
            .map_err(|e| {
                SvgDecodeError::internal_panic(format!("alpha conversion buffer error: {e:?}"))
            })?;

        let mul_div = MulDiv::default();
        match target {
            AlphaMode::Premultiplied => mul_div.multiply_alpha_inplace(&mut image),
            AlphaMode::Straight => mul_div.divide_alpha_inplace(&mut image),
        }
        .map_err(|e| SvgDecodeError::internal_panic(format!("alpha conversion failed: {e}")))?;

        Ok(Self {
            width,
            height,
            alpha: target,
            bytes: image.into_vec(),
        })
    }

    /// Straight-alpha `image::RgbaImage`, for hosts built on the image crate.
    pub fn into_rgba_image(self) -> NormalizeResult<RgbaImage> {
        let straight = self.convert_alpha(AlphaMode::Straight)?;
        let (width, height) = straight.dimensions();
        RgbaImage::from_raw(width, height, straight.bytes).ok_or_else(|| {
            SvgDecodeError::internal_panic("canonical bitmap length does not match its dimensions")
        })
    }
}

/// Normalize a backend buffer into a [`CanonicalBitmap`].
///
/// Channels are remapped per pixel, padded rows are copied one by one, and the
/// alpha label is taken from the raw buffer as-is.
pub fn normalize(raw: RawPixelBuffer) -> NormalizeResult<CanonicalBitmap> {
    let RawPixelBuffer {
        width,
        height,
        bytes_per_row,
        channel_order,
        alpha,
        bytes,
    } = raw;

    if width == 0 || height == 0 {
        return Err(SvgDecodeError::invalid_argument(
            "raw buffer dimensions",
            format!("{width}x{height}"),
            "backend produced an empty buffer",
        ));
    }

    let overflow = || SvgDecodeError::buffer_too_small((width, height), bytes_per_row, usize::MAX, bytes.len());
    let row_len = (width as usize)
        .checked_mul(BYTES_PER_PIXEL)
        .ok_or_else(overflow)?;
    let tight_len = row_len
        .checked_mul(height as usize)
        .ok_or_else(overflow)?;

    if bytes_per_row < row_len {
        return Err(SvgDecodeError::buffer_too_small(
            (width, height),
            bytes_per_row,
            tight_len,
            bytes.len(),
        ));
    }
    let required = bytes_per_row
        .checked_mul(height as usize)
        .ok_or_else(overflow)?;
    if bytes.len() < required {
        return Err(SvgDecodeError::buffer_too_small(
            (width, height),
            bytes_per_row,
            required,
            bytes.len(),
        ));
    }

    // Fast path: already canonical, reuse the allocation.
    if channel_order == ChannelOrder::Rgba && bytes_per_row == row_len {
        let mut bytes = bytes;
        bytes.truncate(tight_len);
        return Ok(CanonicalBitmap {
            width,
            height,
            alpha,
            bytes,
        });
    }

    let mut out = Vec::with_capacity(tight_len);
    let [r, g, b, a] = channel_order.rgba_indices();
    for row in bytes.chunks(bytes_per_row).take(height as usize) {
        let pixels = &row[..row_len];
        if channel_order == ChannelOrder::Rgba {
            out.extend_from_slice(pixels);
        } else {
            for px in pixels.chunks_exact(BYTES_PER_PIXEL) {
                out.extend_from_slice(&[px[r], px[g], px[b], px[a]]);
            }
        }
    }
    debug_assert_eq!(out.len(), tight_len);

    Ok(CanonicalBitmap {
        width,
        height,
        alpha,
        bytes: out,
    })
}
