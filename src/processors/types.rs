//! Types describing caller-owned pixel buffers.

use serde::{Deserialize, Serialize};

/// Pixel layouts a host bitmap may use.
///
/// Only [`PixelFormat::Rgba8888`] is accepted by the preprocessor; the others
/// exist so callers can describe what they have and receive a precise
/// rejection instead of a silent conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 8 bits per channel, R G B A byte order.
    Rgba8888,
    /// 16-bit packed 5-6-5 RGB.
    Rgb565,
    /// 16-bit packed 4-4-4-4 RGBA.
    Rgba4444,
    /// Single 8-bit alpha channel.
    Alpha8,
    /// Half-float RGBA.
    RgbaF16,
}

impl PixelFormat {
    /// Bytes occupied by one pixel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgba8888 => 4,
            PixelFormat::Rgb565 | PixelFormat::Rgba4444 => 2,
            PixelFormat::Alpha8 => 1,
            PixelFormat::RgbaF16 => 8,
        }
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PixelFormat::Rgba8888 => write!(f, "RGBA_8888"),
            PixelFormat::Rgb565 => write!(f, "RGB_565"),
            PixelFormat::Rgba4444 => write!(f, "RGBA_4444"),
            PixelFormat::Alpha8 => write!(f, "A_8"),
            PixelFormat::RgbaF16 => write!(f, "RGBA_F16"),
        }
    }
}

/// Geometry and layout of a pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelInfo {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Bytes between the starts of consecutive rows.
    pub stride: u32,
    /// Pixel layout.
    pub format: PixelFormat,
}

impl PixelInfo {
    /// Describes a buffer whose rows are tightly packed.
    pub fn packed(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            // Saturates so an impossible width yields a layout that fails checks.
            stride: width.saturating_mul(format.bytes_per_pixel() as u32),
            format,
        }
    }

    /// Overrides the row stride.
    pub fn with_stride(mut self, stride: u32) -> Self {
        self.stride = stride;
        self
    }

    /// Minimum number of bytes a buffer with this layout must hold.
    pub fn required_len(&self) -> usize {
        let row_bytes = (self.width as usize).saturating_mul(self.format.bytes_per_pixel());
        match self.height as usize {
            0 => 0,
            h => (self.stride as usize)
                .saturating_mul(h - 1)
                .saturating_add(row_bytes),
        }
    }
}
