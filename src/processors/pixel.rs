//! Scoped access to caller-owned pixel buffers.
//!
//! Host bitmaps typically have to be locked before their memory may be read
//! and unlocked afterwards. [`PixelLock`] pairs the two so the buffer is
//! released whenever the guard goes out of scope, including on early returns.

use super::types::{PixelFormat, PixelInfo};
use crate::core::errors::{ClassifierError, ClassifierResult};
use image::RgbaImage;

/// A pixel buffer owned by the caller.
pub trait PixelSource {
    /// Geometry and format; must be readable without locking.
    fn info(&self) -> PixelInfo;

    /// Pins the pixel memory and returns it.
    ///
    /// Each successful call is balanced by exactly one [`unlock_pixels`](Self::unlock_pixels).
    /// Prefer [`PixelLock::acquire`] over calling this directly. Implementors
    /// report a buffer that cannot be pinned as `ClassifierError::PixelAccess`.
    fn lock_pixels(&self) -> ClassifierResult<&[u8]>;

    /// Releases memory pinned by `lock_pixels`.
    fn unlock_pixels(&self);
}

/// Guard holding a locked pixel buffer.
pub struct PixelLock<'a, S: PixelSource + ?Sized> {
    source: &'a S,
    pixels: &'a [u8],
}

impl<'a, S: PixelSource + ?Sized> PixelLock<'a, S> {
    /// Locks `source`; the returned guard unlocks it on drop.
    pub fn acquire(source: &'a S) -> ClassifierResult<Self> {
        let pixels = source.lock_pixels()?;
        Ok(Self { source, pixels })
    }
}

impl<S: PixelSource + ?Sized> std::ops::Deref for PixelLock<'_, S> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.pixels
    }
}

impl<S: PixelSource + ?Sized> Drop for PixelLock<'_, S> {
    fn drop(&mut self) {
        self.source.unlock_pixels();
    }
}

/// Adapts an [`image::RgbaImage`] that is already decoded and scaled.
#[derive(Debug, Clone, Copy)]
pub struct RgbaImageSource<'a> {
    image: &'a RgbaImage,
}

impl<'a> RgbaImageSource<'a> {
    pub fn new(image: &'a RgbaImage) -> Self {
        Self { image }
    }
}

impl PixelSource for RgbaImageSource<'_> {
    fn info(&self) -> PixelInfo {
        let (width, height) = self.image.dimensions();
        PixelInfo::packed(width, height, PixelFormat::Rgba8888)
    }

    fn lock_pixels(&self) -> ClassifierResult<&[u8]> {
        Ok(self.image.as_raw())
    }

    fn unlock_pixels(&self) {}
}

/// A borrowed byte slice with an explicit layout, e.g. memory handed over an FFI boundary.
#[derive(Debug, Clone, Copy)]
pub struct RawPixels<'a> {
    data: &'a [u8],
    info: PixelInfo,
}

impl<'a> RawPixels<'a> {
    /// Wraps `data`, checking it is large enough for `info`.
    pub fn new(data: &'a [u8], info: PixelInfo) -> ClassifierResult<Self> {
        let required = info.required_len();
        if data.len() < required {
            return Err(ClassifierError::input_format(format!(
                "pixel buffer holds {} bytes, layout {}x{} stride {} needs {}",
                data.len(),
                info.width,
                info.height,
                info.stride,
                required
            )));
        }
        Ok(Self { data, info })
    }
}

impl PixelSource for RawPixels<'_> {
    fn info(&self) -> PixelInfo {
        self.info
    }

    fn lock_pixels(&self) -> ClassifierResult<&[u8]> {
        Ok(self.data)
    }

    fn unlock_pixels(&self) {}
}


#[cfg(test)]
mod tests {
    use super::test_support::CountingSource;
    use super::*;

    #[test]
    fn test_lock_released_on_drop() {
        let source = CountingSource::rgba(2, 2, [1, 2, 3, 4]);
        {
            let pixels = PixelLock::acquire(&source).unwrap();
            assert_eq!(pixels.len(), 16);
            assert_eq!(source.unlocks.get(), 0);
        }
        assert_eq!(source.locks.get(), 1);
        assert_eq!(source.unlocks.get(), 1);
    }

    #[test]
    fn test_failed_lock_is_not_unlocked() {
        let mut source = CountingSource::rgba(2, 2, [0; 4]);
        source.fail_lock = true;
        assert!(matches!(
            PixelLock::acquire(&source),
            Err(ClassifierError::PixelAccess { .. })
        ));
        assert_eq!(source.unlocks.get(), 0);
    }

    #[test]
    fn test_rgba_image_source() {
        let image = RgbaImage::from_pixel(3, 2, image::Rgba([9, 8, 7, 255]));
        let source = RgbaImageSource::new(&image);
        assert_eq!(
            source.info(),
            PixelInfo::packed(3, 2, PixelFormat::Rgba8888)
        );
        let pixels = PixelLock::acquire(&source).unwrap();
        assert_eq!(&pixels[..4], &[9, 8, 7, 255]);
    }

    #[test]
    fn test_raw_pixels_rejects_short_buffer() {
        let info = PixelInfo::packed(4, 4, PixelFormat::Rgba8888);
        assert!(RawPixels::new(&[0u8; 63], info).is_err());
        assert!(RawPixels::new(&[0u8; 64], info).is_ok());
    }
}
