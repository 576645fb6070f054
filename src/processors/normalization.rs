//! Input tensor construction: RGBA to planar BGR with mean subtraction.
//!
//! The model consumes a `[1, 3, H, W]` tensor whose planes are B, G, R in
//! that order, each with a fixed mean subtracted and no further scaling.
//! Only buffers that already have the exact input size and RGBA8 layout are
//! accepted; resizing and format conversion belong to the caller.

use super::pixel::{PixelLock, PixelSource};
use super::types::{PixelFormat, PixelInfo};
use crate::core::config::ClassifierConfig;
use crate::core::constants::INPUT_CHANNELS;
use crate::core::errors::{ClassifierError, ClassifierResult, ProcessingStage};
use crate::core::Tensor4D;
use ndarray::Array4;
use rayon::prelude::*;

/// Byte offset of each output plane's source channel inside an RGBA pixel.
const BGR_FROM_RGBA: [usize; INPUT_CHANNELS] = [2, 1, 0];

/// Converts caller pixel buffers into mean-subtracted BGR tensors.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    input_size: u32,
    /// Means for the B, G and R planes.
    mean_values: [f32; 3],
}

impl Preprocessor {
    /// Creates a preprocessor for square inputs of `input_size` pixels.
    pub fn new(input_size: u32, mean_values: [f32; 3]) -> Self {
        Self {
            input_size,
            mean_values,
        }
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(config.input_size, config.mean_values)
    }

    /// Required width and height.
    pub fn input_size(&self) -> u32 {
        self.input_size
    }

    /// Rejects any layout other than `input_size` x `input_size` RGBA8.
    pub fn check_info(&self, info: &PixelInfo) -> ClassifierResult<()> {
        if info.width != self.input_size || info.height != self.input_size {
            return Err(ClassifierError::input_format(format!(
                "expected {0}x{0} pixels, got {1}x{2}",
                self.input_size, info.width, info.height
            )));
        }
        if info.format != PixelFormat::Rgba8888 {
            return Err(ClassifierError::input_format(format!(
                "expected RGBA_8888 pixels, got {}",
                info.format
            )));
        }
        let row_bytes =
            (info.width as usize).saturating_mul(PixelFormat::Rgba8888.bytes_per_pixel());
        if (info.stride as usize) < row_bytes {
            return Err(ClassifierError::input_format(format!(
                "row stride {} is smaller than {} bytes per row",
                info.stride, row_bytes
            )));
        }
        Ok(())
    }

    /// Builds the input tensor from a caller-owned source.
    ///
    /// The layout is checked before the buffer is locked; once locked, the
    /// buffer is released when this function returns, whatever the outcome.
    pub fn preprocess<S: PixelSource + ?Sized>(&self, source: &S) -> ClassifierResult<Tensor4D> {
        let info = source.info();
        self.check_info(&info)?;

        let pixels = PixelLock::acquire(source)?;
        self.preprocess_pixels(&pixels, &info)
    }

    /// Builds the input tensor from raw bytes described by `info`.
    pub fn preprocess_pixels(&self, pixels: &[u8], info: &PixelInfo) -> ClassifierResult<Tensor4D> {
        self.check_info(info)?;

        let required = info.required_len();
        if pixels.len() < required {
            return Err(ClassifierError::input_format(format!(
                "pixel buffer holds {} bytes, expected at least {}",
                pixels.len(),
                required
            )));
        }

        let width = info.width as usize;
        let height = info.height as usize;
        let stride = info.stride as usize;
        let row_bytes = width * PixelFormat::Rgba8888.bytes_per_pixel();
        let plane = width * height;

        let mut data = vec![0.0f32; INPUT_CHANNELS * plane];
        data.par_chunks_mut(plane.max(1))
            .enumerate()
            .for_each(|(c, out)| {
                let src_channel = BGR_FROM_RGBA[c];
                let mean = self.mean_values[c];
                for y in 0..height {
                    let row = &pixels[y * stride..y * stride + row_bytes];
                    let dst = &mut out[y * width..(y + 1) * width];
                    for (x, value) in dst.iter_mut().enumerate() {
                        *value = row[x * 4 + src_channel] as f32 - mean;
                    }
                }
            });

        Array4::from_shape_vec((1, INPUT_CHANNELS, height, width), data).map_err(|e| {
            ClassifierError::processing_error(
                ProcessingStage::Preprocessing,
                "failed to shape input tensor",
                e,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::DEFAULT_MEAN_VALUES;
    use crate::processors::pixel::test_support::CountingSource;

    fn preprocessor() -> Preprocessor {
        Preprocessor::new(224, DEFAULT_MEAN_VALUES)
    }

    #[test]
    fn test_bgr_order_and_mean_subtraction() {
        let source = CountingSource::rgba(224, 224, [200, 150, 100, 7]);
        let tensor = preprocessor().preprocess(&source).unwrap();

        assert_eq!(tensor.shape(), &[1, 3, 224, 224]);
        let eps = 1e-4;
        assert!((tensor[[0, 0, 0, 0]] - (100.0 - 103.94)).abs() < eps);
        assert!((tensor[[0, 1, 10, 20]] - (150.0 - 116.78)).abs() < eps);
        assert!((tensor[[0, 2, 223, 223]] - (200.0 - 123.68)).abs() < eps);
        assert_eq!(source.locks.get(), 1);
        assert_eq!(source.unlocks.get(), 1);
    }

    #[test]
    fn test_pixel_positions_are_row_major() {
        let size = 224u32;
        let mut data = vec![0u8; (size * size * 4) as usize];
        // Pixel (x=5, y=3) gets a distinctive red value.
        let offset = ((3 * size + 5) * 4) as usize;
        data[offset] = 255;
        let info = PixelInfo::packed(size, size, PixelFormat::Rgba8888);
        let tensor = preprocessor().preprocess_pixels(&data, &info).unwrap();

        assert!((tensor[[0, 2, 3, 5]] - (255.0 - 123.68)).abs() < 1e-4);
        assert!((tensor[[0, 2, 5, 3]] + 123.68).abs() < 1e-4);
    }

    #[test]
    fn test_rejects_wrong_size_without_locking() {
        let source = CountingSource::rgba(225, 224, [0; 4]);
        let err = preprocessor().preprocess(&source).unwrap_err();
        assert!(err.is_input_format());
        assert_eq!(source.locks.get(), 0);

        let source = CountingSource::rgba(224, 100, [0; 4]);
        assert!(preprocessor().preprocess(&source).unwrap_err().is_input_format());
    }

    #[test]
    fn test_rejects_non_rgba_format() {
        let info = PixelInfo::packed(224, 224, PixelFormat::Rgb565);
        let source = CountingSource::new(vec![0u8; info.required_len()], info);
        let err = preprocessor().preprocess(&source).unwrap_err();
        assert!(err.is_input_format());
        assert_eq!(source.locks.get(), 0);
    }

    #[test]
    fn test_short_buffer_releases_lock() {
        let info = PixelInfo::packed(224, 224, PixelFormat::Rgba8888);
        let source = CountingSource::new(vec![0u8; 100], info);
        let err = preprocessor().preprocess(&source).unwrap_err();
        assert!(err.is_input_format());
        assert_eq!(source.locks.get(), 1);
        assert_eq!(source.unlocks.get(), 1);
    }

    #[test]
    fn test_padded_stride() {
        let pre = Preprocessor::new(2, [0.0, 0.0, 0.0]);
        let info = PixelInfo::packed(2, 2, PixelFormat::Rgba8888).with_stride(12);
        #[rustfmt::skip]
        let data = [
            1, 2, 3, 0,   4, 5, 6, 0,   99, 99, 99, 99,
            7, 8, 9, 0,   10, 11, 12, 0,
        ];
        let tensor = pre.preprocess_pixels(&data, &info).unwrap();
        // Blue plane
        assert_eq!(tensor[[0, 0, 0, 0]], 3.0);
        assert_eq!(tensor[[0, 0, 1, 1]], 12.0);
        // Red plane skips the padding bytes
        assert_eq!(tensor[[0, 2, 1, 0]], 7.0);
    }

    #[test]
    fn test_huge_input_size_rejected_without_overflow() {
        let pre = Preprocessor::new(u32::MAX, [0.0, 0.0, 0.0]);
        let info = PixelInfo::packed(u32::MAX, u32::MAX, PixelFormat::Rgba8888);
        let err = pre.check_info(&info).unwrap_err();
        assert!(err.is_input_format());
    }

    #[test]
    fn test_stride_smaller_than_row_rejected() {
        let info = PixelInfo::packed(224, 224, PixelFormat::Rgba8888).with_stride(10);
        let err = preprocessor()
            .preprocess_pixels(&vec![0u8; 224 * 224 * 4], &info)
            .unwrap_err();
        assert!(err.is_input_format());
    }
}
