use image::{DynamicImage, ImageError, ImageReader, RgbaImage, imageops::FilterType};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Loads an image and scales it to a `size` x `size` RGBA bitmap.
///
/// Decoding falls back to content sniffing when the file extension does not
/// match the actual format.
pub fn load_rgba_square(path: &Path, size: u32) -> Result<RgbaImage, ImageError> {
    let img = load_dynamic_image(path)?;
    Ok(img.resize_exact(size, size, FilterType::Triangle).to_rgba8())
}

fn load_dynamic_image(path: &Path) -> Result<DynamicImage, ImageError> {
    match image::open(path) {
        Ok(img) => Ok(img),
        Err(err) if should_retry(&err) => {
            tracing::warn!(
                "Standard decode failed for {} ({err}). Retrying with format sniffing.",
                path.display()
            );
            let reader = BufReader::new(File::open(path)?);
            ImageReader::new(reader).with_guessed_format()?.decode()
        }
        Err(err) => Err(err),
    }
}

fn should_retry(err: &ImageError) -> bool {
    matches!(err, ImageError::Decoding(_) | ImageError::Unsupported(_))
}
