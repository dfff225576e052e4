//! Raster decoding: turns downloaded image bytes into a greyscale bitmap.
use image::{GrayImage, ImageFormat};
use tracing::debug;

/// Decode PNG/JPEG/GIF/WebP bytes into an 8-bit greyscale raster.
pub fn decode_raster(bytes: &[u8]) -> Result<GrayImage, image::ImageError> {
    let format = image::guess_format(bytes).ok();
    debug!(format = ?format.map(ImageFormat::extensions_str), bytes = bytes.len(), "Decoding raster");
    let img = image::load_from_memory(bytes)?;
    Ok(img.to_luma8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageBuffer, Rgb};
    use std::io::Cursor;

    #[test]
    fn decodes_png_to_greyscale() {
        let rgb = ImageBuffer::from_pixel(4, 3, Rgb([255u8, 255, 255]));
        let mut png = Vec::new();
        DynamicImage::ImageRgb8(rgb)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();

        let grey = decode_raster(&png).unwrap();
        assert_eq!(grey.dimensions(), (4, 3));
        assert_eq!(grey.get_pixel(0, 0).0[0], 255);
    }

    #[test]
    fn rejects_non_image_bytes() {
        assert!(decode_raster(b"%PDF-1.7 definitely not an image").is_err());
        assert!(decode_raster(&[]).is_err());
    }

    #[test]
    fn rejects_truncated_png() {
        let rgb = ImageBuffer::from_pixel(16, 16, Rgb([0u8, 0, 0]));
        let mut png = Vec::new();
        DynamicImage::ImageRgb8(rgb)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();
        png.truncate(png.len() / 2);
        assert!(decode_raster(&png).is_err());
    }
}
