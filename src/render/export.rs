use std::path::Path;

use image::{imageops, ImageFormat, Rgb, RgbImage};

use crate::error::TopoError;

/// Crop to the bounding box of every pixel that differs from `background`,
/// keeping `pad` pixels of border where the canvas allows it.
///
/// An image that is entirely background is returned unchanged.
pub fn crop_tight(image: &RgbImage, background: Rgb<u8>, pad: u32) -> RgbImage {
    let (width, height) = image.dimensions();
    let mut min = (u32::MAX, u32::MAX);
    let mut max = (0u32, 0u32);

    for (x, y, px) in image.enumerate_pixels() {
        if *px != background {
            min = (min.0.min(x), min.1.min(y));
            max = (max.0.max(x), max.1.max(y));
        }
    }
    if min.0 == u32::MAX {
        return image.clone();
    }

    let x0 = min.0.saturating_sub(pad);
    let y0 = min.1.saturating_sub(pad);
    let x1 = (max.0 + pad).min(width - 1);
    let y1 = (max.1 + pad).min(height - 1);

    imageops::crop_imm(image, x0, y0, x1 - x0 + 1, y1 - y0 + 1).to_image()
}

/// Encode as PNG, creating or truncating `path`.
pub fn save_png(image: &RgbImage, path: &Path) -> Result<(), TopoError> {
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| TopoError::Encode {
            path: path.to_path_buf(),
            source,
        })
}
