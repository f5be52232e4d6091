//! Resampling onto the output surface.

use image::DynamicImage;
use image::imageops::FilterType;

/// Bilinear, matching the default smoothing of a 2D canvas blit.
const FILTER: FilterType = FilterType::Triangle;

/// Draws `image` onto a new `width` x `height` surface, stretching to fit.
///
/// Returns the image untouched when it already has the target size.
pub fn resample(image: DynamicImage, width: u32, height: u32) -> DynamicImage {
    if image.width() == width && image.height() == height {
        return image;
    }
    image.resize_exact(width, height, FILTER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stretches_to_exact_size() {
        let out = resample(DynamicImage::new_rgb8(100, 50), 30, 30);
        assert_eq!((out.width(), out.height()), (30, 30));
    }

    #[test]
    fn same_size_is_passthrough() {
        let out = resample(DynamicImage::new_rgba8(12, 7), 12, 7);
        assert_eq!((out.width(), out.height()), (12, 7));
    }
}
