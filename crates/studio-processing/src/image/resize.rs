use image::{DynamicImage, GenericImageView};

/// Image resize operations
pub struct ImageResize;

impl ImageResize {
    /// Select appropriate filter type based on resize ratio
    pub fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> image::imageops::FilterType {
        let width_ratio = orig_width as f32 / new_width as f32;
        let height_ratio = orig_height as f32 / new_height as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            image::imageops::FilterType::Triangle
        } else if max_ratio > 1.5 {
            image::imageops::FilterType::CatmullRom
        } else {
            image::imageops::FilterType::Lanczos3
        }
    }

    /// Scale to an exact width, preserving the aspect ratio.
    pub fn scale_to_width(img: &DynamicImage, width: u32) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        let aspect_ratio = orig_height as f32 / orig_width as f32;
        let height = ((width as f32 * aspect_ratio).round() as u32).max(1);
        img.resize_exact(
            width,
            height,
            Self::select_filter(orig_width, orig_height, width, height),
        )
    }

    /// Scale to an exact height, preserving the aspect ratio.
    pub fn scale_to_height(img: &DynamicImage, height: u32) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        let aspect_ratio = orig_width as f32 / orig_height as f32;
        let width = ((height as f32 * aspect_ratio).round() as u32).max(1);
        img.resize_exact(
            width,
            height,
            Self::select_filter(orig_width, orig_height, width, height),
        )
    }

    /// Scale `img` down to the given maximum dimensions, preserving the
    /// aspect ratio. `None` keeps the original size along that axis.
    ///
    /// Width is handled first; because width-scaling preserves the aspect
    /// ratio, the height limit is re-checked against the width-scaled image
    /// and only applied when still exceeded. An image within both limits is
    /// returned unchanged.
    pub fn resize_if_necessary(
        img: DynamicImage,
        max_width: Option<u32>,
        max_height: Option<u32>,
    ) -> DynamicImage {
        let mut result = img;

        if let Some(max_width) = max_width {
            if result.width() > max_width {
                result = Self::scale_to_width(&result, max_width);
            }
        }
        if let Some(max_height) = max_height {
            if result.height() > max_height {
                result = Self::scale_to_height(&result, max_height);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn test_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([255, 255, 255, 255]),
        ))
    }

    #[test]
    fn test_scale_to_width_preserves_aspect_ratio() {
        let resized = ImageResize::scale_to_width(&test_image(1000, 500), 300);
        assert_eq!(resized.dimensions(), (300, 150));
    }

    #[test]
    fn test_scale_to_height_preserves_aspect_ratio() {
        let resized = ImageResize::scale_to_height(&test_image(500, 1000), 300);
        assert_eq!(resized.dimensions(), (150, 300));
    }

    #[test]
    fn test_resize_wide_image_skips_height_pass() {
        // 1000x500 with both limits at 300: the width pass brings the height
        // under the limit, so no second distortion happens
        let resized =
            ImageResize::resize_if_necessary(test_image(1000, 500), Some(300), Some(300));
        assert_eq!(resized.dimensions(), (300, 150));
    }

    #[test]
    fn test_resize_tall_image_by_height_only() {
        let resized =
            ImageResize::resize_if_necessary(test_image(200, 800), Some(300), Some(300));
        assert_eq!(resized.dimensions(), (75, 300));
    }

    #[test]
    fn test_resize_is_idempotent_for_fitting_images() {
        let resized =
            ImageResize::resize_if_necessary(test_image(120, 90), Some(300), Some(300));
        assert_eq!(resized.dimensions(), (120, 90));
    }

    #[test]
    fn test_resize_original_size_sentinel() {
        let resized = ImageResize::resize_if_necessary(test_image(2000, 1500), None, None);
        assert_eq!(resized.dimensions(), (2000, 1500));
    }

    #[test]
    fn test_select_filter_by_downscale_ratio() {
        use image::imageops::FilterType;
        assert_eq!(
            ImageResize::select_filter(1000, 1000, 300, 300),
            FilterType::Triangle
        );
        assert_eq!(
            ImageResize::select_filter(1000, 1000, 600, 600),
            FilterType::CatmullRom
        );
        assert_eq!(
            ImageResize::select_filter(1000, 1000, 900, 900),
            FilterType::Lanczos3
        );
    }
}
