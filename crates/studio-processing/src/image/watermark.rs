use std::io::Cursor;

use image::{imageops, DynamicImage, GenericImageView, ImageReader};
use studio_core::WatermarkConfig;

use super::resize::ImageResize;

/// Watermark overlay compositing.
pub struct Watermark;

impl Watermark {
    /// Resize the overlay to fit within the target bounds, preserving the
    /// overlay's own aspect ratio.
    ///
    /// The axis with the larger overlay-to-target scale factor constrains
    /// the fit: the overlay matches the target exactly along it and stays
    /// within the target along the other.
    pub fn fit_overlay(overlay: &DynamicImage, target_width: u32, target_height: u32) -> DynamicImage {
        let (overlay_width, overlay_height) = overlay.dimensions();
        let width_aspect = overlay_width as f32 / target_width as f32;
        let height_aspect = overlay_height as f32 / target_height as f32;

        if width_aspect > height_aspect {
            ImageResize::scale_to_width(overlay, target_width)
        } else {
            ImageResize::scale_to_height(overlay, target_height)
        }
    }

    /// Composite the configured overlay onto `target`, centered, applying
    /// the color-key and opacity transparency settings.
    pub fn apply(
        target: &DynamicImage,
        overlay_data: &[u8],
        config: &WatermarkConfig,
    ) -> Result<DynamicImage, anyhow::Error> {
        let cursor = Cursor::new(overlay_data);
        let overlay = ImageReader::new(cursor).with_guessed_format()?.decode()?;

        let (target_width, target_height) = target.dimensions();
        let mut overlay = Self::fit_overlay(&overlay, target_width, target_height).to_rgba8();

        let color_key = [
            config.overlay_image_red,
            config.overlay_image_green,
            config.overlay_image_blue,
        ];
        let key_opacity = config.overlay_image_transparency as f32 / 100.0;
        let overlay_opacity = config.base_image_transparency as f32 / 100.0;
        for pixel in overlay.pixels_mut() {
            if [pixel[0], pixel[1], pixel[2]] == color_key {
                pixel[3] = (pixel[3] as f32 * key_opacity) as u8;
            }
            pixel[3] = (pixel[3] as f32 * overlay_opacity) as u8;
        }

        let (overlay_width, overlay_height) = overlay.dimensions();
        let x_offset = ((target_width as i64 - overlay_width as i64) / 2).max(0);
        let y_offset = ((target_height as i64 - overlay_height as i64) / 2).max(0);

        let mut base = target.to_rgba8();
        imageops::overlay(&mut base, &overlay, x_offset, y_offset);

        Ok(DynamicImage::ImageRgba8(base))
    }
}
