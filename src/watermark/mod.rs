// Watermark band composition: brand logo or text on the left, EXIF caption
// on the right, dominant-color swatches centered below.
pub mod jpeg;

use ab_glyph::{FontVec, PxScale};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage, imageops};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use std::path::PathBuf;
use tracing::{debug, error};

use crate::WatermarkConfig;
use crate::colors::SwatchColor;
use crate::error::ProcessError;
use crate::exif::ExifSummary;
use crate::layout::LayoutMetrics;

const TEXT_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);
const BAND_BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Horizontal placement of the swatch row within the band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwatchRow {
    pub total_width: i32,
    pub start_x: i32,
    pub y: i32,
    pub step: i32,
}

impl SwatchRow {
    pub fn new(metrics: &LayoutMetrics, count: usize, canvas_width: u32, source_height: u32) -> Self {
        let swatch = metrics.swatch_size as i32;
        let gap = (metrics.padding / 2) as i32;
        let count = count as i32;
        let total_width = swatch * count + gap * (count - 1);
        Self {
            total_width,
            start_x: (canvas_width as i32 - total_width) / 2,
            y: source_height as i32 + metrics.band_height as i32 - swatch - gap,
            step: swatch + gap,
        }
    }
}

enum LogoLookup {
    /// Logo asset found and resized to the band's logo height.
    Loaded(RgbaImage),
    /// Asset file exists but could not be decoded. The left side of the band
    /// stays empty in this case; it does not fall back to brand text.
    Failed,
    /// No asset file for this brand (or the brand string is empty).
    NotFound,
}

pub struct Composer {
    config: WatermarkConfig,
    logo_directory: PathBuf,
}

impl Composer {
    pub fn new(config: WatermarkConfig, logo_directory: PathBuf) -> Self {
        Self {
            config,
            logo_directory,
        }
    }

    pub fn config(&self) -> &WatermarkConfig {
        &self.config
    }

    /// Assemble the output canvas: the source image unchanged on top, and a
    /// white band below carrying logo/brand, caption, and swatches.
    pub fn compose(
        &self,
        source: &DynamicImage,
        summary: &ExifSummary,
        palette: &[SwatchColor],
        metrics: &LayoutMetrics,
    ) -> Result<RgbaImage, ProcessError> {
        let font_data = std::fs::read(&self.config.font_path)?;
        let font = FontVec::try_from_vec(font_data).map_err(|_| {
            ProcessError::Font(format!(
                "Failed to parse font at {}",
                self.config.font_path.display()
            ))
        })?;
        let scale = PxScale::from(metrics.font_size as f32);

        let (width, height) = source.dimensions();
        let mut canvas =
            RgbaImage::from_pixel(width, height + metrics.band_height, BAND_BACKGROUND);
        imageops::replace(&mut canvas, &source.to_rgba8(), 0, 0);

        // Brand/logo and caption share a vertical anchor centered in the band
        // area above the swatch row.
        let y_center = height as i32
            + (metrics.band_height as i32 - metrics.swatch_size as i32 - metrics.padding as i32)
                / 2;
        let padding = metrics.padding as i32;

        match self.load_logo(&summary.brand, metrics.logo_height) {
            LogoLookup::Loaded(logo) => {
                let logo_y = y_center - logo.height() as i32 / 2;
                imageops::overlay(&mut canvas, &logo, i64::from(metrics.padding), i64::from(logo_y));
            }
            LogoLookup::Failed => {}
            LogoLookup::NotFound => {
                if !summary.brand.is_empty() {
                    let (_, text_height) = text_size(scale, &font, &summary.brand);
                    draw_text_mut(
                        &mut canvas,
                        TEXT_COLOR,
                        padding,
                        y_center - text_height as i32 / 2,
                        scale,
                        &font,
                        &summary.brand,
                    );
                }
            }
        }

        let caption = summary.caption();
        if !caption.is_empty() {
            let (text_width, text_height) = text_size(scale, &font, &caption);
            let text_x = width as i32 - padding - text_width as i32;
            draw_text_mut(
                &mut canvas,
                TEXT_COLOR,
                text_x,
                y_center - text_height as i32 / 2,
                scale,
                &font,
                &caption,
            );
        }

        if !palette.is_empty() {
            self.draw_swatch_row(&mut canvas, palette, metrics, height);
        }

        Ok(canvas)
    }

    fn draw_swatch_row(
        &self,
        canvas: &mut RgbaImage,
        palette: &[SwatchColor],
        metrics: &LayoutMetrics,
        source_height: u32,
    ) {
        let row = SwatchRow::new(metrics, palette.len(), canvas.width(), source_height);
        let swatch = metrics.swatch_size as i32;
        let half = swatch / 2;

        for (i, color) in palette.iter().enumerate() {
            let x = row.start_x + i as i32 * row.step;
            let [r, g, b] = color.rgb;
            let [dr, dg, db] = color.darkened();
            if half > 0 {
                draw_filled_rect_mut(
                    canvas,
                    Rect::at(x, row.y).of_size(swatch as u32, half as u32),
                    Rgba([r, g, b, 255]),
                );
            }
            if swatch - half > 0 {
                draw_filled_rect_mut(
                    canvas,
                    Rect::at(x, row.y + half).of_size(swatch as u32, (swatch - half) as u32),
                    Rgba([dr, dg, db, 255]),
                );
            }
        }
    }

    fn load_logo(&self, brand: &str, logo_height: u32) -> LogoLookup {
        if brand.is_empty() {
            return LogoLookup::NotFound;
        }
        let path = self.logo_directory.join(format!("{}.png", brand));
        if !path.exists() {
            debug!("No logo asset for brand {:?}", brand);
            return LogoLookup::NotFound;
        }
        match image::open(&path) {
            Ok(logo) => {
                let aspect = f64::from(logo.width()) / f64::from(logo.height());
                let new_width = (f64::from(logo_height) * aspect) as u32;
                let resized = logo
                    .resize_exact(new_width, logo_height, FilterType::Lanczos3)
                    .to_rgba8();
                LogoLookup::Loaded(resized)
            }
            Err(e) => {
                error!("Failed to load logo {}: {}", path.display(), e);
                LogoLookup::Failed
            }
        }
    }
}
