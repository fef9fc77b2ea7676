use crate::WatermarkConfig;

/// Pixel sizes for the watermark band, derived from the source image width.
///
/// Every field is its base constant multiplied by `width / reference_width`
/// and truncated independently. The per-field truncation means the metrics
/// are not guaranteed to stay perfectly proportional to each other at extreme
/// scale factors; layouts depend on that exact arithmetic, so it is kept
/// rather than deriving the smaller sizes from the band height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutMetrics {
    pub band_height: u32,
    pub logo_height: u32,
    pub font_size: u32,
    pub swatch_size: u32,
    pub padding: u32,
}

impl LayoutMetrics {
    /// No clamping: pathologically small or huge widths produce
    /// proportionally tiny or huge bands, including zero sizes.
    pub fn for_width(config: &WatermarkConfig, width: u32) -> Self {
        let scale = f64::from(width) / f64::from(config.reference_width);
        let scaled = |base: u32| (f64::from(base) * scale) as u32;
        Self {
            band_height: scaled(config.base_band_height),
            logo_height: scaled(config.base_logo_height),
            font_size: scaled(config.base_font_size),
            swatch_size: scaled(config.base_swatch_size),
            padding: scaled(config.base_padding),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    fn config() -> WatermarkConfig {
        Config::default().watermark
    }

    #[test]
    fn test_reference_width_is_identity() {
        let metrics = LayoutMetrics::for_width(&config(), 4000);
        assert_eq!(metrics.band_height, 400);
        assert_eq!(metrics.logo_height, 80);
        assert_eq!(metrics.font_size, 60);
        assert_eq!(metrics.swatch_size, 80);
        assert_eq!(metrics.padding, 80);
    }

    #[test]
    fn test_double_width_doubles_every_metric() {
        let metrics = LayoutMetrics::for_width(&config(), 8000);
        assert_eq!(metrics.band_height, 800);
        assert_eq!(metrics.logo_height, 160);
        assert_eq!(metrics.font_size, 120);
        assert_eq!(metrics.swatch_size, 160);
        assert_eq!(metrics.padding, 160);
    }

    #[test]
    fn test_fractional_scale_truncates() {
        // 1500 / 4000 = 0.375; 60 * 0.375 = 22.5 truncates to 22
        let metrics = LayoutMetrics::for_width(&config(), 1500);
        assert_eq!(metrics.band_height, 150);
        assert_eq!(metrics.logo_height, 30);
        assert_eq!(metrics.font_size, 22);
        assert_eq!(metrics.swatch_size, 30);
        assert_eq!(metrics.padding, 30);
    }

    #[test]
    fn test_near_zero_width_collapses_to_zero() {
        let metrics = LayoutMetrics::for_width(&config(), 1);
        assert_eq!(metrics.band_height, 0);
        assert_eq!(metrics.swatch_size, 0);
        assert_eq!(metrics.padding, 0);
    }
}
