use image::DynamicImage;
use kmeans_colors::get_kmeans;
use palette::Srgb;
use tracing::debug;

/// Longer side of the downsampled copy the clustering runs on.
const THUMBNAIL_EDGE: u32 = 100;
/// Fixed seed so repeated runs on the same image yield the same palette.
const KMEANS_SEED: u64 = 42;
const KMEANS_MAX_ITER: usize = 20;
const KMEANS_CONVERGE: f32 = 1.0;
const DARKEN_FACTOR: f32 = 0.7;

/// One dominant color of an image, as an integer RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwatchColor {
    pub rgb: [u8; 3],
}

impl SwatchColor {
    /// Variant used for the lower half of the swatch: each channel
    /// multiplied by 0.7 and truncated.
    pub fn darkened(&self) -> [u8; 3] {
        self.rgb.map(|c| (f32::from(c) * DARKEN_FACTOR) as u8)
    }
}

/// Cluster the image's pixels into `count` dominant colors.
///
/// Images larger than 100px on their longer side are downsampled first to
/// bound the clustering cost; smaller images are clustered as-is, never
/// upscaled. Degenerate input (fewer pixels than clusters) yields an empty
/// palette; the caller simply omits the swatch row in that case.
pub fn extract_dominant_colors(image: &DynamicImage, count: usize) -> Vec<SwatchColor> {
    let small = if image.width().max(image.height()) > THUMBNAIL_EDGE {
        image.thumbnail(THUMBNAIL_EDGE, THUMBNAIL_EDGE).to_rgb8()
    } else {
        image.to_rgb8()
    };
    let pixels: Vec<Srgb<f32>> = small
        .pixels()
        .map(|p| Srgb::new(p[0], p[1], p[2]).into_format())
        .collect();

    if count == 0 || pixels.len() < count {
        debug!(
            "Skipping palette extraction: {} samples for {} clusters",
            pixels.len(),
            count
        );
        return Vec::new();
    }

    let result = get_kmeans(
        count,
        KMEANS_MAX_ITER,
        KMEANS_CONVERGE,
        false,
        &pixels,
        KMEANS_SEED,
    );

    let mut swatches: Vec<SwatchColor> = result
        .centroids
        .iter()
        .map(|centroid| {
            let rgb: Srgb<u8> = centroid.into_format();
            SwatchColor {
                rgb: [rgb.red, rgb.green, rgb.blue],
            }
        })
        .collect();

    // Empty clusters are dropped from the centroid list; a uniform or
    // low-variance image would otherwise yield a short swatch row. Pad back
    // up so the row always carries `count` entries.
    if let Some(&last) = swatches.last() {
        while swatches.len() < count {
            swatches.push(last);
        }
    }
    swatches
}
