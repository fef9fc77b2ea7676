use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::error::ProcessError;
use crate::exif::ExifSummary;
use crate::layout::LayoutMetrics;
use crate::watermark::{Composer, jpeg};
use crate::{Config, WatcherConfig, colors};

/// Polls the source directory and runs each eligible file through the
/// watermark pipeline, one at a time. Successful results land in the target
/// directory and the source file is deleted; failures are moved to
/// quarantine so they are not reprocessed forever.
pub struct Watcher {
    config: WatcherConfig,
    composer: Composer,
}

impl Watcher {
    pub fn new(config: &Config) -> Self {
        let composer = Composer::new(
            config.watermark.clone(),
            config.watcher.logo_directory.clone(),
        );
        Self {
            config: config.watcher.clone(),
            composer,
        }
    }

    /// Scan-and-dispatch loop. Runs until the surrounding task is dropped on
    /// shutdown; in-flight file processing finishes whatever it completed.
    pub async fn run(&self) {
        let interval = Duration::from_secs(self.config.poll_interval_seconds);
        info!(
            "Watching {:?} every {} seconds",
            self.config.source_directory, self.config.poll_interval_seconds
        );
        loop {
            let files = self.scan();
            if !files.is_empty() {
                info!("Found {} new file(s) to process", files.len());
                for path in files {
                    // Something else may have removed the file since the scan
                    if path.exists() {
                        self.dispatch(&path);
                    }
                }
            }
            sleep(interval).await;
        }
    }

    /// List eligible files in the source directory, immediate children only.
    /// Order follows the directory listing and is not guaranteed stable.
    pub fn scan(&self) -> Vec<PathBuf> {
        WalkDir::new(&self.config.source_directory)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| is_jpeg(p))
            .collect()
    }

    /// Process one file, quarantining it on any failure.
    pub fn dispatch(&self, path: &Path) {
        info!("Processing {}", path.display());
        match self.process(path) {
            Ok(dest) => {
                info!("Finished {} -> {}", path.display(), dest.display());
            }
            Err(e) => {
                error!("Processing {} failed: {}", path.display(), e);
                if let Err(e) = self.quarantine(path) {
                    error!("Failed to quarantine {}: {}", path.display(), e);
                }
            }
        }
    }

    fn process(&self, source: &Path) -> Result<PathBuf, ProcessError> {
        let filename = source.file_name().ok_or(ProcessError::InvalidPath)?;
        let bytes = std::fs::read(source)?;
        let image = image::load_from_memory(&bytes)?;

        let config = self.composer.config();
        let metrics = LayoutMetrics::for_width(config, image.width());
        let summary = ExifSummary::from_jpeg_bytes(&bytes);
        let palette = colors::extract_dominant_colors(&image, config.palette_size);

        let canvas = self.composer.compose(&image, &summary, &palette, &metrics)?;
        let output = DynamicImage::ImageRgba8(canvas).to_rgb8();

        let dest = self.config.target_directory.join(filename);
        jpeg::save_with_metadata(
            &output,
            &dest,
            config.jpeg_quality,
            jpeg::extract_exif_segment(&bytes).as_deref(),
            jpeg::extract_icc_profile(&bytes).as_deref(),
        )?;
        std::fs::remove_file(source)?;
        Ok(dest)
    }

    fn quarantine(&self, source: &Path) -> std::io::Result<()> {
        if !source.exists() {
            return Ok(());
        }
        std::fs::create_dir_all(&self.config.quarantine_directory)?;
        let filename = source.file_name().unwrap_or_default();
        let dest = self.config.quarantine_directory.join(filename);
        std::fs::rename(source, &dest)?;
        warn!("Moved {} to quarantine at {}", source.display(), dest.display());
        Ok(())
    }
}

fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_jpeg_extension_matching() {
        assert!(is_jpeg(Path::new("a.jpg")));
        assert!(is_jpeg(Path::new("a.JPG")));
        assert!(is_jpeg(Path::new("a.jpeg")));
        assert!(is_jpeg(Path::new("a.JPEG")));
        assert!(!is_jpeg(Path::new("a.png")));
        assert!(!is_jpeg(Path::new("a.jpg.bak")));
        assert!(!is_jpeg(Path::new("jpg")));
    }
}
