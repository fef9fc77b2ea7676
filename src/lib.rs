use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod colors;
pub mod error;
pub mod exif;
pub mod layout;
pub mod startup_checks;
pub mod watcher;
pub mod watermark;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub app: AppConfig,
    pub watcher: WatcherConfig,
    pub watermark: WatermarkConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub name: String,
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WatcherConfig {
    /// Drop folder scanned for new photographs.
    pub source_directory: PathBuf,
    /// Finished images are written here under their original filename.
    pub target_directory: PathBuf,
    /// Brand logo assets, one `{Brand}.png` per camera maker.
    pub logo_directory: PathBuf,
    /// Files that failed processing are moved here for manual retry.
    pub quarantine_directory: PathBuf,
    pub poll_interval_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WatermarkConfig {
    pub font_path: PathBuf,
    /// Image width at which the base sizes below apply unscaled.
    pub reference_width: u32,
    pub base_band_height: u32,
    pub base_logo_height: u32,
    pub base_font_size: u32,
    pub base_swatch_size: u32,
    pub base_padding: u32,
    pub palette_size: usize,
    pub jpeg_quality: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app: AppConfig {
                name: "Sukashi".to_string(),
                log_level: "info".to_string(),
            },
            watcher: WatcherConfig {
                source_directory: PathBuf::from("source"),
                target_directory: PathBuf::from("target"),
                logo_directory: PathBuf::from("logos"),
                quarantine_directory: PathBuf::from("failed_photos"),
                poll_interval_seconds: 10,
            },
            watermark: WatermarkConfig {
                font_path: PathBuf::from("fonts/DejaVuSans.ttf"),
                reference_width: 4000,
                base_band_height: 400,
                base_logo_height: 80,
                base_font_size: 60,
                base_swatch_size: 80,
                base_padding: 80,
                palette_size: 5,
                jpeg_quality: 95,
            },
        }
    }
}
