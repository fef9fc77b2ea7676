use crate::Config;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum StartupCheckError {
    #[error("Failed to create directory: {0}")]
    DirectoryCreationFailed(#[from] std::io::Error),
}

/// Create the working directories and verify the font asset. Directory
/// creation failure is fatal; a missing font only warns, since each file's
/// processing degrades to quarantine on its own.
pub async fn perform_startup_checks(config: &Config) -> Result<(), StartupCheckError> {
    info!("Performing startup checks...");

    let directories = [
        &config.watcher.source_directory,
        &config.watcher.target_directory,
        &config.watcher.logo_directory,
    ];
    for dir in directories {
        if dir.exists() {
            info!("Directory exists: {:?}", dir);
        } else {
            info!("Directory does not exist, creating: {:?}", dir);
            if let Err(e) = tokio::fs::create_dir_all(dir).await {
                error!("Failed to create directory {:?}: {}", dir, e);
                return Err(StartupCheckError::DirectoryCreationFailed(e));
            }
        }
    }

    if config.watermark.font_path.exists() {
        info!("Font file found: {:?}", config.watermark.font_path);
    } else {
        warn!(
            "Font file missing: {:?}, files will be quarantined until it is present",
            config.watermark.font_path
        );
    }

    info!("All startup checks passed");
    Ok(())
}
