use image::{GenericImageView, Rgb, RgbImage};
use std::path::PathBuf;
use tempfile::TempDir;

use sukashi::{Config, watcher::Watcher};

/// The repo does not ship a font; rendering paths skip when DejaVu Sans
/// cannot be found locally.
fn find_font() -> Option<PathBuf> {
    [
        "fonts/DejaVuSans.ttf",
        "static/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .find(|p| p.exists())
}

fn test_config(temp: &TempDir) -> Config {
    let mut config = Config::default();
    config.watcher.source_directory = temp.path().join("source");
    config.watcher.target_directory = temp.path().join("target");
    config.watcher.logo_directory = temp.path().join("logos");
    config.watcher.quarantine_directory = temp.path().join("failed_photos");
    for dir in [
        &config.watcher.source_directory,
        &config.watcher.target_directory,
        &config.watcher.logo_directory,
    ] {
        std::fs::create_dir_all(dir).unwrap();
    }
    config
}

#[test]
fn test_scan_filters_by_extension_and_depth() {
    let temp = TempDir::new().unwrap();
    let config = test_config(&temp);
    let source = &config.watcher.source_directory;

    std::fs::write(source.join("a.jpg"), b"x").unwrap();
    std::fs::write(source.join("b.JPEG"), b"x").unwrap();
    std::fs::write(source.join("c.png"), b"x").unwrap();
    std::fs::write(source.join("notes.txt"), b"x").unwrap();
    std::fs::create_dir_all(source.join("nested")).unwrap();
    std::fs::write(source.join("nested").join("d.jpg"), b"x").unwrap();

    let watcher = Watcher::new(&config);
    let mut names: Vec<String> = watcher
        .scan()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    names.sort();

    assert_eq!(names, vec!["a.jpg", "b.JPEG"]);
}

#[test]
fn test_undecodable_payload_is_quarantined() {
    let temp = TempDir::new().unwrap();
    let config = test_config(&temp);
    let source_file = config.watcher.source_directory.join("broken.jpg");
    std::fs::write(&source_file, b"this is not a jpeg").unwrap();

    let watcher = Watcher::new(&config);
    watcher.dispatch(&source_file);

    assert!(!source_file.exists(), "failed file must leave the source");
    let quarantined = config.watcher.quarantine_directory.join("broken.jpg");
    assert!(quarantined.exists(), "failed file must land in quarantine");
    assert_eq!(
        std::fs::read(&quarantined).unwrap(),
        b"this is not a jpeg",
        "quarantined contents are untouched"
    );
    assert!(!config.watcher.target_directory.join("broken.jpg").exists());
}

#[test]
fn test_missing_font_quarantines_decodable_file() {
    let temp = TempDir::new().unwrap();
    let mut config = test_config(&temp);
    config.watermark.font_path = temp.path().join("no-such-font.ttf");

    let source_file = config.watcher.source_directory.join("photo.jpg");
    let img = RgbImage::from_pixel(64, 48, Rgb([120, 80, 40]));
    img.save(&source_file).unwrap();

    let watcher = Watcher::new(&config);
    watcher.dispatch(&source_file);

    assert!(!source_file.exists());
    assert!(
        config
            .watcher
            .quarantine_directory
            .join("photo.jpg")
            .exists()
    );
    assert!(!config.watcher.target_directory.join("photo.jpg").exists());
}

#[test]
fn test_successful_processing_moves_file_to_target() {
    let Some(font) = find_font() else { return };
    let temp = TempDir::new().unwrap();
    let mut config = test_config(&temp);
    config.watermark.font_path = font;

    let source_file = config.watcher.source_directory.join("photo.jpg");
    let img = RgbImage::from_pixel(400, 300, Rgb([60, 120, 180]));
    img.save(&source_file).unwrap();

    let watcher = Watcher::new(&config);
    watcher.dispatch(&source_file);

    let target_file = config.watcher.target_directory.join("photo.jpg");
    assert!(target_file.exists(), "output must land in the target folder");
    assert!(!source_file.exists(), "source must be deleted on success");
    assert!(
        !config
            .watcher
            .quarantine_directory
            .join("photo.jpg")
            .exists(),
        "successful files never reach quarantine"
    );

    // 400px wide source scales the 400px base band to 40px
    let output = image::open(&target_file).unwrap();
    assert_eq!(output.dimensions(), (400, 300 + 40));
}

#[test]
fn test_output_band_carries_swatch_colors() {
    let Some(font) = find_font() else { return };
    let temp = TempDir::new().unwrap();
    let mut config = test_config(&temp);
    config.watermark.font_path = font;

    // Solid source: the whole palette clusters to one color
    let source_file = config.watcher.source_directory.join("red.jpg");
    let img = RgbImage::from_pixel(1000, 800, Rgb([200, 30, 30]));
    img.save(&source_file).unwrap();

    let watcher = Watcher::new(&config);
    watcher.dispatch(&source_file);

    let output = image::open(config.watcher.target_directory.join("red.jpg"))
        .unwrap()
        .to_rgb8();
    // Band height 100 at this width; swatch row sits near the bottom center
    let probe = output.get_pixel(500, 800 + 100 - 20);
    assert!(
        probe[0] > 100 && probe[0] > probe[1],
        "expected a reddish swatch pixel, got {:?}",
        probe
    );
}
