use rexif::{ExifTag, TagValue};
use tracing::trace;

/// Camera metadata used for the watermark caption, normalized from EXIF.
///
/// Absent or unparseable numeric fields are stored as 0 and render as empty
/// strings; string fields are stripped of null bytes and surrounding
/// whitespace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExifSummary {
    pub brand: String,
    pub model: String,
    pub focal_length: f64,
    pub aperture: f64,
    pub shutter_speed: f64,
    pub iso: u32,
}

impl ExifSummary {
    /// Extract a summary from raw JPEG bytes. Missing or corrupt EXIF data
    /// yields an empty summary rather than an error.
    pub fn from_jpeg_bytes(bytes: &[u8]) -> Self {
        match rexif::parse_buffer(bytes) {
            Ok(exif) => Self::from_entries(&exif),
            Err(e) => {
                trace!("No usable EXIF data: {}", e);
                Self::default()
            }
        }
    }

    fn from_entries(exif: &rexif::ExifData) -> Self {
        let mut summary = Self::default();
        for entry in &exif.entries {
            match entry.tag {
                ExifTag::Make => summary.brand = clean_string(&entry.value_more_readable),
                ExifTag::Model => summary.model = clean_string(&entry.value_more_readable),
                ExifTag::FocalLength => {
                    summary.focal_length = numeric_value(&entry.value).unwrap_or(0.0);
                }
                ExifTag::FNumber => {
                    summary.aperture = numeric_value(&entry.value).unwrap_or(0.0);
                }
                ExifTag::ExposureTime => {
                    summary.shutter_speed = numeric_value(&entry.value).unwrap_or(0.0);
                }
                ExifTag::ISOSpeedRatings => {
                    summary.iso = numeric_value(&entry.value).unwrap_or(0.0) as u32;
                }
                _ => {}
            }
        }
        summary
    }

    /// Caption line for the watermark band: the non-empty shooting parameters
    /// joined by two spaces.
    pub fn caption(&self) -> String {
        let parts = [
            self.model.clone(),
            format_focal_length(self.focal_length),
            format_aperture(self.aperture),
            format_shutter_speed(self.shutter_speed),
            format_iso(self.iso),
        ];
        parts
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("  ")
    }
}

fn clean_string(s: &str) -> String {
    s.replace('\0', "").trim().to_string()
}

fn numeric_value(value: &TagValue) -> Option<f64> {
    match value {
        TagValue::URational(v) => v.first().map(|r| {
            if r.denominator == 0 {
                0.0
            } else {
                f64::from(r.numerator) / f64::from(r.denominator)
            }
        }),
        TagValue::IRational(v) => v.first().map(|r| {
            if r.denominator == 0 {
                0.0
            } else {
                f64::from(r.numerator) / f64::from(r.denominator)
            }
        }),
        TagValue::U8(v) => v.first().map(|&x| f64::from(x)),
        TagValue::U16(v) => v.first().map(|&x| f64::from(x)),
        TagValue::U32(v) => v.first().map(|&x| f64::from(x)),
        TagValue::I16(v) => v.first().map(|&x| f64::from(x)),
        TagValue::I32(v) => v.first().map(|&x| f64::from(x)),
        TagValue::F32(v) => v.first().map(|&x| f64::from(x)),
        TagValue::F64(v) => v.first().copied(),
        _ => None,
    }
}

pub fn format_focal_length(value: f64) -> String {
    if value > 0.0 {
        format!("{}mm", value.round() as i64)
    } else {
        String::new()
    }
}

pub fn format_aperture(value: f64) -> String {
    if value > 0.0 {
        format!("f/{:.1}", value)
    } else {
        String::new()
    }
}

/// Exposures of a second or longer use the inches-style quote notation
/// (`2"`); fractional exposures render as `1/Ns`.
pub fn format_shutter_speed(value: f64) -> String {
    if value >= 1.0 {
        format!("{}\"", value.round() as i64)
    } else if value > 0.0 {
        format!("1/{}s", (1.0 / value).round() as i64)
    } else {
        String::new()
    }
}

pub fn format_iso(value: u32) -> String {
    if value > 0 {
        format!("ISO {}", value)
    } else {
        String::new()
    }
}
