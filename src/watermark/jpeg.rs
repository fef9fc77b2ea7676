use image::{ExtendedColorType, ImageEncoder, RgbImage, codecs::jpeg::JpegEncoder};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

use crate::error::ProcessError;

// APP1/APP2 payload identifiers
const EXIF_IDENTIFIER: &[u8] = b"Exif\0\0";
const ICC_IDENTIFIER: &[u8] = b"ICC_PROFILE\0";

/// Pull the raw APP1 Exif payload (identifier included) out of a JPEG buffer,
/// so it can be re-embedded verbatim in the output.
pub fn extract_exif_segment(buf: &[u8]) -> Option<Vec<u8>> {
    let payload = find_app_segment(buf, 0xE1, EXIF_IDENTIFIER)?;
    debug!("Found EXIF segment: {} bytes", payload.len());
    Some(payload.to_vec())
}

/// Pull the ICC profile out of a JPEG buffer. ICC profiles live in APP2
/// segments behind the ICC_PROFILE identifier and two sequence bytes.
pub fn extract_icc_profile(buf: &[u8]) -> Option<Vec<u8>> {
    let payload = find_app_segment(buf, 0xE2, ICC_IDENTIFIER)?;
    if payload.len() <= 14 {
        return None;
    }
    let icc_data = &payload[14..];
    debug!("Found ICC profile: {} bytes", icc_data.len());
    Some(icc_data.to_vec())
}

/// Walk the JPEG marker segments up to the start of entropy-coded data,
/// returning the payload of the first `marker` segment starting with
/// `identifier`.
fn find_app_segment<'a>(buf: &'a [u8], marker: u8, identifier: &[u8]) -> Option<&'a [u8]> {
    if buf.len() < 4 || buf[0] != 0xFF || buf[1] != 0xD8 {
        return None;
    }
    let mut pos = 2;
    while pos + 4 <= buf.len() {
        if buf[pos] != 0xFF {
            return None;
        }
        let kind = buf[pos + 1];
        if kind == 0xDA {
            // SOS: compressed data follows, no more metadata segments
            return None;
        }
        // Standalone markers carry no length field
        if kind == 0x01 || (0xD0..=0xD9).contains(&kind) {
            pos += 2;
            continue;
        }
        let length = usize::from(u16::from_be_bytes([buf[pos + 2], buf[pos + 3]]));
        if length < 2 || pos + 2 + length > buf.len() {
            return None;
        }
        let payload = &buf[pos + 4..pos + 2 + length];
        if kind == marker && payload.starts_with(identifier) {
            return Some(payload);
        }
        pos += 2 + length;
    }
    None
}

/// Encode the image as a quality-controlled JPEG, carrying over the source
/// file's EXIF segment verbatim and re-attaching its ICC profile if present.
pub fn save_with_metadata(
    image: &RgbImage,
    path: &Path,
    quality: u8,
    exif: Option<&[u8]>,
    icc_profile: Option<&[u8]>,
) -> Result<(), ProcessError> {
    let mut encoded = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(Cursor::new(&mut encoded), quality);
    if let Some(profile) = icc_profile
        && let Err(e) = encoder.set_icc_profile(profile.to_vec())
    {
        debug!("Could not attach ICC profile ({}), writing without it", e);
    }
    encoder.write_image(
        image,
        image.width(),
        image.height(),
        ExtendedColorType::Rgb8,
    )?;

    let output = match exif {
        Some(segment) => splice_exif_segment(&encoded, segment)?,
        None => encoded,
    };
    std::fs::write(path, output)?;
    Ok(())
}

/// Insert an APP1 Exif segment directly after SOI in an encoded JPEG.
fn splice_exif_segment(encoded: &[u8], payload: &[u8]) -> Result<Vec<u8>, ProcessError> {
    // Segment length field covers itself plus the payload and must fit u16
    if payload.len() + 2 > usize::from(u16::MAX) {
        return Err(ProcessError::ExifSegmentTooLarge(payload.len()));
    }
    if encoded.len() < 2 || encoded[0] != 0xFF || encoded[1] != 0xD8 {
        return Err(ProcessError::InvalidJpeg);
    }
    let length = (payload.len() + 2) as u16;
    let mut output = Vec::with_capacity(encoded.len() + payload.len() + 4);
    output.extend_from_slice(&[0xFF, 0xD8, 0xFF, 0xE1]);
    output.extend_from_slice(&length.to_be_bytes());
    output.extend_from_slice(payload);
    output.extend_from_slice(&encoded[2..]);
    Ok(output)
}
