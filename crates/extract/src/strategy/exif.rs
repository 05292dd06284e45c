//! Embedded camera metadata (EXIF).

use crate::date::{CaptureDate, Provenance};
use crate::error::Result;
use crate::media::MediaKind;
use crate::strategy::{DateStrategy, Probe};
use exif::{In, Reader, Tag, Value};
use std::io::Cursor;

/// EXIF date tags in decreasing order of trustworthiness.
///
/// `DateTimeOriginal` is when the shutter fired; `DateTimeDigitized` when the
/// image was scanned or converted; plain `DateTime` is the file's own
/// modification stamp and often rewritten by editing software.
const DATE_TAGS: [Tag; 3] = [Tag::DateTimeOriginal, Tag::DateTimeDigitized, Tag::DateTime];

/// Reads the capture date from an image's EXIF block.
pub struct ExifStrategy;

impl DateStrategy for ExifStrategy {
    fn provenance(&self) -> Provenance {
        Provenance::CameraMetadata
    }

    fn applies_to(&self, kind: MediaKind) -> bool {
        kind == MediaKind::Image
    }

    fn extract(&self, probe: &Probe<'_>) -> Result<Option<CaptureDate>> {
        let Some(bytes) = probe.bytes else {
            return Ok(None);
        };
        let mut cursor = Cursor::new(bytes);
        let parsed = match Reader::new().read_from_container(&mut cursor) {
            Ok(parsed) => parsed,
            // Most images simply carry no EXIF segment at all.
            Err(_) => return Ok(None),
        };
        for tag in DATE_TAGS {
            let Some(field) = parsed.get_field(tag, In::PRIMARY) else {
                continue;
            };
            let Value::Ascii(ref ascii) = field.value else {
                continue;
            };
            let Some(raw) = ascii.first() else {
                continue;
            };
            if let Ok(datetime) = exif::DateTime::from_ascii(raw) {
                return CaptureDate::new(datetime.year, datetime.month, datetime.day).map(Some);
            }
        }
        Ok(None)
    }
}
