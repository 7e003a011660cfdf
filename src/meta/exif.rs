/// EXIF metadata extraction
///
/// Reads the capture date and GPS position straight from the image file
/// header. Anything missing or corrupt falls back silently: the date
/// degrades to the filesystem modification time, the position to `None`.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use exif::{Field, In, Reader, Tag, Value};

/// Capture date of an image.
///
/// Prefers the EXIF `DateTimeOriginal` tag; falls back to the file's
/// modification time when the tag is missing or unreadable. `None` only
/// when the file itself cannot be inspected at all.
pub fn capture_date(path: &Path) -> Option<NaiveDate> {
    exif_date(path).or_else(|| modification_date(path))
}

/// GPS position of an image as signed decimal degrees, if present.
pub fn gps_coordinates(path: &Path) -> Option<(f64, f64)> {
    let exif = read_exif(path)?;

    let lat = dms_to_degrees(exif.get_field(Tag::GPSLatitude, In::PRIMARY)?)?;
    let lon = dms_to_degrees(exif.get_field(Tag::GPSLongitude, In::PRIMARY)?)?;

    let lat = apply_hemisphere(lat, exif.get_field(Tag::GPSLatitudeRef, In::PRIMARY), 'S');
    let lon = apply_hemisphere(lon, exif.get_field(Tag::GPSLongitudeRef, In::PRIMARY), 'W');

    Some((lat, lon))
}

fn read_exif(path: &Path) -> Option<exif::Exif> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    Reader::new().read_from_container(&mut reader).ok()
}

fn exif_date(path: &Path) -> Option<NaiveDate> {
    let exif = read_exif(path)?;
    let field = exif.get_field(Tag::DateTimeOriginal, In::PRIMARY)?;

    let raw = match &field.value {
        Value::Ascii(items) => items.first().map(|bytes| String::from_utf8_lossy(bytes))?,
        _ => return None,
    };

    // EXIF stores "YYYY:MM:DD HH:MM:SS".
    NaiveDateTime::parse_from_str(raw.trim(), "%Y:%m:%d %H:%M:%S")
        .ok()
        .map(|timestamp| timestamp.date())
}

fn modification_date(path: &Path) -> Option<NaiveDate> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    let local: DateTime<Local> = modified.into();
    Some(local.date_naive())
}

/// Convert a degrees/minutes/seconds rational triplet to decimal degrees.
fn dms_to_degrees(field: &Field) -> Option<f64> {
    match &field.value {
        Value::Rational(parts) if parts.len() >= 3 => {
            let degrees = parts[0].to_f64();
            let minutes = parts[1].to_f64();
            let seconds = parts[2].to_f64();
            Some(degrees + minutes / 60.0 + seconds / 3600.0)
        }
        _ => None,
    }
}

/// Negate the coordinate when the hemisphere reference matches `negative`.
fn apply_hemisphere(value: f64, field: Option<&Field>, negative: char) -> f64 {
    let reference = field.and_then(|f| match &f.value {
        Value::Ascii(items) => items
            .first()
            .and_then(|bytes| bytes.first())
            .map(|&byte| byte as char),
        _ => None,
    });

    if reference == Some(negative) {
        -value
    } else {
        value
    }
}
