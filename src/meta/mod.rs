/// External metadata lookups
///
/// This module handles:
/// - EXIF capture date and GPS extraction (exif.rs)
/// - Reverse geocoding of GPS coordinates to a place name (geocode.rs)
///
/// Lookups run once per image-visit, never per frame. Every failure mode
/// degrades to an empty or fallback value; nothing in here is allowed to
/// abort a session.

use std::path::PathBuf;

pub mod exif;
pub mod geocode;

/// Everything the annotation editor can be seeded with from outside.
#[derive(Debug, Clone, Default)]
pub struct ImageMetadata {
    pub date: Option<chrono::NaiveDate>,
    pub city: String,
}

/// Load the external metadata for one image.
///
/// The EXIF read is file I/O, so it runs on the blocking pool; the geocode
/// call only happens when the file carried GPS coordinates.
pub async fn load(path: PathBuf) -> ImageMetadata {
    let exif_path = path.clone();
    let (date, gps) = tokio::task::spawn_blocking(move || {
        (
            exif::capture_date(&exif_path),
            exif::gps_coordinates(&exif_path),
        )
    })
    .await
    .unwrap_or((None, None));

    let city = match gps {
        Some((lat, lon)) => geocode::reverse_geocode(lat, lon).await,
        None => String::new(),
    };

    ImageMetadata { date, city }
}
