/// Preview loading for the displayed image
///
/// Decodes the current image off the UI thread and hands back an iced
/// image handle, downscaled so that navigating a folder of full-size
/// photos stays responsive.

use std::path::{Path, PathBuf};

use iced::widget::image::Handle;
use image::imageops::FilterType;

/// Longest edge of the decoded preview, in pixels.
const PREVIEW_SIZE: u32 = 1600;

/// Load a preview for one image.
/// Runs in a background thread to avoid blocking the UI.
pub async fn load_preview(path: PathBuf) -> Result<Handle, String> {
    tokio::task::spawn_blocking(move || load_preview_blocking(&path))
        .await
        .map_err(|e| format!("Task join error: {}", e))?
}

/// Blocking version of preview loading
fn load_preview_blocking(path: &Path) -> Result<Handle, String> {
    let decoded = image::open(path)
        .map_err(|e| format!("Failed to decode {}: {}", path.display(), e))?;

    // Downscale only when the photo is larger than the preview size.
    let preview = if decoded.width() > PREVIEW_SIZE || decoded.height() > PREVIEW_SIZE {
        decoded.resize(PREVIEW_SIZE, PREVIEW_SIZE, FilterType::Lanczos3)
    } else {
        decoded
    };

    let rgba = preview.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(Handle::from_rgba(width, height, rgba.into_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let result = load_preview(PathBuf::from("/nonexistent/photo.jpg")).await;
        assert!(result.is_err());
    }
}
