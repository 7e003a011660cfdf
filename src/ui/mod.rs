/// User interface module
///
/// This module handles:
/// - Loading and downscaling the on-screen preview (viewer.rs)
/// - The annotation overlay drawn on top of the preview (overlay.rs)

pub mod overlay;
pub mod viewer;
