/// Filename synthesis module
///
/// This module handles:
/// - Cleaning free text for use in filenames (sanitize.rs)
/// - Composing a proposed filename from the annotation fields (compose.rs)
/// - Recognizing filenames that already follow the naming convention (parse.rs)

pub mod compose;
pub mod parse;
pub mod sanitize;
