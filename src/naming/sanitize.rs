/// Text cleaning for filename components
///
/// Free text (a typed description, a geocoded place name) can contain
/// anything; filenames cannot. Every character outside the allowed set is
/// replaced with a substitute character, then the result is trimmed.

/// Replacement for characters that are not allowed in a filename component.
const SUBSTITUTE: char = '_';

/// Clean a text fragment for use inside a filename.
///
/// Allowed characters are alphanumerics, space, hyphen and underscore.
/// Everything else becomes `SUBSTITUTE`. Leading and trailing whitespace
/// is trimmed afterwards, so the function is idempotent:
/// `sanitize(sanitize(x)) == sanitize(x)` for any input.
pub fn sanitize(text: &str) -> String {
    let replaced: String = text
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == ' ' || c == '-' || c == '_' {
                c
            } else {
                SUBSTITUTE
            }
        })
        .collect();

    replaced.trim().to_string()
}
