/// Proposed-filename composition
///
/// Maps the annotation fields of one image to its target filename. This is
/// a pure function: identical inputs always produce the identical string,
/// and nothing here reads session state.

use chrono::NaiveDate;

use super::sanitize::sanitize;

/// Compose a filename from the annotation fields.
///
/// Tokens are emitted in the fixed order date, prefix, city, description
/// and joined with single spaces:
/// - the date token is `YYYY MM DD`, present only when a date exists and
///   `include_date` is set (it never becomes an empty placeholder)
/// - prefix and city are sanitized and emitted only when their toggle is
///   set and the sanitized value is non-empty
/// - the description is sanitized and emitted whenever non-empty
///
/// The lower-cased original extension (with its leading dot) is appended
/// unchanged.
#[allow(clippy::too_many_arguments)]
pub fn compose(
    date: Option<NaiveDate>,
    prefix: &str,
    city: &str,
    description: &str,
    include_date: bool,
    include_prefix: bool,
    include_location: bool,
    extension: &str,
) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(4);

    if include_date {
        if let Some(date) = date {
            parts.push(date.format("%Y %m %d").to_string());
        }
    }

    if include_prefix {
        let prefix = sanitize(prefix);
        if !prefix.is_empty() {
            parts.push(prefix);
        }
    }

    if include_location {
        let city = sanitize(city);
        if !city.is_empty() {
            parts.push(city);
        }
    }

    let description = sanitize(description);
    if !description.is_empty() {
        parts.push(description);
    }

    format!("{}{}", parts.join(" "), extension.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_date() -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2023, 9, 15)
    }

    #[test]
    fn test_all_fields_included() {
        let name = compose(
            sample_date(),
            "Vacation",
            "New York",
            "Central Park",
            true,
            true,
            true,
            ".jpg",
        );
        assert_eq!(name, "2023 09 15 Vacation New York Central Park.jpg");
    }

    #[test]
    fn test_location_toggle_removes_only_its_token() {
        let name = compose(
            sample_date(),
            "Vacation",
            "New York",
            "Central Park",
            true,
            true,
            false,
            ".jpg",
        );
        assert_eq!(name, "2023 09 15 Vacation Central Park.jpg");
    }

    #[test]
    fn test_date_toggle_removes_only_its_token() {
        let name = compose(
            sample_date(),
            "Vacation",
            "New York",
            "Central Park",
            false,
            true,
            true,
            ".jpg",
        );
        assert_eq!(name, "Vacation New York Central Park.jpg");
    }

    #[test]
    fn test_absent_date_is_omitted_entirely() {
        let name = compose(None, "", "", "beach", true, true, true, ".png");
        assert_eq!(name, "beach.png");
    }

    #[test]
    fn test_empty_toggled_fields_produce_no_token() {
        // A toggle that is on but whose sanitized value is empty must not
        // leave a stray separator behind.
        let name = compose(sample_date(), "  ", "   ", "sunset", true, true, true, ".jpg");
        assert_eq!(name, "2023 09 15 sunset.jpg");
    }

    #[test]
    fn test_extension_is_lowercased() {
        let name = compose(None, "", "", "scan", true, true, true, ".JPG");
        assert_eq!(name, "scan.jpg");
    }

    #[test]
    fn test_deterministic() {
        let a = compose(sample_date(), "p", "c", "d", true, true, true, ".jpg");
        let b = compose(sample_date(), "p", "c", "d", true, true, true, ".jpg");
        assert_eq!(a, b);
    }

    #[test]
    fn test_fields_are_sanitized() {
        let name = compose(None, "trip:2023", "Sao/Paulo", "what?", true, true, true, ".jpg");
        assert_eq!(name, "trip_2023 Sao_Paulo what_.jpg");
    }
}
