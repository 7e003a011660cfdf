/// Recognition of filenames that already follow the naming convention
///
/// The reverse of the composer for the simple `YYYY MM DD <free text>` form.
/// Used only to pre-seed the annotation fields of images that were renamed
/// by an earlier session; a parsed value never overrides anything the user
/// typed.

use chrono::NaiveDate;

/// Date and description recovered from a conventional filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub date: NaiveDate,
    pub description: String,
}

/// Try to read a filename of the form `YYYY MM DD <free text>.ext`.
///
/// The extension (if any) is stripped first. The three leading tokens must
/// be zero-padded numeric fields forming a valid calendar date; everything
/// after them becomes the description (possibly empty). Returns `None` for
/// any name that does not match.
pub fn parse_filename(name: &str) -> Option<ParsedName> {
    let stem = match name.rfind('.') {
        // A leading dot is a hidden file, not an extension separator.
        Some(position) if position > 0 => &name[..position],
        _ => name,
    };

    let mut tokens = stem.splitn(4, ' ');
    let year = numeric_token(tokens.next()?, 4)?;
    let month = numeric_token(tokens.next()?, 2)?;
    let day = numeric_token(tokens.next()?, 2)?;
    let description = tokens.next().unwrap_or("").to_string();

    let date = NaiveDate::from_ymd_opt(year as i32, month, day)?;

    Some(ParsedName { date, description })
}

/// Parse a token of exactly `width` ASCII digits.
fn numeric_token(token: &str, width: usize) -> Option<u32> {
    if token.len() != width || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::compose::compose;

    #[test]
    fn test_parses_conventional_name() {
        let parsed = parse_filename("2023 09 15 Central Park.jpg").expect("should parse");
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2023, 9, 15).unwrap());
        assert_eq!(parsed.description, "Central Park");
    }

    #[test]
    fn test_parses_name_without_description() {
        let parsed = parse_filename("2023 09 15.jpg").expect("should parse");
        assert_eq!(parsed.description, "");
    }

    #[test]
    fn test_rejects_unconventional_names() {
        assert!(parse_filename("IMG_7776.jpg").is_none());
        assert!(parse_filename("holiday 2023.jpg").is_none());
        assert!(parse_filename("2023-09-15 park.jpg").is_none());
        assert!(parse_filename("23 09 15 park.jpg").is_none());
    }

    #[test]
    fn test_rejects_impossible_dates() {
        assert!(parse_filename("2023 13 01 park.jpg").is_none());
        assert!(parse_filename("2023 02 30 park.jpg").is_none());
    }

    #[test]
    fn test_round_trips_with_compose() {
        // A name the composer produced (empty prefix and city) must come
        // back out of the parser with the same date and description.
        let date = NaiveDate::from_ymd_opt(2024, 1, 5);
        let name = compose(date, "", "", "first snow", true, true, true, ".jpg");
        let parsed = parse_filename(&name).expect("composed name should parse");
        assert_eq!(Some(parsed.date), date);
        assert_eq!(parsed.description, "first snow");
        assert_eq!(
            compose(
                Some(parsed.date),
                "",
                "",
                &parsed.description,
                true,
                true,
                true,
                ".jpg"
            ),
            name
        );
    }
}
