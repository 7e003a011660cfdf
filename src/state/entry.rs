/// Shared data structures for the session state
///
/// These structs represent the planned outcome for each image. They flow
/// between the session controller, the annotation editor and the batch
/// emitter.

use chrono::NaiveDate;

use crate::naming::compose::compose;

/// Value `proposed` takes while an entry is marked for deletion.
/// Contains characters the sanitizer never lets through, so it can never
/// collide with a real composed filename.
pub const DELETE_SENTINEL: &str = "<deleted>";

/// The planned outcome for a single image
///
/// One entry per image, keyed by the original filename captured at startup.
/// The ledger keeps entries in the initial sorted image order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEntry {
    /// Immutable source filename (e.g. "IMG_7776.jpg")
    pub original: String,
    /// Last computed target name, or `DELETE_SENTINEL`
    pub proposed: String,
    /// True: ignore `proposed` and move the file to quarantine instead
    pub delete: bool,
    /// Annotation date (distinct from the raw capture timestamp)
    pub date: Option<NaiveDate>,
    pub prefix: String,
    pub city: String,
    pub description: String,
    /// Inclusion toggles; a non-empty field can still be excluded
    pub include_date: bool,
    pub include_prefix: bool,
    pub include_location: bool,
    /// Set once the user edits `city` by hand; a later geocode result
    /// must not overwrite it
    pub location_edited: bool,
    /// Set on the first commit; controls whether a visit seeds from the
    /// ledger or from fresh external lookups
    pub visited: bool,
}

impl ChangeEntry {
    /// Create an untouched entry: the proposal is the original name.
    pub fn new(original: String) -> Self {
        let proposed = original.clone();
        Self {
            original,
            proposed,
            delete: false,
            date: None,
            prefix: String::new(),
            city: String::new(),
            description: String::new(),
            include_date: true,
            include_prefix: true,
            include_location: true,
            location_edited: false,
            visited: false,
        }
    }

    /// File extension of the original name, lower-cased, with leading dot.
    /// Empty for extensionless files.
    pub fn extension(&self) -> String {
        match self.original.rfind('.') {
            Some(position) if position > 0 => self.original[position..].to_lowercase(),
            _ => String::new(),
        }
    }

    /// Recompute `proposed` from the current fields.
    ///
    /// This is the only place that writes `proposed`: either the deletion
    /// sentinel, or the composer's output for the current field values.
    /// When every token is empty or excluded the composition degenerates
    /// to the bare extension; such an entry keeps its original name so
    /// that skipping through unannotated images stays a no-op.
    pub fn recompose(&mut self) {
        if self.delete {
            self.proposed = DELETE_SENTINEL.to_string();
            return;
        }

        let composed = compose(
            self.date,
            &self.prefix,
            &self.city,
            &self.description,
            self.include_date,
            self.include_prefix,
            self.include_location,
            &self.extension(),
        );

        self.proposed = if composed == self.extension() {
            self.original.clone()
        } else {
            composed
        };
    }

    /// Clear the deletion flag and restore the proposal to the original
    /// name. The next commit recomputes it from the fields.
    pub fn undelete(&mut self) {
        self.delete = false;
        self.proposed = self.original.clone();
    }

    /// Whether the batch emitter has anything to do for this entry.
    pub fn is_changed(&self) -> bool {
        self.delete || self.proposed != self.original
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_is_unchanged() {
        let entry = ChangeEntry::new("IMG_0001.jpg".to_string());
        assert_eq!(entry.proposed, "IMG_0001.jpg");
        assert!(!entry.is_changed());
    }

    #[test]
    fn test_extension_is_lowercased() {
        let entry = ChangeEntry::new("IMG_0001.JPG".to_string());
        assert_eq!(entry.extension(), ".jpg");
    }

    #[test]
    fn test_extensionless_and_hidden_files() {
        assert_eq!(ChangeEntry::new("README".to_string()).extension(), "");
        assert_eq!(ChangeEntry::new(".hidden".to_string()).extension(), "");
    }

    #[test]
    fn test_recompose_writes_the_composed_name() {
        let mut entry = ChangeEntry::new("IMG_0001.jpg".to_string());
        entry.date = NaiveDate::from_ymd_opt(2023, 9, 15);
        entry.city = "New York".to_string();
        entry.description = "Central Park".to_string();
        entry.recompose();
        assert_eq!(entry.proposed, "2023 09 15 New York Central Park.jpg");
        assert!(entry.is_changed());
    }

    #[test]
    fn test_recompose_without_any_token_keeps_the_original_name() {
        let mut entry = ChangeEntry::new("IMG_0001.jpg".to_string());
        entry.recompose();
        assert_eq!(entry.proposed, "IMG_0001.jpg");
        assert!(!entry.is_changed());
    }

    #[test]
    fn test_delete_then_undelete_restores_original() {
        let mut entry = ChangeEntry::new("IMG_0001.jpg".to_string());
        entry.description = "park".to_string();
        entry.delete = true;
        entry.recompose();
        assert_eq!(entry.proposed, DELETE_SENTINEL);

        entry.undelete();
        assert_eq!(entry.proposed, entry.original);
        assert!(!entry.delete);
        // Everything else is untouched.
        assert_eq!(entry.description, "park");
    }
}
