use crate::naming::parse::parse_filename;
use crate::state::entry::ChangeEntry;

/// The Ledger holds the planned outcome for every image in the folder.
/// It is the unit of persisted intent: nothing touches the filesystem
/// during a session, and the batch emitter consumes the ledger exactly
/// once at shutdown.
#[derive(Debug, Clone)]
pub struct Ledger {
    /// One entry per image, in the initial sorted image order.
    entries: Vec<ChangeEntry>,
}

impl Ledger {
    /// Build the ledger for a sorted list of image filenames.
    ///
    /// Filenames that already follow the naming convention pre-seed their
    /// entry's date and description, so re-running the tool over its own
    /// output starts from the previous annotations.
    pub fn new(image_names: &[String]) -> Self {
        let entries = image_names
            .iter()
            .map(|name| {
                let mut entry = ChangeEntry::new(name.clone());
                if let Some(parsed) = parse_filename(name) {
                    entry.date = Some(parsed.date);
                    entry.description = parsed.description;
                }
                entry
            })
            .collect();

        Ledger { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ChangeEntry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&ChangeEntry> {
        self.entries.get(index)
    }

    pub fn entry_mut(&mut self, index: usize) -> Option<&mut ChangeEntry> {
        self.entries.get_mut(index)
    }

    /// Look an entry up by the original filename it is keyed on.
    pub fn by_original(&self, original: &str) -> Option<&ChangeEntry> {
        self.entries.iter().find(|entry| entry.original == original)
    }

    /// Entries the batch emitter will turn into a rename operation.
    pub fn rename_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| !entry.delete && entry.is_changed())
            .count()
    }

    /// Entries the batch emitter will turn into a quarantine move.
    pub fn delete_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.delete).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_one_entry_per_image_in_order() {
        let ledger = Ledger::new(&names(&["a.jpg", "b.jpg", "c.png"]));
        assert_eq!(ledger.len(), 3);
        let originals: Vec<&str> = ledger
            .entries()
            .iter()
            .map(|e| e.original.as_str())
            .collect();
        assert_eq!(originals, vec!["a.jpg", "b.jpg", "c.png"]);
    }

    #[test]
    fn test_conventional_names_pre_seed_their_entry() {
        let ledger = Ledger::new(&names(&["2023 09 15 Central Park.jpg", "IMG_1.jpg"]));

        let seeded = ledger.by_original("2023 09 15 Central Park.jpg").unwrap();
        assert_eq!(seeded.date, NaiveDate::from_ymd_opt(2023, 9, 15));
        assert_eq!(seeded.description, "Central Park");

        let untouched = ledger.by_original("IMG_1.jpg").unwrap();
        assert_eq!(untouched.date, None);
        assert_eq!(untouched.description, "");
    }

    #[test]
    fn test_counts_follow_the_emitter_rules() {
        let mut ledger = Ledger::new(&names(&["a.jpg", "b.jpg", "c.jpg"]));

        ledger.entry_mut(0).unwrap().description = "beach".to_string();
        ledger.entry_mut(0).unwrap().recompose();

        ledger.entry_mut(1).unwrap().delete = true;
        ledger.entry_mut(1).unwrap().recompose();

        assert_eq!(ledger.rename_count(), 1);
        assert_eq!(ledger.delete_count(), 1);
    }
}
