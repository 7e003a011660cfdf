/// Session controller
///
/// Owns the ordered image list, the current index and the change ledger,
/// and sequences one editor visit per image. Navigation wraps at both ends
/// of the list. The session performs no filename logic itself; it only
/// seeds editors and persists their results.

use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use crate::state::editor::{Direction, Editor};
use crate::state::ledger::Ledger;

/// Extensions the folder scan accepts (lower-cased comparison).
const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("no images (jpg, jpeg, png) found in {}", .0.display())]
    NoImages(PathBuf),
}

/// Scan a folder for images, sorted lexicographically by filename.
///
/// Only the folder itself is listed, not its subdirectories; the
/// quarantine subdirectory of an earlier run must not be picked up again.
pub fn discover(folder: &Path) -> Result<Vec<String>, ScanError> {
    let mut images = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Some(extension) = path.extension() else {
            continue;
        };
        let ext = extension.to_string_lossy().to_lowercase();
        if !IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            continue;
        }

        if let Some(name) = path.file_name() {
            images.push(name.to_string_lossy().to_string());
        }
    }

    images.sort();

    if images.is_empty() {
        return Err(ScanError::NoImages(folder.to_path_buf()));
    }

    Ok(images)
}

/// One run of the tool over one folder
pub struct Session {
    folder: PathBuf,
    /// Sorted image filenames, immutable after discovery
    images: Vec<String>,
    index: usize,
    ledger: Ledger,
    /// Carry-over default: seeds the prefix of entries that never held one
    last_prefix: String,
}

impl Session {
    pub fn new(folder: PathBuf, images: Vec<String>) -> Self {
        let ledger = Ledger::new(&images);
        Session {
            folder,
            images,
            index: 0,
            ledger,
            last_prefix: String::new(),
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current_name(&self) -> &str {
        &self.images[self.index]
    }

    pub fn current_path(&self) -> PathBuf {
        self.folder.join(self.current_name())
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Move to the next image, wrapping past the end.
    pub fn advance(&mut self) {
        self.index = (self.index + 1) % self.images.len();
    }

    /// Move to the previous image, wrapping past the start.
    pub fn retreat(&mut self) {
        self.index = (self.index + self.images.len() - 1) % self.images.len();
    }

    /// Start a visit of the current image: seed its entry with the carried
    /// prefix if it never held one, then build the editor from the entry.
    pub fn begin_visit(&mut self) -> Editor {
        let last_prefix = self.last_prefix.clone();
        let entry = self.ledger.entry_mut(self.index).expect("index in range");

        if !entry.visited && entry.prefix.is_empty() {
            entry.prefix = last_prefix;
        }

        Editor::from_entry(entry)
    }

    /// Persist a finished visit and move the index in the given direction.
    pub fn commit(&mut self, editor: &Editor, direction: Direction) {
        self.write_back(editor);
        match direction {
            Direction::Forward => self.advance(),
            Direction::Backward => self.retreat(),
        }
    }

    /// Persist the final visit without moving; the batch emitter runs next.
    pub fn finish(&mut self, editor: &Editor) {
        self.write_back(editor);
    }

    /// Clear the deletion flag on the current entry, restoring its
    /// proposal to the original name.
    pub fn undelete_current(&mut self) {
        if let Some(entry) = self.ledger.entry_mut(self.index) {
            entry.undelete();
        }
    }

    fn write_back(&mut self, editor: &Editor) {
        if let Some(entry) = self.ledger.entry_mut(self.index) {
            editor.write_back(entry);
            self.last_prefix = entry.prefix.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::editor::Input;

    fn session(names: &[&str]) -> Session {
        Session::new(
            PathBuf::from("/photos"),
            names.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[test]
    fn test_navigation_wraps_at_both_ends() {
        let mut s = session(&["a.jpg", "b.jpg", "c.jpg"]);
        assert_eq!(s.index(), 0);
        s.retreat();
        assert_eq!(s.index(), 2);
        s.advance();
        assert_eq!(s.index(), 0);
        s.advance();
        s.advance();
        s.advance();
        assert_eq!(s.index(), 0);
    }

    #[test]
    fn test_navigation_wraps_for_a_single_image() {
        let mut s = session(&["only.jpg"]);
        s.advance();
        assert_eq!(s.index(), 0);
        s.retreat();
        assert_eq!(s.index(), 0);
    }

    #[test]
    fn test_commit_moves_in_the_requested_direction() {
        let mut s = session(&["a.jpg", "b.jpg"]);
        let editor = s.begin_visit();
        s.commit(&editor, Direction::Forward);
        assert_eq!(s.index(), 1);

        let editor = s.begin_visit();
        s.commit(&editor, Direction::Backward);
        assert_eq!(s.index(), 0);
    }

    #[test]
    fn test_prefix_carries_over_to_unvisited_entries() {
        let mut s = session(&["a.jpg", "b.jpg"]);

        let mut editor = s.begin_visit();
        editor.apply(Input::FocusNext); // date
        editor.apply(Input::FocusNext); // prefix
        for c in "Vacation".chars() {
            editor.apply(Input::Character(c));
        }
        s.commit(&editor, Direction::Forward);

        let editor = s.begin_visit();
        assert_eq!(editor.prefix, "Vacation");
    }

    #[test]
    fn test_carried_prefix_never_overwrites_an_existing_one() {
        let mut s = session(&["a.jpg", "b.jpg"]);

        // Give b.jpg its own prefix first.
        s.advance();
        let mut editor = s.begin_visit();
        editor.apply(Input::FocusNext);
        editor.apply(Input::FocusNext);
        for c in "Own".chars() {
            editor.apply(Input::Character(c));
        }
        s.commit(&editor, Direction::Backward);

        // Confirm a.jpg with a different prefix, then revisit b.jpg.
        let mut editor = s.begin_visit();
        editor.apply(Input::FocusNext);
        editor.apply(Input::FocusNext);
        for c in "Carried".chars() {
            editor.apply(Input::Character(c));
        }
        s.commit(&editor, Direction::Forward);

        let editor = s.begin_visit();
        assert_eq!(editor.prefix, "Own");
    }

    #[test]
    fn test_edits_persist_across_revisits() {
        let mut s = session(&["a.jpg", "b.jpg"]);

        let mut editor = s.begin_visit();
        for c in "sunrise".chars() {
            editor.apply(Input::Character(c));
        }
        s.commit(&editor, Direction::Forward);

        // Come back around the wrap.
        let editor = s.begin_visit();
        s.commit(&editor, Direction::Forward);
        let editor = s.begin_visit();
        assert_eq!(editor.description, "sunrise");
    }

    #[test]
    fn test_undelete_restores_the_current_entry() {
        let mut s = session(&["a.jpg", "b.jpg"]);

        let mut editor = s.begin_visit();
        editor.apply(Input::ToggleDelete);
        s.commit(&editor, Direction::Forward);
        assert!(s.ledger().entry(0).unwrap().delete);

        s.retreat();
        s.undelete_current();
        let entry = s.ledger().entry(0).unwrap();
        assert!(!entry.delete);
        assert_eq!(entry.proposed, entry.original);
    }
}
