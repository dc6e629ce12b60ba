//! Human-readable summary of a complete selection.

use serde::Serialize;

use super::LoreBook;
use crate::selection::{extract_range, EntryId, Selection};

/// Characters of content shown per marker entry.
pub const EXCERPT_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionSummary {
    pub start_id: EntryId,
    pub end_id: EntryId,
    pub start_title: String,
    pub end_title: String,
    pub start_excerpt: String,
    pub end_excerpt: String,
    /// Number of lore entries that fall inside the range.
    pub entry_count: usize,
}

impl std::fmt::Display for SelectionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Start: Entry #{} ({})", self.start_id, self.start_title)?;
        writeln!(f, "{}", self.start_excerpt)?;
        writeln!(f)?;
        writeln!(f, "End: Entry #{} ({})", self.end_id, self.end_title)?;
        writeln!(f, "{}", self.end_excerpt)?;
        writeln!(f)?;
        write!(f, "Entries: {}", self.entry_count)
    }
}

/// Summarize the selection against `book`.
///
/// `None` while the selection is incomplete or when either marker points at
/// an entry the book does not contain.
pub fn selection_summary(selection: &Selection, book: &LoreBook) -> Option<SelectionSummary> {
    let (start, end) = selection.bounds()?;
    let start_entry = book.find(start)?;
    let end_entry = book.find(end)?;
    let entry_count = extract_range(selection, &book.entries).ok()?.len();

    Some(SelectionSummary {
        start_id: start,
        end_id: end,
        start_title: start_entry.title().to_string(),
        end_title: end_entry.title().to_string(),
        start_excerpt: excerpt(&start_entry.content),
        end_excerpt: excerpt(&end_entry.content),
        entry_count,
    })
}

/// Truncate to [`EXCERPT_CHARS`] characters, appending `...` when cut.
pub fn excerpt(content: &str) -> String {
    match content.char_indices().nth(EXCERPT_CHARS) {
        Some((byte_idx, _)) => format!("{}...", &content[..byte_idx]),
        None => content.to_string(),
    }
}
