//! CLI `select` command — show per-entry marker state for a lore book.

use anyhow::Result;
use std::path::Path;

use semantix::lore::LoreBook;
use semantix::selection::{DisplayState, EntryId, MarkerType};

pub fn select(book_path: &Path, marks: &[(MarkerType, EntryId)]) -> Result<()> {
    let book = LoreBook::load(book_path)?;
    let session = super::session_for(&book, marks, false);

    println!("Lore book: {} ({} entries)", book.name, book.entries.len());
    println!("Selection: {}", session.selection());
    println!();

    for display in session.display_states() {
        let title = book.find(display.id).map(|e| e.title()).unwrap_or("Untitled");
        let marker = match display.state {
            DisplayState::IsStart => "►",
            DisplayState::IsEnd => "◄",
            DisplayState::InsideRange => "│",
            _ => " ",
        };
        println!(
            "  {marker} #{:<6} {:<22} {}",
            display.id.to_string(),
            display.state.as_str(),
            title
        );
    }

    println!();
    match session.summary(&book) {
        Some(summary) => println!("{summary}"),
        None => println!(
            "No entries selected. Mark a start (start:<uid>) and an end (end:<uid>) entry."
        ),
    }

    Ok(())
}
