pub mod inject;
pub mod search;
pub mod select;
pub mod show_config;
pub mod vectorize;

use semantix::lore::LoreBook;
use semantix::selection::{EntryId, MarkerType};
use semantix::session::VectorizationSession;

/// Parse a `start:<uid>` / `end:<uid>` marker argument.
pub fn parse_mark(s: &str) -> Result<(MarkerType, EntryId), String> {
    let (marker, id) = s
        .split_once(':')
        .ok_or_else(|| format!("expected <start|end>:<uid>, got {s:?}"))?;
    let marker: MarkerType = marker.parse().map_err(|e| format!("{e}"))?;
    let id: EntryId = id.parse().map_err(|e| format!("{e}"))?;
    Ok((marker, id))
}

/// A session that has seen every entry of `book` and applied `marks` in order.
pub fn session_for(
    book: &LoreBook,
    marks: &[(MarkerType, EntryId)],
    show_notifications: bool,
) -> VectorizationSession {
    let mut session = VectorizationSession::new(show_notifications);
    session.entries_added(book.ids());
    for &(marker, id) in marks {
        session.mark(id, marker);
    }
    session
}
