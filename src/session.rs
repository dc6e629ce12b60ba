//! Per-session vectorization controller.
//!
//! [`VectorizationSession`] owns the selection and the entries the host has
//! shown so far. Every mark re-derives the display state of every known
//! entry; [`VectorizationSession::submit`] sends the selected range to the
//! backend. Sessions are independent values, so two lore-book panels (or two
//! tests) never share a selection.

use serde::Serialize;
use thiserror::Error;

use crate::backend::{BackendError, StoreResult, VectorBackend};
use crate::config::SemantixConfig;
use crate::lore::summary::{selection_summary, SelectionSummary};
use crate::lore::{LoreBook, LoreEntry};
use crate::notify::Notifier;
use crate::selection::{
    derive_display_state, extract_range, DisplayState, EntryId, MarkerType, Selection,
    SelectionError,
};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error("no lore entries between {start} and {end}")]
    EmptyRange { start: EntryId, end: EntryId },
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Display state of one known entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntryDisplay {
    pub id: EntryId,
    pub state: DisplayState,
}

/// Outcome of a successful store call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub start: EntryId,
    pub end: EntryId,
    pub entries: usize,
    pub result: StoreResult,
}

#[derive(Debug, Clone, Default)]
pub struct VectorizationSession {
    selection: Selection,
    known: Vec<EntryId>,
    show_notifications: bool,
}

impl VectorizationSession {
    pub fn new(show_notifications: bool) -> Self {
        Self {
            selection: Selection::empty(),
            known: Vec::new(),
            show_notifications,
        }
    }

    pub fn from_config(config: &SemantixConfig) -> Self {
        Self::new(config.module.show_notifications)
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Entries the host has reported, in the order it reported them.
    pub fn known_entries(&self) -> &[EntryId] {
        &self.known
    }

    /// Handle an entry-added notification. Repeated notifications for the
    /// same entry are ignored. Returns the entry's current display state.
    pub fn entry_added(&mut self, id: EntryId) -> DisplayState {
        if !self.known.contains(&id) {
            self.known.push(id);
        }
        derive_display_state(&self.selection, id)
    }

    pub fn entries_added(&mut self, ids: impl IntoIterator<Item = EntryId>) {
        for id in ids {
            self.entry_added(id);
        }
    }

    /// Apply a marker and return the display state of every known entry.
    pub fn mark(&mut self, id: EntryId, marker: MarkerType) -> Vec<EntryDisplay> {
        self.selection = self.selection.mark(id, marker);
        tracing::debug!(entry = %id, marker = %marker, selection = %self.selection, "marker set");
        self.display_states()
    }

    /// [`mark`](Self::mark) for identifiers and marker names as the host
    /// passes them (strings from element attributes).
    pub fn mark_raw(
        &mut self,
        id: &str,
        marker: &str,
    ) -> Result<Vec<EntryDisplay>, SelectionError> {
        let id: EntryId = id.parse()?;
        let marker: MarkerType = marker.parse()?;
        Ok(self.mark(id, marker))
    }

    pub fn display_states(&self) -> Vec<EntryDisplay> {
        self.known
            .iter()
            .map(|&id| EntryDisplay {
                id,
                state: derive_display_state(&self.selection, id),
            })
            .collect()
    }

    pub fn summary(&self, book: &LoreBook) -> Option<SelectionSummary> {
        selection_summary(&self.selection, book)
    }

    /// Clear both markers.
    pub fn reset(&mut self) -> Vec<EntryDisplay> {
        self.selection = Selection::empty();
        self.display_states()
    }

    /// Send the selected range of `book` to the backend.
    ///
    /// The selection is left as it is whether the call succeeds or fails, so
    /// the same range can be submitted again.
    pub async fn submit(
        &self,
        book: &LoreBook,
        backend: &dyn VectorBackend,
        notifier: &dyn Notifier,
    ) -> Result<Submission, SubmitError> {
        let selection = self.selection;
        let (start, end) = selection.require_complete()?;

        tracing::info!(book = %book.name, start = %start, end = %end, "processing entries");
        self.notice(notifier, |n| {
            n.info("Processing selected entries for vectorization...")
        });

        match self.store_range(&selection, book, backend).await {
            Ok((entries, result)) => {
                tracing::info!(
                    entries,
                    chunks = result.chunks_processed,
                    points = result.points_stored,
                    "vectorization complete"
                );
                self.notice(notifier, |n| {
                    n.success(&format!(
                        "Successfully processed {} chunks and stored {} vectors",
                        result.chunks_processed, result.points_stored
                    ))
                });
                Ok(Submission {
                    start,
                    end,
                    entries,
                    result,
                })
            }
            Err(e) => {
                tracing::error!(error = %e, "error processing entries");
                self.notice(notifier, |n| {
                    n.error(&format!("Failed to process entries: {e}"))
                });
                Err(e)
            }
        }
    }

    async fn store_range(
        &self,
        selection: &Selection,
        book: &LoreBook,
        backend: &dyn VectorBackend,
    ) -> Result<(usize, StoreResult), SubmitError> {
        let (start, end) = selection.require_complete()?;
        let entries: Vec<LoreEntry> = extract_range(selection, &book.entries)?
            .into_iter()
            .cloned()
            .collect();
        if entries.is_empty() {
            return Err(SubmitError::EmptyRange { start, end });
        }
        let result = backend.store(&entries).await?;
        Ok((entries.len(), result))
    }

    fn notice(&self, notifier: &dyn Notifier, f: impl FnOnce(&dyn Notifier)) {
        if self.show_notifications {
            f(notifier);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(ns: impl IntoIterator<Item = u64>) -> Vec<EntryId> {
        ns.into_iter().map(EntryId).collect()
    }

    #[test]
    fn new_session_starts_empty() {
        let session = VectorizationSession::new(true);
        assert_eq!(session.selection(), Selection::empty());
        assert!(session.known_entries().is_empty());
    }

    #[test]
    fn entry_added_is_idempotent() {
        let mut session = VectorizationSession::new(true);
        session.entry_added(EntryId(1));
        session.entry_added(EntryId(2));
        session.entry_added(EntryId(1));
        assert_eq!(session.known_entries(), ids([1, 2]).as_slice());
    }

    #[test]
    fn new_entry_reflects_current_selection() {
        let mut session = VectorizationSession::new(true);
        session.entries_added(ids(0..5));
        session.mark(EntryId(2), MarkerType::Start);
        assert_eq!(session.entry_added(EntryId(9)), DisplayState::ValidEndCandidate);
        assert_eq!(session.entry_added(EntryId(1)), DisplayState::None);
    }

    #[test]
    fn mark_rederives_every_entry() {
        let mut session = VectorizationSession::new(true);
        session.entries_added(ids(0..6));
        session.mark(EntryId(1), MarkerType::Start);
        let states = session.mark(EntryId(4), MarkerType::End);
        let got: Vec<DisplayState> = states.iter().map(|d| d.state).collect();
        use DisplayState::*;
        assert_eq!(got, vec![None, IsStart, InsideRange, InsideRange, IsEnd, None]);

        // moving the start past the end drops the end and every range mark
        let states = session.mark(EntryId(5), MarkerType::Start);
        let got: Vec<DisplayState> = states.iter().map(|d| d.state).collect();
        assert_eq!(got, vec![None, None, None, None, None, IsStart]);
    }

    #[test]
    fn mark_raw_parses_at_the_boundary() {
        let mut session = VectorizationSession::new(true);
        session.entries_added(ids([9, 10]));
        session.mark_raw("9", "start").unwrap();
        session.mark_raw("10", "end").unwrap();
        assert_eq!(session.selection().bounds(), Some((EntryId(9), EntryId(10))));

        assert!(matches!(
            session.mark_raw("ten", "end"),
            Err(SelectionError::InvalidEntryId(_))
        ));
        assert!(matches!(
            session.mark_raw("3", "middle"),
            Err(SelectionError::InvalidMarker(_))
        ));
        // failed calls leave the selection alone
        assert_eq!(session.selection().bounds(), Some((EntryId(9), EntryId(10))));
    }

    #[test]
    fn reset_clears_markers() {
        let mut session = VectorizationSession::new(true);
        session.entries_added(ids(0..3));
        session.mark(EntryId(0), MarkerType::Start);
        session.mark(EntryId(2), MarkerType::End);
        let states = session.reset();
        assert!(states.iter().all(|d| d.state == DisplayState::None));
        assert_eq!(session.selection(), Selection::empty());
    }

    #[test]
    fn sessions_are_independent() {
        let mut a = VectorizationSession::new(true);
        let b = VectorizationSession::new(true);
        a.mark(EntryId(3), MarkerType::Start);
        assert_eq!(b.selection(), Selection::empty());
    }
}
