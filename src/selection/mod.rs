//! Range selection over an ordered list of lore entries.
//!
//! A user marks one entry as the start of a range and another as the end.
//! [`Selection::mark`] applies a marker and keeps the pair valid
//! (`start < end` whenever both are set), [`derive_display_state`] classifies
//! each entry relative to the current selection, and [`extract_range`] pulls
//! the inclusive run of entries once both bounds are set.

pub mod display;
pub mod range;
pub mod state;

pub use display::{derive_display_state, DisplayState};
pub use range::{extract_range, HasEntryId};
pub use state::{MarkerType, Selection};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised at the selection boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// A range operation was attempted before both bounds were set.
    #[error("selection is incomplete (start: {start:?}, end: {end:?})")]
    Incomplete {
        start: Option<EntryId>,
        end: Option<EntryId>,
    },
    /// Explicit bounds that do not satisfy `start < end`.
    #[error("start {start} is not before end {end}")]
    Inverted { start: EntryId, end: EntryId },
    /// An identifier coming from the host could not be parsed.
    #[error("invalid entry id: {0:?}")]
    InvalidEntryId(String),
    #[error("unknown marker type: {0:?} (expected 'start' or 'end')")]
    InvalidMarker(String),
}

/// Numeric identifier of a lore entry (the host's `uid`).
///
/// The host hands identifiers over as strings (`data-entryid` attributes).
/// They are parsed once at the boundary so every comparison in the core is
/// numeric.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl EntryId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for EntryId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for EntryId {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| SelectionError::InvalidEntryId(s.to_string()))
    }
}
