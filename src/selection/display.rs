use serde::Serialize;

use super::{EntryId, Selection};

/// Visual classification of one entry relative to the selection.
///
/// Derived on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayState {
    None,
    IsStart,
    IsEnd,
    InsideRange,
    ValidStartCandidate,
    ValidEndCandidate,
}

impl DisplayState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::IsStart => "is-start",
            Self::IsEnd => "is-end",
            Self::InsideRange => "inside-range",
            Self::ValidStartCandidate => "valid-start-candidate",
            Self::ValidEndCandidate => "valid-end-candidate",
        }
    }
}

impl std::fmt::Display for DisplayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify `entry` against `selection`.
pub fn derive_display_state(selection: &Selection, entry: EntryId) -> DisplayState {
    match (selection.start(), selection.end()) {
        (Some(start), Some(end)) => {
            if entry == start {
                DisplayState::IsStart
            } else if entry == end {
                DisplayState::IsEnd
            } else if start < entry && entry < end {
                DisplayState::InsideRange
            } else {
                DisplayState::None
            }
        }
        (Some(start), None) => {
            if entry == start {
                DisplayState::IsStart
            } else if entry > start {
                DisplayState::ValidEndCandidate
            } else {
                DisplayState::None
            }
        }
        (None, Some(end)) => {
            if entry == end {
                DisplayState::IsEnd
            } else if entry < end {
                DisplayState::ValidStartCandidate
            } else {
                DisplayState::None
            }
        }
        (None, None) => DisplayState::None,
    }
}
