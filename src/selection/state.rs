use serde::{Deserialize, Serialize};

use super::{EntryId, SelectionError};

/// Which boundary of the range a marker sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerType {
    Start,
    End,
}

impl MarkerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

impl std::fmt::Display for MarkerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MarkerType {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Self::Start),
            "end" => Ok(Self::End),
            _ => Err(SelectionError::InvalidMarker(s.to_string())),
        }
    }
}

/// The current `(start, end)` marker pair.
///
/// Whenever both bounds are set, `start < end`. Values come from
/// [`Selection::mark`], [`Selection::new`] or deserialization, and the last
/// two reject pairs that break the ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSelection")]
pub struct Selection {
    start: Option<EntryId>,
    end: Option<EntryId>,
}

#[derive(Deserialize)]
struct RawSelection {
    #[serde(default)]
    start: Option<EntryId>,
    #[serde(default)]
    end: Option<EntryId>,
}

impl TryFrom<RawSelection> for Selection {
    type Error = SelectionError;

    fn try_from(raw: RawSelection) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl Selection {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a selection from explicit bounds.
    pub fn new(start: Option<EntryId>, end: Option<EntryId>) -> Result<Self, SelectionError> {
        match (start, end) {
            (Some(s), Some(e)) if s >= e => Err(SelectionError::Inverted { start: s, end: e }),
            _ => Ok(Self { start, end }),
        }
    }

    pub fn start(&self) -> Option<EntryId> {
        self.start
    }

    pub fn end(&self) -> Option<EntryId> {
        self.end
    }

    /// Both bounds set.
    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// `(start, end)` when complete.
    pub fn bounds(&self) -> Option<(EntryId, EntryId)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    pub fn require_complete(&self) -> Result<(EntryId, EntryId), SelectionError> {
        self.bounds().ok_or(SelectionError::Incomplete {
            start: self.start,
            end: self.end,
        })
    }

    /// Apply a marker to `entry` and return the resulting selection.
    ///
    /// Setting a bound first clears the opposite bound if it would no longer
    /// be strictly on the correct side, then toggles: marking the entry that
    /// already holds the bound clears it.
    pub fn mark(self, entry: EntryId, marker: MarkerType) -> Self {
        let mut next = self;
        match marker {
            MarkerType::Start => {
                if self.end.is_some_and(|end| end <= entry) {
                    next.end = None;
                }
                next.start = if self.start == Some(entry) {
                    None
                } else {
                    Some(entry)
                };
            }
            MarkerType::End => {
                if self.start.is_some_and(|start| start >= entry) {
                    next.start = None;
                }
                next.end = if self.end == Some(entry) {
                    None
                } else {
                    Some(entry)
                };
            }
        }
        next
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let show = |id: Option<EntryId>| id.map_or_else(|| "-".to_string(), |id| id.to_string());
        write!(f, "({}, {})", show(self.start), show(self.end))
    }
}
