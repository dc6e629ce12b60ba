use super::{EntryId, Selection, SelectionError};

/// Anything that carries an entry identifier.
pub trait HasEntryId {
    fn entry_id(&self) -> EntryId;
}

impl HasEntryId for EntryId {
    fn entry_id(&self) -> EntryId {
        *self
    }
}

impl<T: HasEntryId + ?Sized> HasEntryId for &T {
    fn entry_id(&self) -> EntryId {
        (**self).entry_id()
    }
}

/// Entries whose id lies in `[start, end]`, in collection order.
///
/// Fails with [`SelectionError::Incomplete`] unless both bounds are set.
pub fn extract_range<'a, T: HasEntryId>(
    selection: &Selection,
    entries: &'a [T],
) -> Result<Vec<&'a T>, SelectionError> {
    let (start, end) = selection.require_complete()?;
    Ok(entries
        .iter()
        .filter(|e| {
            let id = e.entry_id();
            start <= id && id <= end
        })
        .collect())
}
