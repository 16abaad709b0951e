//! Per-user pointer into an ordered item sequence.

use std::num::NonZeroUsize;

use crate::catalog::StoryCatalog;

/// Outcome of moving an [`ItemCursor`].
///
/// Boundaries are explicit: running off either end never looks like a
/// successful move.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    /// Cursor now points at this item.
    Moved(usize),
    /// Already on the last item; index unchanged.
    ExhaustedForward,
    /// Already on the first item; index unchanged.
    ExhaustedBackward,
}

/// Pointer to one item of one user.
///
/// `item_index < item_count` always holds, and `item_count` is non-zero by
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemCursor {
    user_index: usize,
    item_index: usize,
    item_count: NonZeroUsize,
}

impl ItemCursor {
    /// Cursor at the first of `item_count` items.
    pub fn new(user_index: usize, item_count: NonZeroUsize) -> Self {
        Self { user_index, item_index: 0, item_count }
    }

    /// Cursor at the first item of the user at `page`. `None` if no such user.
    pub fn for_page(catalog: &StoryCatalog, page: usize) -> Option<Self> {
        let count = NonZeroUsize::new(catalog.items(page)?.len())?;
        Some(Self::new(page, count))
    }

    /// User (page) this cursor walks.
    pub fn user_index(&self) -> usize {
        self.user_index
    }

    /// Current item.
    pub fn item_index(&self) -> usize {
        self.item_index
    }

    /// Number of items of the user.
    pub fn item_count(&self) -> usize {
        self.item_count.get()
    }

    /// Whether the cursor is on the last item.
    pub fn is_last(&self) -> bool {
        self.item_index + 1 == self.item_count.get()
    }

    /// Step to the next item.
    pub fn advance(&mut self) -> CursorMove {
        if self.is_last() {
            return CursorMove::ExhaustedForward;
        }
        self.item_index += 1;
        CursorMove::Moved(self.item_index)
    }

    /// Step to the previous item.
    pub fn retreat(&mut self) -> CursorMove {
        if self.item_index == 0 {
            return CursorMove::ExhaustedBackward;
        }
        self.item_index -= 1;
        CursorMove::Moved(self.item_index)
    }

    /// Jump back to the first item.
    pub fn reset_to_first_item(&mut self) {
        self.item_index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(count: usize) -> ItemCursor {
        ItemCursor::new(0, NonZeroUsize::new(count).expect("non-zero"))
    }

    #[test]
    fn advance_stops_at_last_item() {
        let mut c = cursor(3);
        assert_eq!(c.advance(), CursorMove::Moved(1));
        assert_eq!(c.advance(), CursorMove::Moved(2));
        assert_eq!(c.advance(), CursorMove::ExhaustedForward);
        assert_eq!(c.item_index(), 2);
    }

    #[test]
    fn retreat_stops_at_first_item() {
        let mut c = cursor(2);
        assert_eq!(c.retreat(), CursorMove::ExhaustedBackward);
        assert_eq!(c.item_index(), 0);

        let _ = c.advance();
        assert_eq!(c.retreat(), CursorMove::Moved(0));
    }

    #[test]
    fn single_item_is_exhausted_both_ways() {
        let mut c = cursor(1);
        assert!(c.is_last());
        assert_eq!(c.advance(), CursorMove::ExhaustedForward);
        assert_eq!(c.retreat(), CursorMove::ExhaustedBackward);
    }

    #[test]
    fn reset_returns_to_first() {
        let mut c = cursor(4);
        let _ = c.advance();
        let _ = c.advance();
        c.reset_to_first_item();
        assert_eq!(c.item_index(), 0);
    }
}
