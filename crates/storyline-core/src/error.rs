//! Error types for the Storyline core.
//!
//! Playback transitions are total and never fail. The only failures are data
//! contract violations, and those are rejected before a session starts: a
//! catalog that cannot be played is never handed to the state machines.

use thiserror::Error;

/// Catalog contract violations, detected at construction time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Catalog contains no users at all
    #[error("catalog has no users")]
    Empty,

    /// A user has no story items
    #[error("user {user_id} has no story items")]
    EmptyUser {
        /// Offending user
        user_id: String,
    },

    /// A story item has a zero duration
    #[error("item {item_id} of user {user_id} has zero duration")]
    ZeroDuration {
        /// Owner of the item
        user_id: String,
        /// Offending item
        item_id: String,
    },

    /// Two users share the same id
    #[error("duplicate user id {0}")]
    DuplicateUser(String),

    /// Two items share the same id, within one user or across users
    #[error("duplicate item id {item_id} (second seen under user {user_id})")]
    DuplicateItem {
        /// User owning the second occurrence
        user_id: String,
        /// Repeated item id
        item_id: String,
    },

    /// A duration override names an item that is not in the catalog
    #[error("no item {item_id} in catalog")]
    UnknownItem {
        /// Item id that was looked up
        item_id: String,
    },
}

impl CatalogError {
    /// Id of the user the violation was found in, if it is tied to one.
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::EmptyUser { user_id }
            | Self::ZeroDuration { user_id, .. }
            | Self::DuplicateItem { user_id, .. } => Some(user_id),
            Self::DuplicateUser(user_id) => Some(user_id),
            Self::Empty | Self::UnknownItem { .. } => None,
        }
    }
}

/// Errors raised when opening a viewing session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The page to open on does not exist in the catalog
    #[error("initial page {page} out of range for {page_count} pages")]
    InitialPageOutOfRange {
        /// Requested page
        page: usize,
        /// Pages in the catalog
        page_count: usize,
    },
}
