//! Story catalog: the read-only data a viewing session plays.
//!
//! A [`StoryCatalog`] can only be built through validation, so every value of
//! the type satisfies the playback contract: at least one user, every user has
//! at least one item, every item has a positive duration, and user ids and
//! item ids are each unique. The session's advance logic relies on this and
//! never re-checks it.

use std::{collections::HashSet, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Kind of media a story item shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// Still image.
    Image,
    /// Video clip.
    Video,
}

/// One timed story item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryItem {
    /// Item identifier, unique within the catalog.
    pub id: String,
    /// Opaque reference the render layer resolves to media.
    pub media_ref: String,
    /// Image or video.
    pub media_kind: MediaKind,
    /// Playback duration in milliseconds. Strictly positive.
    pub duration_ms: u64,
}

impl StoryItem {
    /// Image item with the given duration.
    pub fn image(id: impl Into<String>, media_ref: impl Into<String>, duration_ms: u64) -> Self {
        Self { id: id.into(), media_ref: media_ref.into(), media_kind: MediaKind::Image, duration_ms }
    }

    /// Video item with the given duration.
    pub fn video(id: impl Into<String>, media_ref: impl Into<String>, duration_ms: u64) -> Self {
        Self { id: id.into(), media_ref: media_ref.into(), media_kind: MediaKind::Video, duration_ms }
    }

    /// Playback duration.
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// All stories of one user, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStories {
    /// User identifier, unique within the catalog.
    pub id: String,
    /// Name shown in the page header.
    pub display_name: String,
    /// Opaque avatar reference.
    pub avatar_ref: String,
    /// Items in display order.
    pub items: Vec<StoryItem>,
}

impl UserStories {
    /// Create a user entry.
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        avatar_ref: impl Into<String>,
        items: Vec<StoryItem>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            avatar_ref: avatar_ref.into(),
            items,
        }
    }
}

/// Validated, ordered sequence of users. One user per pager page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<UserStories>", into = "Vec<UserStories>")]
pub struct StoryCatalog {
    users: Vec<UserStories>,
}

impl StoryCatalog {
    /// Validate and wrap a list of users.
    ///
    /// # Errors
    ///
    /// - `CatalogError::Empty` if there are no users
    /// - `CatalogError::EmptyUser` if a user has no items
    /// - `CatalogError::ZeroDuration` if an item has `duration_ms == 0`
    /// - `CatalogError::DuplicateUser` if two users share an id
    /// - `CatalogError::DuplicateItem` if two items share an id
    pub fn new(users: Vec<UserStories>) -> Result<Self, CatalogError> {
        if users.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen_users = HashSet::with_capacity(users.len());
        let mut seen_items = HashSet::new();
        for user in &users {
            if !seen_users.insert(user.id.as_str()) {
                return Err(CatalogError::DuplicateUser(user.id.clone()));
            }

            let repeated = user.items.iter().find(|item| !seen_items.insert(item.id.as_str()));
            if let Some(item) = repeated {
                return Err(CatalogError::DuplicateItem {
                    user_id: user.id.clone(),
                    item_id: item.id.clone(),
                });
            }

            if user.items.is_empty() {
                return Err(CatalogError::EmptyUser { user_id: user.id.clone() });
            }

            if let Some(item) = user.items.iter().find(|item| item.duration_ms == 0) {
                return Err(CatalogError::ZeroDuration {
                    user_id: user.id.clone(),
                    item_id: item.id.clone(),
                });
            }
        }

        Ok(Self { users })
    }

    /// Number of users (pages).
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Always `false`: an empty catalog cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Whether `page` names a user in this catalog.
    pub fn has_page(&self, page: usize) -> bool {
        page < self.users.len()
    }

    /// All users in display order.
    pub fn users(&self) -> &[UserStories] {
        &self.users
    }

    /// User at `page`. `None` if out of range.
    pub fn user(&self, page: usize) -> Option<&UserStories> {
        self.users.get(page)
    }

    /// Items of the user at `page`. `None` if out of range.
    pub fn items(&self, page: usize) -> Option<&[StoryItem]> {
        self.users.get(page).map(|user| user.items.as_slice())
    }

    /// Item `item` of the user at `page`. `None` if either is out of range.
    pub fn item(&self, page: usize, item: usize) -> Option<&StoryItem> {
        self.items(page).and_then(|items| items.get(item))
    }

    /// Copy of this catalog with one item's duration replaced.
    ///
    /// Hosts use this for video items once the true clip length is known,
    /// before handing the catalog to a session. The override is validated
    /// like any other duration.
    ///
    /// # Errors
    ///
    /// - `CatalogError::UnknownItem` if no item has `item_id`
    /// - `CatalogError::ZeroDuration` if `duration_ms == 0`
    pub fn with_duration_override(
        &self,
        item_id: &str,
        duration_ms: u64,
    ) -> Result<Self, CatalogError> {
        let mut users = self.users.clone();
        let target = users
            .iter_mut()
            .flat_map(|user| user.items.iter_mut())
            .find(|item| item.id == item_id)
            .ok_or_else(|| CatalogError::UnknownItem { item_id: item_id.to_string() })?;
        target.duration_ms = duration_ms;

        Self::new(users)
    }
}

impl TryFrom<Vec<UserStories>> for StoryCatalog {
    type Error = CatalogError;

    fn try_from(users: Vec<UserStories>) -> Result<Self, Self::Error> {
        Self::new(users)
    }
}

impl From<StoryCatalog> for Vec<UserStories> {
    fn from(catalog: StoryCatalog) -> Self {
        catalog.users
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, durations: &[u64]) -> UserStories {
        let items = durations
            .iter()
            .enumerate()
            .map(|(i, &ms)| StoryItem::image(format!("{id}-{i}"), format!("img://{id}/{i}"), ms))
            .collect();
        UserStories::new(id, id.to_uppercase(), format!("avatar://{id}"), items)
    }

    #[test]
    fn accepts_well_formed_catalog() {
        let catalog = StoryCatalog::new(vec![user("ana", &[2000, 2000]), user("bo", &[2000])])
            .expect("valid catalog");

        assert_eq!(catalog.len(), 2);
        assert!(catalog.has_page(1));
        assert!(!catalog.has_page(2));
        assert_eq!(catalog.item(0, 1).map(|i| i.id.as_str()), Some("ana-1"));
        assert_eq!(catalog.item(1, 1), None);
    }

    #[test]
    fn rejects_empty_catalog() {
        assert_eq!(StoryCatalog::new(vec![]), Err(CatalogError::Empty));
    }

    #[test]
    fn rejects_user_without_items() {
        let result = StoryCatalog::new(vec![user("ana", &[1000]), user("bo", &[])]);
        assert_eq!(result, Err(CatalogError::EmptyUser { user_id: "bo".into() }));
    }

    #[test]
    fn rejects_zero_duration() {
        let result = StoryCatalog::new(vec![user("ana", &[1000, 0])]);
        assert_eq!(
            result,
            Err(CatalogError::ZeroDuration { user_id: "ana".into(), item_id: "ana-1".into() })
        );
    }

    #[test]
    fn rejects_duplicate_users() {
        let result = StoryCatalog::new(vec![user("ana", &[1000]), user("ana", &[1000])]);
        assert_eq!(result, Err(CatalogError::DuplicateUser("ana".into())));
    }

    #[test]
    fn rejects_item_ids_repeated_across_users() {
        let shared = |user_id: &str| {
            UserStories::new(user_id, user_id, "", vec![StoryItem::video("v", "vid://v", 1000)])
        };
        assert_eq!(
            StoryCatalog::new(vec![shared("ana"), shared("bo")]),
            Err(CatalogError::DuplicateItem { user_id: "bo".into(), item_id: "v".into() })
        );
    }

    #[test]
    fn rejects_item_ids_repeated_within_user() {
        let ana = UserStories::new(
            "ana",
            "Ana",
            "",
            vec![StoryItem::image("s", "img://1", 1000), StoryItem::image("s", "img://2", 1000)],
        );
        assert_eq!(
            StoryCatalog::new(vec![ana]),
            Err(CatalogError::DuplicateItem { user_id: "ana".into(), item_id: "s".into() })
        );
    }

    #[test]
    fn duration_override_replaces_single_item() {
        let catalog = StoryCatalog::new(vec![user("ana", &[1000, 1000])]).expect("valid");
        let updated = catalog.with_duration_override("ana-1", 7500).expect("known item");

        assert_eq!(updated.item(0, 0).map(|i| i.duration_ms), Some(1000));
        assert_eq!(updated.item(0, 1).map(StoryItem::duration), Some(Duration::from_millis(7500)));
        // Original is untouched
        assert_eq!(catalog.item(0, 1).map(|i| i.duration_ms), Some(1000));
    }

    #[test]
    fn duration_override_is_validated() {
        let catalog = StoryCatalog::new(vec![user("ana", &[1000])]).expect("valid");

        assert_eq!(
            catalog.with_duration_override("nope", 10),
            Err(CatalogError::UnknownItem { item_id: "nope".into() })
        );
        assert!(matches!(
            catalog.with_duration_override("ana-0", 0),
            Err(CatalogError::ZeroDuration { .. })
        ));
    }

    #[test]
    fn deserialization_goes_through_validation() {
        let mut bytes = Vec::new();
        ciborium::into_writer(&vec![user("ana", &[1000]), user("bo", &[])], &mut bytes)
            .expect("encode");

        let decoded: Result<StoryCatalog, _> = ciborium::from_reader(bytes.as_slice());
        assert!(decoded.is_err(), "catalog with an empty user must not decode");
    }
}
