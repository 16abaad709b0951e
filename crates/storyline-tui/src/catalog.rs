//! Catalog sources for the terminal viewer.
//!
//! Either a CBOR file written by a host, or a generated demo catalog.

use std::{fs::File, io, io::BufReader, path::Path};

use rand::Rng;
use storyline_core::{CatalogError, StoryCatalog, StoryItem, UserStories};
use thiserror::Error;

/// Demo users.
pub const DEFAULT_USERS: usize = 4;

/// Upper bound of items per demo user.
pub const DEFAULT_MAX_ITEMS: usize = 4;

/// Base duration of a demo item.
pub const DEFAULT_DURATION_MS: u64 = 5000;

const NAMES: [&str; 8] = ["ana", "bo", "cleo", "dev", "eli", "fay", "gus", "hana"];

/// Every third demo item is a video.
const VIDEO_EVERY: usize = 3;

/// Catalog loading errors.
#[derive(Debug, Error)]
pub enum CatalogSourceError {
    /// Could not read the catalog file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// File is not a valid CBOR catalog.
    #[error("decode error: {0}")]
    Decode(#[from] ciborium::de::Error<io::Error>),

    /// Generated catalog failed validation.
    #[error("invalid catalog: {0}")]
    Invalid(#[from] CatalogError),
}

/// Read a CBOR-encoded catalog. Validation runs during decoding.
pub fn load_catalog(path: &Path) -> Result<StoryCatalog, CatalogSourceError> {
    let file = File::open(path)?;
    Ok(ciborium::from_reader(BufReader::new(file))?)
}

/// Shape of a generated demo catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoCatalog {
    /// Number of users (pages).
    pub users: usize,
    /// Items per user are drawn from `1..=max_items`.
    pub max_items: usize,
    /// Base item duration.
    pub duration_ms: u64,
    /// Random extra duration added per item, `0..=jitter_ms`.
    pub jitter_ms: u64,
}

impl Default for DemoCatalog {
    fn default() -> Self {
        Self {
            users: DEFAULT_USERS,
            max_items: DEFAULT_MAX_ITEMS,
            duration_ms: DEFAULT_DURATION_MS,
            jitter_ms: 0,
        }
    }
}

impl DemoCatalog {
    /// Generate the catalog.
    ///
    /// Zero users or a zero duration are passed through so validation reports
    /// them.
    pub fn build(&self, rng: &mut impl Rng) -> Result<StoryCatalog, CatalogSourceError> {
        let mut users = Vec::with_capacity(self.users);
        for u in 0..self.users {
            let name = NAMES[u % NAMES.len()];
            let count = rng.random_range(1..=self.max_items.max(1));

            let mut items = Vec::with_capacity(count);
            for i in 0..count {
                let jitter = if self.jitter_ms == 0 { 0 } else { rng.random_range(0..=self.jitter_ms) };
                let duration_ms = self.duration_ms.saturating_add(jitter);
                let id = format!("{name}-{u}-{i}");
                items.push(if i % VIDEO_EVERY == VIDEO_EVERY - 1 {
                    StoryItem::video(id, format!("vid://{name}/{i}"), duration_ms)
                } else {
                    StoryItem::image(id, format!("img://{name}/{i}"), duration_ms)
                });
            }

            users.push(UserStories::new(
                format!("{name}-{u}"),
                capitalize(name),
                format!("avatar://{name}"),
                items,
            ));
        }

        Ok(StoryCatalog::new(users)?)
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map(|first| first.to_uppercase().chain(chars).collect()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};
    use storyline_core::MediaKind;

    use super::*;

    #[test]
    fn demo_catalog_has_requested_shape() {
        let shape = DemoCatalog { users: 10, max_items: 3, duration_ms: 1500, jitter_ms: 500 };
        let catalog = shape.build(&mut StdRng::seed_from_u64(7)).expect("valid catalog");

        assert_eq!(catalog.len(), 10);
        for user in catalog.users() {
            assert!((1..=3).contains(&user.items.len()));
            for item in &user.items {
                assert!((1500..=2000).contains(&item.duration_ms));
            }
        }
        // Names wrap around but ids stay unique
        assert_eq!(catalog.users()[8].display_name, "Ana");
        assert_ne!(catalog.users()[0].id, catalog.users()[8].id);
    }

    #[test]
    fn same_seed_same_catalog() {
        let shape = DemoCatalog { jitter_ms: 1000, ..DemoCatalog::default() };
        let a = shape.build(&mut StdRng::seed_from_u64(42)).expect("valid catalog");
        let b = shape.build(&mut StdRng::seed_from_u64(42)).expect("valid catalog");
        assert_eq!(a, b);
    }

    #[test]
    fn every_third_item_is_video() {
        let shape = DemoCatalog { users: 1, max_items: 1, ..DemoCatalog::default() };
        let catalog = shape.build(&mut StdRng::seed_from_u64(0)).expect("valid catalog");
        assert_eq!(catalog.items(0).expect("page 0")[0].media_kind, MediaKind::Image);

        let shape = DemoCatalog { users: 40, ..DemoCatalog::default() };
        let catalog = shape.build(&mut StdRng::seed_from_u64(0)).expect("valid catalog");
        for user in catalog.users() {
            for (i, item) in user.items.iter().enumerate() {
                let expected = if i == 2 { MediaKind::Video } else { MediaKind::Image };
                assert_eq!(item.media_kind, expected);
            }
        }
    }

    #[test]
    fn invalid_shapes_are_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let empty = DemoCatalog { users: 0, ..DemoCatalog::default() };
        assert!(matches!(
            empty.build(&mut rng),
            Err(CatalogSourceError::Invalid(CatalogError::Empty))
        ));

        let zero = DemoCatalog { duration_ms: 0, ..DemoCatalog::default() };
        assert!(matches!(
            zero.build(&mut rng),
            Err(CatalogSourceError::Invalid(CatalogError::ZeroDuration { .. }))
        ));
    }

    #[test]
    fn load_reads_cbor_catalog() {
        let shape = DemoCatalog { users: 2, ..DemoCatalog::default() };
        let catalog = shape.build(&mut StdRng::seed_from_u64(3)).expect("valid catalog");

        let path = std::env::temp_dir().join(format!("storyline-{}.cbor", std::process::id()));
        let file = File::create(&path).expect("create");
        ciborium::into_writer(&catalog, file).expect("encode");

        let loaded = load_catalog(&path).expect("load");
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, catalog);
    }

    #[test]
    fn load_reports_missing_file() {
        let result = load_catalog(Path::new("/nonexistent/storyline.cbor"));
        assert!(matches!(result, Err(CatalogSourceError::Io(_))));
    }
}
