//! Fuzz target for catalog decoding
//!
//! Harden CBOR catalog decoding against malformed host data (MEDIUM
//! priority)
//!
//! # Strategy
//!
//! - Random bytes: completely arbitrary CBOR data
//! - Round trip: any catalog that decodes must re-encode and decode equal
//!
//! # Invariants
//!
//! - NEVER panic on malformed CBOR
//! - A decoded catalog has at least one user
//! - Every decoded user has at least one item, every item a positive duration
//! - A decoded catalog can open a viewer on page 0

#![no_main]

use std::sync::Arc;

use libfuzzer_sys::fuzz_target;
use storyline_app::{Viewer, ViewerConfig};
use storyline_core::StoryCatalog;

fuzz_target!(|data: &[u8]| {
    let Ok(catalog) = ciborium::from_reader::<StoryCatalog, _>(data) else {
        return;
    };

    assert!(!catalog.is_empty());
    for user in catalog.users() {
        assert!(!user.items.is_empty(), "user {} decoded without items", user.id);
        assert!(user.items.iter().all(|item| item.duration_ms > 0));
    }

    let mut encoded = Vec::new();
    ciborium::into_writer(&catalog, &mut encoded).expect("encoding a valid catalog");
    let decoded: StoryCatalog = ciborium::from_reader(encoded.as_slice()).expect("round trip");
    assert_eq!(decoded, catalog);

    let viewer = Viewer::<std::time::Instant>::new(Arc::new(catalog), 0, ViewerConfig::default());
    assert!(viewer.is_ok());
});
