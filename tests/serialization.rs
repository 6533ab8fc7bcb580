//! Checks that the pure geometry types survive a `serde_json` round trip,
//! mirroring the teacher's own `serialization_tests.rs` coverage for its
//! serde-gated state types. Only compiled when the `serde` feature is on.
#![cfg(feature = "serde")]

use fensterchef::geometry::{Extents, Rect};

#[test]
fn rect_round_trips_through_json() {
    let rect = Rect::new(12, -4, 800, 600);
    let encoded = serde_json::to_string(&rect).unwrap();
    let decoded: Rect = serde_json::from_str(&encoded).unwrap();
    assert_eq!(rect, decoded);
}

#[test]
fn extents_round_trips_through_json() {
    let extents = Extents::uniform(8);
    let encoded = serde_json::to_string(&extents).unwrap();
    let decoded: Extents = serde_json::from_str(&encoded).unwrap();
    assert_eq!(extents, decoded);
}
