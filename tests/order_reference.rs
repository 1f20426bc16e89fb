use std::collections::HashSet;

use axum_marketplace_api::reference::{SUFFIX_LEN, encode_base36, new_order_reference};

#[test]
fn reference_matches_expected_format() {
    let reference = new_order_reference("ORD");
    let parts: Vec<&str> = reference.split('-').collect();
    assert_eq!(parts.len(), 3, "reference was {reference}");
    assert_eq!(parts[0], "ORD");
    assert!(
        parts[1].chars().all(|c| c.is_ascii_digit()),
        "timestamp segment was {}",
        parts[1]
    );
    assert_eq!(parts[2].len(), SUFFIX_LEN);
    assert!(
        parts[2]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()),
        "suffix segment was {}",
        parts[2]
    );
}

#[test]
fn references_are_distinct() {
    let mut seen = HashSet::new();
    for _ in 0..1000 {
        assert!(seen.insert(new_order_reference("ORD")));
    }
}

#[test]
fn base36_encoding_is_fixed_width() {
    assert_eq!(encode_base36(0, 6), "000000");
    assert_eq!(encode_base36(35, 2), "0Z");
    assert_eq!(encode_base36(36, 2), "10");
    // Only the low digits survive a narrow width.
    assert_eq!(encode_base36(36 * 36 + 5, 2), "05");
}
