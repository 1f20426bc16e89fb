use chrono::Utc;
use uuid::Uuid;

use axum_marketplace_api::entity::products::Model as ProductModel;
use axum_marketplace_api::services::order_service::within_tolerance;
use axum_marketplace_api::services::payment_service::{
    base_price_candidates, resolve_base_price, to_minor_units,
};

fn product(price: f64, original_price: Option<f64>) -> ProductModel {
    let now = Utc::now().fixed_offset();
    ProductModel {
        id: Uuid::new_v4(),
        admin_id: Uuid::new_v4(),
        name: "Widget".into(),
        category: "Fashion".into(),
        description: None,
        price,
        original_price,
        adjusted_price: None,
        gateway_fee: None,
        units_available: 5,
        location_state: None,
        location_address: None,
        image_url: None,
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn current_price_wins_when_set() {
    let p = product(500.0, Some(450.0));
    assert_eq!(resolve_base_price(base_price_candidates(&p, 300.0)), 500.0);
}

#[test]
fn original_price_used_when_current_is_zero() {
    let p = product(0.0, Some(450.0));
    assert_eq!(resolve_base_price(base_price_candidates(&p, 300.0)), 450.0);
}

#[test]
fn recorded_line_price_is_last_resort() {
    let p = product(0.0, None);
    assert_eq!(resolve_base_price(base_price_candidates(&p, 300.0)), 300.0);

    let p = product(0.0, Some(0.0));
    assert_eq!(resolve_base_price(base_price_candidates(&p, 300.0)), 300.0);
}

#[test]
fn all_unusable_resolves_to_zero() {
    let p = product(0.0, None);
    assert_eq!(resolve_base_price(base_price_candidates(&p, 0.0)), 0.0);
}

#[test]
fn tolerance_band_is_absolute() {
    assert!(within_tolerance(500.0, 500.0));
    assert!(within_tolerance(500.0, 500.01));
    assert!(within_tolerance(500.005, 500.0));
    assert!(!within_tolerance(500.0, 500.02));
    // Not percentage based: a tiny absolute gap on a large amount passes,
    // the same relative gap on a small amount does not.
    assert!(!within_tolerance(1.0, 1.02));
}

#[test]
fn minor_unit_conversion_rounds() {
    assert_eq!(to_minor_units(1250.0), 125_000);
    assert_eq!(to_minor_units(10.555), 1056);
    assert_eq!(to_minor_units(0.0), 0);
}
