use axum::extract::Query;
use axum::http::Uri;
use uuid::Uuid;

use axum_marketplace_api::routes::params::{OrderListQuery, ProductQuery, SortOrder};

// Pagination must survive real query-string deserialization, not just
// direct struct construction.
#[test]
fn product_listing_query_parses_pagination() {
    let admin_id = Uuid::new_v4();
    let uri: Uri = format!(
        "/api/products?admin_id={admin_id}&page=2&per_page=10&category=Fashion"
    )
    .parse()
    .unwrap();

    let Query(query) = Query::<ProductQuery>::try_from_uri(&uri).unwrap();
    assert_eq!(query.admin_id, admin_id);
    assert_eq!(query.page, Some(2));
    assert_eq!(query.per_page, Some(10));
    assert_eq!(query.category.as_deref(), Some("Fashion"));
    assert_eq!(query.pagination().normalize(), (2, 10, 10));
}

#[test]
fn product_listing_query_defaults_without_pagination() {
    let admin_id = Uuid::new_v4();
    let uri: Uri = format!("/api/products?admin_id={admin_id}").parse().unwrap();

    let Query(query) = Query::<ProductQuery>::try_from_uri(&uri).unwrap();
    assert_eq!(query.page, None);
    assert_eq!(query.per_page, None);
    assert_eq!(query.pagination().normalize(), (1, 20, 0));
}

#[test]
fn order_listing_query_parses_filters_and_pagination() {
    let uri: Uri = "/api/orders?status=pending&sort_order=asc&page=3&per_page=5"
        .parse()
        .unwrap();

    let Query(query) = Query::<OrderListQuery>::try_from_uri(&uri).unwrap();
    assert_eq!(query.status.as_deref(), Some("pending"));
    assert!(matches!(query.sort_order, Some(SortOrder::Asc)));
    assert_eq!(query.pagination().normalize(), (3, 5, 10));
}
