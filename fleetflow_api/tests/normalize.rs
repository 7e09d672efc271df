use fleetflow_api::normalize::{detect, normalize_collection, normalize_single, Envelope};
use fleetflow_api::types::{Pagination, Resource, ResourceId};
use serde_json::{json, Value};

fn nested_customers() -> Value {
    json!({
        "data": {
            "data": [{"id": 1, "name": "Acme"}],
            "current_page": 1,
            "per_page": 15,
            "total": 1,
            "from": 1,
            "to": 1,
            "last_page": 1,
            "path": "/customers",
            "first_page_url": "/customers?page=1",
            "last_page_url": "/customers?page=1",
            "prev_page_url": null,
            "next_page_url": null
        }
    })
}

#[test]
fn nested_envelope_customers() {
    let payload = nested_customers();
    assert_eq!(detect(&payload), Envelope::Nested);

    let out = normalize_collection(payload);
    assert_eq!(out.items, vec![json!({"id": 1, "name": "Acme"})]);
    assert_eq!(out.pagination.meta.total, Some(1));
    assert_eq!(out.pagination.meta.current_page, Some(1));
    assert_eq!(out.pagination.meta.per_page, Some(15));
    assert_eq!(out.pagination.meta.path.as_deref(), Some("/customers"));
    assert_eq!(out.pagination.links.first.as_deref(), Some("/customers?page=1"));
    assert_eq!(out.pagination.links.next, None);
    assert_eq!(out.pagination.links.prev, None);
    assert!(out.pagination.shows_controls());
}

#[test]
fn nested_extraction_keeps_order_and_count() {
    let items: Vec<Value> = (0..40).map(|i| json!({"id": i, "n": 40 - i})).collect();
    let payload = json!({"data": {"data": items.clone(), "total": 40}});
    let out = normalize_collection(payload);
    assert_eq!(out.items, items);
}

#[test]
fn legacy_envelope_passes_links_and_meta() {
    let payload = json!({
        "data": [{"id": "a"}, {"id": "b"}],
        "links": {"first": "/drivers?page=1", "last": "/drivers?page=3", "prev": null, "next": "/drivers?page=2"},
        "meta": {"current_page": 1, "from": 1, "to": 2, "total": 6, "last_page": 3, "per_page": 2}
    });
    assert_eq!(detect(&payload), Envelope::Legacy);

    let out = normalize_collection(payload);
    assert_eq!(out.items.len(), 2);
    assert_eq!(out.pagination.links.next.as_deref(), Some("/drivers?page=2"));
    assert!(out.pagination.has_next());
    assert!(!out.pagination.has_prev());
    assert_eq!(out.pagination.meta.last_page, Some(3));
    assert_eq!(out.pagination.summary(), "Showing 1 to 2 of 6 results");
}

#[test]
fn legacy_envelope_without_links_or_meta() {
    let out = normalize_collection(json!({"data": [{"id": 1}]}));
    assert_eq!(out.items.len(), 1);
    assert_eq!(out.pagination, Pagination::default());
}

#[test]
fn legacy_items_with_data_fields_are_not_nested() {
    // Elements that happen to carry their own `data` must not change the verdict.
    let payload = json!({
        "data": [
            {"id": 1, "data": {"data": [1, 2, 3]}},
            {"id": 2, "data": [4, 5]}
        ],
        "links": {},
        "meta": {"total": 2}
    });
    assert_eq!(detect(&payload), Envelope::Legacy);

    let out = normalize_collection(payload);
    assert_eq!(out.items.len(), 2);
    assert_eq!(out.items[0]["id"], json!(1));
    assert_eq!(out.pagination.meta.total, Some(2));
}

#[test]
fn bare_array_vehicle_types() {
    let payload = json!([{"id": "a", "name": "Truck"}]);
    assert_eq!(detect(&payload), Envelope::BareArray);

    let out = normalize_collection(payload);
    let items: Vec<Resource> = out
        .items
        .into_iter()
        .map(|v| serde_json::from_value(v).unwrap())
        .collect();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, ResourceId::from("a"));
    assert_eq!(items[0].get("name"), Some(&json!("Truck")));
    assert_eq!(out.pagination, Pagination::default());
}

#[test]
fn arrays_never_take_object_branches() {
    // An array whose first element looks like an envelope is still a bare array.
    let payload = json!([{"data": {"data": []}}, {"data": []}]);
    assert_eq!(detect(&payload), Envelope::BareArray);
    assert_eq!(normalize_collection(payload).items.len(), 2);

    assert_eq!(detect(&json!([])), Envelope::BareArray);
}

#[test]
fn unrecognized_shapes_degrade_to_empty() {
    for payload in [
        Value::Null,
        json!(5),
        json!("text"),
        json!(true),
        json!({"data": 5}),
        json!({"data": null}),
        json!({"data": {"data": 5}}),
        json!({"data": {"data": {"id": 1}}}),
        json!({"message": "ok"}),
        json!({}),
    ] {
        let out = normalize_collection(payload.clone());
        assert!(out.items.is_empty(), "items for {}", payload);
        assert_eq!(out.pagination, Pagination::default(), "pagination for {}", payload);
    }
}

#[test]
fn nested_wins_over_legacy_shape() {
    // `data` is an object holding a `data` array: nested, even with top-level links/meta.
    let payload = json!({
        "data": {"data": [{"id": 9}], "total": 1, "next_page_url": "/x?page=2"},
        "links": {"next": "/ignored"},
        "meta": {"total": 99}
    });
    assert_eq!(detect(&payload), Envelope::Nested);
    let out = normalize_collection(payload);
    assert_eq!(out.pagination.meta.total, Some(1));
    assert_eq!(out.pagination.links.next.as_deref(), Some("/x?page=2"));
}

#[test]
fn single_value_paths() {
    assert_eq!(
        normalize_single(nested_customers()),
        json!([{"id": 1, "name": "Acme"}])
    );
    assert_eq!(
        normalize_single(json!({"data": [{"id": 2}], "links": {}, "meta": {}})),
        json!([{"id": 2}])
    );
    assert_eq!(normalize_single(json!([1, 2])), json!([1, 2]));
    assert_eq!(
        normalize_single(json!({"id": 7, "code": "INV-7"})),
        json!({"id": 7, "code": "INV-7"})
    );
    assert_eq!(normalize_single(Value::Null), Value::Null);
}

#[test]
fn normalized_pagination_snapshot() {
    let out = normalize_collection(nested_customers());
    insta::assert_snapshot!(
        serde_json::to_string(&out.pagination).unwrap(),
        @r#"{"links":{"first":"/customers?page=1","last":"/customers?page=1"},"meta":{"current_page":1,"from":1,"last_page":1,"path":"/customers","per_page":15,"to":1,"total":1}}"#
    );
}
