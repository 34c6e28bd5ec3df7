use tracker_core::{Item, ItemValidationError};

#[test]
fn item_new_has_no_identity() {
    let item = Item::new("hello");

    assert_eq!(item.id, None);
    assert_eq!(item.name, "hello");
    assert_eq!(item.created, None);
    assert!(!item.is_persisted());
}

#[test]
fn with_id_rejects_non_positive_ids() {
    assert_eq!(
        Item::with_id(0, "zero").unwrap_err(),
        ItemValidationError::NonPositiveId(0)
    );
    assert_eq!(
        Item::with_id(-4, "negative").unwrap_err(),
        ItemValidationError::NonPositiveId(-4)
    );

    let item = Item::with_id(12, "ok").unwrap();
    assert_eq!(item.id, Some(12));
    assert_eq!(item.created, None);
}

#[test]
fn item_serialization_uses_expected_wire_fields() {
    let created = chrono::DateTime::parse_from_rfc3339("2026-02-13T10:00:00.250Z")
        .unwrap()
        .with_timezone(&chrono::Utc);
    let item = Item {
        id: Some(7),
        name: "Beta Task".to_string(),
        created: Some(created),
    };

    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["id"], 7);
    assert_eq!(json["name"], "Beta Task");
    assert!(json["created"]
        .as_str()
        .unwrap()
        .starts_with("2026-02-13T10:00:00.250"));

    let decoded: Item = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, item);
    assert!(decoded.is_persisted());
}

#[test]
fn deserialize_rejects_non_positive_id() {
    let value = serde_json::json!({
        "id": 0,
        "name": "bad",
        "created": null
    });

    let err = serde_json::from_value::<Item>(value).unwrap_err();
    assert!(
        err.to_string().contains("item id must be positive, got 0"),
        "unexpected error: {err}"
    );
}
