// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]

use super::*;
use chrono::{TimeZone, Utc};
use serde_json::json;
use similar_asserts::assert_eq;
use yare::parameterized;

fn schema() -> Schema {
    Schema::builder("workitems")
        .text("title")
        .text("status")
        .rich("description")
        .timestamp("created")
        .to_one("author")
        .to_many("assignee")
        .build()
        .unwrap()
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

// ========== Attributes ==========

#[test]
fn encode_merges_known_and_dynamic_fields() {
    let schema = schema();
    let codec = Codec::new(&schema);
    let mut attrs = AttributeSet::new();
    attrs.set("title", "Foo");
    attrs.set_dynamic("priority", json!("high"));

    let wire = codec.encode_attributes(&attrs).unwrap();

    assert_eq!(Value::Object(wire), json!({"title": "Foo", "priority": "high"}));
}

#[test]
fn encode_resource_nests_attributes() {
    let schema = schema();
    let codec = Codec::new(&schema);
    let resource = Resource::new("workitems")
        .with_field("title", "Foo")
        .with_dynamic("priority", json!("high"));

    let wire = codec.encode_resource(&resource).unwrap();

    assert_eq!(
        wire,
        json!({
            "type": "workitems",
            "attributes": {"title": "Foo", "priority": "high"}
        })
    );
}

#[test]
fn decode_routes_unknown_keys_to_dynamic_bag() {
    let schema = schema();
    let codec = Codec::new(&schema);
    let wire = object(json!({
        "title": "Crash on save",
        "severity": 3,
        "blocking": true,
        "estimate": {"value": 2, "unit": "d"},
    }));

    let attrs = codec.decode_attributes(&wire).unwrap();

    assert_eq!(attrs.text("title"), Some("Crash on save"));
    assert_eq!(attrs.dynamic("severity"), Some(&json!(3)));
    assert_eq!(attrs.dynamic("blocking"), Some(&json!(true)));
    assert_eq!(
        attrs.dynamic("estimate"),
        Some(&json!({"value": 2, "unit": "d"}))
    );
    assert!(attrs.dynamic("title").is_none());
    assert_eq!(attrs.len(), 4);
}

#[test]
fn dynamic_key_shadowing_known_field_fails() {
    let schema = schema();
    let codec = Codec::new(&schema);
    let mut attrs = AttributeSet::new();
    attrs.set("title", "Foo");
    attrs.set_dynamic("title", json!("Bar"));

    let err = codec.encode_attributes(&attrs).unwrap_err();

    assert!(matches!(err, Error::FieldCollision { ref field } if field == "title"));
}

#[test]
fn dynamic_key_shadowing_unset_known_field_still_fails() {
    let schema = schema();
    let codec = Codec::new(&schema);
    let mut attrs = AttributeSet::new();
    attrs.set_dynamic("status", json!("open"));

    assert!(matches!(
        codec.encode_attributes(&attrs),
        Err(Error::FieldCollision { .. })
    ));
}

#[test]
fn known_field_missing_from_schema_fails() {
    let schema = schema();
    let codec = Codec::new(&schema);
    let mut attrs = AttributeSet::new();
    attrs.set("resolution", "fixed");

    assert!(matches!(
        codec.encode_attributes(&attrs),
        Err(Error::UnknownField { ref field, .. }) if field == "resolution"
    ));
}

#[test]
fn known_field_of_wrong_kind_fails_to_encode() {
    let schema = schema();
    let codec = Codec::new(&schema);
    let mut attrs = AttributeSet::new();
    attrs.set("created", "yesterday");

    assert!(matches!(
        codec.encode_attributes(&attrs),
        Err(Error::FieldType { ref field, .. }) if field == "created"
    ));
}

#[test]
fn timestamps_and_rich_text_decode_structurally() {
    let schema = schema();
    let codec = Codec::new(&schema);
    let wire = object(json!({
        "created": "2024-03-01T12:30:00Z",
        "description": {"type": "text/html", "value": "<p>Steps</p>"},
    }));

    let attrs = codec.decode_attributes(&wire).unwrap();

    assert_eq!(
        attrs.timestamp("created"),
        Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap())
    );
    assert_eq!(
        attrs.rich("description"),
        Some(&TextContent::html("<p>Steps</p>"))
    );
}

#[test]
fn timestamp_offsets_survive_round_trip() {
    let schema = schema();
    let codec = Codec::new(&schema);
    let wire = object(json!({"created": "2024-03-01T14:30:00+02:00"}));

    let attrs = codec.decode_attributes(&wire).unwrap();
    let encoded = codec.encode_attributes(&attrs).unwrap();

    assert_eq!(
        attrs.timestamp("created"),
        Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap())
    );
    assert_eq!(encoded, wire);
}

#[parameterized(
    text_as_number = { json!({"title": 7}), "title" },
    timestamp_garbage = { json!({"created": "not a date"}), "created" },
    timestamp_as_bool = { json!({"created": false}), "created" },
    rich_as_string = { json!({"description": "plain"}), "description" },
    rich_missing_value = { json!({"description": {"type": "text/plain"}}), "description" },
)]
fn malformed_known_values_name_the_field(wire: Value, expected: &str) {
    let schema = schema();
    let codec = Codec::new(&schema);

    let err = codec.decode_attributes(&object(wire)).unwrap_err();

    assert!(matches!(err, Error::FieldType { ref field, .. } if field == expected));
}

#[test]
fn empty_and_null_known_values_keep_their_keys() {
    let schema = schema();
    let codec = Codec::new(&schema);
    let wire = object(json!({
        "title": "",
        "status": null,
        "description": {"type": "text/plain", "value": ""},
        "priority": "high",
    }));

    let attrs = codec.decode_attributes(&wire).unwrap();
    let encoded = codec.encode_attributes(&attrs).unwrap();

    assert_eq!(attrs.get("status"), Some(&FieldValue::Null));
    assert_eq!(attrs.text("title"), Some(""));
    let wire_keys: Vec<&String> = wire.keys().collect();
    let encoded_keys: Vec<&String> = encoded.keys().collect();
    assert_eq!(encoded_keys, wire_keys);
    assert_eq!(encoded, wire);
}

#[test]
fn empty_values_set_by_callers_are_not_sent() {
    let schema = schema();
    let codec = Codec::new(&schema);
    let mut attrs = AttributeSet::new();
    attrs.set("title", "");
    attrs.set("status", FieldValue::Null);
    attrs.set("description", TextContent::plain(""));

    assert!(attrs.is_empty());
    assert_eq!(codec.encode_attributes(&attrs).unwrap(), Map::new());
}

#[test]
fn null_dynamic_values_are_preserved() {
    let schema = schema();
    let codec = Codec::new(&schema);
    let wire = object(json!({"sprint": null}));

    let attrs = codec.decode_attributes(&wire).unwrap();

    assert_eq!(attrs.dynamic("sprint"), Some(&Value::Null));
    assert_eq!(codec.encode_attributes(&attrs).unwrap(), wire);
}

#[test]
fn attributes_round_trip_from_wire() {
    let schema = schema();
    let codec = Codec::new(&schema);
    let wire = object(json!({
        "title": "Foo",
        "status": "open",
        "created": "2024-03-01T12:30:00Z",
        "description": {"type": "text/plain", "value": "body"},
        "priority": "high",
        "tags": ["a", "b"],
        "points": 5,
    }));

    let encoded = codec
        .encode_attributes(&codec.decode_attributes(&wire).unwrap())
        .unwrap();

    assert_eq!(encoded, wire);
}

#[test]
fn attributes_round_trip_from_memory() {
    let schema = schema();
    let codec = Codec::new(&schema);
    let mut attrs = AttributeSet::new();
    attrs.set("title", "Foo");
    attrs.set(
        "created",
        Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap(),
    );
    attrs.set("description", TextContent::plain("body"));
    attrs.set_dynamic("custom", json!({"nested": [1, 2, {"deep": null}]}));

    let decoded = codec
        .decode_attributes(&codec.encode_attributes(&attrs).unwrap())
        .unwrap();

    assert_eq!(decoded, attrs);
}

// ========== Relationships ==========

#[test]
fn single_reference_decodes_into_reference_list() {
    let schema = schema();
    let codec = Codec::new(&schema);
    let wire = object(json!({
        "reviewer": {"data": {"type": "users", "id": "alice"}}
    }));

    let rels = codec.decode_relationships(&wire).unwrap();

    let reviewer = rels.dynamic("reviewer").unwrap();
    assert_eq!(reviewer.references().to_vec(), vec![Reference::new("users", "alice")]);
    assert_eq!(reviewer.arity(), Arity::One);
}

#[test]
fn reference_list_decodes_into_same_slot() {
    let schema = schema();
    let codec = Codec::new(&schema);
    let wire = object(json!({
        "reviewer": {"data": [
            {"type": "users", "id": "alice"},
            {"type": "users", "id": "bob"},
        ]}
    }));

    let rels = codec.decode_relationships(&wire).unwrap();

    let reviewer = rels.dynamic("reviewer").unwrap();
    assert_eq!(
        reviewer.references().to_vec(),
        vec![Reference::new("users", "alice"), Reference::new("users", "bob")]
    );
    assert_eq!(reviewer.arity(), Arity::Many);
}

#[test]
fn known_relationships_decode_into_known_partition() {
    let schema = schema();
    let codec = Codec::new(&schema);
    let wire = object(json!({
        "author": {"data": {"type": "users", "id": "alice"}},
        "assignee": {"data": []},
    }));

    let rels = codec.decode_relationships(&wire).unwrap();

    assert_eq!(
        rels.get("author").and_then(Relationship::first),
        Some(&Reference::new("users", "alice"))
    );
    assert!(rels.get("assignee").unwrap().is_empty());
    assert!(rels.dynamic_fields().is_empty());
}

#[test]
fn relationships_reencode_in_original_shape() {
    let schema = schema();
    let codec = Codec::new(&schema);
    let wire = object(json!({
        "author": {"data": {"type": "users", "id": "alice"}},
        "assignee": {"data": [{"type": "users", "id": "bob"}]},
        "parent": {"data": null},
        "watchers": {"data": [
            {"type": "users", "id": "carol"},
            {"type": "users", "id": "dave"},
        ]},
    }));

    let encoded = codec
        .encode_relationships(&codec.decode_relationships(&wire).unwrap())
        .unwrap();

    assert_eq!(encoded, wire);
}

#[parameterized(
    missing_data = { json!({"author": {"links": {}}}) },
    not_an_object = { json!({"author": "alice"}) },
    data_is_string = { json!({"author": {"data": "alice"}}) },
    reference_without_id = { json!({"author": {"data": {"type": "users"}}}) },
)]
fn malformed_relationships_fail(wire: Value) {
    let schema = schema();
    let codec = Codec::new(&schema);

    assert!(matches!(
        codec.decode_relationships(&object(wire)),
        Err(Error::FieldType { ref field, .. }) if field == "author"
    ));
}

#[test]
fn to_one_with_several_references_fails_to_encode() {
    let schema = schema();
    let codec = Codec::new(&schema);
    let mut rels = RelationshipSet::new();
    rels.set(
        "author",
        Relationship::new(
            Arity::One,
            vec![Reference::new("users", "a"), Reference::new("users", "b")],
        ),
    );

    assert!(matches!(
        codec.encode_relationships(&rels),
        Err(Error::FieldType { .. })
    ));
}

#[test]
fn dynamic_relationship_shadowing_known_fails() {
    let schema = schema();
    let codec = Codec::new(&schema);
    let mut rels = RelationshipSet::new();
    rels.set_dynamic("author", Relationship::one(Reference::new("users", "a")));

    assert!(matches!(
        codec.encode_relationships(&rels),
        Err(Error::FieldCollision { ref field }) if field == "author"
    ));
}

// ========== Resources ==========

#[test]
fn resource_round_trips_through_wire() {
    let schema = schema();
    let codec = Codec::new(&schema);
    let wire = json!({
        "type": "workitems",
        "id": "proj/WI-1",
        "revision": "42",
        "attributes": {"title": "Foo", "priority": "high"},
        "relationships": {
            "author": {"data": {"type": "users", "id": "alice"}}
        }
    });

    let resource = codec.decode_resource(&wire).unwrap();

    assert_eq!(resource.id.as_deref(), Some("proj/WI-1"));
    assert_eq!(resource.revision.as_deref(), Some("42"));
    assert_eq!(codec.encode_resource(&resource).unwrap(), wire);
}

#[test]
fn resource_without_attributes_decodes_empty() {
    let schema = schema();
    let codec = Codec::new(&schema);

    let resource = codec
        .decode_resource(&json!({"type": "workitems", "id": "1"}))
        .unwrap();

    assert!(resource.attributes.is_empty());
    assert!(resource.relationships.is_none());
}

#[parameterized(
    not_object = { json!([1, 2]) },
    missing_type = { json!({"id": "1"}) },
    numeric_id = { json!({"type": "workitems", "id": 1}) },
    attributes_list = { json!({"type": "workitems", "attributes": []}) },
    relationships_string = { json!({"type": "workitems", "relationships": "x"}) },
)]
fn malformed_resources_fail(wire: Value) {
    let schema = schema();
    let codec = Codec::new(&schema);

    assert!(matches!(
        codec.decode_resource(&wire),
        Err(Error::MalformedPayload(_))
    ));
}

#[test]
fn resource_of_other_type_is_rejected() {
    let schema = schema();
    let codec = Codec::new(&schema);

    let err = codec
        .decode_resource(&json!({"type": "users", "id": "alice"}))
        .unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { ref actual, .. } if actual == "users"));

    let err = codec.encode_resource(&Resource::new("users")).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));
}

#[test]
fn encoded_size_matches_compact_json() {
    let schema = schema();
    let codec = Codec::new(&schema);
    let resource = Resource::new("workitems").with_field("title", "Foo");

    let expected = r#"{"attributes":{"title":"Foo"},"type":"workitems"}"#.len();
    assert_eq!(codec.encoded_size(&resource).unwrap(), expected);
}

// ========== Documents ==========

#[test]
fn empty_document_matches_envelope() {
    let schema = schema();
    let codec = Codec::new(&schema);

    let doc = codec.encode_document(&[]).unwrap();

    assert_eq!(serde_json::to_string(&doc).unwrap(), DOCUMENT_ENVELOPE.to_string());
}

#[test]
fn document_errors_carry_item_index() {
    let schema = schema();
    let codec = Codec::new(&schema);
    let resources = vec![
        Resource::new("workitems").with_field("title", "ok"),
        Resource::new("workitems").with_dynamic("title", json!("clash")),
    ];

    let err = codec.encode_document(&resources).unwrap_err();

    assert!(matches!(err, Error::Item { index: 1, .. }));
}

#[parameterized(
    list = { json!({"data": [
        {"type": "workitems", "id": "1"},
        {"type": "workitems", "id": "2"},
    ]}), 2 },
    single = { json!({"data": {"type": "workitems", "id": "1"}}), 1 },
    null = { json!({"data": null}), 0 },
)]
fn decode_document_accepts_any_data_shape(wire: Value, expected: usize) {
    use similar_asserts::assert_eq;

    let schema = schema();
    let codec = Codec::new(&schema);

    assert_eq!(codec.decode_document(&wire).unwrap().len(), expected);
}

#[test]
fn decode_document_without_data_fails() {
    let schema = schema();
    let codec = Codec::new(&schema);

    assert!(matches!(
        codec.decode_document(&json!({"errors": []})),
        Err(Error::MalformedPayload(_))
    ));
}

// ========== Change sets ==========

#[test]
fn change_set_body_carries_only_changes_and_clears() {
    let schema = schema();
    let codec = Codec::new(&schema);
    let resource = Resource::new("workitems")
        .with_id("proj/WI-1")
        .with_revision("7")
        .with_field("title", "Old");
    let mut changes = ChangeSet::new();
    changes.attributes_mut().set("title", "New");
    changes.clear_attribute("status").unwrap();
    changes.clear_relationship("assignee").unwrap();
    changes.clear_relationship("author").unwrap();

    let body = codec.encode_change_set(&resource, &changes).unwrap();

    assert_eq!(
        body,
        json!({
            "data": {
                "type": "workitems",
                "id": "proj/WI-1",
                "revision": "7",
                "attributes": {"title": "New", "status": null},
                "relationships": {
                    "assignee": {"data": []},
                    "author": {"data": null},
                }
            }
        })
    );
}

#[test]
fn change_set_for_unsaved_resource_fails() {
    let schema = schema();
    let codec = Codec::new(&schema);
    let mut changes = ChangeSet::new();
    changes.attributes_mut().set("title", "New");

    assert!(matches!(
        codec.encode_change_set(&Resource::new("workitems"), &changes),
        Err(Error::MissingId { .. })
    ));
}

// ========== Responses ==========

#[test]
fn merge_response_takes_server_identity_and_keeps_local_dynamic() {
    let schema = schema();
    let codec = Codec::new(&schema);
    let mut resource = Resource::new("workitems")
        .with_field("title", "Foo")
        .with_dynamic("draft_note", json!("local only"));
    let response = json!({
        "type": "workitems",
        "id": "proj/WI-9",
        "revision": "1",
        "attributes": {
            "title": "Foo",
            "created": "2024-03-01T12:30:00Z",
            "priority": "high",
        },
        "relationships": {
            "author": {"data": {"type": "users", "id": "alice"}}
        }
    });

    codec.merge_response(&mut resource, &response).unwrap();

    assert_eq!(resource.id.as_deref(), Some("proj/WI-9"));
    assert_eq!(resource.revision.as_deref(), Some("1"));
    assert!(resource.attributes.timestamp("created").is_some());
    assert_eq!(resource.attributes.dynamic("priority"), Some(&json!("high")));
    assert_eq!(
        resource.attributes.dynamic("draft_note"),
        Some(&json!("local only"))
    );
    assert_eq!(
        resource
            .relationships
            .as_ref()
            .and_then(|r| r.get("author"))
            .and_then(Relationship::first),
        Some(&Reference::new("users", "alice"))
    );
}
