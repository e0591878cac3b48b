// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Flexible attribute codec.
//!
//! Converts between wire payloads and [`Resource`]s. Wire shape:
//!
//! ```text
//! {
//!   "type": "workitems",
//!   "id": "proj/WI-1",              (optional)
//!   "revision": "1234",             (optional)
//!   "attributes": { "title": "...", "<custom>": ... },
//!   "relationships": {              (optional)
//!     "author":   { "data": { "type": "users", "id": "alice" } },
//!     "assignee": { "data": [ { "type": "users", "id": "bob" } ] }
//!   }
//! }
//! ```
//!
//! Keys declared by the [`Schema`] decode into typed known fields; every
//! other key is copied verbatim into the dynamic bag. Encoding merges both
//! partitions back into one flat object and refuses dynamic keys that would
//! shadow a known key.
//!
//! A known key the server sent as `null`, `""` or structured text with an
//! empty value is kept as such and re-encoded, so a decoded payload
//! re-encodes with the same key set. Timestamps keep their UTC offset.

use chrono::{DateTime, SecondsFormat};
use serde_json::{Map, Value};

use crate::diff::ChangeSet;
use crate::error::{Error, Result};
use crate::resource::{
    Arity, AttributeSet, FieldValue, Reference, Relationship, RelationshipSet, Resource,
    TextContent,
};
use crate::schema::{FieldKind, Schema};

/// Encoded form of an empty batch document: `{"data":[]}`.
pub const DOCUMENT_ENVELOPE: &str = r#"{"data":[]}"#;

/// Codec for one resource type, driven by its [`Schema`].
#[derive(Debug, Clone, Copy)]
pub struct Codec<'a> {
    schema: &'a Schema,
}

impl<'a> Codec<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Codec { schema }
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    // ========== Attributes ==========

    /// Splits a wire `attributes` object into known and dynamic fields.
    pub fn decode_attributes(&self, wire: &Map<String, Value>) -> Result<AttributeSet> {
        let mut attrs = AttributeSet::new();
        for (name, value) in wire {
            match self.schema.field(name) {
                Some(kind) => attrs.insert(name.clone(), decode_field(name, kind, value)?),
                None => attrs.set_dynamic(name.clone(), value.clone()),
            }
        }
        Ok(attrs)
    }

    /// Merges known and dynamic fields into one wire `attributes` object.
    ///
    /// Every stored known field is written; [`AttributeSet::set`] never
    /// stores an empty value, so only empties decoded from a payload appear.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownField`] if a known field is not declared by the schema
    /// - [`Error::FieldType`] if a known field's kind disagrees with the schema
    /// - [`Error::FieldCollision`] if a dynamic key equals a known key
    pub fn encode_attributes(&self, attrs: &AttributeSet) -> Result<Map<String, Value>> {
        let mut wire = Map::new();
        for (name, value) in attrs.known() {
            let kind = self.schema.field(name).ok_or_else(|| Error::UnknownField {
                field: name.to_string(),
                resource_type: self.schema.resource_type().to_string(),
            })?;
            wire.insert(name.to_string(), encode_field(name, kind, value)?);
        }
        for (name, value) in attrs.dynamic_fields() {
            if self.schema.is_known_field(name) || wire.contains_key(name) {
                return Err(Error::FieldCollision {
                    field: name.clone(),
                });
            }
            wire.insert(name.clone(), value.clone());
        }
        Ok(wire)
    }

    // ========== Relationships ==========

    /// Splits a wire `relationships` object into known and dynamic fields.
    ///
    /// Both `{"data": {...}}` and `{"data": [...]}` decode into the same
    /// reference-list slot.
    pub fn decode_relationships(&self, wire: &Map<String, Value>) -> Result<RelationshipSet> {
        let mut rels = RelationshipSet::new();
        for (name, value) in wire {
            let relationship = decode_relationship(name, value)?;
            if self.schema.is_known_relation(name) {
                rels.set(name.clone(), relationship);
            } else {
                rels.set_dynamic(name.clone(), relationship);
            }
        }
        Ok(rels)
    }

    pub fn encode_relationships(&self, rels: &RelationshipSet) -> Result<Map<String, Value>> {
        let mut wire = Map::new();
        for (name, relationship) in rels.known() {
            if !self.schema.is_known_relation(name) {
                return Err(Error::UnknownField {
                    field: name.to_string(),
                    resource_type: self.schema.resource_type().to_string(),
                });
            }
            wire.insert(name.to_string(), encode_relationship(name, relationship)?);
        }
        for (name, relationship) in rels.dynamic_fields() {
            if self.schema.is_known_relation(name) || wire.contains_key(name) {
                return Err(Error::FieldCollision {
                    field: name.clone(),
                });
            }
            wire.insert(name.clone(), encode_relationship(name, relationship)?);
        }
        Ok(wire)
    }

    // ========== Resources ==========

    pub fn decode_resource(&self, wire: &Value) -> Result<Resource> {
        let object = wire
            .as_object()
            .ok_or_else(|| Error::MalformedPayload("resource must be a JSON object".into()))?;

        let resource_type = match object.get("type") {
            Some(Value::String(t)) => t.clone(),
            _ => return Err(Error::MalformedPayload("resource is missing 'type'".into())),
        };
        if resource_type != self.schema.resource_type() {
            return Err(Error::TypeMismatch {
                expected: self.schema.resource_type().to_string(),
                actual: resource_type,
            });
        }

        let attributes = match object.get("attributes") {
            None | Some(Value::Null) => AttributeSet::new(),
            Some(Value::Object(map)) => self.decode_attributes(map)?,
            Some(_) => {
                return Err(Error::MalformedPayload(
                    "'attributes' must be an object".into(),
                ))
            }
        };

        let relationships = match object.get("relationships") {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(self.decode_relationships(map)?),
            Some(_) => {
                return Err(Error::MalformedPayload(
                    "'relationships' must be an object".into(),
                ))
            }
        };

        Ok(Resource {
            resource_type,
            id: optional_string(object, "id")?,
            revision: optional_string(object, "revision")?,
            attributes,
            relationships,
        })
    }

    pub fn encode_resource(&self, resource: &Resource) -> Result<Value> {
        self.check_type(resource)?;

        let mut wire = Map::new();
        wire.insert("type".into(), Value::String(resource.resource_type.clone()));
        if let Some(id) = &resource.id {
            wire.insert("id".into(), Value::String(id.clone()));
        }
        if let Some(revision) = &resource.revision {
            wire.insert("revision".into(), Value::String(revision.clone()));
        }
        wire.insert(
            "attributes".into(),
            Value::Object(self.encode_attributes(&resource.attributes)?),
        );
        if let Some(rels) = &resource.relationships {
            wire.insert(
                "relationships".into(),
                Value::Object(self.encode_relationships(rels)?),
            );
        }
        Ok(Value::Object(wire))
    }

    /// Size in bytes of the compact JSON encoding of `resource`.
    pub fn encoded_size(&self, resource: &Resource) -> Result<usize> {
        let value = self.encode_resource(resource)?;
        Ok(serde_json::to_vec(&value)?.len())
    }

    // ========== Documents ==========

    /// Wraps resources in the `{"data": [...]}` envelope used for creation.
    pub fn encode_document(&self, resources: &[Resource]) -> Result<Value> {
        let data = resources
            .iter()
            .enumerate()
            .map(|(index, r)| self.encode_resource(r).map_err(|e| e.at_item(index)))
            .collect::<Result<Vec<_>>>()?;
        Ok(serde_json::json!({ "data": data }))
    }

    /// Decodes a response document whose `data` holds one resource or a list.
    pub fn decode_document(&self, wire: &Value) -> Result<Vec<Resource>> {
        match wire.get("data") {
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(index, item)| self.decode_resource(item).map_err(|e| e.at_item(index)))
                .collect(),
            Some(Value::Null) => Ok(Vec::new()),
            Some(item @ Value::Object(_)) => Ok(vec![self.decode_resource(item)?]),
            _ => Err(Error::MalformedPayload(
                "document is missing 'data'".into(),
            )),
        }
    }

    /// Builds the PATCH body carrying only the fields of `changes`.
    ///
    /// Explicit clears encode as `null` attributes and as empty relationships
    /// in the shape the schema declares.
    pub fn encode_change_set(&self, resource: &Resource, changes: &ChangeSet) -> Result<Value> {
        self.check_type(resource)?;
        let id = resource.id.as_ref().ok_or_else(|| Error::MissingId {
            resource_type: resource.resource_type.clone(),
        })?;

        let mut attributes = self.encode_attributes(changes.attributes())?;
        for name in changes.cleared_attributes() {
            if attributes.contains_key(name) {
                return Err(Error::ConflictingClear {
                    field: name.clone(),
                });
            }
            attributes.insert(name.clone(), Value::Null);
        }

        let mut relationships = self.encode_relationships(changes.relationships())?;
        for name in changes.cleared_relationships() {
            if relationships.contains_key(name) {
                return Err(Error::ConflictingClear {
                    field: name.clone(),
                });
            }
            let empty = match self.schema.relation(name) {
                Some(Arity::Many) => Relationship::many(Vec::new()),
                _ => Relationship::none(),
            };
            relationships.insert(name.clone(), encode_relationship(name, &empty)?);
        }

        let mut data = Map::new();
        data.insert("type".into(), Value::String(resource.resource_type.clone()));
        data.insert("id".into(), Value::String(id.clone()));
        if let Some(revision) = &resource.revision {
            data.insert("revision".into(), Value::String(revision.clone()));
        }
        data.insert("attributes".into(), Value::Object(attributes));
        if !relationships.is_empty() {
            data.insert("relationships".into(), Value::Object(relationships));
        }
        Ok(serde_json::json!({ "data": Value::Object(data) }))
    }

    /// Folds a server response for `resource` back into it.
    ///
    /// The server's id, revision and fields win; local dynamic fields the
    /// server did not echo are kept.
    pub fn merge_response(&self, resource: &mut Resource, wire: &Value) -> Result<()> {
        let returned = self.decode_resource(wire)?;
        if returned.id.is_some() {
            resource.id = returned.id;
        }
        if returned.revision.is_some() {
            resource.revision = returned.revision;
        }
        resource.attributes.extend(returned.attributes);
        if let Some(rels) = returned.relationships {
            resource.relationships_mut().extend(rels);
        }
        Ok(())
    }

    fn check_type(&self, resource: &Resource) -> Result<()> {
        if resource.resource_type != self.schema.resource_type() {
            return Err(Error::TypeMismatch {
                expected: self.schema.resource_type().to_string(),
                actual: resource.resource_type.clone(),
            });
        }
        Ok(())
    }
}

fn optional_string(object: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(Error::MalformedPayload(format!("'{key}' must be a string"))),
    }
}

fn decode_field(name: &str, kind: FieldKind, value: &Value) -> Result<FieldValue> {
    if value.is_null() {
        return Ok(FieldValue::Null);
    }
    let mismatch = || Error::FieldType {
        field: name.to_string(),
        expected: kind.expected(),
    };
    let field = match kind {
        FieldKind::Text => FieldValue::Text(value.as_str().ok_or_else(mismatch)?.to_string()),
        FieldKind::Timestamp => {
            let raw = value.as_str().ok_or_else(mismatch)?;
            let ts = DateTime::parse_from_rfc3339(raw).map_err(|_| mismatch())?;
            FieldValue::Timestamp(ts)
        }
        FieldKind::Rich => {
            let text: TextContent =
                serde_json::from_value(value.clone()).map_err(|_| mismatch())?;
            FieldValue::Rich(text)
        }
    };
    Ok(field)
}

fn encode_field(name: &str, kind: FieldKind, value: &FieldValue) -> Result<Value> {
    match (kind, value) {
        (FieldKind::Text, FieldValue::Text(s)) => Ok(Value::String(s.clone())),
        (FieldKind::Timestamp, FieldValue::Timestamp(ts)) => Ok(Value::String(
            ts.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        )),
        (FieldKind::Rich, FieldValue::Rich(text)) => Ok(serde_json::to_value(text)?),
        (_, FieldValue::Null) => Ok(Value::Null),
        _ => Err(Error::FieldType {
            field: name.to_string(),
            expected: kind.expected(),
        }),
    }
}

fn decode_relationship(name: &str, value: &Value) -> Result<Relationship> {
    let mismatch = || Error::FieldType {
        field: name.to_string(),
        expected: "a relationship object with 'data'",
    };
    let data = value
        .as_object()
        .and_then(|object| object.get("data"))
        .ok_or_else(mismatch)?;

    match data {
        Value::Null => Ok(Relationship::none()),
        Value::Object(_) => Ok(Relationship::one(decode_reference(name, data)?)),
        Value::Array(items) => items
            .iter()
            .map(|item| decode_reference(name, item))
            .collect::<Result<Vec<_>>>()
            .map(Relationship::many),
        _ => Err(mismatch()),
    }
}

fn decode_reference(name: &str, value: &Value) -> Result<Reference> {
    serde_json::from_value(value.clone()).map_err(|_| Error::FieldType {
        field: name.to_string(),
        expected: "references of the form {\"type\", \"id\"}",
    })
}

fn encode_relationship(name: &str, relationship: &Relationship) -> Result<Value> {
    let data = match relationship.arity() {
        Arity::One => match relationship.references() {
            [] => Value::Null,
            [single] => serde_json::to_value(single)?,
            _ => {
                return Err(Error::FieldType {
                    field: name.to_string(),
                    expected: "at most one reference for a to-one relationship",
                })
            }
        },
        Arity::Many => serde_json::to_value(relationship.references())?,
    };
    Ok(serde_json::json!({ "data": data }))
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
