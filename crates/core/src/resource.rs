// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Resource types: the in-memory shape of a server entity.
//!
//! A [`Resource`] splits its fields into a schema-declared, statically typed
//! portion and an open-ended dynamic portion, for both attributes
//! ([`AttributeSet`]) and references to other resources
//! ([`RelationshipSet`]).

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// A typed pointer to another resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
}

impl Reference {
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Reference {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.resource_type, self.id)
    }
}

/// Wire shape of a relationship: one object or a list of objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// `{"data": {"type": ..., "id": ...}}` or `{"data": null}`.
    One,
    /// `{"data": [{"type": ..., "id": ...}, ...]}`.
    Many,
}

/// A relationship value.
///
/// References are always held as a list, whatever the arity, so callers
/// handle single and multi-valued fields the same way. The arity is kept
/// only to re-encode the original wire shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    arity: Arity,
    references: Vec<Reference>,
}

impl Relationship {
    pub fn new(arity: Arity, references: Vec<Reference>) -> Self {
        Relationship { arity, references }
    }

    /// A to-one relationship pointing at `reference`.
    pub fn one(reference: Reference) -> Self {
        Relationship::new(Arity::One, vec![reference])
    }

    /// A to-one relationship pointing at nothing (`{"data": null}`).
    pub fn none() -> Self {
        Relationship::new(Arity::One, Vec::new())
    }

    /// A to-many relationship.
    pub fn many(references: impl IntoIterator<Item = Reference>) -> Self {
        Relationship::new(Arity::Many, references.into_iter().collect())
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    /// The single reference of a to-one relationship (or the first of a list).
    pub fn first(&self) -> Option<&Reference> {
        self.references.first()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    pub fn push(&mut self, reference: Reference) {
        self.references.push(reference);
    }
}

/// Structured text such as a description: a content type plus its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub value: String,
}

impl TextContent {
    pub fn new(content_type: impl Into<String>, value: impl Into<String>) -> Self {
        TextContent {
            content_type: content_type.into(),
            value: value.into(),
        }
    }

    pub fn plain(value: impl Into<String>) -> Self {
        TextContent::new("text/plain", value)
    }

    pub fn html(value: impl Into<String>) -> Self {
        TextContent::new("text/html", value)
    }
}

/// Value of a known attribute.
///
/// Timestamps keep the offset they were written with; equality compares
/// instants, so `10:00Z` and `12:00+02:00` are the same value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Timestamp(DateTime<FixedOffset>),
    Rich(TextContent),
    /// An explicit `null` received from the server.
    Null,
}

impl FieldValue {
    /// Whether this value counts as "not set".
    ///
    /// Empty values set by callers are never stored. Empty values decoded
    /// from a payload are kept so the payload re-encodes with the same keys.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Timestamp(_) => false,
            FieldValue::Rich(text) => text.value.is_empty(),
            FieldValue::Null => true,
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(ts: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(ts.into())
    }
}

impl From<DateTime<FixedOffset>> for FieldValue {
    fn from(ts: DateTime<FixedOffset>) -> Self {
        FieldValue::Timestamp(ts)
    }
}

impl From<TextContent> for FieldValue {
    fn from(text: TextContent) -> Self {
        FieldValue::Rich(text)
    }
}

/// A resource's attributes, split into known and dynamic fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeSet {
    known: BTreeMap<String, FieldValue>,
    dynamic: BTreeMap<String, Value>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a known field. Setting an empty value removes the field.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        let value = value.into();
        if value.is_empty() {
            self.known.remove(&name);
        } else {
            self.known.insert(name, value);
        }
    }

    /// Stores a known field as is, empty values included.
    ///
    /// Used when decoding, where an explicitly empty value must survive the
    /// round trip. Callers building resources want [`AttributeSet::set`].
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.known.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.known.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.known.remove(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.known.get(name) {
            Some(FieldValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// A timestamp field as a UTC instant.
    pub fn timestamp(&self, name: &str) -> Option<DateTime<Utc>> {
        match self.known.get(name) {
            Some(FieldValue::Timestamp(ts)) => Some(ts.with_timezone(&Utc)),
            _ => None,
        }
    }

    pub fn rich(&self, name: &str) -> Option<&TextContent> {
        match self.known.get(name) {
            Some(FieldValue::Rich(text)) => Some(text),
            _ => None,
        }
    }

    /// Known fields in name order.
    pub fn known(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.known.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Sets a dynamic (custom) field, keeping the JSON value as is.
    pub fn set_dynamic(&mut self, name: impl Into<String>, value: Value) {
        self.dynamic.insert(name.into(), value);
    }

    pub fn dynamic(&self, name: &str) -> Option<&Value> {
        self.dynamic.get(name)
    }

    pub fn remove_dynamic(&mut self, name: &str) -> Option<Value> {
        self.dynamic.remove(name)
    }

    /// Dynamic fields in name order.
    pub fn dynamic_fields(&self) -> &BTreeMap<String, Value> {
        &self.dynamic
    }

    /// Whether `name` is held in either partition.
    pub fn contains(&self, name: &str) -> bool {
        self.known.contains_key(name) || self.dynamic.contains_key(name)
    }

    /// Number of fields across both partitions.
    pub fn len(&self) -> usize {
        self.known.len() + self.dynamic.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty() && self.dynamic.is_empty()
    }

    /// Copies every field of `other` into `self`, overwriting on conflict.
    pub fn extend(&mut self, other: AttributeSet) {
        self.known.extend(other.known);
        self.dynamic.extend(other.dynamic);
    }
}

/// A resource's relationships, split into known and dynamic fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationshipSet {
    known: BTreeMap<String, Relationship>,
    dynamic: BTreeMap<String, Relationship>,
}

impl RelationshipSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, relationship: Relationship) {
        self.known.insert(name.into(), relationship);
    }

    pub fn get(&self, name: &str) -> Option<&Relationship> {
        self.known.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Relationship> {
        self.known.remove(name)
    }

    pub fn known(&self) -> impl Iterator<Item = (&str, &Relationship)> {
        self.known.iter().map(|(name, rel)| (name.as_str(), rel))
    }

    pub fn set_dynamic(&mut self, name: impl Into<String>, relationship: Relationship) {
        self.dynamic.insert(name.into(), relationship);
    }

    pub fn dynamic(&self, name: &str) -> Option<&Relationship> {
        self.dynamic.get(name)
    }

    pub fn remove_dynamic(&mut self, name: &str) -> Option<Relationship> {
        self.dynamic.remove(name)
    }

    pub fn dynamic_fields(&self) -> &BTreeMap<String, Relationship> {
        &self.dynamic
    }

    pub fn contains(&self, name: &str) -> bool {
        self.known.contains_key(name) || self.dynamic.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.known.len() + self.dynamic.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty() && self.dynamic.is_empty()
    }

    pub fn extend(&mut self, other: RelationshipSet) {
        self.known.extend(other.known);
        self.dynamic.extend(other.dynamic);
    }
}

/// A server-managed entity.
///
/// Locally created resources have no `id`; resources decoded from a server
/// response carry the server-assigned `id` and, when the server uses
/// optimistic concurrency, a `revision` token.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub resource_type: String,
    pub id: Option<String>,
    pub revision: Option<String>,
    pub attributes: AttributeSet,
    pub relationships: Option<RelationshipSet>,
}

impl Resource {
    /// Creates a new, unsaved resource of the given type.
    pub fn new(resource_type: impl Into<String>) -> Self {
        Resource {
            resource_type: resource_type.into(),
            id: None,
            revision: None,
            attributes: AttributeSet::new(),
            relationships: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = Some(revision.into());
        self
    }

    /// Sets a known attribute, builder style.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.attributes.set(name, value);
        self
    }

    /// Sets a dynamic attribute, builder style.
    pub fn with_dynamic(mut self, name: impl Into<String>, value: Value) -> Self {
        self.attributes.set_dynamic(name, value);
        self
    }

    /// Whether the server has assigned an identifier yet.
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// A reference to this resource, once it has an identifier.
    pub fn reference(&self) -> Option<Reference> {
        self.id
            .as_ref()
            .map(|id| Reference::new(self.resource_type.clone(), id.clone()))
    }

    /// The relationship set, created empty on first access.
    pub fn relationships_mut(&mut self) -> &mut RelationshipSet {
        self.relationships.get_or_insert_with(RelationshipSet::new)
    }
}

#[cfg(test)]
#[path = "resource_tests.rs"]
mod tests;
