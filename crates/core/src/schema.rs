// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Known-field schemas for resource types.
//!
//! A [`Schema`] is the allow-list the codec classifies wire keys against.
//! Every attribute or relationship name it declares is a *known* field with a
//! static kind; everything else the server sends is routed to the dynamic
//! bag. Schemas are plain data so that each resource type (and each server
//! installation) can carry its own list.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::resource::{Arity, Reference, Relationship};

/// Static kind of a known attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Plain string. Empty strings count as absent.
    Text,
    /// RFC 3339 timestamp.
    Timestamp,
    /// Structured text: `{"type": "text/html", "value": "..."}`.
    Rich,
}

impl FieldKind {
    /// Human-readable description used in decode errors.
    pub fn expected(&self) -> &'static str {
        match self {
            FieldKind::Text => "a string",
            FieldKind::Timestamp => "an RFC 3339 timestamp",
            FieldKind::Rich => "an object with string 'type' and 'value'",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FieldKind::Text => "text",
            FieldKind::Timestamp => "timestamp",
            FieldKind::Rich => "rich",
        };
        write!(f, "{s}")
    }
}

/// Known attributes and relationships of one resource type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    resource_type: String,
    fields: BTreeMap<String, FieldKind>,
    relations: BTreeMap<String, Arity>,
}

impl Schema {
    /// Starts a schema for the given wire type tag (e.g. `"workitems"`).
    pub fn builder(resource_type: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            resource_type: resource_type.into(),
            fields: Vec::new(),
            relations: Vec::new(),
        }
    }

    /// The wire type tag.
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Kind of a known attribute, or `None` when the name is dynamic.
    pub fn field(&self, name: &str) -> Option<FieldKind> {
        self.fields.get(name).copied()
    }

    /// Declared arity of a known relationship, or `None` when dynamic.
    pub fn relation(&self, name: &str) -> Option<Arity> {
        self.relations.get(name).copied()
    }

    pub fn is_known_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn is_known_relation(&self, name: &str) -> bool {
        self.relations.contains_key(name)
    }

    /// Known attribute names and kinds, in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, FieldKind)> {
        self.fields.iter().map(|(name, kind)| (name.as_str(), *kind))
    }

    /// Known relationship names and arities, in name order.
    pub fn relations(&self) -> impl Iterator<Item = (&str, Arity)> {
        self.relations.iter().map(|(name, arity)| (name.as_str(), *arity))
    }

    /// Builds a relationship value shaped by the declared arity of `name`.
    ///
    /// Names the schema does not declare are to-one when given at most one
    /// reference and to-many otherwise.
    pub fn relationship(&self, name: &str, references: Vec<Reference>) -> Relationship {
        let arity = self.relation(name).unwrap_or(if references.len() > 1 {
            Arity::Many
        } else {
            Arity::One
        });
        Relationship::new(arity, references)
    }
}

/// Builder returned by [`Schema::builder`].
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    resource_type: String,
    fields: Vec<(String, FieldKind)>,
    relations: Vec<(String, Arity)>,
}

impl SchemaBuilder {
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push((name.into(), kind));
        self
    }

    pub fn text(self, name: impl Into<String>) -> Self {
        self.field(name, FieldKind::Text)
    }

    pub fn timestamp(self, name: impl Into<String>) -> Self {
        self.field(name, FieldKind::Timestamp)
    }

    pub fn rich(self, name: impl Into<String>) -> Self {
        self.field(name, FieldKind::Rich)
    }

    pub fn to_one(mut self, name: impl Into<String>) -> Self {
        self.relations.push((name.into(), Arity::One));
        self
    }

    pub fn to_many(mut self, name: impl Into<String>) -> Self {
        self.relations.push((name.into(), Arity::Many));
        self
    }

    /// Validates and freezes the schema.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSchema`] when the type tag is empty, a name is
    /// empty or reserved, or a name is declared twice.
    pub fn build(self) -> Result<Schema> {
        if self.resource_type.trim().is_empty() {
            return Err(Error::InvalidSchema("resource type cannot be empty".into()));
        }

        let mut fields = BTreeMap::new();
        for (name, kind) in self.fields {
            check_name(&name)?;
            if fields.insert(name.clone(), kind).is_some() {
                return Err(Error::InvalidSchema(format!(
                    "attribute '{name}' declared twice"
                )));
            }
        }

        let mut relations = BTreeMap::new();
        for (name, arity) in self.relations {
            check_name(&name)?;
            if relations.insert(name.clone(), arity).is_some() {
                return Err(Error::InvalidSchema(format!(
                    "relationship '{name}' declared twice"
                )));
            }
        }

        Ok(Schema {
            resource_type: self.resource_type,
            fields,
            relations,
        })
    }
}

/// Member names that live next to `attributes` on the wire.
const RESERVED: &[&str] = &["type", "id"];

fn check_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidSchema("field name cannot be empty".into()));
    }
    if RESERVED.contains(&name) {
        return Err(Error::InvalidSchema(format!(
            "'{name}' is reserved for the resource identity"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
