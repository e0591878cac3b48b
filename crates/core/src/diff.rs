// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Change-set diffing between two versions of a resource.
//!
//! Rules:
//! - Known fields: included when the modified value is set and differs from
//!   the baseline. An unset (empty) modified value means "not touched".
//! - Dynamic fields: included when present in the modified resource and
//!   absent from, or structurally different in, the baseline.
//! - Fields present only in the baseline are never included.
//!
//! The diff can therefore say "set" or "leave", never "clear". Callers that
//! need to clear a field add it explicitly with [`ChangeSet::clear_attribute`]
//! or [`ChangeSet::clear_relationship`] and send the change set themselves.

use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::resource::{AttributeSet, RelationshipSet, Resource};

/// The fields that differ between a baseline and a modified resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    attributes: AttributeSet,
    relationships: RelationshipSet,
    cleared_attributes: BTreeSet<String>,
    cleared_relationships: BTreeSet<String>,
}

impl ChangeSet {
    /// An empty change set, for callers building explicit updates.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut AttributeSet {
        &mut self.attributes
    }

    pub fn relationships(&self) -> &RelationshipSet {
        &self.relationships
    }

    pub fn relationships_mut(&mut self) -> &mut RelationshipSet {
        &mut self.relationships
    }

    pub fn cleared_attributes(&self) -> &BTreeSet<String> {
        &self.cleared_attributes
    }

    pub fn cleared_relationships(&self) -> &BTreeSet<String> {
        &self.cleared_relationships
    }

    /// Requests that attribute `name` be cleared on the server.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConflictingClear`] if the change set also sets `name`.
    pub fn clear_attribute(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if self.attributes.contains(&name) {
            return Err(Error::ConflictingClear { field: name });
        }
        self.cleared_attributes.insert(name);
        Ok(())
    }

    /// Requests that relationship `name` be emptied on the server.
    pub fn clear_relationship(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if self.relationships.contains(&name) {
            return Err(Error::ConflictingClear { field: name });
        }
        self.cleared_relationships.insert(name);
        Ok(())
    }

    /// Whether `name` is set or cleared by this change set.
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains(name)
            || self.relationships.contains(name)
            || self.cleared_attributes.contains(name)
            || self.cleared_relationships.contains(name)
    }

    /// Number of changed fields, clears included.
    pub fn len(&self) -> usize {
        self.attributes.len()
            + self.relationships.len()
            + self.cleared_attributes.len()
            + self.cleared_relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names of every changed field, attributes first.
    pub fn field_names(&self) -> Vec<&str> {
        let attributes = self
            .attributes
            .known()
            .map(|(name, _)| name)
            .chain(self.attributes.dynamic_fields().keys().map(String::as_str))
            .chain(self.cleared_attributes.iter().map(String::as_str));
        let relationships = self
            .relationships
            .known()
            .map(|(name, _)| name)
            .chain(self.relationships.dynamic_fields().keys().map(String::as_str))
            .chain(self.cleared_relationships.iter().map(String::as_str));
        attributes.chain(relationships).collect()
    }
}

/// Computes the minimal change set turning `baseline` into `modified`.
///
/// Returns `None` when nothing changed.
pub fn diff(baseline: &Resource, modified: &Resource) -> Option<ChangeSet> {
    let empty = RelationshipSet::new();
    let changes = ChangeSet {
        attributes: diff_attributes(&baseline.attributes, &modified.attributes),
        relationships: diff_relationships(
            baseline.relationships.as_ref().unwrap_or(&empty),
            modified.relationships.as_ref().unwrap_or(&empty),
        ),
        cleared_attributes: BTreeSet::new(),
        cleared_relationships: BTreeSet::new(),
    };
    if changes.is_empty() {
        None
    } else {
        Some(changes)
    }
}

/// Whether `modified` introduces no change over `baseline`.
///
/// Defined as `diff(baseline, modified).is_none()`, so it inherits the
/// diff's asymmetry: fields set only in `baseline` do not count.
pub fn equals(baseline: &Resource, modified: &Resource) -> bool {
    diff(baseline, modified).is_none()
}

fn diff_attributes(baseline: &AttributeSet, modified: &AttributeSet) -> AttributeSet {
    let mut changed = AttributeSet::new();
    for (name, value) in modified.known() {
        if value.is_empty() {
            continue;
        }
        if baseline.get(name) != Some(value) {
            changed.set(name, value.clone());
        }
    }
    for (name, value) in modified.dynamic_fields() {
        if baseline.dynamic(name) != Some(value) {
            changed.set_dynamic(name.clone(), value.clone());
        }
    }
    changed
}

fn diff_relationships(baseline: &RelationshipSet, modified: &RelationshipSet) -> RelationshipSet {
    let mut changed = RelationshipSet::new();
    for (name, relationship) in modified.known() {
        if relationship.is_empty() {
            continue;
        }
        let same = baseline
            .get(name)
            .is_some_and(|base| base.references() == relationship.references());
        if !same {
            changed.set(name, relationship.clone());
        }
    }
    for (name, relationship) in modified.dynamic_fields() {
        let same = baseline
            .dynamic(name)
            .is_some_and(|base| base.references() == relationship.references());
        if !same {
            changed.set_dynamic(name.clone(), relationship.clone());
        }
    }
    changed
}

#[cfg(test)]
#[path = "diff_tests.rs"]
mod tests;
