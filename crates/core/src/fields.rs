// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative mapping between a typed custom-field struct and the dynamic
//! attribute bag.
//!
//! A [`FieldTable`] is built once per struct and lists every wire name with
//! an accessor pair:
//!
//! ```ignore
//! #[derive(Default)]
//! struct Planning { priority: Option<String>, points: u32 }
//!
//! let table = FieldTable::<Planning>::new()
//!     .field("priority", |p| &p.priority, |p| &mut p.priority)
//!     .field("points", |p| &p.points, |p| &mut p.points);
//! table.validate(&schema)?;
//! table.write(&planning, &mut resource.attributes)?;
//! let planning: Planning = table.read(&resource.attributes)?;
//! ```

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::resource::AttributeSet;
use crate::schema::Schema;

type Getter<T> = Box<dyn Fn(&T) -> serde_json::Result<Value> + Send + Sync>;
type Setter<T> = Box<dyn Fn(&mut T, Value) -> serde_json::Result<()> + Send + Sync>;

struct Entry<T> {
    name: String,
    get: Getter<T>,
    set: Setter<T>,
}

/// Name ↔ typed accessor table for the dynamic fields of `T`.
pub struct FieldTable<T> {
    entries: Vec<Entry<T>>,
}

impl<T: 'static> FieldTable<T> {
    pub fn new() -> Self {
        FieldTable {
            entries: Vec::new(),
        }
    }

    /// Maps wire name `name` onto the struct member reached by the accessors.
    pub fn field<F>(
        mut self,
        name: impl Into<String>,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Self
    where
        F: Serialize + DeserializeOwned + 'static,
    {
        self.entries.push(Entry {
            name: name.into(),
            get: Box::new(move |target: &T| serde_json::to_value(get(target))),
            set: Box::new(move |target: &mut T, value: Value| {
                *get_mut(target) = serde_json::from_value(value)?;
                Ok(())
            }),
        });
        self
    }

    /// Wire names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks the table against the schema it will be used with.
    ///
    /// # Errors
    ///
    /// - [`Error::FieldCollision`] if a name is a known attribute of `schema`
    /// - [`Error::InvalidSchema`] if a name is empty or mapped twice
    pub fn validate(&self, schema: &Schema) -> Result<()> {
        for (i, entry) in self.entries.iter().enumerate() {
            if entry.name.trim().is_empty() {
                return Err(Error::InvalidSchema("field name cannot be empty".into()));
            }
            if schema.is_known_field(&entry.name) {
                return Err(Error::FieldCollision {
                    field: entry.name.clone(),
                });
            }
            if self.entries[..i].iter().any(|e| e.name == entry.name) {
                return Err(Error::InvalidSchema(format!(
                    "custom field '{}' mapped twice",
                    entry.name
                )));
            }
        }
        Ok(())
    }

    /// Copies every mapped member of `value` into the dynamic bag.
    ///
    /// Members serializing to `null` (such as `None`) remove the entry.
    pub fn write(&self, value: &T, attrs: &mut AttributeSet) -> Result<()> {
        for entry in &self.entries {
            let encoded = (entry.get)(value).map_err(|e| Error::FieldValue {
                field: entry.name.clone(),
                reason: e.to_string(),
            })?;
            if encoded.is_null() {
                attrs.remove_dynamic(&entry.name);
            } else {
                attrs.set_dynamic(entry.name.clone(), encoded);
            }
        }
        Ok(())
    }

    /// Overwrites the mapped members of `target` that are present in `attrs`.
    pub fn read_into(&self, attrs: &AttributeSet, target: &mut T) -> Result<()> {
        for entry in &self.entries {
            let Some(raw) = attrs.dynamic(&entry.name) else {
                continue;
            };
            (entry.set)(target, raw.clone()).map_err(|e| Error::FieldValue {
                field: entry.name.clone(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Builds a `T` from the dynamic bag, leaving absent members at default.
    pub fn read(&self, attrs: &AttributeSet) -> Result<T>
    where
        T: Default,
    {
        let mut target = T::default();
        self.read_into(attrs, &mut target)?;
        Ok(target)
    }
}

impl<T: 'static> Default for FieldTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for FieldTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|entry| &entry.name))
            .finish()
    }
}

#[cfg(test)]
#[path = "fields_tests.rs"]
mod tests;
