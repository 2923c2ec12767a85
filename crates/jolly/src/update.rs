//! Partial updates: turn a sparse `{field: value}` payload into a `SET` clause.
//!
//! ```ignore
//! use jolly::{ColumnMap, UpdateData, sql_for_partial_update};
//!
//! const COLUMNS: ColumnMap<'static> = ColumnMap::new(&[("firstName", "first_name")]);
//!
//! let data = UpdateData::new().set("firstName", "Aliya").set("age", 32);
//! let set = sql_for_partial_update(&data, &COLUMNS)?;
//! assert_eq!(set.to_sql(), r#""first_name"=$1, "age"=$2"#);
//! ```

use crate::error::{JollyError, JollyResult};
use crate::sql::{SqlFragment, quote_ident};
use crate::value::SqlValue;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Translation from API field names to storage column names.
///
/// Fields without an entry map to a column of the same name.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnMap<'a> {
    entries: &'a [(&'a str, &'a str)],
}

impl<'a> ColumnMap<'a> {
    pub const fn new(entries: &'a [(&'a str, &'a str)]) -> Self {
        Self { entries }
    }

    /// A map with no entries: every field is its own column.
    pub const fn identity() -> Self {
        Self { entries: &[] }
    }

    /// Column for `field`, falling back to `field` itself.
    pub fn column_for<'k>(&'k self, field: &'k str) -> &'k str {
        self.entries
            .iter()
            .find(|(from, _)| *from == field)
            .map_or(field, |(_, to)| *to)
    }
}

/// An ordered set of field updates with unique keys.
///
/// Order is significant: it decides placeholder numbering. Setting a field
/// that is already present replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateData {
    fields: Vec<(String, SqlValue)>,
}

impl UpdateData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chainable [`UpdateData::insert`].
    pub fn set(mut self, field: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<SqlValue>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == field) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((field, value)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&SqlValue> {
        self.fields
            .iter()
            .find(|(k, _)| k == field)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Reject fields outside `allowed`.
    ///
    /// Field names end up in the statement as identifiers, so callers restrict
    /// them to a known list before building.
    pub fn ensure_only(&self, allowed: &[&str]) -> JollyResult<()> {
        let unknown: Vec<&str> = self.keys().filter(|k| !allowed.contains(k)).collect();
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(JollyError::validation(format!(
                "unknown field(s): {}",
                unknown.join(", ")
            )))
        }
    }
}

impl<K: Into<String>, V: Into<SqlValue>> FromIterator<(K, V)> for UpdateData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = Self::new();
        for (k, v) in iter {
            data.insert(k, v);
        }
        data
    }
}

// Deserialized by hand so fields keep their document order.
impl<'de> Deserialize<'de> for UpdateData {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct UpdateDataVisitor;

        impl<'de> Visitor<'de> for UpdateDataVisitor {
            type Value = UpdateData;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of field updates")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut data = UpdateData::new();
                while let Some((field, value)) = map.next_entry::<String, SqlValue>()? {
                    data.insert(field, value);
                }
                Ok(data)
            }
        }

        deserializer.deserialize_map(UpdateDataVisitor)
    }
}

/// Build the `SET` list for a partial update.
///
/// Emits `"<column>"=$n` per field in order, joined by `", "`; the values keep
/// the same order, with explicit nulls preserved. Fails with
/// [`JollyError::EmptyInput`] when there is nothing to update.
pub fn sql_for_partial_update(
    data: &UpdateData,
    columns: &ColumnMap<'_>,
) -> JollyResult<SqlFragment> {
    if data.is_empty() {
        return Err(JollyError::EmptyInput);
    }

    let mut set = SqlFragment::empty();
    for (i, (field, value)) in data.iter().enumerate() {
        if i > 0 {
            set.push(", ");
        }
        set.push(&quote_ident(columns.column_for(field)))
            .push("=")
            .push_bind(value.clone());
    }
    Ok(set)
}
