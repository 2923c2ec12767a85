use super::parts::{SqlPart, count_params, push_raw, render};
use crate::value::SqlValue;

/// A self-contained clause (`SET ...`, `WHERE ...`) with its bound values.
///
/// Placeholders are stored as slots rather than text, so the fragment renders
/// as `$1..$n` on its own and is renumbered when spliced into a larger
/// statement with [`Sql::push_fragment`](super::Sql::push_fragment). Values are
/// never written into the clause text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlFragment {
    parts: Vec<SqlPart>,
    values: Vec<SqlValue>,
}

impl SqlFragment {
    /// Create an empty fragment.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append raw SQL (no parameters).
    pub fn push(&mut self, sql: &str) -> &mut Self {
        push_raw(&mut self.parts, sql);
        self
    }

    /// Append a parameter placeholder and bind its value.
    pub fn push_bind(&mut self, value: impl Into<SqlValue>) -> &mut Self {
        self.parts.push(SqlPart::Param);
        self.values.push(value.into());
        self
    }

    /// `true` when the fragment renders to the empty string.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Render the clause with placeholders numbered from `$1`.
    pub fn to_sql(&self) -> String {
        let mut out = String::new();
        render(&self.parts, &mut out);
        out
    }

    /// Bound values, in placeholder order.
    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    /// Number of placeholders in the clause (always equal to `values().len()`).
    pub fn placeholder_count(&self) -> usize {
        count_params(&self.parts)
    }

    pub(crate) fn parts(&self) -> &[SqlPart] {
        &self.parts
    }
}
