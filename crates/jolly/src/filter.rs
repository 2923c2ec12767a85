//! Search filters: a closed set of optional fields rendered as a `WHERE` clause.
//!
//! Each entity declares its filterable fields once, as a table of
//! [`FilterField`] descriptors, and [`sql_for_filtering`] renders any such table
//! the same way:
//!
//! - fields are visited in table order and joined with ` AND `
//! - absent or blank values (null, `false`, `""`) emit nothing and consume no
//!   placeholder number
//! - the clause is prefixed with `WHERE `, or is empty when nothing applies
//!
//! # Example
//!
//! ```ignore
//! let filter = CompanyFilter { name: Some("hi".into()), min_employees: Some(20), ..Default::default() };
//! let w = sql_for_filtering(&filter)?;
//! assert_eq!(w.to_sql(), "WHERE name ILIKE $1 AND num_employees >= $2");
//! ```

use crate::error::{JollyError, JollyResult};
use crate::sql::SqlFragment;
use crate::value::SqlValue;
use std::cmp::Ordering;

/// How a filter field compares against its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// `column = $n`
    Exact,
    /// `column ILIKE $n`, bound as `%value%`
    Substring,
    /// `column >= $n` (inclusive lower bound)
    AtLeast,
    /// `column <= $n` (inclusive upper bound)
    AtMost,
    /// A fixed predicate applied when the value is set; binds nothing.
    Flag(&'static str),
}

/// One filterable field: its API key, the column it targets and how it compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterField {
    pub key: &'static str,
    pub column: &'static str,
    pub comparison: Comparison,
}

impl FilterField {
    pub const fn new(key: &'static str, column: &'static str, comparison: Comparison) -> Self {
        Self {
            key,
            column,
            comparison,
        }
    }

    pub const fn exact(key: &'static str, column: &'static str) -> Self {
        Self::new(key, column, Comparison::Exact)
    }

    pub const fn substring(key: &'static str, column: &'static str) -> Self {
        Self::new(key, column, Comparison::Substring)
    }

    pub const fn at_least(key: &'static str, column: &'static str) -> Self {
        Self::new(key, column, Comparison::AtLeast)
    }

    pub const fn at_most(key: &'static str, column: &'static str) -> Self {
        Self::new(key, column, Comparison::AtMost)
    }

    pub const fn flag(key: &'static str, column: &'static str, predicate: &'static str) -> Self {
        Self::new(key, column, Comparison::Flag(predicate))
    }
}

/// A filter payload with a fixed field table.
pub trait FilterParams {
    /// Recognized fields, in clause order.
    const FIELDS: &'static [FilterField];

    /// The supplied value for `key`, or `None` if it was not supplied.
    fn value(&self, key: &str) -> Option<SqlValue>;
}

/// Render `filter` as a `WHERE` clause.
///
/// Fails with [`JollyError::InvalidRange`] when a lower bound exceeds the upper
/// bound on the same column, before any SQL is produced.
pub fn sql_for_filtering<F: FilterParams>(filter: &F) -> JollyResult<SqlFragment> {
    let present: Vec<(&FilterField, SqlValue)> = F::FIELDS
        .iter()
        .filter_map(|field| {
            filter
                .value(field.key)
                .filter(|v| !v.is_blank())
                .map(|v| (field, v))
        })
        .collect();

    check_ranges(&present)?;

    let mut clause = SqlFragment::empty();
    for (i, (field, value)) in present.into_iter().enumerate() {
        clause.push(if i == 0 { "WHERE " } else { " AND " });
        match field.comparison {
            Comparison::Exact => {
                clause.push(field.column).push(" = ").push_bind(value);
            }
            Comparison::Substring => {
                clause
                    .push(field.column)
                    .push(" ILIKE ")
                    .push_bind(format!("%{value}%"));
            }
            Comparison::AtLeast => {
                clause.push(field.column).push(" >= ").push_bind(value);
            }
            Comparison::AtMost => {
                clause.push(field.column).push(" <= ").push_bind(value);
            }
            Comparison::Flag(predicate) => {
                clause.push(predicate);
            }
        }
    }

    Ok(clause)
}

fn check_ranges(present: &[(&FilterField, SqlValue)]) -> JollyResult<()> {
    for (lower, min) in present
        .iter()
        .filter(|(f, _)| f.comparison == Comparison::AtLeast)
    {
        for (upper, max) in present
            .iter()
            .filter(|(f, _)| f.comparison == Comparison::AtMost && f.column == lower.column)
        {
            if min.compare_numeric(max) == Some(Ordering::Greater) {
                tracing::debug!(
                    min_field = lower.key,
                    max_field = upper.key,
                    %min,
                    %max,
                    "rejecting inverted range filter"
                );
                return Err(JollyError::invalid_range(lower.key, upper.key));
            }
        }
    }
    Ok(())
}
