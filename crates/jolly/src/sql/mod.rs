//! Dynamic SQL composition.
//!
//! - [`SqlFragment`] is a standalone clause (`SET ...`, `WHERE ...`) produced by
//!   the partial-update and filter builders. It renders as `$1..$n` on its own.
//! - [`Sql`] assembles a full statement around fragments without manually
//!   tracking placeholder indices.
//!
//! # Example
//!
//! ```ignore
//! use jolly::{sql, sql_for_filtering};
//!
//! let filter = sql_for_filtering(&company_filter)?;
//! let mut q = sql("SELECT handle, name FROM companies ");
//! q.push_fragment(&filter).push(" ORDER BY name");
//!
//! let companies: Vec<Company> = q.fetch_all_as(&conn).await?;
//! ```

mod builder;
mod fragment;
mod parts;


pub use builder::Sql;
pub use fragment::SqlFragment;

/// Start building a SQL statement.
pub fn sql(initial_sql: impl Into<String>) -> Sql {
    Sql::new(initial_sql)
}

/// Quote a column name as a SQL identifier (`first_name` -> `"first_name"`).
///
/// Embedded double quotes are doubled, so the result is always a single identifier.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
