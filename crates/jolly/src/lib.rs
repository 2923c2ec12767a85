//! # jolly
//!
//! Storage layer for the Jolly job board: companies, their jobs, and the
//! dynamic SQL that filters and partially updates them.
//!
//! ## Features
//!
//! - **Partial updates**: [`sql_for_partial_update`] turns a sparse payload into a `SET` clause
//! - **Search filters**: [`sql_for_filtering`] renders a declared filter table as a `WHERE` clause
//! - **Parameter safe**: values are always bound as `$n`, never spliced into SQL text
//! - **Transaction-friendly**: pass a transaction anywhere a `GenericClient` is expected
//! - **SQL logging**: [`TracedClient`] emits a `tracing` event per statement
//!
//! ## Example
//!
//! ```ignore
//! use jolly::{Company, CompanyFilter, Config, UpdateData, create_pool};
//!
//! let pool = create_pool(&Config::from_env()?)?;
//! let client = pool.get().await?;
//!
//! let filter = CompanyFilter { min_employees: Some(10), ..Default::default() };
//! let companies = Company::find_all(&client, &filter).await?;
//!
//! let data = UpdateData::new().set("numEmployees", 12);
//! let updated = Company::update(&client, "c1", &data).await?;
//! ```

pub mod changeset;
pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod monitor;
pub mod row;
pub mod sql;
pub mod update;
pub mod validate;
pub mod value;

pub use changeset::{ValidationCode, ValidationError, ValidationErrors};
pub use client::GenericClient;
pub use config::Config;
pub use error::{JollyError, JollyResult};
pub use filter::{Comparison, FilterField, FilterParams, sql_for_filtering};
pub use models::{
    COMPANY_COLUMNS, Company, CompanyDetail, CompanyFilter, CompanyJob, Job, JobFilter,
    NewCompany, NewJob,
};
pub use monitor::TracedClient;
pub use row::{FromRow, RowExt};
pub use sql::{Sql, SqlFragment, quote_ident, sql};
pub use update::{ColumnMap, UpdateData, sql_for_partial_update};
pub use value::SqlValue;

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_config};
