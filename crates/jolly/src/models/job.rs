//! Jobs: postings that belong to a company.

use crate::changeset::{ValidationCode, ValidationErrors};
use crate::client::GenericClient;
use crate::error::{JollyError, JollyResult};
use crate::filter::{FilterField, FilterParams, sql_for_filtering};
use crate::row::{FromRow, RowExt};
use crate::sql::{Sql, SqlFragment, sql};
use crate::update::{ColumnMap, UpdateData, sql_for_partial_update};
use crate::validate;
use crate::value::SqlValue;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

const RETURNING: &str = r#"id, title, salary, equity, company_handle AS "companyHandle""#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl FromRow for Job {
    fn from_row(row: &Row) -> JollyResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("companyHandle")?,
        })
    }
}

/// Input for [`Job::create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub salary: Option<i32>,
    #[serde(default)]
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl NewJob {
    pub fn validate(&self) -> ValidationErrors {
        let mut errs = ValidationErrors::new();
        if validate::is_blank(&self.title) {
            errs.add("title", ValidationCode::Required, "title is required");
        }
        if self.salary.is_some_and(|s| s < 0) {
            errs.add("salary", ValidationCode::Range, "salary must be >= 0");
        }
        if self.equity.is_some_and(|e| !equity_in_range(e)) {
            errs.add("equity", ValidationCode::Range, "equity must be between 0 and 1");
        }
        if !validate::is_handle(&self.company_handle) {
            errs.add(
                "companyHandle",
                ValidationCode::Required,
                "companyHandle must be a company handle",
            );
        }
        errs
    }
}

fn equity_in_range(equity: Decimal) -> bool {
    equity >= Decimal::ZERO && equity <= Decimal::ONE
}

// Accepts the JSON shapes an equity value arrives in: 0.5, 1, "0.5".
fn equity_value(value: &SqlValue) -> Option<Decimal> {
    match value {
        SqlValue::Int(v) => Some(Decimal::from(*v)),
        SqlValue::Float(v) => Decimal::try_from(*v).ok(),
        SqlValue::Text(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Search filters for [`Job::find_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobFilter {
    /// Case-insensitive substring of the title.
    pub title: Option<String>,
    pub min_salary: Option<i32>,
    /// Only jobs with non-zero equity. `false` means no restriction.
    pub has_equity: Option<bool>,
}

impl JobFilter {
    /// Render as a `WHERE` clause (empty when no field is set).
    pub fn to_where(&self) -> JollyResult<SqlFragment> {
        sql_for_filtering(self)
    }
}

impl FilterParams for JobFilter {
    const FIELDS: &'static [FilterField] = &[
        FilterField::substring("title", "title"),
        FilterField::at_least("minSalary", "salary"),
        FilterField::flag("hasEquity", "equity", "equity > 0"),
    ];

    fn value(&self, key: &str) -> Option<SqlValue> {
        match key {
            "title" => self.title.clone().map(Into::into),
            "minSalary" => self.min_salary.map(Into::into),
            "hasEquity" => self.has_equity.map(Into::into),
            _ => None,
        }
    }
}

impl Job {
    pub const UPDATABLE: &'static [&'static str] = &["title", "salary", "equity"];

    /// Check an update payload. `id` and `companyHandle` cannot change.
    pub fn validate_update(data: &UpdateData) -> JollyResult<()> {
        data.ensure_only(Self::UPDATABLE)?;

        let mut errs = ValidationErrors::new();
        for (field, value) in data.iter() {
            match field {
                "title" => match value {
                    SqlValue::Text(s) if !validate::is_blank(s) => {}
                    SqlValue::Text(_) => {
                        errs.add(field, ValidationCode::Required, "title must not be empty")
                    }
                    _ => errs.add(field, ValidationCode::Type, "title must be a string"),
                },
                "salary" => match value {
                    SqlValue::Null => {}
                    SqlValue::Int(n) if *n >= 0 && i32::try_from(*n).is_ok() => {}
                    SqlValue::Int(_) => errs.add(
                        field,
                        ValidationCode::Range,
                        "salary must be between 0 and 2147483647",
                    ),
                    _ => errs.add(field, ValidationCode::Type, "salary must be an integer"),
                },
                _ => {
                    if value.is_null() {
                        continue;
                    }
                    match equity_value(value) {
                        Some(e) if equity_in_range(e) => {}
                        Some(_) => errs.add(
                            field,
                            ValidationCode::Range,
                            "equity must be between 0 and 1",
                        ),
                        None => errs.add(field, ValidationCode::Type, "equity must be a number"),
                    }
                }
            }
        }
        errs.into_result().map_err(JollyError::from)
    }

    /// Insert a job. A job for an unknown company is a bad request.
    pub async fn create(conn: &impl GenericClient, data: &NewJob) -> JollyResult<Job> {
        data.validate().into_result()?;

        let mut q = sql("INSERT INTO jobs (title, salary, equity, company_handle) VALUES (");
        q.push_bind(data.title.clone())
            .push(", ")
            .push_bind(data.salary)
            .push(", ")
            .push_bind(data.equity)
            .push(", ")
            .push_bind(data.company_handle.clone())
            .push(") RETURNING ")
            .push(RETURNING);

        let job: Job = match q.fetch_one_as(conn).await {
            Err(JollyError::ForeignKeyViolation(_)) => {
                return Err(JollyError::bad_request(format!(
                    "No company: {}",
                    data.company_handle
                )));
            }
            other => other?,
        };
        tracing::info!(id = job.id, company = %job.company_handle, "created job");
        Ok(job)
    }

    /// All jobs matching `filter`, grouped by company.
    pub async fn find_all(conn: &impl GenericClient, filter: &JobFilter) -> JollyResult<Vec<Job>> {
        Self::find_all_query(filter)?.fetch_all_as(conn).await
    }

    fn find_all_query(filter: &JobFilter) -> JollyResult<Sql> {
        let clause = filter.to_where()?;

        let mut q = sql("SELECT ");
        q.push(RETURNING).push(" FROM jobs");
        if !clause.is_empty() {
            q.push(" ").push_fragment(&clause);
        }
        q.push(" ORDER BY company_handle, title");
        Ok(q)
    }

    pub async fn get(conn: &impl GenericClient, id: i32) -> JollyResult<Job> {
        let mut q = sql("SELECT ");
        q.push(RETURNING).push(" FROM jobs WHERE id = ").push_bind(id);
        q.fetch_opt_as(conn)
            .await?
            .ok_or_else(|| JollyError::not_found(format!("No job: {id}")))
    }

    /// Apply a partial update; only the supplied fields change.
    pub async fn update(conn: &impl GenericClient, id: i32, data: &UpdateData) -> JollyResult<Job> {
        Self::validate_update(data)?;
        let set = sql_for_partial_update(data, &ColumnMap::identity())?;

        let mut q = sql("UPDATE jobs SET ");
        q.push_fragment(&set)
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(RETURNING);

        let job: Job = q
            .fetch_opt_as(conn)
            .await?
            .ok_or_else(|| JollyError::not_found(format!("No job: {id}")))?;
        tracing::debug!(id, fields = data.len(), "updated job");
        Ok(job)
    }

    pub async fn remove(conn: &impl GenericClient, id: i32) -> JollyResult<()> {
        let mut q = sql("DELETE FROM jobs WHERE id = ");
        q.push_bind(id).push(" RETURNING id");

        match q.fetch_opt(conn).await? {
            Some(_) => {
                tracing::info!(id, "removed job");
                Ok(())
            }
            None => Err(JollyError::not_found(format!("No job: {id}"))),
        }
    }
}
