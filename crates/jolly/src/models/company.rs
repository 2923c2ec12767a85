//! Companies: identified by a short handle, each with zero or more jobs.

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

const RETURNING: &str = r#"handle, name, description, num_employees AS "numEmployees", logo_url AS "logoUrl""#;

/// API field name -> column, for partial updates.
pub const COMPANY_COLUMNS: ColumnMap<'static> = ColumnMap::new(&[
    ("numEmployees", "num_employees"),
    ("logoUrl", "logo_url"),
]);

/// A company row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl FromRow for Company {
    fn from_row(row: &Row) -> JollyResult<Self> {
        Ok(Self {
            handle: row.try_get_column("handle")?,
            name: row.try_get_column("name")?,
            description: row.try_get_column("description")?,
            num_employees: row.try_get_column("numEmployees")?,
            logo_url: row.try_get_column("logoUrl")?,
        })
    }
}

/// A job as listed under its company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyJob {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
}

impl FromRow for CompanyJob {
    fn from_row(row: &Row) -> JollyResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
        })
    }
}

/// A company together with its jobs, as returned by [`Company::get`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<CompanyJob>,
}

/// Input for [`Company::create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub num_employees: Option<i32>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl NewCompany {
    pub fn validate(&self) -> ValidationErrors {
        let mut errs = ValidationErrors::new();
        if !validate::is_handle(&self.handle) {
            errs.add(
                "handle",
                ValidationCode::Required,
                "handle must be lowercase letters, digits or '-'",
            );
        }
        if validate::is_blank(&self.name) {
            errs.add("name", ValidationCode::Required, "name is required");
        }
        if self.num_employees.is_some_and(|n| n < 0) {
            errs.add("numEmployees", ValidationCode::Range, "numEmployees must be >= 0");
        }
        if let Some(url) = &self.logo_url {
            if !validate::is_url(url) {
                errs.add("logoUrl", ValidationCode::Url, "logoUrl must be a URL");
            }
        }
        errs
    }
}

/// Search filters for [`Company::find_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyFilter {
    /// Case-insensitive substring of the company name.
    pub name: Option<String>,
    pub min_employees: Option<i32>,
    pub max_employees: Option<i32>,
}

impl CompanyFilter {
    /// Render as a `WHERE` clause (empty when no field is set).
    pub fn to_where(&self) -> JollyResult<SqlFragment> {
        sql_for_filtering(self)
    }
}

impl FilterParams for CompanyFilter {
    const FIELDS: &'static [FilterField] = &[
        FilterField::substring("name", "name"),
        FilterField::at_least("minEmployees", "num_employees"),
        FilterField::at_most("maxEmployees", "num_employees"),
    ];

    fn value(&self, key: &str) -> Option<SqlValue> {
        match key {
            "name" => self.name.clone().map(Into::into),
            "minEmployees" => self.min_employees.map(Into::into),
            "maxEmployees" => self.max_employees.map(Into::into),
            _ => None,
        }
    }
}

impl Company {
    /// Fields a partial update may touch.
    pub const UPDATABLE: &'static [&'static str] = &["name", "description", "numEmployees", "logoUrl"];

    /// Check an update payload: known fields only, sensible values.
    pub fn validate_update(data: &UpdateData) -> JollyResult<()> {
        data.ensure_only(Self::UPDATABLE)?;

        let mut errs = ValidationErrors::new();
        for (field, value) in data.iter() {
            match (field, value) {
                ("name" | "description", SqlValue::Text(s)) if field == "name" && validate::is_blank(s) => {
                    errs.add(field, ValidationCode::Required, "name must not be empty");
                }
                ("name" | "description", SqlValue::Text(_)) => {}
                ("numEmployees", SqlValue::Int(n)) if *n < 0 || i32::try_from(*n).is_err() => {
                    errs.add(
                        field,
                        ValidationCode::Range,
                        "numEmployees must be between 0 and 2147483647",
                    );
                }
                ("numEmployees", SqlValue::Int(_) | SqlValue::Null) => {}
                ("logoUrl", SqlValue::Text(s)) if !validate::is_url(s) => {
                    errs.add(field, ValidationCode::Url, "logoUrl must be a URL");
                }
                ("logoUrl", SqlValue::Text(_) | SqlValue::Null) => {}
                _ => errs.add(field, ValidationCode::Type, format!("{field} has the wrong type")),
            }
        }
        errs.into_result().map_err(JollyError::from)
    }

    /// Insert a company. A taken handle or name is a bad request.
    pub async fn create(conn: &impl GenericClient, data: &NewCompany) -> JollyResult<Company> {
        data.validate().into_result()?;

        let mut q = sql(
            "INSERT INTO companies (handle, name, description, num_employees, logo_url) VALUES (",
        );
        q.push_bind(data.handle.clone())
            .push(", ")
            .push_bind(data.name.clone())
            .push(", ")
            .push_bind(data.description.clone())
            .push(", ")
            .push_bind(data.num_employees)
            .push(", ")
            .push_bind(data.logo_url.clone())
            .push(") RETURNING ")
            .push(RETURNING);

        let company: Company = match q.fetch_one_as(conn).await {
            Err(JollyError::UniqueViolation(detail)) => {
                tracing::debug!(handle = %data.handle, %detail, "duplicate company");
                return Err(JollyError::bad_request(format!(
                    "Duplicate company: {}",
                    data.handle
                )));
            }
            other => other?,
        };
        tracing::info!(handle = %company.handle, "created company");
        Ok(company)
    }

    /// All companies matching `filter`, ordered by name.
    pub async fn find_all(
        conn: &impl GenericClient,
        filter: &CompanyFilter,
    ) -> JollyResult<Vec<Company>> {
        Self::find_all_query(filter)?.fetch_all_as(conn).await
    }

    fn find_all_query(filter: &CompanyFilter) -> JollyResult<Sql> {
        let clause = filter.to_where()?;

        let mut q = sql("SELECT ");
        q.push(RETURNING).push(" FROM companies");
        if !clause.is_empty() {
            q.push(" ").push_fragment(&clause);
        }
        q.push(" ORDER BY name");
        Ok(q)
    }

    /// A company and its jobs.
    pub async fn get(conn: &impl GenericClient, handle: &str) -> JollyResult<CompanyDetail> {
        let mut q = sql("SELECT ");
        q.push(RETURNING)
            .push(" FROM companies WHERE handle = ")
            .push_bind(handle.to_string());
        let company: Company = q
            .fetch_opt_as(conn)
            .await?
            .ok_or_else(|| JollyError::not_found(format!("No company: {handle}")))?;

        let mut jobs = sql("SELECT id, title, salary, equity FROM jobs WHERE company_handle = ");
        jobs.push_bind(handle.to_string()).push(" ORDER BY id");
        let jobs: Vec<CompanyJob> = jobs.fetch_all_as(conn).await?;

        Ok(CompanyDetail { company, jobs })
    }

    /// Apply a partial update; only the supplied fields change.
    pub async fn update(
        conn: &impl GenericClient,
        handle: &str,
        data: &UpdateData,
    ) -> JollyResult<Company> {
        Self::validate_update(data)?;
        let set = sql_for_partial_update(data, &COMPANY_COLUMNS)?;

        let mut q = sql("UPDATE companies SET ");
        q.push_fragment(&set)
            .push(" WHERE handle = ")
            .push_bind(handle.to_string())
            .push(" RETURNING ")
            .push(RETURNING);

        let company: Company = q
            .fetch_opt_as(conn)
            .await?
            .ok_or_else(|| JollyError::not_found(format!("No company: {handle}")))?;
        tracing::debug!(handle, fields = data.len(), "updated company");
        Ok(company)
    }

    /// Delete a company (its jobs go with it).
    pub async fn remove(conn: &impl GenericClient, handle: &str) -> JollyResult<()> {
        let mut q = sql("DELETE FROM companies WHERE handle = ");
        q.push_bind(handle.to_string()).push(" RETURNING handle");

        match q.fetch_opt(conn).await? {
            Some(_) => {
                tracing::info!(handle, "removed company");
                Ok(())
            }
            None => Err(JollyError::not_found(format!("No company: {handle}"))),
        }
    }
}
