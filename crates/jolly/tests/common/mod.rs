//! Shared setup for database-backed tests.
//!
//! Tests run only when `DATABASE_URL_TEST` (or `DATABASE_URL`) is set. Each test
//! gets its own connection with session-local `companies` and `jobs` tables, so
//! nothing touches real data and tests can run in parallel.

#![allow(dead_code)]

use jolly::{JollyError, JollyResult};
use tokio_postgres::{Client, NoTls};

const SCHEMA: &str = r#"
CREATE TEMP TABLE companies (
    handle VARCHAR(25) PRIMARY KEY CHECK (handle = lower(handle)),
    name TEXT UNIQUE NOT NULL,
    num_employees INTEGER CHECK (num_employees >= 0),
    description TEXT NOT NULL,
    logo_url TEXT
);

CREATE TEMP TABLE jobs (
    id SERIAL PRIMARY KEY,
    title TEXT NOT NULL,
    salary INTEGER CHECK (salary >= 0),
    equity NUMERIC CHECK (equity <= 1.0),
    company_handle VARCHAR(25) NOT NULL REFERENCES companies ON DELETE CASCADE
);

INSERT INTO companies (handle, name, num_employees, description, logo_url)
VALUES ('c1', 'C1', 1, 'Desc1', 'http://c1.img'),
       ('c2', 'C2', 2, 'Desc2', 'http://c2.img'),
       ('c3', 'C3', 3, 'Desc3', 'http://c3.img');

INSERT INTO jobs (title, salary, equity, company_handle)
VALUES ('j1', 1000, 0.1, 'c1'),
       ('j2', 2000, 0.2, 'c1'),
       ('j3', 3000, 0, 'c3');
"#;

fn database_url() -> Option<String> {
    std::env::var("DATABASE_URL_TEST")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
}

/// Connect and seed the fixture tables, or `None` when no database is configured.
pub async fn seeded_client(test: &str) -> JollyResult<Option<Client>> {
    let Some(url) = database_url() else {
        eprintln!("DATABASE_URL is not set; skipping {test}");
        return Ok(None);
    };

    let (client, connection) = tokio_postgres::connect(&url, NoTls)
        .await
        .map_err(|e| JollyError::Connection(e.to_string()))?;
    tokio::spawn(async move {
        let _ = connection.await;
    });

    client
        .batch_execute(SCHEMA)
        .await
        .map_err(JollyError::from_db_error)?;
    Ok(Some(client))
}

/// Id of the seeded job with `title`.
pub async fn job_id(client: &Client, title: &str) -> JollyResult<i32> {
    let row = client
        .query_one("SELECT id FROM jobs WHERE title = $1", &[&title])
        .await?;
    Ok(row.get(0))
}
