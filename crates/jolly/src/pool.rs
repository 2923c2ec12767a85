//! Connection pool utilities

use crate::config::Config;
use crate::error::{JollyError, JollyResult};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::NoTls;

/// Create a connection pool from loaded [`Config`].
///
/// # Example
///
/// ```ignore
/// let pool = jolly::create_pool(&jolly::Config::from_env()?)?;
/// let client = pool.get().await?;
/// let companies = Company::find_all(&client, &CompanyFilter::default()).await?;
/// ```
pub fn create_pool(config: &Config) -> JollyResult<Pool> {
    create_pool_with_config(&config.database_url, config.pool_size)
}

/// Create a connection pool from a database URL and a maximum size.
pub fn create_pool_with_config(database_url: &str, max_size: usize) -> JollyResult<Pool> {
    let pg_config: tokio_postgres::Config = database_url
        .parse()
        .map_err(|e: tokio_postgres::Error| JollyError::Connection(e.to_string()))?;

    let mgr = Manager::from_config(pg_config, NoTls, default_manager_config());
    Pool::builder(mgr)
        .max_size(max_size)
        .build()
        .map_err(|e| JollyError::Pool(e.to_string()))
}

fn default_manager_config() -> ManagerConfig {
    ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparseable_url() {
        let err = create_pool_with_config("postgresql://localhost:notaport/jolly", 2).unwrap_err();
        assert!(matches!(err, JollyError::Connection(_)));
    }

    #[tokio::test]
    async fn builds_without_connecting() {
        let pool = create_pool(&Config::default()).unwrap();
        assert_eq!(pool.status().max_size, 16);
    }
}
