//! Schema setup and teardown from the crate's SQL directories
//!
//! `init_database` applies `migrations/` in ascending order and
//! `cleanup_database` applies `cleanup/` in descending order, without going
//! through the sqlx migration ledger. Use them for throwaway databases; the
//! scheduler binary uses `sqlx::migrate!` instead.

use sqlx::PgPool;
use std::fs;
use std::path::Path;

/// Create every type and table of the sales core
///
/// # Example
///
/// ```rust,no_run
/// use sqlx::PgPool;
/// use sales_core_postgres::repository::db_init::init_database;
///
/// # async fn example(pool: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// init_database(pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn init_database(pool: &PgPool) -> Result<(), sqlx::Error> {
    let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations");
    execute_sql_files_in_order(pool, &migrations_dir, true).await
}

/// Drop every table and type created by [`init_database`]
pub async fn cleanup_database(pool: &PgPool) -> Result<(), sqlx::Error> {
    let cleanup_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("cleanup");
    execute_sql_files_in_order(pool, &cleanup_dir, false).await
}

async fn execute_sql_files_in_order(
    pool: &PgPool,
    dir: &Path,
    ascending: bool,
) -> Result<(), sqlx::Error> {
    let mut entries: Vec<_> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("sql"))
        .collect();

    entries.sort();
    if !ascending {
        entries.reverse();
    }

    for path in entries {
        let sql = fs::read_to_string(&path)?;
        tracing::debug!(file = %path.display(), "executing sql file");
        sqlx::raw_sql(&sql).execute(pool).await?;
    }

    Ok(())
}
