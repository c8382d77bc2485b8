use heapless::String as HeaplessString;
use sqlx::{postgres::PgRow, Row};
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

use sales_core_db::models::Identifiable;
use sales_core_db::repository::OwnershipFilter;
use sales_core_db::{RepositoryError, RepositoryResult};

use crate::executor::{consumed, Executor};

/// A trait for converting a database row into a model.
pub trait TryFromRow<R>: Sized {
    /// Performs the conversion.
    fn try_from_row(row: &R) -> RepositoryResult<Self>;
}

/// Retrieves a required `HeaplessString` from a row.
pub fn get_heapless_string<const N: usize>(
    row: &PgRow,
    col_name: &str,
) -> RepositoryResult<HeaplessString<N>> {
    let s: String = row.try_get(col_name)?;
    HeaplessString::from_str(&s).map_err(|_| too_long(col_name, N))
}

/// Retrieves an optional `HeaplessString` from a row.
pub fn get_optional_heapless_string<const N: usize>(
    row: &PgRow,
    col_name: &str,
) -> RepositoryResult<Option<HeaplessString<N>>> {
    let s: Option<String> = row.try_get(col_name)?;
    s.map(|val| HeaplessString::from_str(&val))
        .transpose()
        .map_err(|_| too_long(col_name, N))
}

fn too_long(col_name: &str, max: usize) -> RepositoryError {
    RepositoryError::Query(format!("Value for column '{col_name}' is too long (max {max} chars)"))
}

/// Column compared by an [`OwnershipFilter`], with the bound id.
///
/// `OwnershipFilter::All` yields no id; queries use the
/// `($1::uuid IS NULL OR <column> = $1)` form so every filter binds the same
/// parameters. Callers handle `Specialist` on tables without that column.
pub fn scope_column(filter: OwnershipFilter) -> (&'static str, Option<Uuid>) {
    match filter {
        OwnershipFilter::All => ("saler_id", None),
        OwnershipFilter::Saler(id) => ("saler_id", Some(id)),
        OwnershipFilter::Department(id) => ("department_id", Some(id)),
        OwnershipFilter::Zone(id) => ("zone_id", Some(id)),
        OwnershipFilter::Specialist(id) => ("specialist_id", Some(id)),
    }
}

/// Load rows of `table` by primary key, preserving the order of `ids`.
pub async fn load_by_ids<T>(
    executor: &Executor,
    table: &str,
    ids: &[Uuid],
) -> RepositoryResult<Vec<Option<T>>>
where
    T: TryFromRow<PgRow> + Identifiable,
{
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let query = format!("SELECT * FROM {table} WHERE id = ANY($1)");
    let rows = {
        let mut tx = executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;
        sqlx::query(&query).bind(ids).fetch_all(&mut **transaction).await?
    };

    let mut item_map = HashMap::with_capacity(rows.len());
    for row in rows {
        let item = T::try_from_row(&row)?;
        item_map.insert(item.get_id(), item);
    }
    Ok(ids.iter().map(|id| item_map.remove(id)).collect())
}

pub async fn exist_by_ids(
    executor: &Executor,
    table: &str,
    ids: &[Uuid],
) -> RepositoryResult<Vec<(Uuid, bool)>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let query = format!("SELECT id FROM {table} WHERE id = ANY($1)");
    let found: Vec<Uuid> = {
        let mut tx = executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;
        sqlx::query_scalar(&query)
            .bind(ids)
            .fetch_all(&mut **transaction)
            .await?
    };
    Ok(ids.iter().map(|id| (*id, found.contains(id))).collect())
}

pub async fn delete_by_ids(
    executor: &Executor,
    table: &str,
    ids: &[Uuid],
) -> RepositoryResult<usize> {
    if ids.is_empty() {
        return Ok(0);
    }

    let query = format!("DELETE FROM {table} WHERE id = ANY($1)");
    let result = {
        let mut tx = executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;
        sqlx::query(&query).bind(ids).execute(&mut **transaction).await?
    };
    Ok(result.rows_affected() as usize)
}

/// Convert a `COUNT(*)` result to the unsigned count the repositories expose
pub fn to_count(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}
