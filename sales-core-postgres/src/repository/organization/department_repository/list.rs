use uuid::Uuid;

use sales_core_db::models::DepartmentModel;
use sales_core_db::repository::{Page, PageRequest};
use sales_core_db::RepositoryResult;

use super::repo_impl::DepartmentRepositoryImpl;
use crate::executor::consumed;
use crate::utils::TryFromRow;

impl DepartmentRepositoryImpl {
    pub(super) async fn list_impl(
        &self,
        zone_id: Option<Uuid>,
        page: PageRequest,
    ) -> RepositoryResult<Page<DepartmentModel>> {
        let (total, rows) = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or_else(consumed)?;
            let total: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM department WHERE ($1::uuid IS NULL OR zone_id = $1)",
            )
            .bind(zone_id)
            .fetch_one(&mut **transaction)
            .await?;
            let rows = sqlx::query(
                r#"
                SELECT * FROM department
                WHERE ($1::uuid IS NULL OR zone_id = $1)
                ORDER BY name
                LIMIT $2 OFFSET $3
                "#,
            )
            .bind(zone_id)
            .bind(page.sql_limit())
            .bind(page.sql_offset())
            .fetch_all(&mut **transaction)
            .await?;
            (total, rows)
        };

        let items = rows
            .iter()
            .map(DepartmentModel::try_from_row)
            .collect::<RepositoryResult<Vec<_>>>()?;
        Ok(Page::new(items, total as usize, page))
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helper::{setup_test_context, test_department, test_zone};
    use sales_core_db::repository::{CreateBatch, PageRequest, UnitOfWorkSession};

    #[tokio::test]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_list_by_zone() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let session = ctx.session();

        let zone = session.zones().create_batch(vec![test_zone()]).await?.remove(0);
        session
            .departments()
            .create_batch(vec![
                test_department(Some(&zone)),
                test_department(Some(&zone)),
                test_department(None),
            ])
            .await?;

        let in_zone = session.departments().list(Some(zone.id), PageRequest::default()).await?;
        assert_eq!(in_zone.total, 2);
        assert!(in_zone.items.iter().all(|d| d.zone_id == Some(zone.id)));

        let everywhere = session.departments().list(None, PageRequest::default()).await?;
        assert!(everywhere.total >= 3);
        Ok(())
    }
}
