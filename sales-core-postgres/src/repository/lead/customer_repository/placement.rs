use uuid::Uuid;

use sales_core_db::RepositoryResult;

use super::repo_impl::CustomerRepositoryImpl;
use crate::executor::consumed;

impl CustomerRepositoryImpl {
    /// Copy the saler's new placement onto every lead they own
    pub(super) async fn sync_owner_placement_impl(
        &self,
        saler_id: Uuid,
        department_id: Option<Uuid>,
        zone_id: Option<Uuid>,
    ) -> RepositoryResult<u64> {
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;
        let result = sqlx::query(
            r#"
            UPDATE customer
            SET department_id = $2, zone_id = $3, updated_at = NOW()
            WHERE saler_id = $1
            "#,
        )
        .bind(saler_id)
        .bind(department_id)
        .bind(zone_id)
        .execute(&mut **transaction)
        .await?;
        Ok(result.rows_affected())
    }

    pub(super) async fn sync_department_zone_impl(
        &self,
        department_id: Uuid,
        zone_id: Option<Uuid>,
    ) -> RepositoryResult<u64> {
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;
        let result = sqlx::query(
            "UPDATE customer SET zone_id = $2, updated_at = NOW() WHERE department_id = $1",
        )
        .bind(department_id)
        .bind(zone_id)
        .execute(&mut **transaction)
        .await?;
        Ok(result.rows_affected())
    }

    pub(super) async fn release_owned_by_impl(&self, saler_id: Uuid) -> RepositoryResult<u64> {
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;
        let result = sqlx::query(
            r#"
            UPDATE customer
            SET is_in_public_sea = TRUE, saler_id = NULL, department_id = NULL, zone_id = NULL,
                updated_at = NOW()
            WHERE saler_id = $1
            "#,
        )
        .bind(saler_id)
        .execute(&mut **transaction)
        .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::super::repo_impl::test_support::owned_lead;
    use crate::test_helper::{setup_test_context, test_department, test_zone};
    use sales_core_db::models::CustomerModel;
    use sales_core_db::repository::{CreateBatch, Load, UnitOfWorkSession};

    #[tokio::test]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_leads_follow_owner_and_department(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let session = ctx.session();
        let (saler, lead) = owned_lead(session).await?;

        let zone = session.zones().create_batch(vec![test_zone()]).await?.remove(0);
        let department = session
            .departments()
            .create_batch(vec![test_department(Some(&zone))])
            .await?
            .remove(0);

        let moved = session
            .customers()
            .sync_owner_placement(saler.id, Some(department.id), Some(zone.id))
            .await?;
        assert_eq!(moved, 1);
        let loaded: CustomerModel = session.customers().load(lead.id).await?;
        assert_eq!(loaded.department_id, Some(department.id));

        let other_zone = session.zones().create_batch(vec![test_zone()]).await?.remove(0);
        session
            .customers()
            .sync_department_zone(department.id, Some(other_zone.id))
            .await?;
        let loaded: CustomerModel = session.customers().load(lead.id).await?;
        assert_eq!(loaded.zone_id, Some(other_zone.id));
        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires PostgreSQL at DATABASE_URL"]
    async fn test_release_owned_by() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ctx = setup_test_context().await?;
        let session = ctx.session();
        let (saler, lead) = owned_lead(session).await?;

        assert_eq!(session.customers().release_owned_by(saler.id).await?, 1);
        let loaded: CustomerModel = session.customers().load(lead.id).await?;
        assert!(loaded.is_in_public_sea);
        assert!(loaded.ownership_is_consistent());
        Ok(())
    }
}
