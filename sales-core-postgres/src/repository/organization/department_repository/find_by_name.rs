use sales_core_db::models::DepartmentModel;
use sales_core_db::RepositoryResult;

use super::repo_impl::DepartmentRepositoryImpl;
use crate::executor::consumed;
use crate::utils::TryFromRow;

impl DepartmentRepositoryImpl {
    pub(super) async fn find_by_name_impl(
        &self,
        name: &str,
    ) -> RepositoryResult<Option<DepartmentModel>> {
        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or_else(consumed)?;
            sqlx::query("SELECT * FROM department WHERE name = $1")
                .bind(name)
                .fetch_optional(&mut **transaction)
                .await?
        };
        row.as_ref().map(DepartmentModel::try_from_row).transpose()
    }
}
