use sales_core_db::models::UserModel;
use sales_core_db::RepositoryResult;

use super::repo_impl::UserRepositoryImpl;
use crate::executor::consumed;
use crate::utils::TryFromRow;

impl UserRepositoryImpl {
    pub(super) async fn find_by_username_impl(
        &self,
        username: &str,
    ) -> RepositoryResult<Option<UserModel>> {
        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or_else(consumed)?;
            sqlx::query("SELECT * FROM app_user WHERE username = $1")
                .bind(username)
                .fetch_optional(&mut **transaction)
                .await?
        };
        row.as_ref().map(UserModel::try_from_row).transpose()
    }
}
