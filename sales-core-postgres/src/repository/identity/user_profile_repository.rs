use async_trait::async_trait;
use sqlx::{postgres::PgRow, Row};
use uuid::Uuid;

use sales_core_db::models::UserProfileModel;
use sales_core_db::repository::UserProfileRepository;
use sales_core_db::RepositoryResult;

use crate::executor::{consumed, Executor};
use crate::utils::{get_heapless_string, get_optional_heapless_string, TryFromRow};

pub struct UserProfileRepositoryImpl {
    pub executor: Executor,
}

impl UserProfileRepositoryImpl {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }
}

impl TryFromRow<PgRow> for UserProfileModel {
    fn try_from_row(row: &PgRow) -> RepositoryResult<Self> {
        Ok(UserProfileModel {
            user_id: row.try_get("user_id")?,
            name: get_heapless_string(row, "name")?,
            age: row.try_get("age")?,
            gender: row.try_get("gender")?,
            address: row.try_get("address")?,
            phone: get_optional_heapless_string(row, "phone")?,
        })
    }
}

#[async_trait]
impl UserProfileRepository for UserProfileRepositoryImpl {
    async fn find_by_user_id(&self, user_id: Uuid) -> RepositoryResult<Option<UserProfileModel>> {
        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or_else(consumed)?;
            sqlx::query("SELECT * FROM user_profile WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&mut **transaction)
                .await?
        };
        row.as_ref().map(UserProfileModel::try_from_row).transpose()
    }

    async fn upsert(&self, profile: UserProfileModel) -> RepositoryResult<UserProfileModel> {
        let row = {
            let mut tx = self.executor.tx.lock().await;
            let transaction = tx.as_mut().ok_or_else(consumed)?;
            sqlx::query(
                r#"
                INSERT INTO user_profile (user_id, name, age, gender, address, phone)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (user_id) DO UPDATE
                SET name = EXCLUDED.name, age = EXCLUDED.age, gender = EXCLUDED.gender,
                    address = EXCLUDED.address, phone = EXCLUDED.phone
                RETURNING *
                "#,
            )
            .bind(profile.user_id)
            .bind(profile.name.as_str())
            .bind(profile.age)
            .bind(profile.gender)
            .bind(profile.address.as_deref())
            .bind(profile.phone.as_ref().map(|p| p.as_str()))
            .fetch_one(&mut **transaction)
            .await?
        };
        UserProfileModel::try_from_row(&row)
    }

    async fn delete_by_user_id(&self, user_id: Uuid) -> RepositoryResult<bool> {
        let mut tx = self.executor.tx.lock().await;
        let transaction = tx.as_mut().ok_or_else(consumed)?;
        let result = sqlx::query("DELETE FROM user_profile WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut **transaction)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
