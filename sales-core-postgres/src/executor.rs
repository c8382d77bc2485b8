use sqlx::{Postgres, Transaction};
use std::sync::Arc;
use tokio::sync::Mutex;

use sales_core_db::{RepositoryError, RepositoryResult};

/// One database transaction shared by every repository of a session.
///
/// The transaction is taken out on commit or rollback; repositories still
/// holding the executor then fail with [`consumed`].
#[derive(Clone)]
pub struct Executor {
    pub tx: Arc<Mutex<Option<Transaction<'static, Postgres>>>>,
}

impl Executor {
    pub fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self {
            tx: Arc::new(Mutex::new(Some(tx))),
        }
    }

    pub async fn commit(&self) -> RepositoryResult<()> {
        let tx = self.tx.lock().await.take().ok_or_else(consumed)?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn rollback(&self) -> RepositoryResult<()> {
        let tx = self.tx.lock().await.take().ok_or_else(consumed)?;
        tx.rollback().await?;
        Ok(())
    }
}

pub fn consumed() -> RepositoryError {
    RepositoryError::Query("transaction has been consumed".into())
}
