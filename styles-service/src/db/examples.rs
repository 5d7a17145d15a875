//! Example table queries

use serde_json::Value;

use super::Database;
use crate::error::StoreError;

impl Database {
    /// Every row of `example_table`, each serialized by Postgres to a JSON object
    pub async fn list_examples(&self) -> Result<Vec<Value>, StoreError> {
        let rows = sqlx::query_scalar::<_, Value>("SELECT to_jsonb(t) FROM example_table t")
            .fetch_all(self.pool())
            .await?;
        Ok(rows)
    }
}
