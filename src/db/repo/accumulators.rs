//! Accumulator row operations for the repository.

use crate::domain::AccumName;
use crate::engine::AccumulatorObject;
use sqlx::{Row, Sqlite, Transaction};

use super::{decode_coins, decode_decimal, RepoError, Repository};

impl Repository {
    /// Load an accumulator by name.
    ///
    /// # Errors
    /// Returns an error if the query fails or a stored column cannot be decoded.
    pub async fn load_accumulator(
        &self,
        name: &AccumName,
    ) -> Result<Option<AccumulatorObject>, RepoError> {
        let row = sqlx::query("SELECT value, total_shares FROM accumulators WHERE name = ?")
            .bind(name.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| {
            let value: String = r.get("value");
            let total_shares: String = r.get("total_shares");
            Ok(AccumulatorObject::from_parts(
                name.clone(),
                decode_coins("value", &value)?,
                decode_decimal("total_shares", &total_shares)?,
            ))
        })
        .transpose()
    }

    /// Names of all stored accumulators, sorted.
    pub async fn list_accumulator_names(&self) -> Result<Vec<AccumName>, RepoError> {
        let rows = sqlx::query("SELECT name FROM accumulators ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(|row| AccumName::new(row.get::<String, _>("name")))
            .collect())
    }

    pub(super) async fn upsert_accumulator(
        tx: &mut Transaction<'_, Sqlite>,
        accum: &AccumulatorObject,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO accumulators (name, value, total_shares)
            VALUES (?, ?, ?)
            ON CONFLICT(name) DO UPDATE SET
                value = excluded.value,
                total_shares = excluded.total_shares
            "#,
        )
        .bind(accum.name().as_str())
        .bind(accum.value().to_canonical_string())
        .bind(accum.total_shares().to_canonical_string())
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
