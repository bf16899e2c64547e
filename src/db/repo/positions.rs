//! Position record operations for the repository.

use crate::domain::{AccumName, PositionIndex, PositionOptions, Record};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, Transaction};
use tracing::warn;

use super::{decode_coins, decode_decimal, RepoError, Repository};

impl Repository {
    /// Load one position record.
    ///
    /// # Errors
    /// Returns an error if the query fails or a stored column cannot be decoded.
    pub async fn load_position(
        &self,
        name: &AccumName,
        index: &PositionIndex,
    ) -> Result<Option<Record>, RepoError> {
        let row = sqlx::query(
            r#"
            SELECT num_shares, init_accum_value, unclaimed_rewards, options
            FROM positions
            WHERE accum_name = ? AND position_index = ?
            "#,
        )
        .bind(name.as_str())
        .bind(index.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(record_from_row).transpose()
    }

    /// All positions of one accumulator ordered by index.
    ///
    /// Linear in the number of positions; settlement never calls it.
    pub async fn list_positions(
        &self,
        name: &AccumName,
    ) -> Result<Vec<(PositionIndex, Record)>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT position_index, num_shares, init_accum_value, unclaimed_rewards, options
            FROM positions
            WHERE accum_name = ?
            ORDER BY position_index ASC
            "#,
        )
        .bind(name.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let index = PositionIndex::new(row.get::<String, _>("position_index"));
                Ok((index, record_from_row(row)?))
            })
            .collect()
    }

    pub(super) async fn upsert_position(
        tx: &mut Transaction<'_, Sqlite>,
        name: &AccumName,
        index: &PositionIndex,
        record: &Record,
    ) -> Result<(), RepoError> {
        let options = record.options.as_ref().map(|o| o.as_value().to_string());

        sqlx::query(
            r#"
            INSERT INTO positions
            (accum_name, position_index, num_shares, init_accum_value, unclaimed_rewards, options)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(accum_name, position_index) DO UPDATE SET
                num_shares = excluded.num_shares,
                init_accum_value = excluded.init_accum_value,
                unclaimed_rewards = excluded.unclaimed_rewards,
                options = excluded.options
            "#,
        )
        .bind(name.as_str())
        .bind(index.as_str())
        .bind(record.num_shares.to_canonical_string())
        .bind(record.init_accum_value.to_canonical_string())
        .bind(record.unclaimed_rewards.to_canonical_string())
        .bind(options)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    pub(super) async fn delete_position_row(
        tx: &mut Transaction<'_, Sqlite>,
        name: &AccumName,
        index: &PositionIndex,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM positions WHERE accum_name = ? AND position_index = ?")
            .bind(name.as_str())
            .bind(index.as_str())
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}

fn record_from_row(row: &SqliteRow) -> Result<Record, RepoError> {
    let num_shares: String = row.get("num_shares");
    let init_accum_value: String = row.get("init_accum_value");
    let unclaimed_rewards: String = row.get("unclaimed_rewards");
    let options: Option<String> = row.get("options");

    let options = options
        .map(|raw| {
            serde_json::from_str(&raw)
                .map(PositionOptions::new)
                .map_err(|e| {
                    warn!(options = %raw, error = %e, "Failed to parse stored position options");
                    RepoError::Decode {
                        column: "options",
                        value: raw.clone(),
                        reason: e.to_string(),
                    }
                })
        })
        .transpose()?;

    Ok(Record {
        num_shares: decode_decimal("num_shares", &num_shares)?,
        init_accum_value: decode_coins("init_accum_value", &init_accum_value)?,
        unclaimed_rewards: decode_coins("unclaimed_rewards", &unclaimed_rewards)?,
        options,
    })
}

#[cfg(test)]
mod tests {
    use crate::db::migrations::init_db;
    use crate::db::repo::RepoError;
    use crate::db::Repository;
    use crate::domain::{AccumName, Decimal, PositionIndex, PositionOptions, Record};
    use crate::engine::AccumulatorObject;
    use crate::store::StoreWrite;
    use serde_json::json;
    use tempfile::TempDir;

    async fn setup_with_accumulator() -> (Repository, AccumName, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .to_string();
        let pool = init_db(&db_path).await.expect("init_db failed");
        let repo = Repository::new(pool);
        let name = AccumName::new("pool/1");
        repo.apply_writes(&[StoreWrite::Accumulator(AccumulatorObject::new(name.clone()))])
            .await
            .unwrap();
        (repo, name, temp_dir)
    }

    fn record(shares: &str, options: Option<PositionOptions>) -> Record {
        Record {
            num_shares: Decimal::from_str_canonical(shares).unwrap(),
            init_accum_value: "0.1uatom".parse().unwrap(),
            unclaimed_rewards: "3.25uosmo".parse().unwrap(),
            options,
        }
    }

    #[tokio::test]
    async fn test_position_round_trip_with_options() {
        let (repo, name, _temp) = setup_with_accumulator().await;
        let index = PositionIndex::new("osmo1xyz|tick-10");
        let rec = record("60", Some(PositionOptions::new(json!({"frozen": true}))));

        repo.apply_writes(&[StoreWrite::Position {
            accum: name.clone(),
            index: index.clone(),
            record: rec.clone(),
        }])
        .await
        .unwrap();

        assert_eq!(repo.load_position(&name, &index).await.unwrap(), Some(rec));
    }

    #[tokio::test]
    async fn test_delete_and_list_positions() {
        let (repo, name, _temp) = setup_with_accumulator().await;
        let write = |index: &str| StoreWrite::Position {
            accum: name.clone(),
            index: PositionIndex::new(index),
            record: record("1", None),
        };

        repo.apply_writes(&[write("b"), write("a"), write("c")])
            .await
            .unwrap();
        repo.apply_writes(&[StoreWrite::DeletePosition {
            accum: name.clone(),
            index: PositionIndex::new("b"),
        }])
        .await
        .unwrap();

        let listed: Vec<String> = repo
            .list_positions(&name)
            .await
            .unwrap()
            .into_iter()
            .map(|(index, _)| index.as_str().to_string())
            .collect();
        assert_eq!(listed, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_corrupt_row_is_reported_not_defaulted() {
        let (repo, name, _temp) = setup_with_accumulator().await;
        sqlx::query(
            "INSERT INTO positions (accum_name, position_index, num_shares, init_accum_value, unclaimed_rewards) VALUES (?, 'bad', 'x', '', '')",
        )
        .bind(name.as_str())
        .execute(&repo.pool)
        .await
        .unwrap();

        let err = repo
            .load_position(&name, &PositionIndex::new("bad"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Decode { column: "num_shares", .. }));
    }
}
