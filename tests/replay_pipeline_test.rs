use accumledger::orchestration::{replay_file, replay_str, ReplayError};
use accumledger::{init_db, AccumName, DecCoins, Decimal, PositionIndex, Repository, TxExecutor};
use std::sync::Arc;
use tempfile::TempDir;

const OPS: &str = r#"
# pool with two holders, one partially exiting
{"op":"create_accumulator","accum":"pool/1"}
{"op":"create_position","accum":"pool/1","index":"a","num_shares":"100","options":{"tick_lower":-10}}
{"op":"distribute_rewards","accum":"pool/1","rewards":"10uX"}
{"op":"remove_from_position","accum":"pool/1","index":"a","delta":"40"}
{"op":"create_position","accum":"pool/1","index":"b","num_shares":"40"}
{"op":"distribute_rewards","accum":"pool/1","rewards":"6uX"}
{"op":"claim_rewards","accum":"pool/1","index":"a"}
"#;

fn db_path(temp: &TempDir) -> String {
    temp.path().join("ledger.db").to_string_lossy().to_string()
}

#[tokio::test]
async fn test_replay_file_survives_reopen() {
    let temp = TempDir::new().unwrap();
    let ops_path = temp.path().join("ops.jsonl");
    tokio::fs::write(&ops_path, OPS).await.unwrap();

    let pool = init_db(&db_path(&temp)).await.unwrap();
    let executor = TxExecutor::new(Arc::new(Repository::new(pool.clone())), false);
    let summary = replay_file(&executor, &ops_path, true).await.unwrap();
    assert_eq!(summary.applied, 7);
    assert_eq!(summary.payouts, "13.6uX".parse::<DecCoins>().unwrap());
    pool.close().await;

    let repo = Repository::new(init_db(&db_path(&temp)).await.unwrap());
    let name = AccumName::new("pool/1");
    let accum = repo.load_accumulator(&name).await.unwrap().unwrap();
    assert_eq!(accum.total_shares(), Decimal::from(100));
    assert_eq!(accum.value(), &"0.16uX".parse::<DecCoins>().unwrap());

    let positions = repo.list_positions(&name).await.unwrap();
    assert_eq!(positions.len(), 2);
    let (index, a) = &positions[0];
    assert_eq!(index, &PositionIndex::new("a"));
    assert_eq!(a.num_shares, Decimal::from(60));
    assert!(a.unclaimed_rewards.is_zero());
    assert_eq!(a.init_accum_value, accum.value().clone());
    assert_eq!(
        a.options.as_ref().map(|o| o.as_value()["tick_lower"].as_i64()),
        Some(Some(-10))
    );

    // b joined after the first distribution and holds 40 of 100 shares.
    let (_, b) = &positions[1];
    assert_eq!(b.init_accum_value, "0.1uX".parse::<DecCoins>().unwrap());
}

#[tokio::test]
async fn test_failed_operation_leaves_database_untouched() {
    let temp = TempDir::new().unwrap();
    let pool = init_db(&db_path(&temp)).await.unwrap();
    let repo = Arc::new(Repository::new(pool));
    let executor = TxExecutor::new(repo.clone(), false);

    let input = concat!(
        "{\"op\":\"create_accumulator\",\"accum\":\"p\"}\n",
        "{\"op\":\"create_position\",\"accum\":\"p\",\"index\":\"a\",\"num_shares\":\"10\"}\n",
        "{\"op\":\"remove_from_position\",\"accum\":\"p\",\"index\":\"a\",\"delta\":\"11\"}\n",
        "{\"op\":\"increase_value\",\"accum\":\"p\",\"delta\":\"-1uX\"}\n",
    );
    let summary = replay_str(&executor, input, false).await.unwrap();
    assert_eq!(summary.applied, 2);
    assert_eq!(summary.failed, 2);

    let name = AccumName::new("p");
    let accum = repo.load_accumulator(&name).await.unwrap().unwrap();
    assert_eq!(accum.total_shares(), Decimal::from(10));
    assert!(accum.value().is_zero());
    let record = repo
        .load_position(&name, &PositionIndex::new("a"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.num_shares, Decimal::from(10));
}

#[tokio::test]
async fn test_admin_override_requires_opt_in() {
    let temp = TempDir::new().unwrap();
    let pool = init_db(&db_path(&temp)).await.unwrap();
    let repo = Arc::new(Repository::new(pool));
    let input = concat!(
        "{\"op\":\"create_accumulator\",\"accum\":\"p\"}\n",
        "{\"op\":\"set_accumulator_value\",\"accum\":\"p\",\"value\":\"5uX\"}\n",
    );

    let locked = TxExecutor::new(repo.clone(), false);
    let err = replay_str(&locked, input, true).await.unwrap_err();
    assert!(matches!(err, ReplayError::Execute { line: 2, .. }));

    let open = TxExecutor::new(repo.clone(), true);
    let input = "{\"op\":\"set_accumulator_value\",\"accum\":\"p\",\"value\":\"5uX\"}\n";
    replay_str(&open, input, true).await.unwrap();
    let accum = repo
        .load_accumulator(&AccumName::new("p"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(accum.value(), &"5uX".parse::<DecCoins>().unwrap());
}

#[tokio::test]
async fn test_overflowing_claim_is_counted_and_skipped() {
    let temp = TempDir::new().unwrap();
    let pool = init_db(&db_path(&temp)).await.unwrap();
    let repo = Arc::new(Repository::new(pool));
    let executor = TxExecutor::new(repo.clone(), false);

    let input = concat!(
        "{\"op\":\"create_accumulator\",\"accum\":\"p\"}\n",
        "{\"op\":\"create_position\",\"accum\":\"p\",\"index\":\"whale\",\"num_shares\":\"1000000000000000\"}\n",
        "{\"op\":\"increase_value\",\"accum\":\"p\",\"delta\":\"1000000000000000uX\"}\n",
        "{\"op\":\"claim_rewards\",\"accum\":\"p\",\"index\":\"whale\"}\n",
        "{\"op\":\"create_position\",\"accum\":\"p\",\"index\":\"minnow\",\"num_shares\":\"1\"}\n",
    );
    let summary = replay_str(&executor, input, false).await.unwrap();
    assert_eq!(summary.applied, 4);
    assert_eq!(summary.failed, 1);
    assert!(summary.payouts.is_zero());

    let whale = repo
        .load_position(&AccumName::new("p"), &PositionIndex::new("whale"))
        .await
        .unwrap()
        .unwrap();
    assert!(whale.init_accum_value.is_zero());
    assert!(whale.unclaimed_rewards.is_zero());

    let claim = "{\"op\":\"claim_rewards\",\"accum\":\"p\",\"index\":\"whale\"}\n";
    let err = replay_str(&executor, claim, true).await.unwrap_err();
    assert!(matches!(err, ReplayError::Execute { line: 1, .. }));
}
