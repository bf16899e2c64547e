use accumledger::{AccumName, DecCoins, Decimal, Ledger, MemStore, PositionIndex};
use proptest::prelude::*;

const DENOMS: [&str; 2] = ["uatom", "uosmo"];
const HOLDERS: [&str; 4] = ["a", "b", "c", "d"];

#[derive(Debug, Clone)]
enum Step {
    Increase { denom: usize, mantissa: i64, scale: u32 },
    Create { holder: usize, shares: i64 },
    Add { holder: usize, shares: i64 },
    Remove { holder: usize, shares: i64 },
    Claim { holder: usize },
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0..DENOMS.len(), 0i64..10_000, 0u32..4).prop_map(|(denom, mantissa, scale)| {
            Step::Increase {
                denom,
                mantissa,
                scale,
            }
        }),
        (0..HOLDERS.len(), 0i64..500).prop_map(|(holder, shares)| Step::Create { holder, shares }),
        (0..HOLDERS.len(), 0i64..500).prop_map(|(holder, shares)| Step::Add { holder, shares }),
        (0..HOLDERS.len(), 1i64..600).prop_map(|(holder, shares)| Step::Remove { holder, shares }),
        (0..HOLDERS.len()).prop_map(|holder| Step::Claim { holder }),
    ]
}

fn live_rewards(ledger: &Ledger<MemStore>, name: &AccumName) -> DecCoins {
    ledger
        .store()
        .positions_of(name)
        .map(|(index, _)| ledger.preview_rewards(name, index, &DecCoins::new()).unwrap())
        .fold(DecCoins::new(), |acc, r| acc.checked_add(&r).unwrap())
}

proptest! {
    #[test]
    fn rewards_are_conserved(steps in proptest::collection::vec(arb_step(), 1..60)) {
        let mut ledger = Ledger::new(MemStore::new());
        let name = AccumName::new("pool/prop");
        ledger.create_accumulator(&name).unwrap();

        let none = DecCoins::new();
        let mut funded = DecCoins::new();
        let mut paid = DecCoins::new();

        for step in steps {
            match step {
                Step::Increase { denom, mantissa, scale } => {
                    let per_share = DecCoins::from_coin(
                        DENOMS[denom],
                        Decimal::new(rust_decimal::Decimal::new(mantissa, scale)),
                    );
                    let shares = ledger.get_total_shares(&name).unwrap();
                    ledger.increase_value(&name, &per_share).unwrap();
                    let funding = per_share.checked_mul_dec(shares).unwrap();
                    funded = funded.checked_add(&funding).unwrap();
                }
                Step::Create { holder, shares } => {
                    let _ = ledger.create_position(
                        &name,
                        &PositionIndex::new(HOLDERS[holder]),
                        Decimal::from(shares),
                        None,
                    );
                }
                Step::Add { holder, shares } => {
                    let _ = ledger.add_to_position(
                        &name,
                        &PositionIndex::new(HOLDERS[holder]),
                        Decimal::from(shares),
                        &none,
                    );
                }
                Step::Remove { holder, shares } => {
                    if let Ok(Some(payout)) = ledger.remove_from_position(
                        &name,
                        &PositionIndex::new(HOLDERS[holder]),
                        Decimal::from(shares),
                        &none,
                    ) {
                        paid = paid.checked_add(&payout).unwrap();
                    }
                }
                Step::Claim { holder } => {
                    if let Ok(payout) = ledger.claim_rewards(
                        &name,
                        &PositionIndex::new(HOLDERS[holder]),
                        &none,
                    ) {
                        paid = paid.checked_add(&payout).unwrap();
                    }
                }
            }

            let outstanding = live_rewards(&ledger, &name);
            prop_assert_eq!(paid.checked_add(&outstanding).unwrap(), funded.clone());

            let share_sum: Decimal = ledger
                .store()
                .positions_of(&name)
                .map(|(_, record)| record.num_shares)
                .sum();
            prop_assert_eq!(share_sum, ledger.get_total_shares(&name).unwrap());
        }
    }

    #[test]
    fn negative_delta_always_rejected(
        mantissa in 1i64..1_000_000,
        scale in 0u32..6,
        seeded in 0i64..1_000,
    ) {
        let mut ledger = Ledger::new(MemStore::new());
        let name = AccumName::new("pool/prop");
        ledger.create_accumulator(&name).unwrap();
        ledger
            .increase_value(&name, &DecCoins::from_coin("uatom", Decimal::from(seeded)))
            .unwrap();
        let before = ledger.get_accumulator(&name).unwrap();

        let delta = DecCoins::from_coin("uosmo", Decimal::from(1))
            .checked_add(&DecCoins::from_coin(
                "uatom",
                -Decimal::new(rust_decimal::Decimal::new(mantissa, scale)),
            ))
            .unwrap();
        prop_assert!(ledger.increase_value(&name, &delta).is_err());
        prop_assert_eq!(ledger.get_accumulator(&name).unwrap(), before);
    }

    #[test]
    fn second_claim_pays_nothing(shares in 1i64..10_000, growth in 1i64..10_000) {
        let mut ledger = Ledger::new(MemStore::new());
        let name = AccumName::new("pool/prop");
        let index = PositionIndex::new("a");
        ledger.create_accumulator(&name).unwrap();
        ledger.create_position(&name, &index, Decimal::from(shares), None).unwrap();
        ledger
            .increase_value(&name, &DecCoins::from_coin("uatom", Decimal::from(growth)))
            .unwrap();

        let first = ledger.claim_rewards(&name, &index, &DecCoins::new()).unwrap();
        let second = ledger.claim_rewards(&name, &index, &DecCoins::new()).unwrap();
        prop_assert!(!first.is_zero());
        prop_assert!(second.is_zero());
    }
}
