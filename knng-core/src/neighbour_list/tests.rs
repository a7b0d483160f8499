use proptest::prelude::*;
use rand::{SeedableRng, rngs::SmallRng};
use rstest::{fixture, rstest};

use super::{NeighbourList, Sampled};
use crate::{error::KnnError, test_utils::suite_proptest_config};

#[fixture]
fn rng() -> SmallRng {
    SmallRng::seed_from_u64(11)
}

fn ids(list: &NeighbourList) -> Vec<usize> {
    list.snapshot().into_iter().map(|n| n.id).collect()
}

#[rstest]
fn fills_until_capacity_in_descending_order(mut rng: SmallRng) {
    let list = NeighbourList::new(0, 3);
    for (id, similarity) in [(1, 0.2), (2, 0.9), (3, 0.5)] {
        assert!(list.try_insert(id, similarity, 0.0, &mut rng).expect("insert"));
    }
    assert_eq!(ids(&list), vec![2, 3, 1]);
    assert_eq!(list.snapshot().last().map(|n| n.similarity), Some(0.2));
}

#[rstest]
fn evicts_minimum_for_better_candidate(mut rng: SmallRng) {
    let list = NeighbourList::new(0, 2);
    list.try_insert(1, 0.3, 0.0, &mut rng).expect("insert");
    list.try_insert(2, 0.6, 0.0, &mut rng).expect("insert");

    assert!(list.try_insert(3, 0.4, 0.0, &mut rng).expect("insert"));
    assert_eq!(ids(&list), vec![2, 3]);
    assert!(!list.try_insert(4, 0.1, 0.0, &mut rng).expect("insert"));
    assert_eq!(list.len(), 2);
}

#[rstest]
fn ignores_duplicates(mut rng: SmallRng) {
    let list = NeighbourList::new(0, 4);
    assert!(list.try_insert(5, 0.5, 0.0, &mut rng).expect("insert"));
    assert!(!list.try_insert(5, 0.9, 0.0, &mut rng).expect("insert"));
    assert_eq!(list.snapshot()[0].similarity, 0.5);
}

#[rstest]
#[case(0.0, false)]
#[case(1.0, true)]
fn ties_at_capacity_follow_perturbation_rate(
    mut rng: SmallRng,
    #[case] rate: f64,
    #[case] replaced: bool,
) {
    let list = NeighbourList::new(0, 1);
    list.try_insert(1, 0.5, rate, &mut rng).expect("insert");
    assert_eq!(
        list.try_insert(2, 0.5, rate, &mut rng).expect("insert"),
        replaced
    );
    assert_eq!(ids(&list), vec![if replaced { 2 } else { 1 }]);
}

#[rstest]
fn rejects_self_loops(mut rng: SmallRng) {
    let list = NeighbourList::new(4, 2);
    let err = list
        .try_insert(4, 1.0, 0.0, &mut rng)
        .expect_err("self insert must fail");
    assert!(matches!(err, KnnError::InvariantViolation { .. }));
}

#[rstest]
fn rejects_undefined_similarity(mut rng: SmallRng) {
    let list = NeighbourList::new(0, 2);
    let err = list
        .try_insert(1, f64::NAN, 0.0, &mut rng)
        .expect_err("NaN must fail");
    assert!(matches!(err, KnnError::InvariantViolation { .. }));
    assert_eq!(list.len(), 0);
}

#[rstest]
fn sampling_new_entries_marks_them_checked(mut rng: SmallRng) {
    let list = NeighbourList::new(0, 4);
    for id in 1..=4 {
        list.try_insert(id, id as f64, 0.0, &mut rng).expect("insert");
    }

    let new = list.sample(Sampled::New, 4, &mut rng).expect("sample new");
    assert_eq!(new.len(), 4);
    assert!(list.sample(Sampled::New, 4, &mut rng).expect("sample").is_empty());

    let old = list.sample(Sampled::Old, 4, &mut rng).expect("sample old");
    assert_eq!(old, new);
}

#[rstest]
fn sampling_respects_max_size(mut rng: SmallRng) {
    let list = NeighbourList::new(0, 8);
    for id in 1..=8 {
        list.try_insert(id, 1.0 / id as f64, 0.0, &mut rng)
            .expect("insert");
    }
    let sampled = list.sample(Sampled::New, 3, &mut rng).expect("sample");
    assert_eq!(sampled.len(), 3);
    let remaining = list.sample(Sampled::New, 8, &mut rng).expect("sample");
    assert_eq!(sampled.len() + remaining.len(), 8);
}

#[rstest]
fn sampling_is_independent_of_rank(mut rng: SmallRng) {
    const TRIALS: usize = 20_000;
    let mut picks = [0_usize; 10];
    for _ in 0..TRIALS {
        let list = NeighbourList::new(0, 10);
        for id in 1..=10 {
            list.try_insert(id, 1.0 - id as f64 / 100.0, 0.0, &mut rng)
                .expect("insert");
        }
        let sampled = list.sample(Sampled::New, 5, &mut rng).expect("sample");
        assert_eq!(sampled.len(), 5);
        for id in sampled {
            picks[id - 1] += 1;
        }
    }
    for (rank, &count) in picks.iter().enumerate() {
        let frequency = count as f64 / TRIALS as f64;
        assert!(
            (frequency - 0.5).abs() < 0.03,
            "rank {rank} selected with frequency {frequency}"
        );
    }
}

#[rstest]
fn clearing_snapshot_resets_checked_flags(mut rng: SmallRng) {
    let list = NeighbourList::new(0, 2);
    list.try_insert(1, 0.7, 0.0, &mut rng).expect("insert");
    list.try_insert(2, 0.1, 0.0, &mut rng).expect("insert");
    list.sample(Sampled::New, 2, &mut rng).expect("sample");

    let snapshot = list.snapshot_clearing_checked();
    assert_eq!(snapshot.len(), 2);
    assert!(list.sample(Sampled::Old, 2, &mut rng).expect("sample").is_empty());
}

proptest! {
    #![proptest_config(suite_proptest_config(128))]

    #[test]
    fn list_stays_bounded_sorted_and_unique(
        capacity in 1_usize..8,
        offers in prop::collection::vec((1_usize..32, -1.0_f64..1.0), 0..64),
        seed in any::<u64>(),
    ) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let list = NeighbourList::new(0, capacity);
        let mut floor = f64::NEG_INFINITY;
        for (id, similarity) in offers {
            list.try_insert(id, similarity, 0.5, &mut rng)
                .map_err(|err| TestCaseError::fail(err.to_string()))?;
            let snapshot = list.snapshot();
            prop_assert!(snapshot.len() <= capacity);
            prop_assert!(snapshot.windows(2).all(|w| w[0].similarity >= w[1].similarity));
            let mut seen: Vec<usize> = snapshot.iter().map(|n| n.id).collect();
            seen.sort_unstable();
            seen.dedup();
            prop_assert_eq!(seen.len(), snapshot.len());
            if snapshot.len() == capacity {
                let minimum = snapshot[capacity - 1].similarity;
                prop_assert!(minimum >= floor);
                floor = minimum;
            }
        }
    }
}
