use std::collections::BTreeMap;

use proptest::prelude::*;
use psy_core::errors::PsyError;
use psy_core::{Position, RngHandle, TrialResponse};
use psy_seq::{Sequence, SequenceKind};

fn tally(draws: &[usize]) -> BTreeMap<usize, usize> {
    let mut counts = BTreeMap::new();
    for draw in draws {
        *counts.entry(*draw).or_insert(0) += 1;
    }
    counts
}

#[test]
fn six_conditions_ten_reps() {
    let conditions: Vec<usize> = (0..6).collect();
    let mut seq = Sequence::new(
        conditions,
        SequenceKind::FinitePermuted { n_reps: 10 },
        RngHandle::from_seed(2024),
    )
    .expect("sequence");
    assert_eq!(seq.n_trials(), Some(60));

    let draws: Vec<usize> = seq.by_ref().collect();
    assert_eq!(draws.len(), 60);
    assert!(tally(&draws).values().all(|count| *count == 10));
    assert!(draws.windows(2).all(|pair| pair[0] != pair[1]));
    assert_eq!(seq.remaining(), Some(0));
}

#[test]
fn exhausted_sequence_reports_end() {
    let mut seq = Sequence::new(
        vec!["a", "b"],
        SequenceKind::FinitePermuted { n_reps: 1 },
        RngHandle::from_seed(1),
    )
    .expect("sequence");
    seq.draw().expect("first");
    seq.draw().expect("second");
    let err = seq.draw().unwrap_err();
    assert!(matches!(err, PsyError::EndOfSequence(_)));
    assert!(err.is_recoverable());
}

#[test]
fn singleton_pool_waives_spacing() {
    let seq = Sequence::new(
        vec!["only"],
        SequenceKind::FinitePermuted { n_reps: 4 },
        RngHandle::from_seed(9),
    )
    .expect("sequence");
    assert_eq!(seq.collect::<Vec<_>>(), vec!["only"; 4]);
}

#[test]
fn invalid_parameters_are_rejected() {
    let empty: Vec<u8> = Vec::new();
    let err = Sequence::new(empty, SequenceKind::InfiniteCyclic, RngHandle::from_seed(0)).unwrap_err();
    assert_eq!(err.info().code, "sequence-empty");

    let err = Sequence::new(
        vec![1, 2],
        SequenceKind::FinitePermuted { n_reps: 0 },
        RngHandle::from_seed(0),
    )
    .unwrap_err();
    assert!(matches!(err, PsyError::Configuration(_)));
}

#[test]
fn same_seed_same_order() {
    let build = || {
        Sequence::new(
            (0..5).collect::<Vec<u32>>(),
            SequenceKind::FinitePermuted { n_reps: 3 },
            RngHandle::from_seed(77),
        )
        .expect("sequence")
        .collect::<Vec<_>>()
    };
    assert_eq!(build(), build());
}

#[test]
fn responses_follow_draws() {
    let mut seq = Sequence::new(
        vec!['x', 'y', 'z'],
        SequenceKind::FinitePermuted { n_reps: 2 },
        RngHandle::from_seed(4),
    )
    .expect("sequence");
    let response = TrialResponse::score(Position::First, Position::First);
    assert!(seq.record_response(response).is_err());

    let first = seq.draw().expect("draw");
    assert_eq!(seq.current(), Some(&first));
    seq.record_response(response).expect("record");
    assert!(seq.record_response(response).is_err());

    let record = seq.record();
    assert_eq!(record.order.len(), 1);
    assert_eq!(record.responses, vec![response]);
    assert_eq!(record.conditions[record.order[0]], first);
}

#[test]
fn record_serializes_losslessly() {
    let mut seq = Sequence::new(
        vec![0.1_f64, 1.029, 1.0 / 3.0],
        SequenceKind::FinitePermuted { n_reps: 2 },
        RngHandle::from_seed(12),
    )
    .expect("sequence");
    while seq.draw().is_ok() {
        seq.record_response(TrialResponse::score(Position::Second, Position::First))
            .expect("record");
    }
    let record = seq.record();
    let json = serde_json::to_string(&record).expect("serialize");
    let decoded: psy_seq::SequenceRecord<f64> = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, record);
    assert!(json.contains("\"type\":\"finite_permuted\""));
}

proptest! {
    #[test]
    fn permuted_counts_are_exact(seed in any::<u64>(), k in 1usize..8, n_reps in 1usize..12) {
        let seq = Sequence::new(
            (0..k).collect::<Vec<_>>(),
            SequenceKind::FinitePermuted { n_reps },
            RngHandle::from_seed(seed),
        ).unwrap();
        let draws: Vec<usize> = seq.collect();
        prop_assert_eq!(draws.len(), k * n_reps);
        let counts = tally(&draws);
        prop_assert_eq!(counts.len(), k);
        prop_assert!(counts.values().all(|count| *count == n_reps));
        if k > 1 {
            prop_assert!(draws.windows(2).all(|pair| pair[0] != pair[1]));
        }
    }
}
