use std::collections::BTreeSet;

use proptest::prelude::*;
use psy_core::RngHandle;
use psy_seq::{Sequence, SequenceKind};

#[test]
fn words_never_repeat_back_to_back() {
    let words = vec!["Aertel", "Apor", "Aucke"];
    let mut seq = Sequence::new(words, SequenceKind::InfiniteCyclic, RngHandle::from_seed(8))
        .expect("sequence");
    assert_eq!(seq.n_trials(), None);
    assert_eq!(seq.remaining(), None);

    let draws: Vec<&str> = (0..300).map(|_| seq.draw().expect("infinite")).collect();
    assert!(draws.windows(2).all(|pair| pair[0] != pair[1]));
    assert_eq!(seq.draws(), 300);
}

#[test]
fn long_runs_keep_only_the_current_pass() {
    let mut seq = Sequence::new(vec![1, 2, 3, 4], SequenceKind::InfiniteCyclic, RngHandle::from_seed(5))
        .expect("sequence");
    let mut last = 0;
    for _ in 0..10_002 {
        last = seq.draw().expect("infinite");
    }
    assert_eq!(seq.draws(), 10_002);
    assert_eq!(seq.current(), Some(&last));
    let record = seq.record();
    assert_eq!(record.order.len(), 2);
    assert_eq!(record.conditions[record.order[1]], last);
}

#[test]
fn singleton_cycle_repeats_forever() {
    let mut seq = Sequence::new(vec![42], SequenceKind::InfiniteCyclic, RngHandle::from_seed(0))
        .expect("sequence");
    assert!((0..10).all(|_| seq.draw().unwrap() == 42));
}

proptest! {
    #[test]
    fn every_pass_covers_all_conditions(seed in any::<u64>(), k in 2usize..7, passes in 2usize..20) {
        let seq = Sequence::new(
            (0..k).collect::<Vec<_>>(),
            SequenceKind::InfiniteCyclic,
            RngHandle::from_seed(seed),
        ).unwrap();
        let draws: Vec<usize> = seq.take(k * passes).collect();
        for pass in draws.chunks(k) {
            let seen: BTreeSet<usize> = pass.iter().copied().collect();
            prop_assert_eq!(seen.len(), k);
        }
        prop_assert!(draws.windows(2).all(|pair| pair[0] != pair[1]));
    }
}
