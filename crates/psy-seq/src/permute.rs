use std::collections::HashMap;

use psy_core::RngHandle;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// Full shuffles tried before switching to the constructive sampler.
pub(crate) const MAX_REJECTION_ATTEMPTS: usize = 10_000;

/// Order in which each of `k` indices occurs exactly `n_reps` times with no two
/// equal neighbours (unless `k == 1`), drawn uniformly from all such orders.
///
/// Rejection sampling of full shuffles is tried first. When valid orders are
/// too rare for it to succeed, [`uniform_order`] builds one position at a time
/// with weights equal to the number of valid completions, which draws from the
/// same distribution.
pub(crate) fn permuted_order(k: usize, n_reps: usize, rng: &mut RngHandle) -> Vec<usize> {
    let mut pool: Vec<usize> = (0..k)
        .flat_map(|index| std::iter::repeat(index).take(n_reps))
        .collect();
    if k < 2 {
        return pool;
    }
    for _ in 0..MAX_REJECTION_ATTEMPTS {
        pool.shuffle(rng);
        if !has_adjacent_repeat(&pool) {
            return pool;
        }
    }
    debug!(k, n_reps, "rejection sampling exhausted, sampling by completion counts");
    uniform_order(k, n_reps, rng)
}

/// One pass over all `k` indices whose first element differs from `previous`.
pub(crate) fn cyclic_block(k: usize, previous: Option<usize>, rng: &mut RngHandle) -> Vec<usize> {
    let mut block: Vec<usize> = (0..k).collect();
    block.shuffle(rng);
    if k > 1 && previous == Some(block[0]) {
        let other = rng.gen_range(1..k);
        block.swap(0, other);
    }
    block
}

pub(crate) fn has_adjacent_repeat(order: &[usize]) -> bool {
    order.windows(2).any(|pair| pair[0] == pair[1])
}

/// Memoized natural log of the number of repeat-free orders that use up the
/// remaining counts without starting on `previous`.
///
/// Indices with equal counts are interchangeable, so a state is keyed by the
/// sorted counts plus the remaining count of the previous index.
#[derive(Debug, Default)]
struct Completions {
    memo: HashMap<(Vec<usize>, Option<usize>), f64>,
}

impl Completions {
    fn ln_count(&mut self, counts: &[usize], previous: Option<usize>) -> f64 {
        if counts.iter().all(|count| *count == 0) {
            return 0.0;
        }
        let mut sorted = counts.to_vec();
        sorted.sort_unstable();
        let key = (sorted, previous.map(|index| counts[index]));
        if let Some(value) = self.memo.get(&key) {
            return *value;
        }

        let mut terms = Vec::with_capacity(counts.len());
        let mut child = counts.to_vec();
        for index in 0..counts.len() {
            if counts[index] == 0 || Some(index) == previous {
                continue;
            }
            child[index] -= 1;
            terms.push(self.ln_count(&child, Some(index)));
            child[index] += 1;
        }
        let value = ln_sum_exp(&terms);
        self.memo.insert(key, value);
        value
    }
}

fn ln_sum_exp(terms: &[f64]) -> f64 {
    let max = terms.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return max;
    }
    max + terms.iter().map(|term| (term - max).exp()).sum::<f64>().ln()
}

/// Exact uniform sampler over repeat-free orders: every position is filled
/// with probability proportional to the number of valid completions it leaves.
fn uniform_order(k: usize, n_reps: usize, rng: &mut RngHandle) -> Vec<usize> {
    let mut completions = Completions::default();
    let mut counts = vec![n_reps; k];
    let mut order = Vec::with_capacity(k * n_reps);
    let mut previous: Option<usize> = None;
    for _ in 0..k * n_reps {
        let mut candidates = Vec::with_capacity(k);
        let mut ln_weights = Vec::with_capacity(k);
        for index in 0..k {
            if counts[index] == 0 || Some(index) == previous {
                continue;
            }
            counts[index] -= 1;
            candidates.push(index);
            ln_weights.push(completions.ln_count(&counts, Some(index)));
            counts[index] += 1;
        }
        let max = ln_weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let weights = ln_weights.iter().map(|weight| (weight - max).exp());
        let Ok(distribution) = WeightedIndex::new(weights) else {
            break;
        };
        let next = candidates[distribution.sample(rng)];
        counts[next] -= 1;
        order.push(next);
        previous = Some(next);
    }
    order
}
