//! Hit and false-alarm scoring of interference blocks.

use std::collections::BTreeSet;

use psy_core::{Condition, TrialResponse};
use psy_seq::SequenceRecord;
use serde::{Deserialize, Serialize};

/// What the hit and false-alarm counts are divided by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Denominator {
    /// Every trial of the block, signal or not.
    AllTrials,
    /// Signal trials for hits, non-signal trials for false alarms.
    #[default]
    PerClass,
}

/// Decides which conditions count as signal trials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRule {
    #[serde(default = "default_signal_labels")]
    pub signal_labels: BTreeSet<String>,
    #[serde(default)]
    pub denominator: Denominator,
}

fn default_signal_labels() -> BTreeSet<String> {
    ["room", "room_voice", "room_itd"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for ScoringRule {
    fn default() -> Self {
        Self {
            signal_labels: default_signal_labels(),
            denominator: Denominator::default(),
        }
    }
}

/// Counts and rates of one scored block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitRates {
    pub hits: usize,
    pub false_alarms: usize,
    pub signal_trials: usize,
    pub noise_trials: usize,
    /// Zero when the denominator is zero.
    pub hit_rate: f64,
    pub false_alarm_rate: f64,
}

impl ScoringRule {
    pub fn is_signal(&self, condition: &Condition) -> bool {
        self.signal_labels.contains(&condition.label)
    }

    /// Scores `(condition, response)` pairs in presentation order.
    pub fn score<'a, I>(&self, trials: I) -> HitRates
    where
        I: IntoIterator<Item = (&'a Condition, &'a TrialResponse)>,
    {
        let (mut hits, mut false_alarms, mut signal_trials, mut noise_trials) = (0, 0, 0, 0);
        for (condition, response) in trials {
            if self.is_signal(condition) {
                signal_trials += 1;
                hits += usize::from(response.target_chosen);
            } else {
                noise_trials += 1;
                false_alarms += usize::from(response.target_chosen);
            }
        }
        let (hit_base, fa_base) = match self.denominator {
            Denominator::AllTrials => (signal_trials + noise_trials, signal_trials + noise_trials),
            Denominator::PerClass => (signal_trials, noise_trials),
        };
        HitRates {
            hits,
            false_alarms,
            signal_trials,
            noise_trials,
            hit_rate: rate(hits, hit_base),
            false_alarm_rate: rate(false_alarms, fa_base),
        }
    }

    /// Scores every answered trial of a block record.
    pub fn score_record(&self, record: &SequenceRecord<Condition>) -> HitRates {
        self.score(
            record
                .order
                .iter()
                .map(|index| &record.conditions[*index])
                .zip(record.responses.iter()),
        )
    }
}

fn rate(count: usize, base: usize) -> f64 {
    if base == 0 {
        0.0
    } else {
        count as f64 / base as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use psy_core::Position;

    fn condition(label: &str) -> Condition {
        Condition {
            voice: 0.98,
            room: 40.0,
            itd: 0.0,
            label: label.into(),
        }
    }

    fn answered(target_chosen: bool) -> TrialResponse {
        let chosen = if target_chosen { Position::First } else { Position::Second };
        TrialResponse::score(Position::First, chosen)
    }

    #[test]
    fn voice_only_trials_are_not_signal() {
        let rule = ScoringRule::default();
        assert!(rule.is_signal(&condition("room_voice")));
        assert!(!rule.is_signal(&condition("voice")));
        assert!(!rule.is_signal(&condition("default")));
        assert!(!rule.is_signal(&condition("roomy")));
    }

    #[test]
    fn per_class_and_all_trial_rates() {
        let conditions = [
            condition("room"),
            condition("room_itd"),
            condition("default"),
            condition("itd"),
            condition("voice"),
            condition("room_voice"),
        ];
        let responses = [
            answered(true),
            answered(false),
            answered(true),
            answered(false),
            answered(false),
            answered(true),
        ];
        let pairs = || conditions.iter().zip(responses.iter());

        let per_class = ScoringRule::default().score(pairs());
        assert_eq!((per_class.hits, per_class.false_alarms), (2, 1));
        assert_eq!((per_class.signal_trials, per_class.noise_trials), (3, 3));
        assert!((per_class.hit_rate - 2.0 / 3.0).abs() < 1e-12);
        assert!((per_class.false_alarm_rate - 1.0 / 3.0).abs() < 1e-12);

        let legacy = ScoringRule {
            denominator: Denominator::AllTrials,
            ..ScoringRule::default()
        };
        let all = legacy.score(pairs());
        assert!((all.hit_rate - 2.0 / 6.0).abs() < 1e-12);
        assert!((all.false_alarm_rate - 1.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn empty_block_scores_zero() {
        let rates = ScoringRule::default().score(std::iter::empty());
        assert_eq!(rates.hit_rate, 0.0);
        assert_eq!(rates.false_alarm_rate, 0.0);
    }
}
