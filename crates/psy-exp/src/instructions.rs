//! Operator-facing instruction texts.

use psy_core::Dimension;

const PREAMBLE: [&str; 2] = [
    "Two sounds are presented in each trial.",
    "They are always different, but sometimes",
];

/// Lines shown before a JND staircase for `dimension`.
pub fn jnd(dimension: Dimension) -> Vec<&'static str> {
    let specific: [&str; 3] = match dimension {
        Dimension::Room => [
            "they are played in two rooms with different sizes,",
            "and sometimes both are played in the same room.",
            "Was the larger room presented first or second?",
        ],
        Dimension::Voice => [
            "they are spoken by two different persons (one larger, one smaller),",
            "and sometimes both are spoken by the same person.",
            "Was the larger person presented first or second?",
        ],
        Dimension::Itd => [
            "they are played from two different directions (one slightly to the left),",
            "and sometimes both are played from straight ahead.",
            "Was the sound slightly from the left played first or second?",
        ],
    };
    let mut lines = PREAMBLE.to_vec();
    lines.extend(specific);
    lines.push("Press 1 for first, 2 for second.");
    lines.push("The difference will get more and more difficult to hear.");
    lines
}

/// Lines shown before every interference block.
pub fn interference() -> Vec<&'static str> {
    let mut lines = PREAMBLE.to_vec();
    lines.extend(jnd(Dimension::Room).into_iter().skip(2).take(3));
    lines.push("Press 1 for first, 2 for second.");
    lines
}

pub const START_JND: &str = "Press enter to start JND estimation...";
pub const START_BLOCK: &str = "Press enter to start the test...";
pub const REPEAT_JND: &str =
    "Press enter to continue, \"r\" to repeat this threshold measurement.";
pub const MAIN_PART: [&str; 2] = [
    "The main part of the experiment starts now (interference task).",
    "Blocks of about 4min each are presented with pauses inbetween.",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_dimension_asks_a_question() {
        for dimension in Dimension::ALL {
            let lines = jnd(dimension);
            assert_eq!(lines.len(), 7);
            assert!(lines[4].ends_with('?'));
        }
        assert_eq!(interference()[4], "Was the larger room presented first or second?");
    }
}
