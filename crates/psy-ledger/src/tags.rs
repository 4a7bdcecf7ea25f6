//! Tag vocabulary shared between sessions and analysis tools.

use psy_core::Dimension;

/// Session provenance, first entry of every session.
pub const SESSION: &str = "session";
/// Phase marker written before a measurement starts.
pub const TIME: &str = "time";
/// Full record of an interference block sequence.
pub const TRIALS: &str = "trials";
/// Hit and false-alarm rates of an interference block.
pub const SCORES: &str = "scores";

/// Threshold (in levels) measured for `dimension`.
pub fn jnd(dimension: Dimension) -> String {
    format!("jnd {dimension}")
}

/// Stimulus value the threshold maps to.
pub fn jnd_condition_value(dimension: Dimension) -> String {
    format!("jnd condition value {dimension}")
}

/// Summary of the measurement staircase.
pub fn jnd_staircase(dimension: Dimension) -> String {
    format!("jnd staircase {dimension}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_tags_are_stable() {
        assert_eq!(jnd(Dimension::Room), "jnd room");
        assert_eq!(jnd_condition_value(Dimension::Voice), "jnd condition value voice");
        assert_eq!(jnd_staircase(Dimension::Itd), "jnd staircase itd");
    }
}
