pub mod ledger;
pub mod sequence;
pub mod session;
pub mod staircase;
