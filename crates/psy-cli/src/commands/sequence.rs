use std::error::Error;

use clap::Args;
use psy_core::RngHandle;
use psy_seq::{Sequence, SequenceKind};

#[derive(Args, Debug)]
pub struct SequenceArgs {
    /// Comma separated condition names.
    #[arg(long, value_delimiter = ',', required = true)]
    pub conditions: Vec<String>,
    /// Repetitions of each condition.
    #[arg(long, default_value_t = 1, conflicts_with = "infinite")]
    pub reps: usize,
    /// Draw from an endless reshuffled cycle instead.
    #[arg(long)]
    pub infinite: bool,
    /// Draws to print from an infinite sequence.
    #[arg(long, default_value_t = 20)]
    pub draws: usize,
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
}

pub fn run(args: &SequenceArgs) -> Result<(), Box<dyn Error>> {
    let kind = if args.infinite {
        SequenceKind::InfiniteCyclic
    } else {
        SequenceKind::FinitePermuted { n_reps: args.reps }
    };
    let sequence = Sequence::new(args.conditions.clone(), kind, RngHandle::from_seed(args.seed))?;
    let limit = sequence.n_trials().unwrap_or(args.draws);
    for condition in sequence.take(limit) {
        println!("{condition}");
    }
    Ok(())
}
