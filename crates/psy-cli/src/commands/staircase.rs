use std::error::Error;

use clap::{Args, ValueEnum};
use psy_core::RngHandle;
use psy_exp::StaircasePlan;
use psy_stairs::{simulate_run, PsychometricObserver};

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Preset {
    Practice,
    Measurement,
}

#[derive(Args, Debug)]
pub struct StaircaseArgs {
    /// Level at which the simulated listener is 75% correct.
    #[arg(long)]
    pub threshold: f64,
    /// Spread of the listener's psychometric function.
    #[arg(long, default_value_t = 1.0)]
    pub width: f64,
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    #[arg(long, value_enum, default_value_t = Preset::Measurement)]
    pub preset: Preset,
    /// Number of stimulus values the levels index into.
    #[arg(long, default_value_t = 11)]
    pub values: usize,
    /// Reversals averaged into the threshold estimate.
    #[arg(long, default_value_t = 6)]
    pub threshold_reversals: usize,
    /// Safety cap on simulated trials.
    #[arg(long, default_value_t = 10_000)]
    pub max_trials: usize,
}

pub fn run(args: &StaircaseArgs) -> Result<(), Box<dyn Error>> {
    let plan = match args.preset {
        Preset::Practice => StaircasePlan::practice(),
        Preset::Measurement => StaircasePlan::measurement(),
    };
    let config = plan.to_config(args.values)?;
    let observer = PsychometricObserver::new(args.threshold, args.width)?;
    let mut rng = RngHandle::from_seed(args.seed);
    let summary = simulate_run(
        config,
        &observer,
        &mut rng,
        args.max_trials,
        args.threshold_reversals,
    )?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
