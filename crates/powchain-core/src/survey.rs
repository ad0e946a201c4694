//! Trial-count sampling across difficulties.
//!
//! Each sample mines an independent candidate with a miner built from the
//! given [`ChainConfig`], so its nonce start and trial cap apply. The samples
//! run in parallel; every individual search is still a sequential scan.

use rayon::prelude::*;
use serde::Serialize;

use crate::block::Candidate;
use crate::config::ChainConfig;
use crate::error::Result;
use crate::mine::Miner;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrialStats {
    pub difficulty: u32,
    pub samples: usize,
    pub mean_trials: f64,
    pub min_trials: u64,
    pub max_trials: u64,
}

/// Mine `samples` candidates at `config.difficulty` and summarise the trial
/// counts. Payloads are derived from the sample number, so results are
/// reproducible.
pub fn sample_trials(config: &ChainConfig, samples: usize) -> Result<TrialStats> {
    config.validate()?;
    let difficulty = config.difficulty;
    let miner = Miner::from_config(config);

    let trials = (0..samples)
        .into_par_iter()
        .map(|i| {
            let candidate = Candidate::new(1, 0, format!("sample-{difficulty}-{i}"), "0");
            miner.mine(candidate).map(|m| m.trials)
        })
        .collect::<Result<Vec<u64>>>()?;

    let total: u64 = trials.iter().sum();
    let mean_trials = if trials.is_empty() {
        0.0
    } else {
        total as f64 / trials.len() as f64
    };

    Ok(TrialStats {
        difficulty,
        samples,
        mean_trials,
        min_trials: trials.iter().copied().min().unwrap_or(0),
        max_trials: trials.iter().copied().max().unwrap_or(0),
    })
}

/// Sample every difficulty from 0 through `max_difficulty`. Everything but
/// the difficulty comes from `config`.
pub fn survey(
    config: &ChainConfig,
    max_difficulty: u32,
    samples: usize,
) -> Result<Vec<TrialStats>> {
    (0..=max_difficulty)
        .map(|difficulty| {
            let step = ChainConfig {
                difficulty,
                ..config.clone()
            };
            sample_trials(&step, samples)
        })
        .collect()
}

/// Ratio of each step's mean trial count to the previous step's.
pub fn growth_factors(stats: &[TrialStats]) -> Vec<f64> {
    stats
        .windows(2)
        .map(|w| {
            if w[0].mean_trials == 0.0 {
                0.0
            } else {
                w[1].mean_trials / w[0].mean_trials
            }
        })
        .collect()
}
