//! Batch statistics over repeated runs.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::SimConfig;
use crate::draw::RandomSource;
use crate::engine::SimulationEngine;
use crate::error::SimResult;
use crate::event::RunSummary;

/// Min, max and mean of one counter across a batch.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spread {
    /// Smallest observed value.
    pub min: u64,
    /// Largest observed value.
    pub max: u64,
    /// Arithmetic mean.
    pub mean: f64,
}

impl Spread {
    #[allow(clippy::cast_precision_loss)]
    fn of(values: impl Iterator<Item = u64> + Clone) -> Self {
        let (count, total) = values.clone().fold((0u64, 0u128), |(n, sum), v| {
            (n + 1, sum + u128::from(v))
        });
        if count == 0 {
            return Self {
                min: 0,
                max: 0,
                mean: 0.0,
            };
        }
        Self {
            min: values.clone().min().unwrap_or(0),
            max: values.max().unwrap_or(0),
            mean: total as f64 / count as f64,
        }
    }
}

impl fmt::Display for Spread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "min {:>7}  max {:>7}  mean {:>10.1}", self.min, self.max, self.mean)
    }
}

/// Aggregated outcome of a batch of runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchStats {
    /// Runs performed.
    pub runs: usize,
    /// Normal boxes opened per run.
    pub draws: Spread,
    /// Advanced boxes opened per run.
    pub advanced_draws: Spread,
    /// Syntheses performed per run.
    pub syntheses: Spread,
    /// Final powder balance per run.
    pub powder: Spread,
}

impl BatchStats {
    /// Runs `engine` `runs` times with `config`, drawing from one shared
    /// random source.
    ///
    /// # Errors
    ///
    /// Propagates the first run error (invalid configuration or draw limit).
    pub fn collect<R: RandomSource + ?Sized>(
        engine: &SimulationEngine,
        config: &SimConfig,
        runs: usize,
        rng: &mut R,
    ) -> SimResult<Self> {
        let mut summaries = Vec::with_capacity(runs);
        for _ in 0..runs {
            let log = engine.run(config, rng)?;
            if let Some(summary) = log.summary() {
                summaries.push(summary);
            }
        }
        tracing::info!("Collected {} run(s)", summaries.len());
        Ok(Self::from_summaries(&summaries))
    }

    /// Aggregates already-finished runs.
    #[must_use]
    pub fn from_summaries(summaries: &[RunSummary]) -> Self {
        Self {
            runs: summaries.len(),
            draws: Spread::of(summaries.iter().map(|s| s.draw_count)),
            advanced_draws: Spread::of(summaries.iter().map(|s| s.advanced_draw_count)),
            syntheses: Spread::of(summaries.iter().map(|s| s.synthesis_count)),
            powder: Spread::of(summaries.iter().map(|s| s.powder_balance)),
        }
    }
}

impl fmt::Display for BatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "runs      {}", self.runs)?;
        writeln!(f, "draws     {}", self.draws)?;
        writeln!(f, "advanced  {}", self.advanced_draws)?;
        writeln!(f, "synthesis {}", self.syntheses)?;
        write!(f, "powder    {}", self.powder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::RngSource;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn summary(draws: u64, powder: u64) -> RunSummary {
        RunSummary {
            draw_count: draws,
            advanced_draw_count: 0,
            synthesis_count: 1,
            powder_balance: powder,
            event_count: 3,
        }
    }

    #[test]
    fn test_from_summaries() {
        let stats = BatchStats::from_summaries(&[summary(10, 5), summary(30, 15)]);
        assert_eq!(stats.runs, 2);
        assert_eq!(stats.draws.min, 10);
        assert_eq!(stats.draws.max, 30);
        assert!((stats.draws.mean - 20.0).abs() < f64::EPSILON);
        assert!((stats.syntheses.mean - 1.0).abs() < f64::EPSILON);
        assert!((stats.powder.mean - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_batch() {
        let stats = BatchStats::from_summaries(&[]);
        assert_eq!(stats.runs, 0);
        assert_eq!(stats.draws.max, 0);
    }

    #[test]
    fn test_collect() {
        let engine = SimulationEngine::reference();
        let config = SimConfig::default().select_only(5, &[0]);
        let mut rng = RngSource::new(ChaCha8Rng::seed_from_u64(3));
        let stats = BatchStats::collect(&engine, &config, 8, &mut rng).unwrap();

        assert_eq!(stats.runs, 8);
        assert!(stats.draws.min >= 1);
        assert!(stats.draws.min <= stats.draws.max);
        assert!(stats.draws.mean >= stats.draws.min as f64);
        assert!(stats.draws.mean <= stats.draws.max as f64);
        assert!(stats.to_string().starts_with("runs      8"));
    }
}
