//! Execution statistics tracking

use std::time::Duration;

/// Timing and size statistics of a circuit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionStatistics {
    /// Time spent building bases and transforms
    pub construction_time: Duration,

    /// Time spent building and applying braid operators
    pub braid_time: Duration,

    /// Time spent sampling
    pub sampling_time: Duration,

    /// Number of braids applied (sequence entries count once each)
    pub braids_applied: usize,

    /// Number of `run` calls
    pub runs: usize,

    /// Total shots drawn across runs
    pub shots_drawn: usize,

    /// Dimension of the state vector
    pub state_dim: usize,
}

impl ExecutionStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of all tracked phases
    pub fn total_time(&self) -> Duration {
        self.construction_time + self.braid_time + self.sampling_time
    }

    /// Get the braid application rate (braids per second)
    pub fn braids_per_second(&self) -> f64 {
        let secs = self.braid_time.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.braids_applied as f64 / secs
        }
    }

    /// Get the sampling rate (shots per second)
    pub fn shots_per_second(&self) -> f64 {
        let secs = self.sampling_time.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.shots_drawn as f64 / secs
        }
    }

    /// Estimated size of the state vector in bytes
    pub fn state_bytes(&self) -> usize {
        self.state_dim * std::mem::size_of::<num_complex::Complex64>()
    }
}

impl std::fmt::Display for ExecutionStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Execution Statistics:")?;
        writeln!(f, "  Total time:        {:?}", self.total_time())?;
        writeln!(f, "  Construction:      {:?}", self.construction_time)?;
        writeln!(f, "  Braids:            {:?} ({} applied)", self.braid_time, self.braids_applied)?;
        writeln!(f, "  Sampling:          {:?} ({} shots, {} runs)", self.sampling_time, self.shots_drawn, self.runs)?;
        write!(f, "  State dimension:   {}", self.state_dim)
    }
}
