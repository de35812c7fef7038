//! Circuit configuration

use fibq_core::Boundary;
use fibq_state::{FusionLayout, DEFAULT_NORM_TOLERANCE, DEFAULT_PARALLEL_THRESHOLD};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Anyon count of each qudit
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AnyonCounts {
    /// Every qudit holds the same number of anyons
    Uniform(usize),
    /// One count per qudit
    PerQudit(Vec<usize>),
}

/// Configuration of an anyonic circuit
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CircuitConfig {
    /// Number of qudits
    ///
    /// Default: 1
    pub nb_qudits: usize,

    /// Anyons per qudit
    ///
    /// Default: `Uniform(3)`
    pub anyons_per_qudit: AnyonCounts,

    /// Total-charge convention of every qudit
    ///
    /// Default: [`Boundary::Free`]
    pub boundary: Boundary,

    /// How qudits are joined
    ///
    /// With [`FusionLayout::Fused`] braids may cross qudit boundaries; it
    /// requires the free boundary.
    ///
    /// Default: [`FusionLayout::Independent`]
    pub layout: FusionLayout,

    /// Allowed drift of the state norm after a braid
    ///
    /// Default: 1e-9
    pub norm_tolerance: f64,

    /// State size from which braids are applied in parallel
    ///
    /// Default: 4096
    pub parallel_threshold: usize,

    /// Seed for [`run_seeded`](crate::AnyonicCircuit::run_seeded)
    ///
    /// If None, a fresh seed is drawn from the operating system.
    ///
    /// Default: None
    pub seed: Option<u64>,

    /// Collect timing statistics
    ///
    /// Default: false
    pub collect_statistics: bool,
}

impl Default for CircuitConfig {
    fn default() -> Self {
        Self {
            nb_qudits: 1,
            anyons_per_qudit: AnyonCounts::Uniform(3),
            boundary: Boundary::Free,
            layout: FusionLayout::Independent,
            norm_tolerance: DEFAULT_NORM_TOLERANCE,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            seed: None,
            collect_statistics: false,
        }
    }
}

impl CircuitConfig {
    /// `nb_qudits` qudits of `anyons` anyons each
    pub fn new(nb_qudits: usize, anyons: usize) -> Self {
        Self {
            nb_qudits,
            anyons_per_qudit: AnyonCounts::Uniform(anyons),
            ..Default::default()
        }
    }

    /// One qudit per entry of `counts`
    pub fn per_qudit(counts: Vec<usize>) -> Self {
        Self {
            nb_qudits: counts.len(),
            anyons_per_qudit: AnyonCounts::PerQudit(counts),
            ..Default::default()
        }
    }

    /// Configuration for debugging
    ///
    /// - Statistics collection
    /// - Deterministic seed
    /// - Sequential braid application
    pub fn debug(nb_qudits: usize, anyons: usize) -> Self {
        Self {
            collect_statistics: true,
            seed: Some(42),
            parallel_threshold: usize::MAX,
            ..Self::new(nb_qudits, anyons)
        }
    }

    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_layout(mut self, layout: FusionLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_norm_tolerance(mut self, tolerance: f64) -> Self {
        self.norm_tolerance = tolerance;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Set the random seed for deterministic sampling
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_statistics(mut self, enabled: bool) -> Self {
        self.collect_statistics = enabled;
        self
    }

    /// Anyon count of every qudit
    pub fn anyon_counts(&self) -> Vec<usize> {
        match &self.anyons_per_qudit {
            AnyonCounts::Uniform(n) => vec![*n; self.nb_qudits],
            AnyonCounts::PerQudit(counts) => counts.clone(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.nb_qudits == 0 {
            return Err("nb_qudits must be > 0".to_string());
        }

        if let AnyonCounts::PerQudit(counts) = &self.anyons_per_qudit {
            if counts.len() != self.nb_qudits {
                return Err(format!(
                    "expected {} anyon counts, got {}",
                    self.nb_qudits,
                    counts.len()
                ));
            }
        }

        if !(self.norm_tolerance > 0.0 && self.norm_tolerance < 1.0) {
            return Err(format!(
                "norm_tolerance must be in (0,1), got {}",
                self.norm_tolerance
            ));
        }

        Ok(())
    }
}
