//! Parallel batch evaluation using Rayon.
//!
//! Every entry point of the crate is a pure function of its input, so
//! independent inputs can be analyzed concurrently without locking. These
//! helpers fan a batch out over the Rayon thread pool and return one result
//! per input, in input order. A failing input does not affect the others.
//!
//! Enable with the `parallel` feature flag.
//!
//! # Usage
//!
//! ```ignore
//! use statkit::parallel::par_describe;
//!
//! let samples = vec![vec![1.0, 2.0, 3.0], vec![4.0]];
//! let summaries = par_describe(&samples);
//! assert!(summaries[0].is_ok());
//! assert!(summaries[1].is_err());
//! ```
//!
//! For a handful of small tables the sequential functions may be faster due
//! to scheduling overhead.

use rayon::prelude::*;

use crate::descriptive::{describe, DescriptiveSummary};
use crate::doe::{compute_anova, AnovaConfig, AnovaResult, WideTable};
use crate::error::Result;
use crate::spc::{compute_control_limits, ControlLimits, SubgroupTable};

/// Describe many samples in parallel.
#[must_use]
pub fn par_describe<S>(samples: &[S]) -> Vec<Result<DescriptiveSummary>>
where
    S: AsRef<[f64]> + Sync,
{
    samples.par_iter().map(|s| describe(s.as_ref())).collect()
}

/// Run the same ANOVA configuration over many tables in parallel.
#[must_use]
pub fn par_compute_anova(tables: &[WideTable], config: &AnovaConfig) -> Vec<Result<AnovaResult>> {
    log::debug!("analyzing {} tables as {}", tables.len(), config.design);
    tables
        .par_iter()
        .map(|t| compute_anova(t, config))
        .collect()
}

/// Compute control limits for many subgroup tables in parallel.
#[must_use]
pub fn par_compute_control_limits(tables: &[SubgroupTable]) -> Vec<Result<ControlLimits>> {
    tables.par_iter().map(compute_control_limits).collect()
}
