//! Descriptive statistics for a single numeric sample.
//!
//! ## Quick Start
//!
//! ```rust
//! use statkit::descriptive::{describe, Mode};
//!
//! let summary = describe(&[1.0, 2.0, 2.0, 3.0]).unwrap();
//! assert_eq!(summary.count, 4);
//! assert_eq!(summary.median, 2.0);
//! assert_eq!(summary.mode, Mode::Value(2.0));
//! ```
//!
//! Variance and standard deviation are sample statistics (N-1 denominator),
//! so at least two values are required.

mod types;

pub use types::{DescriptiveSummary, Mode, SummaryValue};

use crate::error::{ensure_finite, Error, Result};

/// Compute the descriptive summary of a sample.
///
/// Order of the input is irrelevant; the sample is copied and sorted
/// internally.
/// Mean, median and standard deviation are finite for any finite sample.
/// Total, range and variance overflow to infinity only when their exact value
/// exceeds `f64::MAX`.
///
/// # Errors
///
/// * [`Error::InsufficientData`] if the sample has fewer than 2 values.
/// * [`Error::NonNumericInput`] if any value is NaN or infinite.
#[allow(clippy::cast_precision_loss)]
pub fn describe(sample: &[f64]) -> Result<DescriptiveSummary> {
    let count = sample.len();
    if count < 2 {
        return Err(Error::InsufficientData {
            statistic: "sample variance",
            required: 2,
            actual: count,
        });
    }
    ensure_finite(sample.iter().copied())?;

    let mut sorted = sample.to_vec();
    sorted.sort_by(f64::total_cmp);

    let min = sorted[0];
    let max = sorted[count - 1];
    let total: f64 = sorted.iter().sum();
    let (mean, variance, std_dev) = moments(&sorted);

    let summary = DescriptiveSummary {
        count,
        total,
        max,
        min,
        mean,
        range: max - min,
        median: median_of_sorted(&sorted),
        mode: mode_of_sorted(&sorted),
        std_dev,
        variance,
    };

    log::debug!(
        "described {} values: mean={}, variance={}",
        count,
        summary.mean,
        summary.variance
    );
    Ok(summary)
}

/// Mean, sample variance and standard deviation of a sorted slice of at
/// least two values.
///
/// Values are scaled by a power of two near the largest magnitude first, so
/// the sums stay finite for any finite input and the scaling itself is exact.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn moments(sorted: &[f64]) -> (f64, f64, f64) {
    let n = sorted.len() as f64;
    let max_abs = sorted[0].abs().max(sorted[sorted.len() - 1].abs());
    let exponent = max_abs.log2().floor().clamp(-1000.0, 1023.0) as i32;
    let scale = 2f64.powi(exponent);

    let mean = sorted.iter().map(|x| x / scale).sum::<f64>() / n;
    let squares: f64 = sorted.iter().map(|x| (x / scale - mean).powi(2)).sum();
    let variance = squares / (n - 1.0);
    (mean * scale, variance * scale * scale, variance.sqrt() * scale)
}

/// Median of a non-empty sorted slice.
fn median_of_sorted(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        sorted[mid - 1] / 2.0 + sorted[mid] / 2.0
    } else {
        sorted[mid]
    }
}

/// Mode of a non-empty sorted slice.
///
/// Equal values are adjacent after sorting, so frequencies are run lengths.
fn mode_of_sorted(sorted: &[f64]) -> Mode {
    let mut best_value = sorted[0];
    let mut best_count = 0;
    let mut tied = false;

    let mut start = 0;
    while start < sorted.len() {
        let value = sorted[start];
        let run = sorted[start..].iter().take_while(|&&v| v == value).count();

        if run > best_count {
            best_value = value;
            best_count = run;
            tied = false;
        } else if run == best_count {
            tied = true;
        }
        start += run;
    }

    if tied {
        Mode::NoUniqueMode
    } else {
        Mode::Value(best_value)
    }
}
