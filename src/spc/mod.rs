//! Statistical Process Control: X-bar and R chart limits.
//!
//! Each column of a [`SubgroupTable`] is one rational subgroup of size n.
//! For every subgroup the mean and range are computed, then
//!
//! - X-bar chart: `CL = X̿`, `UCL/LCL = X̿ ± A2·R̄`
//! - R chart: `CL = R̄`, `UCL = D4·R̄`, `LCL = D3·R̄`
//!
//! with A2, D3 and D4 taken from [`ControlChartConstants`]. The X-bar LCL
//! is reported as computed, negative or not.
//!
//! ```rust
//! use statkit::spc::{compute_control_limits, SubgroupTable};
//!
//! let table = SubgroupTable::from_columns(&[
//!     vec![10.0, 11.0, 12.0],
//!     vec![11.0, 12.0, 13.0],
//!     vec![9.0, 12.0, 12.0],
//! ])
//! .unwrap();
//!
//! let limits = compute_control_limits(&table).unwrap();
//! assert_eq!(limits.subgroup_size, 3);
//! assert!(limits.out_of_control_means().is_empty());
//! ```

mod constants;
mod types;

pub use constants::{
    ControlChartConstants, MAX_SUBGROUP_SIZE, MIN_SUBGROUP_SIZE, SUPPORTED_SUBGROUP_SIZES,
};
pub use types::{ChartLimits, ControlLimits, SubgroupTable};

use ndarray::{ArrayView1, Axis};

use crate::error::{ensure_finite, Error, Result};

/// Compute X-bar and R chart limits for a table of subgroups.
///
/// # Errors
///
/// * [`Error::UnsupportedSampleSize`] if the table is empty (reported as
///   size 0) or its subgroup size is outside 2..=25.
/// * [`Error::NonNumericInput`] if any measurement is NaN or infinite.
#[allow(clippy::cast_precision_loss)]
pub fn compute_control_limits(table: &SubgroupTable) -> Result<ControlLimits> {
    if table.is_empty() {
        return Err(Error::UnsupportedSampleSize {
            size: 0,
            min: MIN_SUBGROUP_SIZE,
            max: MAX_SUBGROUP_SIZE,
        });
    }
    let n = table.subgroup_size();
    let constants = ControlChartConstants::for_subgroup_size(n)?;
    let data = table.data();
    ensure_finite(data.iter().copied())?;

    let subgroup_means: Vec<f64> = data
        .mean_axis(Axis(0))
        .map(|m| m.to_vec())
        .unwrap_or_default();
    let subgroup_ranges: Vec<f64> = data.axis_iter(Axis(1)).map(subgroup_range).collect();

    let k = subgroup_means.len() as f64;
    let grand_mean = subgroup_means.iter().sum::<f64>() / k;
    let mean_range = subgroup_ranges.iter().sum::<f64>() / k;

    let xbar = ChartLimits {
        ucl: grand_mean + constants.a2 * mean_range,
        cl: grand_mean,
        lcl: grand_mean - constants.a2 * mean_range,
    };
    let range = ChartLimits {
        ucl: constants.d4 * mean_range,
        cl: mean_range,
        lcl: constants.d3 * mean_range,
    };

    log::debug!(
        "control limits for {} subgroups of size {}: X̿={}, R̄={}",
        subgroup_means.len(),
        n,
        grand_mean,
        mean_range
    );

    Ok(ControlLimits {
        subgroup_size: n,
        constants,
        grand_mean,
        mean_range,
        xbar,
        range,
        subgroup_means,
        subgroup_ranges,
    })
}

/// Max minus min of a non-empty subgroup.
fn subgroup_range(subgroup: ArrayView1<'_, f64>) -> f64 {
    let (min, max) = subgroup
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    max - min
}
