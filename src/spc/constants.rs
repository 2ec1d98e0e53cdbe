//! Control chart factor table for X-bar and R charts.
//!
//! The factors are tabulated, not computed: D3 is exactly 0 for n <= 6, which
//! puts the R chart's lower limit at 0 for small subgroups.
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*,
//!   8th ed., Appendix Table VI.
//! - ASTM E2587, Standard Practice for Use of Control Charts

use crate::error::{Error, Result};

/// Smallest subgroup size with tabulated factors.
pub const MIN_SUBGROUP_SIZE: usize = 2;

/// Largest subgroup size with tabulated factors.
pub const MAX_SUBGROUP_SIZE: usize = 25;

/// Subgroup sizes accepted by [`ControlChartConstants::for_subgroup_size`].
pub const SUPPORTED_SUBGROUP_SIZES: std::ops::RangeInclusive<usize> =
    MIN_SUBGROUP_SIZE..=MAX_SUBGROUP_SIZE;

// Index 0 corresponds to n = 2.

/// A2 factors: X-bar limits are X-double-bar +/- A2 * R-bar.
const A2: [f64; 24] = [
    1.880, 1.023, 0.729, 0.577, 0.483, 0.419, 0.373, 0.337, 0.308, 0.285, 0.266, 0.249, 0.235,
    0.223, 0.212, 0.203, 0.194, 0.187, 0.180, 0.173, 0.167, 0.162, 0.157, 0.153,
];

/// D3 factors: R chart LCL = D3 * R-bar.
const D3: [f64; 24] = [
    0.0, 0.0, 0.0, 0.0, 0.0, 0.076, 0.136, 0.184, 0.223, 0.256, 0.283, 0.307, 0.328, 0.347,
    0.363, 0.378, 0.391, 0.403, 0.415, 0.425, 0.434, 0.443, 0.451, 0.459,
];

/// D4 factors: R chart UCL = D4 * R-bar.
const D4: [f64; 24] = [
    3.267, 2.574, 2.282, 2.115, 2.004, 1.924, 1.864, 1.816, 1.777, 1.744, 1.717, 1.693, 1.672,
    1.653, 1.637, 1.622, 1.608, 1.597, 1.585, 1.575, 1.566, 1.557, 1.548, 1.541,
];

/// The (A2, D3, D4) factors for one subgroup size.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlChartConstants {
    /// Subgroup size n these factors belong to.
    pub subgroup_size: usize,
    /// X-bar chart limit factor.
    pub a2: f64,
    /// R chart lower limit factor.
    pub d3: f64,
    /// R chart upper limit factor.
    pub d4: f64,
}

impl ControlChartConstants {
    /// Look up the factors for subgroup size `n`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedSampleSize`] if `n` is outside 2..=25.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statkit::spc::ControlChartConstants;
    ///
    /// let c = ControlChartConstants::for_subgroup_size(5).unwrap();
    /// assert_eq!((c.a2, c.d3, c.d4), (0.577, 0.0, 2.115));
    /// assert!(ControlChartConstants::for_subgroup_size(30).is_err());
    /// ```
    pub fn for_subgroup_size(n: usize) -> Result<Self> {
        if !SUPPORTED_SUBGROUP_SIZES.contains(&n) {
            return Err(Error::UnsupportedSampleSize {
                size: n,
                min: MIN_SUBGROUP_SIZE,
                max: MAX_SUBGROUP_SIZE,
            });
        }
        let idx = n - MIN_SUBGROUP_SIZE;
        Ok(Self {
            subgroup_size: n,
            a2: A2[idx],
            d3: D3[idx],
            d4: D4[idx],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lengths_match_range() {
        let len = MAX_SUBGROUP_SIZE - MIN_SUBGROUP_SIZE + 1;
        assert_eq!(A2.len(), len);
        assert_eq!(D3.len(), len);
        assert_eq!(D4.len(), len);
    }

    #[test]
    fn test_known_factors() {
        let c = ControlChartConstants::for_subgroup_size(2).unwrap();
        assert_eq!((c.a2, c.d3, c.d4), (1.880, 0.0, 3.267));

        let c = ControlChartConstants::for_subgroup_size(7).unwrap();
        assert_eq!((c.a2, c.d3, c.d4), (0.419, 0.076, 1.924));

        let c = ControlChartConstants::for_subgroup_size(25).unwrap();
        assert_eq!(c.subgroup_size, 25);
        assert_eq!((c.a2, c.d3, c.d4), (0.153, 0.459, 1.541));
    }

    #[test]
    fn test_d3_zero_through_six() {
        for n in 2..=6 {
            assert_eq!(ControlChartConstants::for_subgroup_size(n).unwrap().d3, 0.0);
        }
        assert!(ControlChartConstants::for_subgroup_size(7).unwrap().d3 > 0.0);
    }

    #[test]
    fn test_factors_monotone() {
        for n in 3..=MAX_SUBGROUP_SIZE {
            let prev = ControlChartConstants::for_subgroup_size(n - 1).unwrap();
            let cur = ControlChartConstants::for_subgroup_size(n).unwrap();
            assert!(cur.a2 < prev.a2, "A2 should shrink at n={n}");
            assert!(cur.d4 < prev.d4, "D4 should shrink at n={n}");
            assert!(cur.d3 >= prev.d3, "D3 should grow at n={n}");
        }
    }

    #[test]
    fn test_out_of_range() {
        for n in [0, 1, 26, 30] {
            assert_eq!(
                ControlChartConstants::for_subgroup_size(n),
                Err(Error::UnsupportedSampleSize {
                    size: n,
                    min: 2,
                    max: 25
                })
            );
        }
    }
}
