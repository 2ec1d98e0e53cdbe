//! DOE (Design of Experiments) analysis of variance.
//!
//! This module analyzes block-by-treatment tables under two designs:
//! - **CRD** (Completely Randomized Design): `Response ~ Treatment`
//! - **RBD** (Randomized Block Design): `Response ~ Treatment + Block`
//!
//! ## Quick Start
//!
//! ```rust
//! use ndarray::array;
//! use statkit::doe::{compute_anova, AnovaConfig, Design, WideTable};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Rows are blocks, columns are treatments
//! let table = WideTable::from_complete(
//!     vec!["B1".into(), "B2".into(), "B3".into()],
//!     vec!["Control".into(), "Fertilized".into()],
//!     &array![[10.0, 15.0], [12.0, 18.0], [11.0, 16.5]],
//! )?;
//!
//! let result = compute_anova(&table, &AnovaConfig::new(Design::Rbd))?;
//!
//! println!("{result}");
//! assert!(result.reject_null());
//! assert!(result.block.is_some());
//! # Ok(())
//! # }
//! ```
//!
//! ## Data Flow
//!
//! The wide table is reshaped into fresh [`LongRecord`]s on every call
//! ([`reshape_long`]) and the records are analyzed; the table itself is never
//! modified. The tables must be balanced: a missing cell is a
//! [`Shape`](crate::Error::Shape) error rather than being dropped.
//!
//! ## Decision Rule
//!
//! The null hypothesis "all treatment means are equal" is rejected when the
//! Treatment p-value is below the configured significance level (0.05 by
//! default). In an RBD the Block row is reported but does not drive the
//! decision.

mod anova;
mod stats;
mod table;
mod types;

pub use stats::{f_distribution_p_value, ln_gamma, regularized_incomplete_beta};
pub use table::{reshape_long, LongRecord, WideTable};
pub use types::{AnovaConfig, AnovaEntry, AnovaResult, Design, Term};

use crate::error::Result;

/// Run a one-way (CRD) or two-way additive (RBD) ANOVA on a wide table.
///
/// # Errors
/// * [`InvalidParams`](crate::Error::InvalidParams) if the significance level
///   is not in (0, 1)
/// * [`Shape`](crate::Error::Shape) if the table has fewer than 2 columns or
///   is unbalanced
/// * [`NonNumericInput`](crate::Error::NonNumericInput) for NaN or infinite
///   responses
pub fn compute_anova(table: &WideTable, config: &AnovaConfig) -> Result<AnovaResult> {
    config.validate()?;
    let records = reshape_long(table)?;
    anova::calculate_anova(&records, config)
}

/// Run the ANOVA on records that are already in long format.
///
/// Blocks and treatments are identified by label, in first-seen order.
///
/// # Errors
/// Same as [`compute_anova`]; additionally a (block, treatment) pair that
/// appears more than once is a [`Shape`](crate::Error::Shape) error.
pub fn compute_anova_long(records: &[LongRecord], config: &AnovaConfig) -> Result<AnovaResult> {
    config.validate()?;
    anova::calculate_anova(records, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use ndarray::{array, Array2};

    fn labels(prefix: &str, n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("{prefix}{i}")).collect()
    }

    fn synthetic_table() -> WideTable {
        WideTable::from_complete(
            labels("B", 3),
            labels("T", 2),
            &array![[10.0, 15.0], [12.0, 18.0], [11.0, 16.5]],
        )
        .unwrap()
    }

    #[test]
    fn test_rbd_reference_values() {
        let result = compute_anova(&synthetic_table(), &AnovaConfig::new(Design::Rbd)).unwrap();

        // Reference sums of squares (hand computed, agree with statsmodels anova_lm)
        let rel = |a: f64, b: f64| ((a - b) / b).abs();
        assert!(rel(result.treatment.sum_of_squares, 45.375) < 1e-6);
        assert!(rel(result.block.as_ref().unwrap().sum_of_squares, 6.25) < 1e-6);
        assert!(rel(result.error_ss, 0.25) < 1e-6);

        // F(1, 2) = 363: p = 1 - sqrt(F / (2 + F))
        let f = result.treatment.f_ratio.unwrap();
        assert!((f - 363.0).abs() < 1e-8);
        let expected_p = 1.0 - (363.0_f64 / 365.0).sqrt();
        assert!((result.treatment.p_value - expected_p).abs() < 1e-10);
        assert!(result.treatment.p_value < 0.05);
        assert!(result.reject_null());

        // Block: F(2, 2) = 25, p = 1 / (1 + F)
        let block = result.block.as_ref().unwrap();
        assert!((block.f_ratio.unwrap() - 25.0).abs() < 1e-8);
        assert!((block.p_value - 1.0 / 26.0).abs() < 1e-10);
    }

    #[test]
    fn test_crd_reference_values() {
        let result = compute_anova(&synthetic_table(), &AnovaConfig::default()).unwrap();

        assert_eq!(result.design, Design::Crd);
        assert!(result.block.is_none());
        assert_eq!(result.entries().count(), 1);

        // F(1, 4): P(F > f) = 1 - sinθ(1 + cos²θ / 2), θ = atan(√f / 2)
        let f = result.treatment.f_ratio.unwrap();
        assert!((f - 45.375 / 1.625).abs() < 1e-10);
        let theta = (f.sqrt() / 2.0).atan();
        let expected_p = 1.0 - theta.sin() * (1.0 + theta.cos().powi(2) / 2.0);
        assert!((result.treatment.p_value - expected_p).abs() < 1e-10);
        assert!(result.reject_null());
    }

    #[test]
    fn test_crd_identical_treatment_columns() {
        let table = WideTable::from_complete(
            labels("B", 4),
            labels("T", 3),
            &array![
                [1.0, 1.0, 1.0],
                [2.5, 2.5, 2.5],
                [0.3, 0.3, 0.3],
                [7.1, 7.1, 7.1]
            ],
        )
        .unwrap();

        let result = compute_anova(&table, &AnovaConfig::new(Design::Crd)).unwrap();
        assert_eq!(result.treatment.sum_of_squares, 0.0);
        assert_eq!(result.treatment.f_ratio, Some(0.0));
        assert_eq!(result.treatment.p_value, 1.0);
        assert!(!result.reject_null());

        // Blocks explain everything, nothing is left for the treatments
        let result = compute_anova(&table, &AnovaConfig::new(Design::Rbd)).unwrap();
        assert_eq!(result.treatment.f_ratio, None);
        assert_eq!(result.treatment.p_value, 1.0);
        assert!(!result.reject_null());
    }

    #[test]
    fn test_unbalanced_table_is_shape_error() {
        let table = WideTable::new(
            labels("B", 2),
            labels("T", 2),
            array![[Some(1.0), Some(2.0)], [Some(3.0), None]],
        )
        .unwrap();

        for design in [Design::Crd, Design::Rbd] {
            assert!(matches!(
                compute_anova(&table, &AnovaConfig::new(design)),
                Err(Error::Shape { .. })
            ));
        }
    }

    #[test]
    fn test_too_few_columns_is_shape_error() {
        let table =
            WideTable::new(labels("B", 3), Vec::new(), Array2::from_elem((3, 0), None)).unwrap();
        assert!(matches!(
            compute_anova(&table, &AnovaConfig::default()),
            Err(Error::Shape { .. })
        ));
    }

    #[test]
    fn test_invalid_significance_level() {
        let config = AnovaConfig::default().with_significance_level(1.5);
        assert!(matches!(
            compute_anova(&synthetic_table(), &config),
            Err(Error::InvalidParams { .. })
        ));
    }

    #[test]
    fn test_significance_level_drives_decision() {
        // Block p-value is 1/26 ~ 0.038; the treatment p-value ~ 0.0027
        let strict = AnovaConfig::new(Design::Rbd).with_significance_level(0.001);
        let result = compute_anova(&synthetic_table(), &strict).unwrap();
        assert!(!result.reject_null());
        assert!(result.block.as_ref().unwrap().reject_null(0.05));
    }

    #[test]
    fn test_long_and_wide_entry_points_agree() {
        let table = synthetic_table();
        let config = AnovaConfig::new(Design::Rbd);
        let records = table.to_long().unwrap();
        assert_eq!(
            compute_anova(&table, &config).unwrap(),
            compute_anova_long(&records, &config).unwrap()
        );
    }

    #[test]
    fn test_column_order_irrelevant() {
        let swapped = WideTable::from_complete(
            labels("B", 3),
            vec!["T2".into(), "T1".into()],
            &array![[15.0, 10.0], [18.0, 12.0], [16.5, 11.0]],
        )
        .unwrap();

        let config = AnovaConfig::new(Design::Rbd);
        let a = compute_anova(&synthetic_table(), &config).unwrap();
        let b = compute_anova(&swapped, &config).unwrap();
        assert!((a.treatment.sum_of_squares - b.treatment.sum_of_squares).abs() < 1e-10);
        assert!((a.error_ss - b.error_ss).abs() < 1e-10);
        assert!((a.treatment.p_value - b.treatment.p_value).abs() < 1e-12);
    }

    #[test]
    fn test_idempotent() {
        let table = synthetic_table();
        let config = AnovaConfig::new(Design::Rbd);
        let first = compute_anova(&table, &config).unwrap();
        let second = compute_anova(&table, &config).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first.treatment.p_value.to_bits(),
            second.treatment.p_value.to_bits()
        );
    }

    fn shifted(data: &Array2<f64>, offset: f64) -> WideTable {
        WideTable::from_complete(
            labels("B", data.nrows()),
            labels("T", data.ncols()),
            &data.mapv(|y| y + offset),
        )
        .unwrap()
    }

    #[test]
    fn test_constant_offset_leaves_result_unchanged() {
        let data = array![[10.0, 15.0], [12.0, 18.0], [11.0, 16.5]];

        for design in [Design::Crd, Design::Rbd] {
            let config = AnovaConfig::new(design);
            let base = compute_anova(&shifted(&data, 0.0), &config).unwrap();
            for offset in [1e6, -2.5e7, 1.7e9] {
                let moved = compute_anova(&shifted(&data, offset), &config).unwrap();
                let f = base.treatment.f_ratio.unwrap();
                let g = moved.treatment.f_ratio.unwrap();
                assert!(((f - g) / f).abs() < 1e-9, "{design} offset {offset}: {f} vs {g}");
                assert!((base.treatment.p_value - moved.treatment.p_value).abs() < 1e-12);
                assert_eq!(base.reject_null(), moved.reject_null());
            }
        }
    }

    #[test]
    fn test_small_effect_on_large_offset_is_kept() {
        let data = array![[0.001, 0.011], [0.002, 0.012], [0.003, 0.013]];
        let config = AnovaConfig::default();

        let base = compute_anova(&shifted(&data, 0.0), &config).unwrap();
        let moved = compute_anova(&shifted(&data, 1.7e9), &config).unwrap();

        assert!(moved.treatment.sum_of_squares > 0.0);
        assert!(moved.error_ss > 0.0);
        let f = base.treatment.f_ratio.unwrap();
        let g = moved.treatment.f_ratio.unwrap();
        assert!((f - 150.0).abs() < 0.05);
        assert!(((f - g) / f).abs() < 1e-2, "{f} vs {g}");
        assert!(base.reject_null());
        assert_eq!(base.reject_null(), moved.reject_null());
    }

    #[test]
    fn test_entries_follow_design_terms() {
        for design in [Design::Crd, Design::Rbd] {
            let result = compute_anova(&synthetic_table(), &AnovaConfig::new(design)).unwrap();
            let terms: Vec<Term> = result.entries().map(|e| e.term).collect();
            assert_eq!(terms, design.terms());
        }
    }

    #[test]
    fn test_display_table() {
        let result = compute_anova(&synthetic_table(), &AnovaConfig::new(Design::Rbd)).unwrap();
        let text = result.to_string();
        let sources: Vec<&str> = text
            .lines()
            .filter_map(|l| l.split_whitespace().next())
            .collect();
        assert_eq!(sources, vec!["Source", "Treatment", "Block", "Residual", "Total"]);
    }
}
