//! ANOVA (Analysis of Variance) for CRD and RBD experiments.
//!
//! Calculates sums of squares, F-ratios, and p-values from long-format
//! records. Both designs require a balanced table: exactly one observed
//! response for every (block, treatment) cell.

use std::collections::HashMap;

use ndarray::{Array2, Axis};

use super::stats::f_distribution_p_value;
use super::table::LongRecord;
use super::types::{AnovaConfig, AnovaEntry, AnovaResult, Design, Term};
use crate::error::{ensure_finite, Error, Result};

/// Multiple of the worst-case rounding error, `(N·ε)²·Σy²`, below which a
/// sum of squares is treated as exactly zero.
const ROUNDING_SLACK: f64 = 4.0;

/// Calculate the ANOVA table for long-format records.
///
/// # Algorithm
/// 1. Arrange the records into a balanced blocks × treatments matrix
/// 2. Total SS = Σ(yᵢⱼ - ȳ)²
/// 3. Treatment SS = b · Σ(ȳ.ⱼ - ȳ)², df = k - 1
/// 4. CRD: Residual SS = Σ(yᵢⱼ - ȳ.ⱼ)², df = N - k
/// 5. RBD: Block SS = k · Σ(ȳᵢ. - ȳ)², df = b - 1;
///    Residual SS = Σ(yᵢⱼ - ȳ.ⱼ - ȳᵢ. + ȳ)², df = N - k - b + 1
/// 6. F = MS_term / MS_residual, p = P(F > f)
///
/// # Errors
///
/// * [`Error::Shape`] if there are no records, a cell is missing, or a cell
///   is observed more than once.
/// * [`Error::NonNumericInput`] for a NaN or infinite response.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn calculate_anova(
    records: &[LongRecord],
    config: &AnovaConfig,
) -> Result<AnovaResult> {
    let layout = BalancedLayout::from_records(records)?;
    let responses = &layout.responses;
    let (num_blocks, num_treatments) = responses.dim();
    let n = num_blocks * num_treatments;

    log::debug!(
        "{} ANOVA on {} blocks x {} treatments",
        config.design,
        num_blocks,
        num_treatments
    );

    let grand_mean = responses.sum() / n as f64;
    let treatment_means = responses
        .mean_axis(Axis(0))
        .ok_or_else(|| Error::shape("table has no blocks"))?;
    let block_means = responses
        .mean_axis(Axis(1))
        .ok_or_else(|| Error::shape("table has no treatments"))?;

    let floor = ROUNDING_SLACK
        * (n as f64 * f64::EPSILON).powi(2)
        * responses.iter().map(|y| y * y).sum::<f64>();
    let clean = |ss: f64| if ss <= floor { 0.0 } else { ss };

    let total_ss = clean(responses.iter().map(|y| (y - grand_mean).powi(2)).sum());
    let total_df = n - 1;

    let treatment_ss = clean(
        num_blocks as f64
            * treatment_means
                .iter()
                .map(|m| (m - grand_mean).powi(2))
                .sum::<f64>(),
    );
    let treatment_df = num_treatments - 1;

    let (block_term, error_ss, error_df) = match config.design {
        Design::Crd => {
            let error_ss: f64 = responses
                .indexed_iter()
                .map(|((_, j), y)| (y - treatment_means[j]).powi(2))
                .sum();
            (None, clean(error_ss), n - num_treatments)
        }
        Design::Rbd => {
            let block_ss = clean(
                num_treatments as f64
                    * block_means
                        .iter()
                        .map(|m| (m - grand_mean).powi(2))
                        .sum::<f64>(),
            );
            let error_ss: f64 = responses
                .indexed_iter()
                .map(|((i, j), y)| {
                    (y - treatment_means[j] - block_means[i] + grand_mean).powi(2)
                })
                .sum();
            let error_df = (num_blocks - 1) * (num_treatments - 1);
            (Some((block_ss, num_blocks - 1)), clean(error_ss), error_df)
        }
    };

    let error_ms = if error_df > 0 {
        error_ss / error_df as f64
    } else {
        0.0
    };

    let treatment = build_entry(Term::Treatment, treatment_ss, treatment_df, error_ms, error_df);
    let block = block_term.map(|(ss, df)| build_entry(Term::Block, ss, df, error_ms, error_df));

    let result = AnovaResult {
        design: config.design,
        significance_level: config.significance_level,
        treatment,
        block,
        error_ss,
        error_df,
        error_ms,
        total_ss,
        total_df,
        grand_mean,
        treatment_means: layout
            .treatments
            .into_iter()
            .zip(treatment_means.iter().copied())
            .collect(),
        block_means: layout
            .blocks
            .into_iter()
            .zip(block_means.iter().copied())
            .collect(),
    };

    log::debug!(
        "treatment p-value {:.6}, reject null at {}: {}",
        result.treatment.p_value,
        result.significance_level,
        result.reject_null()
    );
    Ok(result)
}

/// Build an ANOVA row, handling the degenerate F-ratios.
///
/// With no residual df, or a zero mean square over a zero residual, the
/// F-ratio is undefined and p = 1. A positive mean square over an exactly
/// zero residual gives F = +inf and p = 0.
#[allow(clippy::cast_precision_loss)]
fn build_entry(term: Term, ss: f64, df: usize, error_ms: f64, error_df: usize) -> AnovaEntry {
    let mean_square = if df > 0 { ss / df as f64 } else { 0.0 };

    let f_ratio = if df == 0 || error_df == 0 {
        None
    } else if error_ms > 0.0 {
        Some(mean_square / error_ms)
    } else if mean_square > 0.0 {
        Some(f64::INFINITY)
    } else {
        None
    };

    if f_ratio.is_none() {
        log::warn!("F-ratio for {term} is undefined (df={df}, residual df={error_df})");
    }

    let p_value = f_ratio.map_or(1.0, |f| f_distribution_p_value(f, df, error_df));

    AnovaEntry {
        term,
        degrees_of_freedom: df,
        sum_of_squares: ss,
        mean_square,
        f_ratio,
        p_value,
    }
}

/// Long records arranged back into a complete blocks × treatments matrix.
struct BalancedLayout {
    blocks: Vec<String>,
    treatments: Vec<String>,
    responses: Array2<f64>,
}

impl BalancedLayout {
    fn from_records(records: &[LongRecord]) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::shape("table has no observations"));
        }

        let (blocks, block_index) = index_labels(records.iter().map(|r| r.block.as_str()));
        let (treatments, treatment_index) =
            index_labels(records.iter().map(|r| r.treatment.as_str()));

        let mut cells: Array2<Option<f64>> =
            Array2::from_elem((blocks.len(), treatments.len()), None);

        for record in records {
            let response = record.response.ok_or_else(|| {
                Error::shape(format!(
                    "missing response for block {:?}, treatment {:?} (unbalanced design)",
                    record.block, record.treatment
                ))
            })?;
            let i = block_index[record.block.as_str()];
            let j = treatment_index[record.treatment.as_str()];
            let cell = &mut cells[[i, j]];
            if cell.replace(response).is_some() {
                return Err(Error::shape(format!(
                    "block {:?}, treatment {:?} observed more than once",
                    record.block, record.treatment
                )));
            }
        }

        if let Some(((i, j), _)) = cells.indexed_iter().find(|(_, c)| c.is_none()) {
            return Err(Error::shape(format!(
                "no observation for block {:?}, treatment {:?} (unbalanced design)",
                blocks[i], treatments[j]
            )));
        }

        let responses = cells.mapv(|c| c.unwrap_or(f64::NAN));
        ensure_finite(responses.iter().copied())?;

        Ok(Self {
            blocks,
            treatments,
            responses,
        })
    }
}

/// Distinct labels in first-seen order, with a label → position lookup.
fn index_labels<'a>(
    labels: impl Iterator<Item = &'a str>,
) -> (Vec<String>, HashMap<&'a str, usize>) {
    let mut ordered = Vec::new();
    let mut index = HashMap::new();
    for label in labels {
        index.entry(label).or_insert_with(|| {
            ordered.push(label.to_string());
            ordered.len() - 1
        });
    }
    (ordered, index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(block: &str, treatment: &str, response: Option<f64>) -> LongRecord {
        LongRecord {
            block: block.to_string(),
            treatment: treatment.to_string(),
            response,
        }
    }

    /// 3 blocks x 2 treatments with a strong treatment effect.
    fn synthetic_records() -> Vec<LongRecord> {
        vec![
            record("B1", "T1", Some(10.0)),
            record("B2", "T1", Some(12.0)),
            record("B3", "T1", Some(11.0)),
            record("B1", "T2", Some(15.0)),
            record("B2", "T2", Some(18.0)),
            record("B3", "T2", Some(16.5)),
        ]
    }

    #[test]
    fn test_crd_sums_of_squares() {
        let anova = calculate_anova(&synthetic_records(), &AnovaConfig::new(Design::Crd)).unwrap();

        assert!((anova.total_ss - 51.875).abs() < 1e-10);
        assert_eq!(anova.total_df, 5);
        assert!((anova.treatment.sum_of_squares - 45.375).abs() < 1e-10);
        assert_eq!(anova.treatment.degrees_of_freedom, 1);
        assert!((anova.error_ss - 6.5).abs() < 1e-10);
        assert_eq!(anova.error_df, 4);
        assert!(anova.block.is_none());

        let f = anova.treatment.f_ratio.unwrap();
        assert!((f - 45.375 / 1.625).abs() < 1e-10);
    }

    #[test]
    fn test_rbd_sums_of_squares() {
        let anova = calculate_anova(&synthetic_records(), &AnovaConfig::new(Design::Rbd)).unwrap();

        assert!((anova.treatment.sum_of_squares - 45.375).abs() < 1e-10);
        let block = anova.block.as_ref().unwrap();
        assert!((block.sum_of_squares - 6.25).abs() < 1e-10);
        assert_eq!(block.degrees_of_freedom, 2);
        assert!((anova.error_ss - 0.25).abs() < 1e-10);
        assert_eq!(anova.error_df, 2);
        assert!((anova.error_ms - 0.125).abs() < 1e-12);
    }

    #[test]
    fn test_means_follow_first_seen_order() {
        let anova = calculate_anova(&synthetic_records(), &AnovaConfig::new(Design::Rbd)).unwrap();

        assert!((anova.grand_mean - 13.75).abs() < 1e-12);
        assert_eq!(anova.treatment_means[0].0, "T1");
        assert!((anova.treatment_means[0].1 - 11.0).abs() < 1e-12);
        assert!((anova.treatment_means[1].1 - 16.5).abs() < 1e-12);
        let block_labels: Vec<&str> = anova.block_means.iter().map(|(b, _)| b.as_str()).collect();
        assert_eq!(block_labels, vec!["B1", "B2", "B3"]);
        assert!((anova.block_means[1].1 - 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_response_is_shape_error() {
        let mut records = synthetic_records();
        records[4].response = None;
        let result = calculate_anova(&records, &AnovaConfig::new(Design::Rbd));
        assert!(matches!(result, Err(Error::Shape { .. })));
    }

    #[test]
    fn test_absent_cell_is_shape_error() {
        let mut records = synthetic_records();
        records.pop();
        let result = calculate_anova(&records, &AnovaConfig::new(Design::Crd));
        assert!(matches!(result, Err(Error::Shape { .. })));
    }

    #[test]
    fn test_duplicate_cell_is_shape_error() {
        let mut records = synthetic_records();
        records.push(record("B1", "T1", Some(9.0)));
        let result = calculate_anova(&records, &AnovaConfig::new(Design::Crd));
        assert!(matches!(result, Err(Error::Shape { .. })));
    }

    #[test]
    fn test_empty_records_is_shape_error() {
        assert!(matches!(
            calculate_anova(&[], &AnovaConfig::default()),
            Err(Error::Shape { .. })
        ));
    }

    #[test]
    fn test_non_finite_response_rejected() {
        let mut records = synthetic_records();
        records[0].response = Some(f64::INFINITY);
        assert!(matches!(
            calculate_anova(&records, &AnovaConfig::default()),
            Err(Error::NonNumericInput { .. })
        ));
    }

    #[test]
    fn test_all_values_identical() {
        let records: Vec<LongRecord> = ["T1", "T2", "T3"]
            .iter()
            .flat_map(|t| ["B1", "B2"].map(|b| record(b, t, Some(4.2))))
            .collect();

        for design in [Design::Crd, Design::Rbd] {
            let anova = calculate_anova(&records, &AnovaConfig::new(design)).unwrap();
            assert_eq!(anova.total_ss, 0.0);
            assert_eq!(anova.treatment.f_ratio, None);
            assert_eq!(anova.treatment.p_value, 1.0);
            assert!(!anova.reject_null());
        }
    }

    #[test]
    fn test_perfect_fit_gives_infinite_f() {
        // Responses depend on treatment only: zero residual in the CRD model
        let records = vec![
            record("B1", "T1", Some(1.0)),
            record("B2", "T1", Some(1.0)),
            record("B1", "T2", Some(3.0)),
            record("B2", "T2", Some(3.0)),
        ];
        let anova = calculate_anova(&records, &AnovaConfig::new(Design::Crd)).unwrap();
        assert_eq!(anova.error_ss, 0.0);
        assert_eq!(anova.treatment.f_ratio, Some(f64::INFINITY));
        assert_eq!(anova.treatment.p_value, 0.0);
        assert!(anova.reject_null());
    }

    #[test]
    fn test_single_block_has_no_residual_df() {
        let records = vec![record("B1", "T1", Some(1.0)), record("B1", "T2", Some(2.0))];
        let anova = calculate_anova(&records, &AnovaConfig::new(Design::Rbd)).unwrap();
        assert_eq!(anova.error_df, 0);
        assert_eq!(anova.treatment.f_ratio, None);
        assert_eq!(anova.treatment.p_value, 1.0);
    }

    #[test]
    fn test_index_labels() {
        let (ordered, index) = index_labels(["b", "a", "b", "c"].into_iter());
        assert_eq!(ordered, vec!["b", "a", "c"]);
        assert_eq!(index["a"], 1);
        assert_eq!(index["c"], 2);
    }
}
