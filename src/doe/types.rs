//! ANOVA configuration and result types.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Experimental design analyzed by the ANOVA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Design {
    /// Completely Randomized Design: `Response ~ Treatment`.
    #[default]
    Crd,
    /// Randomized Block Design: `Response ~ Treatment + Block`, no interaction.
    Rbd,
}

impl Design {
    /// Model terms tested by this design, in table order.
    #[must_use]
    pub fn terms(self) -> &'static [Term] {
        match self {
            Self::Crd => &[Term::Treatment],
            Self::Rbd => &[Term::Treatment, Term::Block],
        }
    }
}

impl fmt::Display for Design {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Crd => f.write_str("CRD"),
            Self::Rbd => f.write_str("RBD"),
        }
    }
}

impl FromStr for Design {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "crd" => Ok(Self::Crd),
            "rbd" => Ok(Self::Rbd),
            other => Err(Error::invalid_params(format!(
                "unknown design {other:?}, expected CRD or RBD"
            ))),
        }
    }
}

/// Configuration for [`compute_anova`](super::compute_anova).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnovaConfig {
    /// Design to analyze (default: CRD).
    pub design: Design,
    /// Significance level for the reject/accept decision (default: 0.05).
    pub significance_level: f64,
}

impl Default for AnovaConfig {
    fn default() -> Self {
        Self {
            design: Design::Crd,
            significance_level: 0.05,
        }
    }
}

impl AnovaConfig {
    /// Default configuration for `design`.
    #[must_use]
    pub fn new(design: Design) -> Self {
        Self {
            design,
            ..Self::default()
        }
    }

    /// Set the design.
    #[must_use]
    pub fn with_design(mut self, design: Design) -> Self {
        self.design = design;
        self
    }

    /// Set the significance level.
    #[must_use]
    pub fn with_significance_level(mut self, alpha: f64) -> Self {
        self.significance_level = alpha;
        self
    }

    /// Check that the significance level lies strictly between 0 and 1.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParams`] otherwise.
    pub fn validate(&self) -> Result<()> {
        if self.significance_level > 0.0 && self.significance_level < 1.0 {
            Ok(())
        } else {
            Err(Error::invalid_params(format!(
                "significance level must be in (0, 1), got {}",
                self.significance_level
            )))
        }
    }
}

/// A model term of the ANOVA table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Term {
    /// The treatment factor under test.
    Treatment,
    /// The nuisance blocking factor (RBD only).
    Block,
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Treatment => f.write_str("Treatment"),
            Self::Block => f.write_str("Block"),
        }
    }
}

/// ANOVA table row for a single model term.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnovaEntry {
    /// Model term of this row.
    pub term: Term,
    /// Degrees of freedom.
    pub degrees_of_freedom: usize,
    /// Sum of squares for this term.
    pub sum_of_squares: f64,
    /// Mean square (SS / df).
    pub mean_square: f64,
    /// F-ratio (MS_term / MS_residual), `None` when undefined.
    pub f_ratio: Option<f64>,
    /// Upper-tail p-value; 1.0 when the F-ratio is undefined.
    pub p_value: f64,
}

impl AnovaEntry {
    /// Whether this term is significant at level `alpha` (`p < alpha`).
    #[must_use]
    pub fn reject_null(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Complete ANOVA result.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnovaResult {
    /// Analyzed design.
    pub design: Design,
    /// Significance level used by [`reject_null`](Self::reject_null).
    pub significance_level: f64,
    /// Treatment row.
    pub treatment: AnovaEntry,
    /// Block row, present for RBD only.
    pub block: Option<AnovaEntry>,
    /// Residual sum of squares.
    pub error_ss: f64,
    /// Residual degrees of freedom.
    pub error_df: usize,
    /// Residual mean square.
    pub error_ms: f64,
    /// Total (corrected) sum of squares.
    pub total_ss: f64,
    /// Total degrees of freedom (N - 1).
    pub total_df: usize,
    /// Mean of all observations.
    pub grand_mean: f64,
    /// Mean response per treatment, in table column order.
    pub treatment_means: Vec<(String, f64)>,
    /// Mean response per block, in table row order.
    pub block_means: Vec<(String, f64)>,
}

impl AnovaResult {
    /// Model-term rows in the order of [`Design::terms`].
    pub fn entries(&self) -> impl Iterator<Item = &AnovaEntry> {
        self.design
            .terms()
            .iter()
            .filter_map(|&term| self.entry(term))
    }

    /// The row for `term`, if the design has one.
    #[must_use]
    pub fn entry(&self, term: Term) -> Option<&AnovaEntry> {
        match term {
            Term::Treatment => Some(&self.treatment),
            Term::Block => self.block.as_ref(),
        }
    }

    /// Whether "all treatment means are equal" is rejected at the configured
    /// significance level. Only the Treatment p-value drives this decision.
    #[must_use]
    pub fn reject_null(&self) -> bool {
        self.treatment.reject_null(self.significance_level)
    }
}

impl fmt::Display for AnovaResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<10} {:>4} {:>14} {:>14} {:>10} {:>10}",
            "Source", "df", "SS", "MS", "F", "PR(>F)"
        )?;
        for e in self.entries() {
            let f_ratio = e
                .f_ratio
                .map_or_else(|| "NaN".to_string(), |v| format!("{v:.4}"));
            writeln!(
                f,
                "{:<10} {:>4} {:>14.4} {:>14.4} {:>10} {:>10.4}",
                e.term.to_string(),
                e.degrees_of_freedom,
                e.sum_of_squares,
                e.mean_square,
                f_ratio,
                e.p_value
            )?;
        }
        writeln!(
            f,
            "{:<10} {:>4} {:>14.4} {:>14.4}",
            "Residual", self.error_df, self.error_ss, self.error_ms
        )?;
        writeln!(
            f,
            "{:<10} {:>4} {:>14.4}",
            "Total", self.total_df, self.total_ss
        )
    }
}
