//! # statkit
//!
//! Statistical analysis cores for quality engineering: descriptive
//! statistics, analysis of variance for designed experiments, and
//! X-bar/R control charts.
//!
//! ## Overview
//!
//! The crate is a set of pure functions over in-memory tables:
//! - **Descriptive statistics** ([`describe`]): count, total, extrema, mean,
//!   range, median, mode, sample standard deviation and variance
//! - **ANOVA** ([`compute_anova`]): one-way analysis for a Completely
//!   Randomized Design and two-way additive analysis for a Randomized Block
//!   Design, from a wide block-by-treatment table
//! - **Control charts** ([`compute_control_limits`]): X-bar and R chart
//!   limits from tabulated A2/D3/D4 factors for subgroups of size 2 to 25
//!
//! Loading data and rendering results belong to the caller. The
//! [`utils`] module turns raw text into numbers for callers that hold text.
//!
//! ## Quick Start
//!
//! ```rust
//! use ndarray::array;
//! use statkit::prelude::*;
//!
//! # fn main() -> statkit::Result<()> {
//! let summary = describe(&[4.0, 8.0, 15.0, 16.0, 23.0, 42.0])?;
//! assert_eq!(summary.median, 15.5);
//!
//! let table = WideTable::from_complete(
//!     vec!["B1".into(), "B2".into(), "B3".into()],
//!     vec!["A".into(), "B".into()],
//!     &array![[10.0, 15.0], [12.0, 18.0], [11.0, 16.5]],
//! )?;
//! let anova = compute_anova(&table, &AnovaConfig::new(Design::Rbd))?;
//! assert!(anova.reject_null());
//!
//! let subgroups = SubgroupTable::from_columns(&[
//!     vec![5.1, 4.9, 5.0],
//!     vec![5.2, 5.0, 4.8],
//! ])?;
//! let limits = compute_control_limits(&subgroups)?;
//! assert!(limits.xbar.lcl < limits.xbar.ucl);
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! Computations emit records through the [`log`] facade: `debug` for what was
//! computed and `warn` for degenerate results. No logger is installed.
//!
//! ## Features
//!
//! - `serde`: Enable serialization/deserialization of tables and results
//! - `parallel`: Enable parallel batch evaluation using rayon
//! - `python`: Enable Python bindings via PyO3

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod descriptive;
pub mod doe;
pub mod error;
#[cfg(feature = "python")]
pub mod python;
pub mod spc;
pub mod utils;

#[cfg(feature = "parallel")]
pub mod parallel;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::descriptive::{describe, DescriptiveSummary, Mode, SummaryValue};
    pub use crate::doe::{
        compute_anova, compute_anova_long, reshape_long, AnovaConfig, AnovaEntry, AnovaResult,
        Design, LongRecord, Term, WideTable,
    };
    pub use crate::error::{Error, Result};
    pub use crate::spc::{
        compute_control_limits, ChartLimits, ControlChartConstants, ControlLimits,
        SubgroupTable,
    };
    pub use crate::utils::{parse_number, parse_number_list};

    #[cfg(feature = "parallel")]
    pub use crate::parallel::{par_compute_anova, par_compute_control_limits, par_describe};
}

// Re-export commonly used items at crate root
pub use descriptive::describe;
pub use doe::compute_anova;
pub use error::{Error, Result};
pub use spc::compute_control_limits;

#[cfg(feature = "parallel")]
pub use parallel::{par_compute_anova, par_compute_control_limits, par_describe};
