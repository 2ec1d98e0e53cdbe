//! Python bindings for statkit.
//!
//! This module exposes the three analyses to Python using PyO3, so a
//! presentation layer written in Python can load spreadsheets and plot while
//! the numbers come from here. Enable the `python` feature to use this.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::descriptive::{describe as describe_sample, DescriptiveSummary};
use crate::doe::{compute_anova, AnovaConfig, AnovaEntry, AnovaResult, Design, WideTable};
use crate::error::Error;
use crate::spc::{compute_control_limits, ControlLimits, SubgroupTable};
use crate::utils::parse_number_list;

fn to_py_err(e: Error) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Python wrapper for DescriptiveSummary
#[pyclass(name = "DescriptiveSummary")]
#[derive(Clone)]
pub struct PyDescriptiveSummary {
    inner: DescriptiveSummary,
}

#[pymethods]
impl PyDescriptiveSummary {
    #[getter]
    fn count(&self) -> usize {
        self.inner.count
    }

    #[getter]
    fn total(&self) -> f64 {
        self.inner.total
    }

    #[getter]
    fn max(&self) -> f64 {
        self.inner.max
    }

    #[getter]
    fn min(&self) -> f64 {
        self.inner.min
    }

    #[getter]
    fn mean(&self) -> f64 {
        self.inner.mean
    }

    #[getter]
    fn range(&self) -> f64 {
        self.inner.range
    }

    #[getter]
    fn median(&self) -> f64 {
        self.inner.median
    }

    /// The most frequent value, or `None` when there is no unique mode.
    #[getter]
    fn mode(&self) -> Option<f64> {
        self.inner.mode.value()
    }

    #[getter]
    fn std_dev(&self) -> f64 {
        self.inner.std_dev
    }

    #[getter]
    fn variance(&self) -> f64 {
        self.inner.variance
    }

    /// Labeled values in display order, as `(label, text)` pairs.
    fn entries(&self) -> Vec<(&'static str, String)> {
        self.inner
            .entries()
            .into_iter()
            .map(|(label, value)| (label, value.to_string()))
            .collect()
    }

    fn __str__(&self) -> String {
        self.inner.to_string()
    }
}

/// Python wrapper for one ANOVA table row
#[pyclass(name = "AnovaEntry")]
#[derive(Clone)]
pub struct PyAnovaEntry {
    /// "Treatment" or "Block"
    #[pyo3(get)]
    pub source: String,
    /// Degrees of freedom
    #[pyo3(get)]
    pub df: usize,
    /// Sum of squares
    #[pyo3(get)]
    pub sum_sq: f64,
    /// Mean square
    #[pyo3(get)]
    pub mean_sq: f64,
    /// F ratio, `None` when undefined
    #[pyo3(get)]
    pub f: Option<f64>,
    /// Upper-tail p-value
    #[pyo3(get)]
    pub p_value: f64,
}

impl From<&AnovaEntry> for PyAnovaEntry {
    fn from(e: &AnovaEntry) -> Self {
        Self {
            source: e.term.to_string(),
            df: e.degrees_of_freedom,
            sum_sq: e.sum_of_squares,
            mean_sq: e.mean_square,
            f: e.f_ratio,
            p_value: e.p_value,
        }
    }
}

/// Python wrapper for AnovaResult
#[pyclass(name = "AnovaResult")]
pub struct PyAnovaResult {
    inner: AnovaResult,
}

#[pymethods]
impl PyAnovaResult {
    #[getter]
    fn design(&self) -> String {
        self.inner.design.to_string()
    }

    /// Model-term rows: Treatment, then Block for RBD.
    #[getter]
    fn entries(&self) -> Vec<PyAnovaEntry> {
        self.inner.entries().map(PyAnovaEntry::from).collect()
    }

    #[getter]
    fn residual_df(&self) -> usize {
        self.inner.error_df
    }

    #[getter]
    fn residual_sum_sq(&self) -> f64 {
        self.inner.error_ss
    }

    #[getter]
    fn treatment_means(&self) -> Vec<(String, f64)> {
        self.inner.treatment_means.clone()
    }

    /// Whether equal treatment means are rejected at the configured level.
    fn reject_null(&self) -> bool {
        self.inner.reject_null()
    }

    fn __str__(&self) -> String {
        self.inner.to_string()
    }
}

/// Python wrapper for ControlLimits
#[pyclass(name = "ControlLimits")]
pub struct PyControlLimits {
    inner: ControlLimits,
}

#[pymethods]
impl PyControlLimits {
    #[getter]
    fn subgroup_size(&self) -> usize {
        self.inner.subgroup_size
    }

    #[getter]
    fn grand_mean(&self) -> f64 {
        self.inner.grand_mean
    }

    #[getter]
    fn mean_range(&self) -> f64 {
        self.inner.mean_range
    }

    /// X-bar chart `(ucl, cl, lcl)`.
    #[getter]
    fn xbar(&self) -> (f64, f64, f64) {
        let l = self.inner.xbar;
        (l.ucl, l.cl, l.lcl)
    }

    /// R chart `(ucl, cl, lcl)`.
    #[getter]
    fn range(&self) -> (f64, f64, f64) {
        let l = self.inner.range;
        (l.ucl, l.cl, l.lcl)
    }

    #[getter]
    fn subgroup_means(&self) -> Vec<f64> {
        self.inner.subgroup_means.clone()
    }

    #[getter]
    fn subgroup_ranges(&self) -> Vec<f64> {
        self.inner.subgroup_ranges.clone()
    }

    fn out_of_control_means(&self) -> Vec<usize> {
        self.inner.out_of_control_means()
    }

    fn out_of_control_ranges(&self) -> Vec<usize> {
        self.inner.out_of_control_ranges()
    }

    fn __str__(&self) -> String {
        self.inner.to_string()
    }
}

/// Parse a comma-separated list of numbers.
#[pyfunction]
fn parse_numbers(text: &str) -> PyResult<Vec<f64>> {
    parse_number_list(text).map_err(to_py_err)
}

/// Describe a numeric sample.
#[pyfunction]
fn describe(values: Vec<f64>) -> PyResult<PyDescriptiveSummary> {
    let inner = describe_sample(&values).map_err(to_py_err)?;
    Ok(PyDescriptiveSummary { inner })
}

/// Run a CRD or RBD ANOVA on a wide table given as text cells.
#[pyfunction]
#[pyo3(signature = (header, rows, design="CRD", alpha=0.05))]
fn anova(
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    design: &str,
    alpha: f64,
) -> PyResult<PyAnovaResult> {
    let design: Design = design.parse().map_err(to_py_err)?;
    let table = WideTable::parse(&header, &rows).map_err(to_py_err)?;
    let config = AnovaConfig::new(design).with_significance_level(alpha);
    let inner = compute_anova(&table, &config).map_err(to_py_err)?;
    Ok(PyAnovaResult { inner })
}

/// Compute X-bar and R chart limits, one list per subgroup.
#[pyfunction]
fn control_limits(subgroups: Vec<Vec<f64>>) -> PyResult<PyControlLimits> {
    let table = SubgroupTable::from_columns(&subgroups).map_err(to_py_err)?;
    let inner = compute_control_limits(&table).map_err(to_py_err)?;
    Ok(PyControlLimits { inner })
}

/// The statkit Python module.
#[pymodule]
fn statkit(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add_class::<PyDescriptiveSummary>()?;
    m.add_class::<PyAnovaEntry>()?;
    m.add_class::<PyAnovaResult>()?;
    m.add_class::<PyControlLimits>()?;
    m.add_function(wrap_pyfunction!(parse_numbers, m)?)?;
    m.add_function(wrap_pyfunction!(describe, m)?)?;
    m.add_function(wrap_pyfunction!(anova, m)?)?;
    m.add_function(wrap_pyfunction!(control_limits, m)?)?;
    Ok(())
}
