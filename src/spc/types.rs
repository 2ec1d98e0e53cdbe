//! Subgroup tables and control limit results.

use std::fmt;

use ndarray::Array2;

use super::constants::ControlChartConstants;
use crate::error::{Error, Result};
use crate::utils::parse_cell;

/// Repeated measurements arranged one subgroup per column.
///
/// Row `i` of column `j` is the `i`-th replicate of subgroup
/// `labels[j]`. Every subgroup has the same size, the number of rows.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubgroupTable {
    labels: Vec<String>,
    /// Shape (subgroup size, number of subgroups).
    data: Array2<f64>,
}

impl SubgroupTable {
    /// Create a table from subgroup labels and a measurement matrix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Shape`] if the label count differs from the number of
    /// columns.
    pub fn new(labels: Vec<String>, data: Array2<f64>) -> Result<Self> {
        if labels.len() != data.ncols() {
            return Err(Error::shape(format!(
                "{} subgroup labels for {} columns",
                labels.len(),
                data.ncols()
            )));
        }
        Ok(Self { labels, data })
    }

    /// Create a table whose subgroups are labeled "1", "2", ...
    #[must_use]
    pub fn from_matrix(data: Array2<f64>) -> Self {
        let labels = (1..=data.ncols()).map(|j| j.to_string()).collect();
        Self { labels, data }
    }

    /// Create a table from one vector per subgroup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Shape`] if the subgroups differ in size.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statkit::spc::SubgroupTable;
    ///
    /// let table = SubgroupTable::from_columns(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    /// assert_eq!(table.subgroup_size(), 2);
    /// assert!(SubgroupTable::from_columns(&[vec![1.0, 2.0], vec![3.0]]).is_err());
    /// ```
    pub fn from_columns(columns: &[Vec<f64>]) -> Result<Self> {
        let n = columns.first().map_or(0, Vec::len);
        if let Some((j, col)) = columns.iter().enumerate().find(|(_, c)| c.len() != n) {
            return Err(Error::shape(format!(
                "subgroup {} has {} values, expected {n}",
                j + 1,
                col.len()
            )));
        }
        let data = Array2::from_shape_fn((n, columns.len()), |(i, j)| columns[j][i]);
        Ok(Self::from_matrix(data))
    }

    /// Build a table from raw text, as read from a spreadsheet: one header
    /// cell per subgroup, then one row per replicate.
    ///
    /// # Errors
    ///
    /// * [`Error::Shape`] if a row's width differs from the header or a cell
    ///   is blank, leaving its subgroup short.
    /// * [`Error::NonNumericInput`] for a cell that is not a number.
    pub fn parse<S: AsRef<str>>(header: &[S], rows: &[Vec<S>]) -> Result<Self> {
        let mut data = Array2::zeros((rows.len(), header.len()));
        for (i, row) in rows.iter().enumerate() {
            if row.len() != header.len() {
                return Err(Error::shape(format!(
                    "row {} has {} cells, header has {}",
                    i + 1,
                    row.len(),
                    header.len()
                )));
            }
            for (j, cell) in row.iter().enumerate() {
                data[[i, j]] = parse_cell(cell.as_ref())?.ok_or_else(|| {
                    Error::shape(format!(
                        "subgroup {:?} is missing replicate {}",
                        header[j].as_ref().trim(),
                        i + 1
                    ))
                })?;
            }
        }
        let labels = header.iter().map(|h| h.as_ref().trim().to_string()).collect();
        Self::new(labels, data)
    }

    /// Subgroup labels, one per column.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of subgroups (columns).
    #[must_use]
    pub fn num_subgroups(&self) -> usize {
        self.data.ncols()
    }

    /// Measurements per subgroup (rows).
    #[must_use]
    pub fn subgroup_size(&self) -> usize {
        self.data.nrows()
    }

    /// Whether the table holds no measurements at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The measurement matrix, shape (subgroup size, subgroups).
    #[must_use]
    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }
}

/// Upper, center and lower line of one chart.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChartLimits {
    /// Upper control limit.
    pub ucl: f64,
    /// Center line.
    pub cl: f64,
    /// Lower control limit.
    pub lcl: f64,
}

impl ChartLimits {
    /// Whether `value` lies within `[lcl, ucl]`.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lcl && value <= self.ucl
    }
}

/// X-bar and R chart limits with the per-subgroup series they came from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlLimits {
    /// Measurements per subgroup (n).
    pub subgroup_size: usize,
    /// Factors looked up for `subgroup_size`.
    pub constants: ControlChartConstants,
    /// Mean of the subgroup means (X-double-bar).
    pub grand_mean: f64,
    /// Mean of the subgroup ranges (R-bar).
    pub mean_range: f64,
    /// X-bar chart limits.
    pub xbar: ChartLimits,
    /// R chart limits.
    pub range: ChartLimits,
    /// Mean of each subgroup, in column order.
    pub subgroup_means: Vec<f64>,
    /// Range (max - min) of each subgroup, in column order.
    pub subgroup_ranges: Vec<f64>,
}

impl ControlLimits {
    /// Indices of subgroups whose mean falls outside the X-bar limits.
    #[must_use]
    pub fn out_of_control_means(&self) -> Vec<usize> {
        outside(&self.subgroup_means, &self.xbar)
    }

    /// Indices of subgroups whose range falls outside the R limits.
    #[must_use]
    pub fn out_of_control_ranges(&self) -> Vec<usize> {
        outside(&self.subgroup_ranges, &self.range)
    }
}

fn outside(series: &[f64], limits: &ChartLimits) -> Vec<usize> {
    series
        .iter()
        .enumerate()
        .filter(|(_, &v)| !limits.contains(v))
        .map(|(i, _)| i)
        .collect()
}

impl fmt::Display for ControlLimits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "n = {}  (A2 = {}, D3 = {}, D4 = {})",
            self.subgroup_size, self.constants.a2, self.constants.d3, self.constants.d4
        )?;
        writeln!(f, "{:<8} {:>12} {:>12} {:>12}", "Chart", "LCL", "CL", "UCL")?;
        for (name, l) in [("X-bar", &self.xbar), ("R", &self.range)] {
            writeln!(f, "{name:<8} {:>12.4} {:>12.4} {:>12.4}", l.lcl, l.cl, l.ucl)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_from_columns_layout() {
        let columns = [vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        let table = SubgroupTable::from_columns(&columns).unwrap();
        assert_eq!(table.subgroup_size(), 3);
        assert_eq!(table.num_subgroups(), 2);
        assert_eq!(table.labels(), &["1".to_string(), "2".to_string()]);
        assert_eq!(table.data(), &array![[1.0, 4.0], [2.0, 5.0], [3.0, 6.0]]);
    }

    #[test]
    fn test_from_columns_ragged() {
        let err = SubgroupTable::from_columns(&[vec![1.0, 2.0], vec![3.0, 4.0, 5.0]]);
        assert!(matches!(err, Err(Error::Shape { .. })));
    }

    #[test]
    fn test_from_columns_empty() {
        let table = SubgroupTable::from_columns(&[]).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.subgroup_size(), 0);
    }

    #[test]
    fn test_new_label_mismatch() {
        let err = SubgroupTable::new(vec!["a".into()], array![[1.0, 2.0], [3.0, 4.0]]);
        assert!(matches!(err, Err(Error::Shape { .. })));
    }

    #[test]
    fn test_parse() {
        let table = SubgroupTable::parse(
            &["Mon", "Tue"],
            &[vec!["1.5", " 2 "], vec!["3", "4.25"]],
        )
        .unwrap();
        assert_eq!(table.labels(), &["Mon".to_string(), "Tue".to_string()]);
        assert_eq!(table.data(), &array![[1.5, 2.0], [3.0, 4.25]]);
    }

    #[test]
    fn test_parse_errors() {
        let blank = SubgroupTable::parse(&["a", "b"], &[vec!["1", ""]]);
        assert!(matches!(blank, Err(Error::Shape { .. })));

        let narrow = SubgroupTable::parse(&["a", "b"], &[vec!["1"]]);
        assert!(matches!(narrow, Err(Error::Shape { .. })));

        let text = SubgroupTable::parse(&["a", "b"], &[vec!["1", "x"]]);
        assert_eq!(
            text,
            Err(Error::NonNumericInput {
                value: "x".to_string()
            })
        );
    }

    #[test]
    fn test_chart_limits_contains() {
        let l = ChartLimits {
            ucl: 2.0,
            cl: 1.0,
            lcl: 0.0,
        };
        assert!(l.contains(0.0));
        assert!(l.contains(2.0));
        assert!(!l.contains(2.5));
        assert!(!l.contains(-0.1));
    }
}
