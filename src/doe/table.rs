//! Wide block-by-treatment tables and their long-format reshape.

use std::collections::HashSet;
use std::fmt;

use ndarray::Array2;

use crate::error::{Error, Result};
use crate::utils::parse_cell;

/// A block-by-treatment table of responses.
///
/// Conceptually the first column identifies the block and the remaining
/// columns are named treatments. Row `i` of `responses` belongs to block
/// `block_labels[i]`, column `j` to treatment `treatment_labels[j]`.
/// `None` marks a missing cell.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WideTable {
    block_header: String,
    block_labels: Vec<String>,
    treatment_labels: Vec<String>,
    /// Shape (blocks, treatments).
    responses: Array2<Option<f64>>,
}

impl WideTable {
    /// Create a table from labels and a response matrix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Shape`] if the label counts do not match the matrix
    /// dimensions, or if block or treatment labels repeat.
    pub fn new(
        block_labels: Vec<String>,
        treatment_labels: Vec<String>,
        responses: Array2<Option<f64>>,
    ) -> Result<Self> {
        if responses.nrows() != block_labels.len() {
            return Err(Error::shape(format!(
                "{} block labels for {} rows",
                block_labels.len(),
                responses.nrows()
            )));
        }
        if responses.ncols() != treatment_labels.len() {
            return Err(Error::shape(format!(
                "{} treatment labels for {} response columns",
                treatment_labels.len(),
                responses.ncols()
            )));
        }
        ensure_unique("block", &block_labels)?;
        ensure_unique("treatment", &treatment_labels)?;

        Ok(Self {
            block_header: "Block".to_string(),
            block_labels,
            treatment_labels,
            responses,
        })
    }

    /// Create a fully observed table from a matrix of responses.
    ///
    /// # Errors
    ///
    /// Same as [`WideTable::new`].
    pub fn from_complete(
        block_labels: Vec<String>,
        treatment_labels: Vec<String>,
        responses: &Array2<f64>,
    ) -> Result<Self> {
        Self::new(block_labels, treatment_labels, responses.mapv(Some))
    }

    /// Build a table from raw text, as read from a spreadsheet.
    ///
    /// `header[0]` names the block column and the remaining header cells name
    /// the treatments. Each row starts with its block label followed by one
    /// cell per treatment; blank cells are missing.
    ///
    /// # Errors
    ///
    /// * [`Error::Shape`] for an empty header or a row whose width differs
    ///   from the header.
    /// * [`Error::NonNumericInput`] for a non-blank cell that is not a number.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statkit::doe::WideTable;
    ///
    /// let table = WideTable::parse(
    ///     &["Field", "A", "B"],
    ///     &[vec!["north", "10", "12"], vec!["south", "11", ""]],
    /// )
    /// .unwrap();
    /// assert_eq!(table.num_blocks(), 2);
    /// assert_eq!(table.num_treatments(), 2);
    /// assert_eq!(table.get(1, 1), None);
    /// ```
    pub fn parse<S: AsRef<str>>(header: &[S], rows: &[Vec<S>]) -> Result<Self> {
        let (block_header, treatments) = header
            .split_first()
            .ok_or_else(|| Error::shape("header has no columns"))?;

        let mut block_labels = Vec::with_capacity(rows.len());
        let mut responses = Array2::from_elem((rows.len(), treatments.len()), None);

        for (i, row) in rows.iter().enumerate() {
            if row.len() != header.len() {
                return Err(Error::shape(format!(
                    "row {} has {} cells, header has {}",
                    i + 1,
                    row.len(),
                    header.len()
                )));
            }
            block_labels.push(row[0].as_ref().trim().to_string());
            for (j, cell) in row[1..].iter().enumerate() {
                responses[[i, j]] = parse_cell(cell.as_ref())?;
            }
        }

        let treatment_labels = treatments
            .iter()
            .map(|t| t.as_ref().trim().to_string())
            .collect();
        let mut table = Self::new(block_labels, treatment_labels, responses)?;
        table.block_header = block_header.as_ref().trim().to_string();
        Ok(table)
    }

    /// Name of the block column.
    #[must_use]
    pub fn block_header(&self) -> &str {
        &self.block_header
    }

    /// Block labels, one per row.
    #[must_use]
    pub fn block_labels(&self) -> &[String] {
        &self.block_labels
    }

    /// Treatment labels, one per response column.
    #[must_use]
    pub fn treatment_labels(&self) -> &[String] {
        &self.treatment_labels
    }

    /// Number of blocks (rows).
    #[must_use]
    pub fn num_blocks(&self) -> usize {
        self.block_labels.len()
    }

    /// Number of treatments (response columns).
    #[must_use]
    pub fn num_treatments(&self) -> usize {
        self.treatment_labels.len()
    }

    /// Total number of columns including the block column.
    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.num_treatments() + 1
    }

    /// The response for block `block` and treatment `treatment`.
    #[must_use]
    pub fn get(&self, block: usize, treatment: usize) -> Option<f64> {
        self.responses.get((block, treatment)).copied().flatten()
    }

    /// The response matrix, shape (blocks, treatments).
    #[must_use]
    pub fn responses(&self) -> &Array2<Option<f64>> {
        &self.responses
    }

    /// Reshape into long format. See [`reshape_long`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Shape`] if the table has no treatment column.
    pub fn to_long(&self) -> Result<Vec<LongRecord>> {
        reshape_long(self)
    }
}

impl fmt::Display for WideTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.block_header)?;
        for t in &self.treatment_labels {
            write!(f, "\t{t}")?;
        }
        writeln!(f)?;
        for (label, row) in self.block_labels.iter().zip(self.responses.rows()) {
            write!(f, "{label}")?;
            for cell in row {
                match cell {
                    Some(v) => write!(f, "\t{v}")?,
                    None => f.write_str("\t")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// One observation of a wide table: a (block, treatment, response) triple.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LongRecord {
    /// Block label.
    pub block: String,
    /// Treatment label.
    pub treatment: String,
    /// Observed response, `None` if the cell was missing.
    pub response: Option<f64>,
}

/// Reshape a wide table into one [`LongRecord`] per (block, treatment) cell.
///
/// Records are ordered treatment-major: every block of the first treatment,
/// then every block of the second, and so on. Missing cells are kept as
/// `None` so the caller can see them; the ANOVA rejects them.
///
/// # Errors
///
/// Returns [`Error::Shape`] if the table has fewer than 2 columns (a block
/// column and at least one treatment).
///
/// # Example
///
/// ```rust
/// use ndarray::array;
/// use statkit::doe::{reshape_long, WideTable};
///
/// let table = WideTable::from_complete(
///     vec!["B1".into(), "B2".into()],
///     vec!["T1".into(), "T2".into(), "T3".into()],
///     &array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]],
/// )
/// .unwrap();
///
/// let long = reshape_long(&table).unwrap();
/// assert_eq!(long.len(), 6);
/// assert_eq!(long[1].block, "B2");
/// assert_eq!(long[1].treatment, "T1");
/// assert_eq!(long[1].response, Some(4.0));
/// ```
pub fn reshape_long(table: &WideTable) -> Result<Vec<LongRecord>> {
    if table.num_columns() < 2 {
        return Err(Error::shape(format!(
            "table has {} column(s); need a block column and at least one treatment",
            table.num_columns()
        )));
    }

    let mut records = Vec::with_capacity(table.num_blocks() * table.num_treatments());
    for (j, treatment) in table.treatment_labels.iter().enumerate() {
        for (i, block) in table.block_labels.iter().enumerate() {
            records.push(LongRecord {
                block: block.clone(),
                treatment: treatment.clone(),
                response: table.responses[[i, j]],
            });
        }
    }
    Ok(records)
}

fn ensure_unique(kind: &str, labels: &[String]) -> Result<()> {
    let mut seen = HashSet::with_capacity(labels.len());
    for label in labels {
        if !seen.insert(label.as_str()) {
            return Err(Error::shape(format!("duplicate {kind} label {label:?}")));
        }
    }
    Ok(())
}
