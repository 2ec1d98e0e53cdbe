//! Descriptive summary types.

use std::fmt;

/// Most frequent value of a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    /// A single value occurs strictly more often than every other value.
    Value(f64),
    /// Two or more distinct values share the highest frequency.
    NoUniqueMode,
}

impl Mode {
    /// The modal value, if unique.
    #[must_use]
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::NoUniqueMode => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v}"),
            Self::NoUniqueMode => f.write_str("No unique mode"),
        }
    }
}

/// A single labeled field of a [`DescriptiveSummary`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SummaryValue {
    /// An integer field (the count).
    Count(usize),
    /// A real-valued field.
    Number(f64),
    /// The mode, which may be the "no unique mode" sentinel.
    Mode(Mode),
}

impl fmt::Display for SummaryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::Number(v) => write!(f, "{v}"),
            Self::Mode(m) => write!(f, "{m}"),
        }
    }
}

/// Summary statistics of one numeric sample.
///
/// Spread statistics use the sample (N-1) denominator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DescriptiveSummary {
    /// Number of values.
    pub count: usize,
    /// Sum of all values.
    pub total: f64,
    /// Largest value.
    pub max: f64,
    /// Smallest value.
    pub min: f64,
    /// Arithmetic mean.
    pub mean: f64,
    /// `max - min`.
    pub range: f64,
    /// Middle value of the sorted sample (mean of the two central values for
    /// an even count).
    pub median: f64,
    /// Most frequent value, or [`Mode::NoUniqueMode`].
    pub mode: Mode,
    /// Sample standard deviation.
    pub std_dev: f64,
    /// Sample variance.
    pub variance: f64,
}

impl DescriptiveSummary {
    /// Labels of [`entries`](Self::entries), in display order.
    pub const LABELS: [&'static str; 10] = [
        "Count", "Total", "Max", "Min", "Mean", "Range", "Median", "Mode", "Std Dev", "Variance",
    ];

    /// The summary as labeled fields, in display order.
    #[must_use]
    pub fn entries(&self) -> [(&'static str, SummaryValue); 10] {
        [
            ("Count", SummaryValue::Count(self.count)),
            ("Total", SummaryValue::Number(self.total)),
            ("Max", SummaryValue::Number(self.max)),
            ("Min", SummaryValue::Number(self.min)),
            ("Mean", SummaryValue::Number(self.mean)),
            ("Range", SummaryValue::Number(self.range)),
            ("Median", SummaryValue::Number(self.median)),
            ("Mode", SummaryValue::Mode(self.mode)),
            ("Std Dev", SummaryValue::Number(self.std_dev)),
            ("Variance", SummaryValue::Number(self.variance)),
        ]
    }
}

impl fmt::Display for DescriptiveSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, value) in self.entries() {
            writeln!(f, "{label:10}: {value}")?;
        }
        Ok(())
    }
}
