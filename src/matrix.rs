use crate::alphabet::classify;
use crate::error::{MotifError, Result};
use crate::types::{Strand, SymbolClass};
use crate::MAX_COUNTS;
use log::info;
use ndarray::{s, Array2, ArrayView2};
use statrs::statistics::Statistics;
use std::fs;

/// Positional scoring matrix, one row per motif position and one column per
/// [`SymbolClass`]. The `Other` column holds the mean of the A/C/G/T scores.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringMatrix {
    weights: Array2<f64>,
}

/// Highest and lowest cumulative score a window of A/C/G/T can reach
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBounds {
    pub max: f64,
    pub min: f64,
}

impl ScoringMatrix {
    /// Builds a matrix from a flat counts table.
    ///
    /// The table is laid out nucleotide by nucleotide: the first `width` values
    /// are the A scores of every position, followed by the C, G and T scores.
    /// Values are stored as given, no pseudocounts or log transform.
    ///
    /// # Errors
    /// * `MotifError::TooManyCounts` if the table holds more than [`MAX_COUNTS`] values
    /// * `MotifError::RaggedCounts` if the table length is not a multiple of 4
    pub fn from_counts(counts: &[f64]) -> Result<Self> {
        if counts.len() > MAX_COUNTS {
            return Err(MotifError::TooManyCounts {
                count: counts.len(),
                capacity: MAX_COUNTS,
            });
        }
        if counts.len() % 4 != 0 {
            return Err(MotifError::RaggedCounts {
                count: counts.len(),
            });
        }

        let width = counts.len() / 4;
        let mut weights = Array2::from_shape_fn((width, SymbolClass::COUNT), |(pos, class)| {
            if class < 4 {
                counts[class * width + pos]
            } else {
                0.0
            }
        });

        for mut row in weights.rows_mut() {
            let mean = row.slice(s![..4]).iter().mean();
            row[SymbolClass::Other.index()] = mean;
        }

        Ok(ScoringMatrix { weights })
    }

    /// Number of positions in the motif
    pub fn width(&self) -> usize {
        self.weights.nrows()
    }

    pub fn weights(&self) -> ArrayView2<'_, f64> {
        self.weights.view()
    }

    #[inline]
    pub fn weight(&self, position: usize, class: SymbolClass) -> f64 {
        self.weights[[position, class.index()]]
    }

    /// Sums the per-position maxima and minima over A/C/G/T
    pub fn bounds(&self) -> ScoreBounds {
        let mut bounds = ScoreBounds { max: 0.0, min: 0.0 };
        for row in self.weights.rows() {
            let nucleotides = row.slice(s![..4]);
            bounds.max += Statistics::max(nucleotides.iter());
            bounds.min += Statistics::min(nucleotides.iter());
        }
        bounds
    }

    /// Scores one window of exactly `width` bases.
    ///
    /// The reverse strand is scored without building the reverse complement:
    /// base `i` of the window is complemented and looked up in row
    /// `width - 1 - i`.
    #[inline]
    pub fn score(&self, window: &[u8], strand: Strand) -> f64 {
        debug_assert_eq!(window.len(), self.width());
        let last = self.width().wrapping_sub(1);
        match strand {
            Strand::Forward => window
                .iter()
                .enumerate()
                .map(|(i, &base)| self.weight(i, classify(base)))
                .sum(),
            Strand::Reverse => window
                .iter()
                .enumerate()
                .map(|(i, &base)| self.weight(last - i, classify(base).complement()))
                .sum(),
        }
    }
}

impl ScoreBounds {
    /// True when every window would get the same score, so no percentage
    /// can be computed
    pub fn is_degenerate(&self) -> bool {
        self.max == self.min
    }

    /// Rescales a score to 0-100 between `min` and `max`.
    ///
    /// # Errors
    /// * `MotifError::DegenerateMatrix` when `max == min`
    pub fn relative(&self, score: f64) -> Result<f64> {
        if self.is_degenerate() {
            return Err(MotifError::DegenerateMatrix { max: self.max });
        }
        Ok(100.0 * (score - self.min) / (self.max - self.min))
    }
}

/// Builds the scoring matrix and its score bounds from a counts table
pub fn build(counts: &[f64]) -> Result<(ScoringMatrix, ScoreBounds)> {
    let matrix = ScoringMatrix::from_counts(counts)?;
    let bounds = matrix.bounds();
    info!(
        "Built scoring matrix: width {}, score range [{:.3}, {:.3}]",
        matrix.width(),
        bounds.min,
        bounds.max
    );
    Ok((matrix, bounds))
}

/// Parses a counts table from text.
///
/// Values may be separated by commas, whitespace or both; empty fields are
/// skipped. The result is not checked for a multiple of 4 here.
///
/// # Errors
/// * `MotifError::InvalidFileFormat` for a field that is not a number
/// * `MotifError::TooManyCounts` past [`MAX_COUNTS`] values
pub fn parse_counts(text: &str) -> Result<Vec<f64>> {
    let fields = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|field| !field.is_empty());

    let mut counts = Vec::new();
    for (idx, field) in fields.enumerate() {
        if idx == MAX_COUNTS {
            return Err(MotifError::TooManyCounts {
                count: idx + 1,
                capacity: MAX_COUNTS,
            });
        }
        let value = field.parse::<f64>().map_err(|e| {
            MotifError::InvalidFileFormat(format!("Invalid count '{}': {}", field, e))
        })?;
        counts.push(value);
    }

    Ok(counts)
}

/// Reads a counts table file, see [`parse_counts`]
pub fn read_counts(filename: &str) -> Result<Vec<f64>> {
    let text = fs::read_to_string(filename)?;
    parse_counts(&text)
}
