use crate::matrix::ScoringMatrix;
use crate::types::{Hit, Strand};

/// Lazy dual-strand scan of one sequence.
///
/// Every window start is scored on both strands; hits come out in window
/// order, forward before reverse at the same start.
pub struct WindowScan<'a> {
    matrix: &'a ScoringMatrix,
    threshold: f64,
    bases: &'a [u8],
    next_start: usize,
    pending: Option<Hit>,
}

/// Starts a scan of `bases` reporting windows that score strictly above
/// `threshold`. A sequence shorter than the motif, or an empty motif, yields
/// no hits.
pub fn scan<'a>(matrix: &'a ScoringMatrix, threshold: f64, bases: &'a [u8]) -> WindowScan<'a> {
    WindowScan {
        matrix,
        threshold,
        bases,
        next_start: 0,
        pending: None,
    }
}

impl<'a> WindowScan<'a> {
    /// Number of window starts the scan covers
    pub fn window_count(&self) -> usize {
        let width = self.matrix.width();
        if width == 0 || self.bases.len() < width {
            0
        } else {
            self.bases.len() - width + 1
        }
    }
}

impl Iterator for WindowScan<'_> {
    type Item = Hit;

    fn next(&mut self) -> Option<Hit> {
        if let Some(hit) = self.pending.take() {
            return Some(hit);
        }

        let width = self.matrix.width();
        let windows = self.window_count();
        while self.next_start < windows {
            let position = self.next_start;
            self.next_start += 1;

            let window = &self.bases[position..position + width];
            let forward = self.matrix.score(window, Strand::Forward);
            let reverse = self.matrix.score(window, Strand::Reverse);

            let reverse_hit = (reverse > self.threshold).then_some(Hit {
                position,
                strand: Strand::Reverse,
                score: reverse,
            });

            if forward > self.threshold {
                self.pending = reverse_hit;
                return Some(Hit {
                    position,
                    strand: Strand::Forward,
                    score: forward,
                });
            }
            if reverse_hit.is_some() {
                return reverse_hit;
            }
        }

        None
    }
}
