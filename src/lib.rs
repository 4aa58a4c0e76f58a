//! Dual-strand position weight matrix scanning for transcription factor binding sites

pub mod alphabet;
pub mod collect;
pub mod error;
pub mod fasta;
pub mod matrix;
pub mod output;
pub mod scan;
pub mod search;
pub mod types;

/// Largest number of values accepted in a counts table (250 positions x 4 bases).
pub const MAX_COUNTS: usize = 1000;

/// Largest number of hits buffered for one sequence in collect-all mode.
pub const MAX_HITS: usize = 1000;

/// Longest sequence the FASTA reader will hand to the scanner.
pub const MAX_SEQUENCE_LEN: usize = 1_000_000;

pub use error::{MotifError, Result};
pub use matrix::{build, ScoreBounds, ScoringMatrix};
pub use search::{Diagnostics, RunSummary, Searcher};
pub use types::{Hit, ReportPolicy, RunConfig, SequenceRecord, Strand, SymbolClass};
