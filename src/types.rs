use std::fmt;

/// Symbol classes used to index a scoring matrix row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SymbolClass {
    A = 0,
    C = 1,
    G = 2,
    T = 3,
    /// Anything that is not A/C/G/T, scored with the per-position average
    Other = 4,
}

impl SymbolClass {
    /// Number of classes, i.e. columns of a scoring matrix
    pub const COUNT: usize = 5;

    /// The four real nucleotides in column order
    pub const NUCLEOTIDES: [SymbolClass; 4] =
        [SymbolClass::A, SymbolClass::C, SymbolClass::G, SymbolClass::T];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Class of the base on the opposite strand. `Other` stays `Other`.
    #[inline]
    pub fn complement(self) -> SymbolClass {
        match self {
            SymbolClass::A => SymbolClass::T,
            SymbolClass::C => SymbolClass::G,
            SymbolClass::G => SymbolClass::C,
            SymbolClass::T => SymbolClass::A,
            SymbolClass::Other => SymbolClass::Other,
        }
    }
}

/// Strand a hit was scored on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    Forward,
    Reverse,
}

impl Strand {
    pub fn symbol(self) -> char {
        match self {
            Strand::Forward => '+',
            Strand::Reverse => '-',
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A window whose score exceeded the threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// 0-based window start on the top strand
    pub position: usize,
    pub strand: Strand,
    pub score: f64,
}

/// One FASTA entry as handed to the scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    pub id: String,
    pub bases: Vec<u8>,
}

impl SequenceRecord {
    pub fn new(id: impl Into<String>, bases: impl Into<Vec<u8>>) -> Self {
        SequenceRecord {
            id: id.into(),
            bases: bases.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }
}

/// How qualifying hits of a sequence are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportPolicy {
    /// Report every hit as soon as the scanner produces it
    #[default]
    EmitEachHit,
    /// Buffer hits and report them in scan order at sequence end
    CollectAll,
    /// Report only the highest scoring hit of each sequence
    BestOnly,
}

/// Settings for one scanning run
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub threshold: f64,
    pub policy: ReportPolicy,
    pub motif_name: String,
    pub motif_class: String,
}

impl RunConfig {
    pub fn new(threshold: f64) -> Self {
        RunConfig {
            threshold,
            policy: ReportPolicy::default(),
            motif_name: String::new(),
            motif_class: String::new(),
        }
    }

    pub fn with_policy(mut self, policy: ReportPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_motif_name(mut self, name: impl Into<String>) -> Self {
        self.motif_name = name.into();
        self
    }

    pub fn with_motif_class(mut self, class: impl Into<String>) -> Self {
        self.motif_class = class.into();
        self
    }
}
