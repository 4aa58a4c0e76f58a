use crate::error::{MotifError, Result};
use crate::types::SymbolClass;
use phf::phf_map;

const fn build_class_table() -> [SymbolClass; 256] {
    let mut table = [SymbolClass::Other; 256];
    table[b'A' as usize] = SymbolClass::A;
    table[b'a' as usize] = SymbolClass::A;
    table[b'C' as usize] = SymbolClass::C;
    table[b'c' as usize] = SymbolClass::C;
    table[b'G' as usize] = SymbolClass::G;
    table[b'g' as usize] = SymbolClass::G;
    table[b'T' as usize] = SymbolClass::T;
    table[b't' as usize] = SymbolClass::T;
    table
}

static CLASS_TABLE: [SymbolClass; 256] = build_class_table();

/// IUPAC complements, case preserved
static IUPAC_COMPLEMENT: phf::Map<char, char> = phf_map! {
    'A' => 'T', 'T' => 'A', 'C' => 'G', 'G' => 'C',
    'R' => 'Y', 'Y' => 'R', 'K' => 'M', 'M' => 'K',
    'B' => 'V', 'V' => 'B', 'D' => 'H', 'H' => 'D',
    'S' => 'S', 'W' => 'W', 'N' => 'N',
    'a' => 't', 't' => 'a', 'c' => 'g', 'g' => 'c',
    'r' => 'y', 'y' => 'r', 'k' => 'm', 'm' => 'k',
    'b' => 'v', 'v' => 'b', 'd' => 'h', 'h' => 'd',
    's' => 's', 'w' => 'w', 'n' => 'n',
};

/// Maps a base to its matrix column.
///
/// Upper and lower case A/C/G/T map to their own class; every other byte,
/// IUPAC ambiguity codes included, maps to [`SymbolClass::Other`].
#[inline]
pub fn classify(base: u8) -> SymbolClass {
    CLASS_TABLE[base as usize]
}

/// Class of the complementary base (A<->T, C<->G, Other stays Other)
#[inline]
pub fn complement_class(class: SymbolClass) -> SymbolClass {
    class.complement()
}

/// Generates the reverse complement of a nucleotide sequence.
///
/// # Arguments
/// * `sequence` - Input sequence, IUPAC codes in either case
///
/// # Returns
/// * `Result<String>` - The reverse complement, each base complemented with
///   IUPAC conventions and case preserved
///
/// # Errors
/// * Returns `MotifError::InvalidSequence` for a character that is not an IUPAC
///   nucleotide code, with its position in the input
pub fn reverse_complement(sequence: &str) -> Result<String> {
    sequence
        .chars()
        .enumerate()
        .map(|(position, c)| {
            IUPAC_COMPLEMENT.get(&c).copied().ok_or_else(|| {
                MotifError::invalid_sequence(position, format!("no complement for '{}'", c))
            })
        })
        .collect::<Result<Vec<char>>>()
        .map(|complemented| complemented.into_iter().rev().collect())
}
