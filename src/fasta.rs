use crate::error::{MotifError, Result};
use crate::types::SequenceRecord;
use crate::MAX_SEQUENCE_LEN;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Split, Write};
use std::iter::Peekable;

/// Streams records out of FASTA text, one per call to `next`.
///
/// Returns `None` once the input is exhausted and `Some(Err(..))` for a read
/// failure or an over-long record. After `SequenceTooLong` the reader has
/// already skipped the rest of that record, so iteration can go on.
pub struct FastaReader<R: BufRead> {
    lines: Peekable<Split<R>>,
    max_len: usize,
}

impl FastaReader<BufReader<File>> {
    /// Opens a FASTA file for reading
    ///
    /// # Errors
    /// * Returns `MotifError::Io` if the file cannot be opened
    pub fn from_path(filename: &str) -> Result<Self> {
        let file = File::open(filename)?;
        Ok(FastaReader::new(BufReader::new(file)))
    }
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        FastaReader {
            lines: reader.split(b'\n').peekable(),
            max_len: MAX_SEQUENCE_LEN,
        }
    }

    /// Sets the longest record accepted, [`MAX_SEQUENCE_LEN`] by default
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    /// Advances until the next header line
    fn skip_until_header(&mut self) {
        while let Some(Ok(line)) = self.lines.peek() {
            if line.starts_with(b">") {
                break;
            }
            self.lines.next();
        }
    }
}

/// Sequence id: header text after '>' up to the first whitespace
fn parse_id(header: &[u8]) -> String {
    let name = header[1..]
        .split(|b| b.is_ascii_whitespace())
        .next()
        .unwrap_or_default();
    String::from_utf8_lossy(name).into_owned()
}

fn is_header(line: &io::Result<Vec<u8>>) -> bool {
    matches!(line, Ok(l) if l.starts_with(b">"))
}

impl<R: BufRead> Iterator for FastaReader<R> {
    type Item = Result<SequenceRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_until_header();

        let header = match self.lines.next()? {
            Ok(line) => line,
            Err(e) => return Some(Err(e.into())),
        };
        let id = parse_id(&header);

        let mut bases = Vec::new();
        let mut too_long = false;
        while let Some(line) = self.lines.next_if(|line| !is_header(line)) {
            let line = match line {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            if too_long {
                continue;
            }
            // digits and whitespace are layout, not sequence
            for &b in line
                .iter()
                .filter(|b| !b.is_ascii_digit() && !b.is_ascii_whitespace())
            {
                if bases.len() >= self.max_len {
                    too_long = true;
                    break;
                }
                bases.push(b);
            }
        }

        if too_long {
            return Some(Err(MotifError::SequenceTooLong {
                id,
                limit: self.max_len,
            }));
        }
        Some(Ok(SequenceRecord { id, bases }))
    }
}

/// Marks the bases covered by hits so a sequence can be written with its
/// sites blanked out
#[derive(Debug, Clone)]
pub struct SiteMask {
    covered: Vec<bool>,
}

impl SiteMask {
    pub fn new(len: usize) -> Self {
        SiteMask {
            covered: vec![false; len],
        }
    }

    /// Marks `width` bases starting at `position`, clipped to the sequence
    pub fn cover(&mut self, position: usize, width: usize) {
        let end = (position + width).min(self.covered.len());
        if position < end {
            self.covered[position..end].fill(true);
        }
    }

    pub fn covered_count(&self) -> usize {
        self.covered.iter().filter(|&&c| c).count()
    }

    /// Copy of `bases` with every covered base replaced by `n`
    pub fn apply(&self, bases: &[u8]) -> Vec<u8> {
        bases
            .iter()
            .zip(self.covered.iter().chain(std::iter::repeat(&false)))
            .map(|(&b, &covered)| if covered { b'n' } else { b })
            .collect()
    }
}

/// Writes one record as FASTA, the whole sequence on a single line
///
/// # Errors
/// * Returns `MotifError::Io` for writing issues
pub fn write_record<W: Write + ?Sized>(writer: &mut W, id: &str, bases: &[u8]) -> Result<()> {
    writeln!(writer, ">{}", id)?;
    writer.write_all(bases)?;
    writeln!(writer)?;
    Ok(())
}
