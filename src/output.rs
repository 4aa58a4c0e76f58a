use crate::error::{MotifError, Result};
use crate::matrix::ScoreBounds;
use crate::types::{Hit, RunConfig, SequenceRecord, Strand};
use polars::prelude::*;
use std::fmt;
use std::io::Write;

/// Feature tag written in the second column of every record
pub const FEATURE_TAG: &str = "TFBS";

/// A hit ready to be written, borrowing its text from the sequence record
/// and run configuration
#[derive(Debug, Clone, PartialEq)]
pub struct HitRecord<'a> {
    pub sequence_id: &'a str,
    pub motif_name: &'a str,
    pub motif_class: &'a str,
    pub strand: Strand,
    pub score: f64,
    /// Score rescaled to 0-100 between the matrix score bounds
    pub relative_score: f64,
    /// 1-based inclusive start
    pub start: usize,
    /// 1-based inclusive end
    pub end: usize,
    /// Top-strand bases of the window, whatever the strand of the hit
    pub site: &'a [u8],
}

impl<'a> HitRecord<'a> {
    /// # Errors
    /// * `MotifError::DegenerateMatrix` if the bounds cannot normalize the score
    /// * `MotifError::InvalidParameter` if the window runs past the sequence end
    pub fn new(
        hit: &Hit,
        record: &'a SequenceRecord,
        config: &'a RunConfig,
        width: usize,
        bounds: &ScoreBounds,
    ) -> Result<Self> {
        let relative_score = bounds.relative(hit.score)?;
        let site = record
            .bases
            .get(hit.position..hit.position + width)
            .ok_or_else(|| {
                MotifError::invalid_parameter(
                    "position",
                    hit.position,
                    format!("window of {} runs past the end of {}", width, record.id),
                )
            })?;

        Ok(HitRecord {
            sequence_id: &record.id,
            motif_name: &config.motif_name,
            motif_class: &config.motif_class,
            strand: hit.strand,
            score: hit.score,
            relative_score,
            start: hit.position + 1,
            end: hit.position + width,
            site,
        })
    }

    pub fn site_text(&self) -> String {
        String::from_utf8_lossy(self.site).into_owned()
    }
}

impl fmt::Display for HitRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{:6.3}\t{:6.1}\t{}\t{}\t{}",
            self.sequence_id,
            FEATURE_TAG,
            self.motif_name,
            self.motif_class,
            self.strand,
            self.score,
            self.relative_score,
            self.start,
            self.end,
            String::from_utf8_lossy(self.site),
        )
    }
}

/// Destination for reported hits
pub trait HitSink {
    fn accept(&mut self, record: &HitRecord<'_>) -> Result<()>;

    /// Called once after the last sequence
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Writes one tab-separated line per hit, no header
pub struct TsvSink<W: Write> {
    writer: W,
}

impl<W: Write> TsvSink<W> {
    pub fn new(writer: W) -> Self {
        TsvSink { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> HitSink for TsvSink<W> {
    fn accept(&mut self, record: &HitRecord<'_>) -> Result<()> {
        writeln!(self.writer, "{}", record)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Accumulates hits column by column for a polars DataFrame
#[derive(Debug, Default)]
pub struct FrameSink {
    sequence_ids: Vec<String>,
    motifs: Vec<String>,
    classes: Vec<String>,
    strands: Vec<String>,
    scores: Vec<f64>,
    relative_scores: Vec<f64>,
    starts: Vec<i64>,
    ends: Vec<i64>,
    sites: Vec<String>,
}

impl FrameSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Builds a DataFrame with columns `sequence_id`, `motif`, `class`,
    /// `strand`, `score`, `relative_score`, `start`, `end` and `site`
    ///
    /// # Errors
    /// * Returns `MotifError::DataError` if DataFrame creation fails
    pub fn into_frame(self) -> Result<DataFrame> {
        DataFrame::new(vec![
            Column::new("sequence_id".into(), self.sequence_ids),
            Column::new("motif".into(), self.motifs),
            Column::new("class".into(), self.classes),
            Column::new("strand".into(), self.strands),
            Column::new("score".into(), self.scores),
            Column::new("relative_score".into(), self.relative_scores),
            Column::new("start".into(), self.starts),
            Column::new("end".into(), self.ends),
            Column::new("site".into(), self.sites),
        ])
        .map_err(|e| MotifError::DataError(e.to_string()))
    }
}

impl HitSink for FrameSink {
    fn accept(&mut self, record: &HitRecord<'_>) -> Result<()> {
        self.sequence_ids.push(record.sequence_id.to_string());
        self.motifs.push(record.motif_name.to_string());
        self.classes.push(record.motif_class.to_string());
        self.strands.push(record.strand.to_string());
        self.scores.push(record.score);
        self.relative_scores.push(record.relative_score);
        self.starts.push(record.start as i64);
        self.ends.push(record.end as i64);
        self.sites.push(record.site_text());
        Ok(())
    }
}
