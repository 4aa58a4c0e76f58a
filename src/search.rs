use crate::collect::HitCollector;
use crate::error::{MotifError, Result};
use crate::fasta::{write_record, SiteMask};
use crate::matrix::{ScoreBounds, ScoringMatrix};
use crate::output::{HitRecord, HitSink};
use crate::scan::scan;
use crate::types::{Hit, RunConfig, SequenceRecord};
use log::{debug, info};
use std::fmt::Display;
use std::io::Write;

/// Messages about recoverable failures, kept until the end of a run so they
/// do not interleave with the result stream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    messages: Vec<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, message: impl Display) {
        let message = message.to_string();
        debug!("recorded diagnostic: {}", message);
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    /// Writes every message, one per line, in the order recorded
    pub fn flush<W: Write + ?Sized>(&self, writer: &mut W) -> std::io::Result<()> {
        for message in &self.messages {
            writeln!(writer, "{}", message)?;
        }
        writer.flush()
    }
}

/// Counters for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub sequences_scanned: usize,
    pub sequences_skipped: usize,
    pub hits_reported: usize,
}

/// Scans sequences with one matrix and configuration
pub struct Searcher<'a> {
    matrix: &'a ScoringMatrix,
    bounds: ScoreBounds,
    config: &'a RunConfig,
}

impl<'a> Searcher<'a> {
    pub fn new(matrix: &'a ScoringMatrix, config: &'a RunConfig) -> Self {
        Searcher {
            matrix,
            bounds: matrix.bounds(),
            config,
        }
    }

    pub fn bounds(&self) -> ScoreBounds {
        self.bounds
    }

    /// Scans one sequence, returning the hits its reporting policy keeps, in
    /// report order. Hits past the collect-all capacity are dropped and
    /// counted in `dropped`.
    pub fn scan_sequence(&self, record: &SequenceRecord) -> (Vec<Hit>, usize) {
        let mut collector = HitCollector::new(self.config.policy);
        let mut reported: Vec<Hit> = scan(self.matrix, self.config.threshold, &record.bases)
            .filter_map(|hit| collector.offer(hit))
            .collect();
        let collected = collector.finish();
        reported.extend(collected.hits);
        (reported, collected.dropped)
    }

    /// Runs the search over every record of `sequences`.
    ///
    /// Recoverable failures (an over-long sequence, a full hit buffer, a
    /// matrix whose bounds cannot normalize scores) go to `diagnostics` and
    /// the run goes on. Read failures and sink failures end the run.
    ///
    /// When `mask` is given, each scanned sequence is written to it as FASTA
    /// with the bases of every qualifying window replaced by `n`.
    pub fn run<I, S>(
        &self,
        sequences: I,
        sink: &mut S,
        mut mask: Option<&mut dyn Write>,
        diagnostics: &mut Diagnostics,
    ) -> Result<RunSummary>
    where
        I: IntoIterator<Item = Result<SequenceRecord>>,
        S: HitSink + ?Sized,
    {
        let mut summary = RunSummary::default();

        if self.bounds.is_degenerate() {
            diagnostics.record(MotifError::DegenerateMatrix {
                max: self.bounds.max,
            });
            return Ok(summary);
        }

        let width = self.matrix.width();
        let mut collector = HitCollector::new(self.config.policy);

        for item in sequences {
            let record = match item {
                Ok(record) => record,
                Err(e) if e.is_recoverable() => {
                    diagnostics.record(&e);
                    summary.sequences_skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            let mut site_mask = mask.as_ref().map(|_| SiteMask::new(record.len()));
            let mut hit_count = 0usize;

            for hit in scan(self.matrix, self.config.threshold, &record.bases) {
                hit_count += 1;
                if let Some(site_mask) = site_mask.as_mut() {
                    site_mask.cover(hit.position, width);
                }
                if let Some(hit) = collector.offer(hit) {
                    self.report(&hit, &record, sink, &mut summary)?;
                }
            }

            let collected = collector.finish();
            for hit in &collected.hits {
                self.report(hit, &record, sink, &mut summary)?;
            }
            if collected.dropped > 0 {
                diagnostics.record(MotifError::HitCapacityExceeded {
                    id: record.id.clone(),
                    capacity: collected.hits.len(),
                    dropped: collected.dropped,
                });
            }

            if let (Some(writer), Some(site_mask)) = (mask.as_mut(), site_mask.as_ref()) {
                write_record(&mut **writer, &record.id, &site_mask.apply(&record.bases))?;
            }

            debug!(
                "{}: {} bases, {} qualifying windows",
                record.id,
                record.len(),
                hit_count
            );
            summary.sequences_scanned += 1;
        }

        sink.finish()?;
        info!(
            "Scanned {} sequences ({} skipped), reported {} hits",
            summary.sequences_scanned, summary.sequences_skipped, summary.hits_reported
        );

        Ok(summary)
    }

    fn report<S: HitSink + ?Sized>(
        &self,
        hit: &Hit,
        record: &SequenceRecord,
        sink: &mut S,
        summary: &mut RunSummary,
    ) -> Result<()> {
        let formatted = HitRecord::new(hit, record, self.config, self.matrix.width(), &self.bounds)?;
        sink.accept(&formatted)?;
        summary.hits_reported += 1;
        Ok(())
    }
}
