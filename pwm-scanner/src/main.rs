use clap::Parser;
use log::info;
use polars::prelude::*;
use pwm_search::fasta::FastaReader;
use pwm_search::matrix::{build, read_counts};
use pwm_search::output::{FrameSink, TsvSink};
use pwm_search::{Diagnostics, MotifError, ReportPolicy, RunConfig, RunSummary, Searcher};
use std::fs::{self, File};
use std::io::{self, BufRead, BufWriter, Write};
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum ScannerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error("{0}")]
    Motif(#[from] MotifError),
}

#[derive(Parser)]
#[command(
    name = "pwm-scanner",
    about = "Scans DNA sequences on both strands with a position weight matrix and reports windows scoring above a threshold",
    long_about = "Reads a flat table of matrix weights (all A values, then C, G and T, separated by commas \
                  or whitespace) and a FASTA file, scores every window of every sequence on both strands, \
                  and writes one tab-separated record per hit: sequence id, TFBS, motif name, motif class, \
                  strand, score, relative score (0-100), start, end and site.",
    version,
    after_help = "Example usage:\n    \
                  pwm-scanner sox9.pwm promoters.fa 8.5 -n SOX9 -c HMG\n    \
                  pwm-scanner sox9.pwm promoters.fa 8.5 --best-only -o hits.csv",
    color = clap::ColorChoice::Always
)]
#[derive(Debug)]
struct Args {
    /// Path to the matrix weights file
    #[arg(value_name = "MATRIX_FILE")]
    matrix_file: String,

    /// Path to the FASTA file with sequences to scan
    #[arg(value_name = "SEQ_FILE")]
    seq_file: String,

    /// Report windows whose score is strictly above this value
    #[arg(value_name = "THRESHOLD", allow_negative_numbers = true)]
    threshold: f64,

    /// Output file (tab-separated text, or .csv / .parquet for a table).
    /// Results go to stdout when omitted
    #[arg(short, long, value_name = "OUTPUT_FILE")]
    output: Option<String>,

    /// Buffer all hits of a sequence and report them when it is done
    #[arg(short = 'a', long = "all", conflicts_with = "best_only")]
    all: bool,

    /// Only report the best hit of each sequence
    #[arg(short = 'b', long)]
    best_only: bool,

    /// Motif name written in every record
    #[arg(short = 'n', long, default_value = "")]
    name: String,

    /// Motif structural class written in every record
    #[arg(short = 'c', long, default_value = "")]
    class: String,

    /// Write the scanned sequences to this FASTA file with hits replaced by 'n'
    #[arg(short = 'm', long, value_name = "MASK_FILE")]
    mask: Option<String>,
}

impl Args {
    fn policy(&self) -> ReportPolicy {
        if self.all {
            ReportPolicy::CollectAll
        } else if self.best_only {
            ReportPolicy::BestOnly
        } else {
            ReportPolicy::EmitEachHit
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Csv,
    Parquet,
}

impl OutputFormat {
    fn from_path(path: &str) -> Self {
        match Path::new(path).extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => OutputFormat::Csv,
            Some(ext) if ext.eq_ignore_ascii_case("parquet") => OutputFormat::Parquet,
            _ => OutputFormat::Text,
        }
    }
}

fn write_frame(sink: FrameSink, path: &str, format: OutputFormat) -> Result<(), ScannerError> {
    let mut df = sink.into_frame()?;
    let mut file = File::create(path)?;
    match format {
        OutputFormat::Csv => CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df)?,
        OutputFormat::Parquet => {
            ParquetWriter::new(&mut file).finish(&mut df)?;
        }
        OutputFormat::Text => {}
    }
    Ok(())
}

fn run_search<R: BufRead>(
    args: &Args,
    searcher: &Searcher<'_>,
    sequences: FastaReader<R>,
    mask: Option<&mut dyn Write>,
    diagnostics: &mut Diagnostics,
) -> Result<RunSummary, ScannerError> {
    let Some(path) = args.output.as_deref() else {
        let mut sink = TsvSink::new(BufWriter::new(io::stdout().lock()));
        return Ok(searcher.run(sequences, &mut sink, mask, diagnostics)?);
    };

    // Create output directory if it doesn't exist
    if let Some(parent) = Path::new(path).parent() {
        fs::create_dir_all(parent)?;
    }

    match OutputFormat::from_path(path) {
        OutputFormat::Text => {
            let mut sink = TsvSink::new(BufWriter::new(File::create(path)?));
            Ok(searcher.run(sequences, &mut sink, mask, diagnostics)?)
        }
        format => {
            let mut sink = FrameSink::new();
            let summary = searcher.run(sequences, &mut sink, mask, diagnostics)?;
            write_frame(sink, path, format)?;
            Ok(summary)
        }
    }
}

fn main() -> Result<(), ScannerError> {
    env_logger::init();
    let start_time = std::time::Instant::now();

    let args = Args::parse();

    let counts = read_counts(&args.matrix_file)?;
    let (matrix, _) = build(&counts)?;

    let config = RunConfig::new(args.threshold)
        .with_policy(args.policy())
        .with_motif_name(args.name.clone())
        .with_motif_class(args.class.clone());
    let searcher = Searcher::new(&matrix, &config);

    let sequences = FastaReader::from_path(&args.seq_file)?;
    let mut mask_writer = match &args.mask {
        Some(path) => Some(BufWriter::new(File::create(path)?)),
        None => None,
    };
    let mut diagnostics = Diagnostics::new();

    let result = run_search(
        &args,
        &searcher,
        sequences,
        mask_writer.as_mut().map(|w| w as &mut dyn Write),
        &mut diagnostics,
    );

    // diagnostics go out once, after the results
    diagnostics.flush(&mut io::stderr())?;
    let summary = result?;

    if let Some(writer) = mask_writer.as_mut() {
        writer.flush()?;
    }

    info!(
        "{} sequences scanned, {} skipped, {} hits reported in {:.3} s",
        summary.sequences_scanned,
        summary.sequences_skipped,
        summary.hits_reported,
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_flags() {
        let args = Args::try_parse_from(["pwm-scanner", "m.pwm", "s.fa", "-2.5"]).unwrap();
        assert_eq!(args.threshold, -2.5);
        assert_eq!(args.policy(), ReportPolicy::EmitEachHit);

        let args = Args::try_parse_from(["pwm-scanner", "m.pwm", "s.fa", "3", "-a"]).unwrap();
        assert_eq!(args.policy(), ReportPolicy::CollectAll);

        let args =
            Args::try_parse_from(["pwm-scanner", "m.pwm", "s.fa", "3", "-b", "-n", "SOX9"]).unwrap();
        assert_eq!(args.policy(), ReportPolicy::BestOnly);
        assert_eq!(args.name, "SOX9");

        assert!(Args::try_parse_from(["pwm-scanner", "m.pwm", "s.fa", "3", "-a", "-b"]).is_err());
        assert!(Args::try_parse_from(["pwm-scanner", "m.pwm", "s.fa"]).is_err());
    }

    #[test]
    fn test_output_format() {
        assert_eq!(OutputFormat::from_path("out/hits.csv"), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_path("hits.PARQUET"), OutputFormat::Parquet);
        assert_eq!(OutputFormat::from_path("hits.tsv"), OutputFormat::Text);
        assert_eq!(OutputFormat::from_path("hits"), OutputFormat::Text);
    }
}
