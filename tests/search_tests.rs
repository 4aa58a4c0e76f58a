use pwm_search::fasta::FastaReader;
use pwm_search::matrix::read_counts;
use pwm_search::output::{FrameSink, TsvSink};
use pwm_search::{
    build, Diagnostics, MotifError, ReportPolicy, RunConfig, RunSummary, ScoringMatrix, Searcher,
    SequenceRecord,
};
use std::io::{self, Write};

const SEQ1_FORWARD: &str = "seq1\tTFBS\tMYB\tTrp\t+\t 8.000\t 100.0\t3\t6\tACGG";
const SEQ1_REVERSE: &str = "seq1\tTFBS\tMYB\tTrp\t-\t 5.000\t  75.0\t4\t7\tCGGT";
const SEQ2_REVERSE: &str = "seq2\tTFBS\tMYB\tTrp\t-\t 8.000\t 100.0\t1\t4\tCCGT";

fn fixture_matrix() -> ScoringMatrix {
    let counts = read_counts("tests/data/acgg.pwm").unwrap();
    build(&counts).unwrap().0
}

fn fixture_config(policy: ReportPolicy) -> RunConfig {
    RunConfig::new(4.0)
        .with_policy(policy)
        .with_motif_name("MYB")
        .with_motif_class("Trp")
}

fn run_fixture(policy: ReportPolicy, mask: Option<&mut dyn Write>) -> (String, RunSummary, Diagnostics) {
    let matrix = fixture_matrix();
    let config = fixture_config(policy);
    let sequences = FastaReader::from_path("tests/data/promoters.fa").unwrap();

    let mut sink = TsvSink::new(Vec::new());
    let mut diagnostics = Diagnostics::new();
    let summary = Searcher::new(&matrix, &config)
        .run(sequences, &mut sink, mask, &mut diagnostics)
        .unwrap();

    (String::from_utf8(sink.into_inner()).unwrap(), summary, diagnostics)
}

fn lines(text: &str) -> Vec<&str> {
    text.lines().collect()
}

#[test]
fn test_emit_each_hit() {
    let (text, summary, diagnostics) = run_fixture(ReportPolicy::EmitEachHit, None);

    assert_eq!(lines(&text), vec![SEQ1_FORWARD, SEQ1_REVERSE, SEQ2_REVERSE]);
    assert_eq!(
        summary,
        RunSummary {
            sequences_scanned: 3,
            sequences_skipped: 0,
            hits_reported: 3,
        }
    );
    assert!(diagnostics.is_empty());
}

#[test]
fn test_collect_all() {
    let (text, summary, _) = run_fixture(ReportPolicy::CollectAll, None);
    assert_eq!(lines(&text), vec![SEQ1_FORWARD, SEQ1_REVERSE, SEQ2_REVERSE]);
    assert_eq!(summary.hits_reported, 3);
}

#[test]
fn test_best_only() {
    let (text, summary, _) = run_fixture(ReportPolicy::BestOnly, None);

    // seq3 has no qualifying window and gets no line
    assert_eq!(lines(&text), vec![SEQ1_FORWARD, SEQ2_REVERSE]);
    assert_eq!(summary.sequences_scanned, 3);
    assert_eq!(summary.hits_reported, 2);
}

#[test]
fn test_output_is_repeatable() {
    let (first, _, _) = run_fixture(ReportPolicy::EmitEachHit, None);
    let (second, _, _) = run_fixture(ReportPolicy::EmitEachHit, None);
    assert_eq!(first, second);
}

#[test]
fn test_mask_output() {
    let mut masked = Vec::new();
    run_fixture(ReportPolicy::BestOnly, Some(&mut masked));

    // every qualifying window is masked, not only the reported one
    assert_eq!(
        String::from_utf8(masked).unwrap(),
        ">seq1\nTTnnnnnT\n>seq2\nnnnnAA\n>seq3\nTTTTTTTT\n"
    );
}

#[test]
fn test_hit_capacity_exceeded() {
    let (matrix, _) = build(&[2.0, 0.0, 0.0, 0.0]).unwrap();
    let config = RunConfig::new(1.0).with_policy(ReportPolicy::CollectAll);
    let sequences: Vec<pwm_search::Result<SequenceRecord>> = vec![
        Ok(SequenceRecord::new("repeat", vec![b'A'; 1200])),
        Ok(SequenceRecord::new("plain", "CAT".as_bytes())),
    ];

    let mut sink = TsvSink::new(Vec::new());
    let mut diagnostics = Diagnostics::new();
    let summary = Searcher::new(&matrix, &config)
        .run(sequences, &mut sink, None, &mut diagnostics)
        .unwrap();

    // 1000 kept for the repeat, then one forward and one reverse hit for CAT
    assert_eq!(summary.hits_reported, 1002);
    assert_eq!(summary.sequences_scanned, 2);
    assert_eq!(diagnostics.len(), 1);
    let message = diagnostics.iter().next().unwrap();
    assert!(message.contains("repeat"));
    assert!(message.contains("200 dropped"));

    let text = String::from_utf8(sink.into_inner()).unwrap();
    let last: Vec<&str> = text.lines().rev().take(2).collect();
    assert!(last[0].starts_with("plain\tTFBS\t\t\t-"));
    assert!(last[1].starts_with("plain\tTFBS\t\t\t+"));
}

#[test]
fn test_too_long_sequence_is_recorded() {
    let (matrix, _) = build(&[2.0, 0.0, 0.0, 0.0]).unwrap();
    let config = RunConfig::new(1.0);
    let sequences = vec![
        Err(MotifError::SequenceTooLong {
            id: "huge".into(),
            limit: 10,
        }),
        Ok(SequenceRecord::new("small", "GAG".as_bytes())),
    ];

    let mut sink = TsvSink::new(Vec::new());
    let mut diagnostics = Diagnostics::new();
    let summary = Searcher::new(&matrix, &config)
        .run(sequences, &mut sink, None, &mut diagnostics)
        .unwrap();

    assert_eq!(summary.sequences_skipped, 1);
    assert_eq!(summary.sequences_scanned, 1);
    assert_eq!(summary.hits_reported, 1);
    assert_eq!(
        diagnostics.iter().collect::<Vec<_>>(),
        vec!["Sequence huge is longer than 10 bases"]
    );
}

#[test]
fn test_read_failure_ends_run() {
    let (matrix, _) = build(&[2.0, 0.0, 0.0, 0.0]).unwrap();
    let config = RunConfig::new(1.0);
    let sequences = vec![
        Ok(SequenceRecord::new("first", "A".as_bytes())),
        Err(MotifError::Io(io::Error::new(io::ErrorKind::Other, "truncated"))),
        Ok(SequenceRecord::new("never", "A".as_bytes())),
    ];

    let mut sink = TsvSink::new(Vec::new());
    let mut diagnostics = Diagnostics::new();
    let result = Searcher::new(&matrix, &config).run(sequences, &mut sink, None, &mut diagnostics);

    assert!(matches!(result, Err(MotifError::Io(_))));
    let text = String::from_utf8(sink.into_inner()).unwrap();
    assert_eq!(text.lines().count(), 1);
}

#[test]
fn test_degenerate_matrix_reports_nothing() {
    let (matrix, _) = build(&[1.0, 1.0, 1.0, 1.0]).unwrap();
    let config = RunConfig::new(0.0);
    let sequences: Vec<pwm_search::Result<SequenceRecord>> =
        vec![Ok(SequenceRecord::new("s", "ACGT".as_bytes()))];

    let mut sink = TsvSink::new(Vec::new());
    let mut diagnostics = Diagnostics::new();
    let summary = Searcher::new(&matrix, &config)
        .run(sequences, &mut sink, None, &mut diagnostics)
        .unwrap();

    assert_eq!(summary, RunSummary::default());
    assert!(sink.into_inner().is_empty());
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.iter().next().unwrap().starts_with("Degenerate matrix"));
}

#[test]
fn test_diagnostics_flush() {
    let mut diagnostics = Diagnostics::new();
    diagnostics.record("first problem");
    diagnostics.record(MotifError::RaggedCounts { count: 7 });

    let mut out = Vec::new();
    diagnostics.flush(&mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "first problem\nCount table has 7 values, which is not a multiple of 4\n"
    );
}

#[test]
fn test_frame_output() {
    let matrix = fixture_matrix();
    let config = fixture_config(ReportPolicy::EmitEachHit);
    let sequences = FastaReader::from_path("tests/data/promoters.fa").unwrap();

    let mut sink = FrameSink::new();
    let mut diagnostics = Diagnostics::new();
    Searcher::new(&matrix, &config)
        .run(sequences, &mut sink, None, &mut diagnostics)
        .unwrap();

    let df = sink.into_frame().unwrap();
    assert_eq!(df.height(), 3);
    let sites: Vec<Option<&str>> = df.column("site").unwrap().str().unwrap().into_iter().collect();
    assert_eq!(sites, vec![Some("ACGG"), Some("CGGT"), Some("CCGT")]);
}

#[test]
fn test_written_to_file() {
    let matrix = fixture_matrix();
    let config = fixture_config(ReportPolicy::BestOnly);
    let sequences = FastaReader::from_path("tests/data/promoters.fa").unwrap();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    {
        let mut sink = TsvSink::new(file.as_file_mut());
        let mut diagnostics = Diagnostics::new();
        Searcher::new(&matrix, &config)
            .run(sequences, &mut sink, None, &mut diagnostics)
            .unwrap();
    }

    let text = std::fs::read_to_string(file.path()).unwrap();
    assert_eq!(lines(&text), vec![SEQ1_FORWARD, SEQ2_REVERSE]);
}
