//! Integration tests for the dataset summary report.
//!
//! These tests verify end-to-end behavior of a run against fixture CSVs
//! written to temporary directories.

use dataset_summary::{
    DatasetDescriptor, InMemoryDocument, PageOutcome, ReportConfig, ReportRunner, RunSummary,
    SummaryError,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

/// Write a CSV with a header and `rows` data rows.
fn write_dataset(dir: &Path, name: &str, rows: usize) -> PathBuf {
    let mut content = String::from("Site Num,State,NO2 Mean,Date Local\n");
    for i in 0..rows {
        content.push_str(&format!(
            "{},Arizona,{}.5,2016-01-{:02}\n",
            3000 + i,
            i % 40,
            i % 28 + 1
        ));
    }
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write fixture");
    path
}

/// Four datasets: two well-formed (10 and 1000 rows), two missing.
fn scenario(dir: &TempDir) -> Vec<DatasetDescriptor> {
    vec![
        DatasetDescriptor::new("small", write_dataset(dir.path(), "small.csv", 10)),
        DatasetDescriptor::new("absent_a", dir.path().join("absent_a.csv")),
        DatasetDescriptor::new("large", write_dataset(dir.path(), "large.csv", 1000)),
        DatasetDescriptor::new("absent_b", dir.path().join("absent_b.csv")),
    ]
}

fn runner(output_dir: &Path, datasets: Vec<DatasetDescriptor>) -> ReportRunner {
    ReportRunner::builder()
        .config(
            ReportConfig::builder()
                .output_dir(output_dir)
                .datasets(datasets)
                .build()
                .expect("valid config"),
        )
        .build()
        .expect("valid runner")
}

// ============================================================================
// End-to-End Scenario
// ============================================================================

#[test]
fn test_scenario_pages() {
    let dir = tempfile::tempdir().unwrap();
    let runner = runner(&dir.path().join("out"), scenario(&dir));

    let (pages, summary) = runner.dry_run().unwrap();

    let titles: Vec<&str> = pages.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Dataset: small",
            "Dataset: absent_a",
            "Dataset: large",
            "Dataset: absent_b"
        ]
    );

    // Missing files: title and notice only
    for page in [&pages[1], &pages[3]] {
        assert_eq!(page.outcome, PageOutcome::Missing);
        assert_eq!(page.text_lines().len(), 1);
        assert!(page.text_lines()[0].starts_with("File not found: "));
        assert!(page.table().is_none());
    }

    // 10-row dataset
    assert!(pages[0].text_lines().contains(&"Estimated total rows: 10"));
    assert_eq!(pages[0].table().unwrap().rows.len(), 10);
    assert_eq!(
        pages[0].text_lines()[2],
        "Columns (first 20 shown): Site Num, State, NO2 Mean, Date Local"
    );

    // 1000-row dataset
    assert!(pages[2].text_lines().contains(&"Estimated total rows: 1000"));
    assert_eq!(pages[2].table().unwrap().rows.len(), 12);

    assert_eq!(summary.pages[0].row_estimate, Some(10));
    assert_eq!(summary.pages[2].row_estimate, Some(1000));
    assert_eq!(summary.pages[2].sampled_rows, Some(50));
    assert_eq!(summary.count(PageOutcome::Missing), 2);
}

#[test]
fn test_scenario_writes_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested").join("out");
    let runner = runner(&out, scenario(&dir));

    let summary = runner.run().unwrap();

    let pdf = out.join("cleaned_datasets_summary.pdf");
    assert_eq!(summary.output_file, Some(pdf.display().to_string()));
    assert_eq!(summary.pages.len(), 4);
    assert_eq!(summary.page_count, 4);
    let bytes = fs::read(&pdf).expect("PDF should exist");
    assert!(bytes.starts_with(b"%PDF-"));
    assert!(bytes.windows(b"/Count 4".len()).any(|w| w == b"/Count 4"));
    assert!(!out.join("cleaned_datasets_summary_summary.json").exists());
}

// ============================================================================
// Isolated Failures
// ============================================================================

#[test]
fn test_unreadable_dataset_does_not_stop_later_pages() {
    let dir = tempfile::tempdir().unwrap();
    let empty = dir.path().join("empty.csv");
    fs::write(&empty, "").unwrap();

    let runner = runner(
        &dir.path().join("out"),
        vec![
            DatasetDescriptor::new("empty", &empty),
            DatasetDescriptor::new("folder", dir.path()),
            DatasetDescriptor::new("good", write_dataset(dir.path(), "good.csv", 3)),
        ],
    );

    let (pages, summary) = runner.dry_run().unwrap();
    assert_eq!(pages.len(), 3);

    assert_eq!(pages[0].outcome, PageOutcome::SampleFailed);
    assert!(pages[0].text_lines().contains(&"Estimated total rows: 0"));
    assert!(
        pages[0]
            .text_lines()
            .iter()
            .any(|line| line.starts_with("Error reading sample: "))
    );
    assert!(pages[0].table().is_none());

    assert_eq!(pages[1].outcome, PageOutcome::SampleFailed);
    assert!(pages[1].text_lines().contains(&"Estimated total rows: unknown"));
    assert_eq!(summary.pages[1].row_estimate, None);

    assert_eq!(pages[2].outcome, PageOutcome::Sampled);
    assert_eq!(pages[2].table().unwrap().rows.len(), 3);
}

#[test]
fn test_ragged_row_past_sample_still_renders_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_dataset(dir.path(), "ragged.csv", 60);
    let mut content = fs::read_to_string(&path).unwrap();
    content.push_str("3999,Arizona,1.5,2016-02-01,extra\n");
    fs::write(&path, content).unwrap();

    let runner = runner(
        &dir.path().join("out"),
        vec![DatasetDescriptor::new("ragged", &path)],
    );

    let (pages, summary) = runner.dry_run().unwrap();
    assert_eq!(pages[0].outcome, PageOutcome::Sampled);
    assert!(pages[0].text_lines().contains(&"Estimated total rows: 61"));
    assert_eq!(pages[0].table().unwrap().rows.len(), 12);
    assert_eq!(summary.pages[0].sampled_rows, Some(50));
}

#[test]
fn test_header_only_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let runner = runner(
        &dir.path().join("out"),
        vec![DatasetDescriptor::new(
            "header",
            write_dataset(dir.path(), "header.csv", 0),
        )],
    );

    let (pages, _) = runner.dry_run().unwrap();
    assert_eq!(pages[0].outcome, PageOutcome::Sampled);
    assert!(pages[0].text_lines().contains(&"Estimated total rows: 0"));
    assert!(pages[0].table().unwrap().rows.is_empty());
}

// ============================================================================
// Run-Level Failures
// ============================================================================

#[test]
fn test_output_directory_failure_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();

    let runner = runner(&blocker.join("out"), scenario(&dir));

    match runner.run() {
        Err(error @ SummaryError::OutputDirectory { .. }) => assert!(error.is_fatal()),
        other => panic!("expected an output directory error, got {other:?}"),
    }
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_default_root_layout() {
    let root = tempfile::tempdir().unwrap();
    let outputs = root.path().join("outputs");
    fs::create_dir_all(&outputs).unwrap();
    write_dataset(&outputs, "pollution_us_2000_2016_clean.csv", 25);

    let summary = ReportRunner::builder()
        .config(ReportConfig::for_root(root.path()))
        .build()
        .unwrap()
        .run()
        .unwrap();

    assert!(outputs.join("cleaned_datasets_summary.pdf").exists());
    let outcomes: Vec<PageOutcome> = summary.pages.iter().map(|p| p.outcome).collect();
    assert_eq!(
        outcomes,
        vec![
            PageOutcome::Missing,
            PageOutcome::Sampled,
            PageOutcome::Missing,
            PageOutcome::Missing
        ]
    );
    assert_eq!(summary.pages[1].row_estimate, Some(25));
}

#[test]
fn test_emit_summary_json() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let config = ReportConfig::builder()
        .output_dir(&out)
        .output_name("report.pdf")
        .datasets(scenario(&dir))
        .emit_summary(true)
        .build()
        .unwrap();

    ReportRunner::builder()
        .config(config)
        .build()
        .unwrap()
        .run()
        .unwrap();

    let json = fs::read_to_string(out.join("report_summary.json")).unwrap();
    let summary: RunSummary = serde_json::from_str(&json).unwrap();
    let labels: Vec<&str> = summary.pages.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["small", "absent_a", "large", "absent_b"]);
}

// ============================================================================
// Idempotence
// ============================================================================

#[test]
fn test_repeated_runs_render_identical_text() {
    let dir = tempfile::tempdir().unwrap();
    let runner = runner(&dir.path().join("out"), scenario(&dir));

    let (first, _) = runner.render_into(InMemoryDocument::new()).unwrap();
    let (second, _) = runner.render_into(InMemoryDocument::new()).unwrap();

    let text = |doc: &InMemoryDocument| -> Vec<String> {
        doc.pages().iter().map(|p| p.plain_text()).collect()
    };
    assert_eq!(text(&first), text(&second));
    assert_eq!(first.pages(), second.pages());
}
