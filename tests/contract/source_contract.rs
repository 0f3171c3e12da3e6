use std::fs;
use std::sync::Arc;

use chrono::NaiveDate;
use powerpos_core::{
    JsonFileTradeSource, SimulatedTradeSource, SourceErrorKind, TradeSource, Validator,
};
use tempfile::TempDir;

struct SourceCase {
    name: &'static str,
    source: Arc<dyn TradeSource>,
    // Keeps fixture files alive for the duration of the case.
    _fixtures: Option<TempDir>,
}

fn trade_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 8, 1).expect("valid date")
}

fn source_cases() -> Vec<SourceCase> {
    let fixtures = tempfile::tempdir().expect("tempdir");
    let path = fixtures.path().join("trades.json");
    fs::write(
        &path,
        r#"[
            {"date": "01/08/2022", "time": ["00:00", "00:05", null], "volume": [1, "x", 3], "id": "a"},
            {"date": ["01/08/2022"], "time": ["23:55"], "volume": [7.5], "id": ["b"]}
        ]"#,
    )
    .expect("write fixture");

    vec![
        SourceCase {
            name: "simulated",
            source: Arc::new(SimulatedTradeSource::with_seed(5).with_max_positions(6)),
            _fixtures: None,
        },
        SourceCase {
            name: "json_file",
            source: Arc::new(JsonFileTradeSource::new(path)),
            _fixtures: Some(fixtures),
        },
    ]
}

#[tokio::test]
async fn every_source_reports_a_stable_name() {
    for case in source_cases() {
        assert_eq!(case.source.name(), case.name);
    }
}

#[tokio::test]
async fn every_source_yields_non_empty_structurally_valid_batches() {
    for case in source_cases() {
        let batches = case
            .source
            .fetch_trades(trade_date())
            .await
            .unwrap_or_else(|error| panic!("source '{}' fetch failed: {error}", case.name));
        assert!(!batches.is_empty(), "source '{}': batch count", case.name);

        for batch in batches {
            let records = batch
                .into_records()
                .unwrap_or_else(|error| panic!("source '{}' batch invalid: {error}", case.name));
            assert!(!records.is_empty(), "source '{}': empty batch", case.name);
            assert!(
                records.iter().all(|record| record.date == "01/08/2022"),
                "source '{}': trade date",
                case.name
            );

            let first_id = records[0].id.clone();
            assert!(
                records.iter().all(|record| record.id == first_id),
                "source '{}': one identifier per batch",
                case.name
            );

            if let Err(error) = Validator::new().validate(&records) {
                panic!("source '{}' validation failed: {error}", case.name);
            }
        }
    }
}

#[tokio::test]
async fn every_source_can_be_shared_across_tasks() {
    for case in source_cases() {
        let source = Arc::clone(&case.source);
        let handle = tokio::spawn(async move { source.fetch_trades(trade_date()).await });
        let batches = handle
            .await
            .expect("task joined")
            .unwrap_or_else(|error| panic!("source '{}' fetch failed: {error}", case.name));
        assert!(!batches.is_empty(), "source '{}'", case.name);
    }
}

#[tokio::test]
async fn file_source_classifies_decode_failures_as_malformed() {
    let fixtures = tempfile::tempdir().expect("tempdir");
    let path = fixtures.path().join("broken.json");
    fs::write(&path, "not json").expect("write fixture");

    let error = JsonFileTradeSource::new(path)
        .fetch_trades(trade_date())
        .await
        .expect_err("must fail");

    assert_eq!(error.kind(), SourceErrorKind::Malformed);
    assert_eq!(error.code(), "source.malformed");
}
