use serde_json::json;
use tempfile::TempDir;

use super::*;
use crate::agent::{AgentQuery, AgentResponse, GuessRecord, QuestionResult};
use crate::scoring::{ScoreSet, ScoreSummary};

fn trace(question_index: usize, guesses: &[(&str, bool)]) -> QuestionResult {
    guesses
        .iter()
        .enumerate()
        .map(|(i, &(guess, buzz))| {
            GuessRecord::merge(
                AgentQuery {
                    question_index,
                    sentence_index: 0,
                    char_index: i * 25,
                    text: "t".repeat(i * 25),
                },
                AgentResponse::new(guess, buzz).with_field("confidence", i as f64 / 10.0),
            )
        })
        .collect()
}

#[test]
fn test_predictions_preserve_fields_and_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("predictions.json");
    let results = vec![
        trace(0, &[("A", false), ("B", false), ("C", true)]),
        trace(1, &[("D", true)]),
    ];

    write_predictions(&path, &results).unwrap();
    let loaded = read_predictions(&path).unwrap();

    assert_eq!(loaded, results);
    assert_eq!(loaded[0][2].extra.get("confidence"), Some(&json!(0.2)));
    assert!(!dir.path().join("predictions.json.tmp").exists());
}

#[test]
fn test_predictions_layout_is_nested_arrays() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("p.json");
    write_predictions(&path, &[trace(0, &[("A", true)])]).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw[0][0]["guess"], json!("A"));
    assert_eq!(raw[0][0]["buzz"], json!(true));
    assert_eq!(raw[0][0]["char_index"], json!(0));
}

#[test]
fn test_read_legacy_predictions() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("legacy.json");
    std::fs::write(
        &path,
        r#"[[{"question_idx": 0, "sent_index": 0, "char_index": 0, "text": "",
              "guess": "Paris", "buzz": false, "score": 0.4}]]"#,
    )
    .unwrap();

    let loaded = read_predictions(&path).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0][0].guess, "Paris");
    assert_eq!(loaded[0][0].extra.get("score"), Some(&json!(0.4)));
}

#[test]
fn test_scores_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scores.json");
    let scores = ScoreSet {
        eoq_acc: vec![true, false, true],
        curve: vec![0.75, 0.0, 0.5],
    };

    write_scores(&path, &scores).unwrap();
    assert_eq!(read_scores(&path).unwrap(), scores);
}

#[test]
fn test_write_overwrites_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scores.json");
    std::fs::write(&path, "stale").unwrap();

    let scores = ScoreSet {
        eoq_acc: vec![false],
        curve: vec![0.0],
    };
    write_scores(&path, &scores).unwrap();
    assert_eq!(read_scores(&path).unwrap(), scores);
}

#[test]
fn test_missing_directory_is_io_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing").join("p.json");
    let result = write_predictions(&path, &[]);
    match result {
        Err(OutputError::Io { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected Io error, got {:?}", other),
    }
}

#[test]
fn test_read_garbage_is_decode_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("p.json");
    std::fs::write(&path, "{not json").unwrap();
    assert!(matches!(
        read_predictions(&path),
        Err(OutputError::Decode { .. })
    ));
}

#[test]
fn test_summary_json() {
    let summary = ScoreSummary {
        eoq_acc: 0.5,
        curve: 0.25,
    };
    let line = summary_json(&summary).unwrap();
    let value: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_eq!(value, json!({"eoq_acc": 0.5, "curve": 0.25}));
}
