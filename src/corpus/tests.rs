use super::*;
use std::io::Write;
use tempfile::NamedTempFile;

const SAMPLE: &str = r#"{
    "questions": [
        {
            "qanta_id": 101,
            "text": "This man wrote a poem. Name him.",
            "page": "Walt_Whitman",
            "tokenizations": [[0, 22], [23, 32]],
            "difficulty": "College"
        },
        {
            "qanta_id": "q-2",
            "text": "Short one.",
            "page": "Answer",
            "tokenizations": [[0, 10]]
        }
    ]
}"#;

#[test]
fn test_parse_sample_corpus() {
    let corpus = Corpus::from_json_str(SAMPLE).expect("sample should parse");

    assert_eq!(corpus.len(), 2);
    let first = &corpus.questions[0];
    assert_eq!(first.id, QuestionId::Number(101));
    assert_eq!(first.page, "Walt_Whitman");
    assert_eq!(
        first.sentences,
        vec![SentenceSpan::new(0, 22), SentenceSpan::new(23, 32)]
    );
    assert_eq!(corpus.questions[1].id, QuestionId::Text("q-2".to_string()));
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();

    let corpus = Corpus::load(file.path()).expect("file should load");
    assert_eq!(corpus.len(), 2);
}

#[test]
fn test_load_missing_file() {
    let result = Corpus::load("/nonexistent/questions.json");
    assert!(matches!(result, Err(CorpusError::Io { .. })));
}

#[test]
fn test_malformed_document() {
    let result = Corpus::from_json_str(r#"{"questions": [{"text": "no id"}]}"#);
    assert!(matches!(result, Err(CorpusError::Parse(_))));

    let result = Corpus::from_json_str("not json");
    assert!(matches!(result, Err(CorpusError::Parse(_))));
}

#[test]
fn test_inverted_span_rejected() {
    let raw = r#"{"questions": [
        {"qanta_id": 7, "text": "abc", "page": "A", "tokenizations": [[2, 1]]}
    ]}"#;
    let err = Corpus::from_json_str(raw).unwrap_err();
    assert!(matches!(
        err,
        CorpusError::InvertedSpan {
            sentence_index: 0,
            start: 2,
            end: 1,
            ..
        }
    ));
    assert!(err.to_string().contains("question 7"));
}

#[test]
fn test_empty_corpus_parses() {
    let corpus = Corpus::from_json_str(r#"{"questions": []}"#).unwrap();
    assert!(corpus.is_empty());
}

#[test]
fn test_prefix_counts_characters() {
    let question = Question::new(1, "Éire is an island", "Ireland", vec![]);

    assert_eq!(question.char_len(), 17);
    assert_eq!(question.prefix(0), "");
    assert_eq!(question.prefix(4), "Éire");
    assert_eq!(question.prefix(17), "Éire is an island");
    assert_eq!(question.prefix(500), "Éire is an island");
}

#[test]
fn test_span_helpers() {
    let span = SentenceSpan::new(10, 20);
    assert_eq!(span.len(), 10);
    assert!(!span.is_empty());
    assert!(span.contains(10));
    assert!(span.contains(19));
    assert!(!span.contains(20));
    assert!(SentenceSpan::new(5, 5).is_empty());
}

#[test]
fn test_question_serializes_with_corpus_keys() {
    let question = Question::new(3, "abc", "A", vec![SentenceSpan::new(0, 3)]);
    let value = serde_json::to_value(&question).unwrap();

    assert_eq!(value["qanta_id"], 3);
    assert_eq!(value["tokenizations"], serde_json::json!([[0, 3]]));
}
