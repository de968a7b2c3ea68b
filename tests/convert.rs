//! End-to-end corpus build tests
//!
//! Drive the converter over on-disk fixture documents with a stub
//! annotator standing in for the CoreNLP server.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use wlp_corpus::{Config, Converter, SentenceAnnotator, TrainingRecord};

struct StubAnnotator;

#[async_trait]
impl SentenceAnnotator for StubAnnotator {
    fn name(&self) -> &str {
        "stub"
    }

    async fn annotate(&self, text: &str) -> Result<Value> {
        Ok(serde_json::json!({
            "sentences": [{"index": 0, "text": text, "openie": []}]
        }))
    }
}

/// Annotator that always fails, for the fatal-error path
struct FailingAnnotator;

#[async_trait]
impl SentenceAnnotator for FailingAnnotator {
    fn name(&self) -> &str {
        "failing"
    }

    async fn annotate(&self, _text: &str) -> Result<Value> {
        anyhow::bail!("annotation service unreachable")
    }
}

fn write_protocol(dir: &Path, num: &str, text: &str, ann: &str) {
    fs::write(dir.join(format!("protocol_{num}.txt")), text).unwrap();
    fs::write(dir.join(format!("protocol_{num}.ann")), ann).unwrap();
}

/// Split the concatenated training file back into individual records
fn read_training(path: &Path) -> Vec<TrainingRecord> {
    let raw = fs::read_to_string(path).unwrap();
    let mut records = Vec::new();
    let mut stream = serde_json::Deserializer::from_str(&raw).into_iter::<TrainingRecord>();
    while let Some(record) = stream.next() {
        records.push(record.unwrap());
    }
    records
}

#[tokio::test]
async fn test_full_corpus_build() {
    let input = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    write_protocol(
        input.path(),
        "0001",
        "Add 5 mL water to tube.\nMix well.\n",
        "T1\tReagent 9 14\twater\n\
         T2\tContainer 18 22\ttube\n\
         R1\tUses Arg1:T1 Arg2:T2\n",
    );
    write_protocol(
        input.path(),
        "0002",
        "Heat the sample briefly.\n",
        "T1\tAction 0 4\tHeat\n\
         T2\tReagent 9 15\tsample\n\
         E1\tAction:T1 Acts-on:T2\n",
    );

    let converter = Converter::new(Config::default(), StubAnnotator);
    let corpus = converter
        .run(input.path(), out.path(), None)
        .await
        .unwrap();

    assert_eq!(corpus.records.len(), 2);

    let records = read_training(&out.path().join("wlp_train.json"));
    assert_eq!(records.len(), 2);

    // Document 0001 first (sorted file order)
    assert_eq!(records[0].rel, "/reagent/container/uses");
    assert_eq!(records[0].sub, "water");
    assert_eq!(records[0].obj, "tube");
    assert_eq!(records[0].sub_id, "m.0001_t1");
    assert_eq!(records[0].sent, "Add 5 mL water to tube.");
    assert_eq!(records[0].rsent, "add 5 ml water to tube.");
    assert_eq!(records[0].openie, records[0].corenlp);

    assert_eq!(records[1].rel, "/action/reagent/acts-on");
    assert_eq!(records[1].sub_id, "m.0002_t1");

    let counts: BTreeMap<String, u64> =
        serde_json::from_str(&fs::read_to_string(out.path().join("wlp_relation2id.json")).unwrap())
            .unwrap();
    assert_eq!(counts["/reagent/container/uses"], 1);
    assert_eq!(counts["/action/reagent/acts-on"], 1);
    assert_eq!(counts.values().sum::<u64>(), records.len() as u64);

    // Entity-type index reflects only the last processed document
    let types: BTreeMap<String, Vec<String>> =
        serde_json::from_str(&fs::read_to_string(out.path().join("type_info.json")).unwrap())
            .unwrap();
    assert_eq!(types.len(), 2);
    assert_eq!(types["m.0002_t1"], vec!["/action".to_string()]);
    assert_eq!(types["m.0002_t2"], vec!["/reagent".to_string()]);
    assert!(!types.contains_key("m.0001_t1"));
}

#[tokio::test]
async fn test_cross_sentence_relation_absent_from_all_outputs() {
    let input = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    // T2 sits in sentence 2; the relation spans sentences and is dropped
    write_protocol(
        input.path(),
        "1",
        "Add 5 mL water to tube.\nMix well.\n",
        "T1\tReagent 9 14\twater\n\
         T2\tAction 24 27\tMix\n\
         R1\tUses Arg1:T1 Arg2:T2\n",
    );

    let converter = Converter::new(Config::default(), StubAnnotator);
    let corpus = converter
        .run(input.path(), out.path(), None)
        .await
        .unwrap();

    assert!(corpus.records.is_empty());
    assert_eq!(fs::read_to_string(out.path().join("wlp_train.json")).unwrap(), "");
    assert_eq!(
        fs::read_to_string(out.path().join("wlp_relation2id.json")).unwrap(),
        "{}"
    );
}

#[tokio::test]
async fn test_grouped_themes_share_predicate_after_digit_stripping() {
    let input = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    write_protocol(
        input.path(),
        "3",
        "Combine water and buffer now.\n",
        "T3\tAction 0 7\tCombine\n\
         T4\tReagent 8 13\twater\n\
         T5\tReagent 18 24\tbuffer\n\
         E1\tAction:T3 Theme1:T4 Theme2:T5\n",
    );

    let converter = Converter::new(Config::default(), StubAnnotator);
    let corpus = converter
        .run(input.path(), out.path(), None)
        .await
        .unwrap();

    assert_eq!(corpus.records.len(), 2);
    assert!(corpus
        .records
        .iter()
        .all(|r| r.rel == "/action/reagent/theme"));
    assert_eq!(corpus.relation_counts["/action/reagent/theme"], 2);
    // arg1 is the shared anchor entity
    assert!(corpus.records.iter().all(|r| r.sub_id == "m.3_t3"));
}

#[tokio::test]
async fn test_document_limit_caps_processing() {
    let input = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    write_protocol(
        input.path(),
        "1",
        "Add water.\n",
        "T1\tAction 0 3\tAdd\nT2\tReagent 4 9\twater\nR1\tUses Arg1:T1 Arg2:T2\n",
    );
    write_protocol(
        input.path(),
        "2",
        "Mix buffer.\n",
        "T1\tAction 0 3\tMix\nT2\tReagent 4 10\tbuffer\nR1\tUses Arg1:T1 Arg2:T2\n",
    );

    let converter = Converter::new(Config::default(), StubAnnotator);
    let corpus = converter
        .run(input.path(), out.path(), Some(1))
        .await
        .unwrap();

    assert_eq!(corpus.records.len(), 1);
    assert_eq!(corpus.records[0].sub_id, "m.1_t1");
}

#[tokio::test]
async fn test_annotator_failure_aborts_the_run() {
    let input = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    write_protocol(
        input.path(),
        "1",
        "Add water.\n",
        "T1\tAction 0 3\tAdd\nT2\tReagent 4 9\twater\nR1\tUses Arg1:T1 Arg2:T2\n",
    );

    let converter = Converter::new(Config::default(), FailingAnnotator);
    let result = converter.run(input.path(), out.path(), None).await;

    assert!(result.is_err());
    // Fail-fast: no partial corpus files were written
    assert!(!out.path().join("wlp_train.json").exists());
}

#[tokio::test]
async fn test_invalid_argument_prefix_aborts_the_run() {
    let input = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    write_protocol(
        input.path(),
        "1",
        "Add water.\n",
        "T1\tAction 0 3\tAdd\nR1\tUses Arg1:Q9 Arg2:T1\n",
    );

    let converter = Converter::new(Config::default(), StubAnnotator);
    let result = converter.run(input.path(), out.path(), None).await;

    assert!(result.is_err());
    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("Q9"));
}
