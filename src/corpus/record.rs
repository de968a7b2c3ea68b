//! Training record construction.
//!
//! One retained relation becomes one flat JSON record in the riedel-raw
//! shape the downstream relation-extraction model trains on. Field names
//! and ordering are part of the output contract.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::annotate::SentenceAnnotator;
use crate::protocol::relations::resolve_argument;
use crate::protocol::{AliasTable, Entity, Relation, Sentence};

use std::collections::HashMap;

/// One line of the training corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingRecord {
    /// Predicate: "/<subject type>/<object type>/<relation type>"
    pub rel: String,
    /// Subject canonical id
    pub sub_id: String,
    /// Subject surface token, lower-cased
    pub sub: String,
    /// Object surface token, lower-cased
    pub obj: String,
    /// Sentence text as stored in the span index
    pub sent: String,
    /// Lower-cased duplicate of `sent`
    pub rsent: String,
    /// Object canonical id
    pub obj_id: String,
    /// Open-information-extraction view of the enrichment payload
    pub openie: Value,
    /// Structural-parse view of the enrichment payload
    pub corenlp: Value,
}

/// Build one training record from a retained relation.
///
/// Arguments are re-resolved through the alias table here; the relation
/// keeps them in raw-id form. The annotator is called once and its payload
/// stored under both enrichment fields, which the reference corpus keeps
/// as identical copies.
pub async fn build_record(
    relation: &Relation,
    sentences: &[Sentence],
    entities: &HashMap<String, Entity>,
    aliases: &AliasTable,
    annotator: &dyn SentenceAnnotator,
) -> Result<TrainingRecord> {
    let subject = resolve_argument(&relation.arg1, entities, aliases)?;
    let object = resolve_argument(&relation.arg2, entities, aliases)?;

    let sent = sentences
        .get(relation.sentence_index)
        .with_context(|| {
            format!(
                "Relation {} resolved to missing sentence {}",
                relation.canonical_id, relation.sentence_index
            )
        })?
        .text
        .clone();

    let payload = annotator
        .annotate(&sent)
        .await
        .with_context(|| format!("Annotation failed for relation {}", relation.canonical_id))?;

    Ok(TrainingRecord {
        rel: format!(
            "/{}/{}/{}",
            subject.entity_type, object.entity_type, relation.relation_type
        ),
        sub_id: subject.canonical_id.clone(),
        sub: subject.token.to_lowercase(),
        obj: object.token.to_lowercase(),
        rsent: sent.to_lowercase(),
        sent,
        obj_id: object.canonical_id.clone(),
        openie: payload.clone(),
        corenlp: payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::parse_protocol;
    use async_trait::async_trait;
    use serde_json::json;

    struct StubAnnotator;

    #[async_trait]
    impl SentenceAnnotator for StubAnnotator {
        fn name(&self) -> &str {
            "stub"
        }

        async fn annotate(&self, text: &str) -> Result<Value> {
            Ok(json!({"sentences": [{"text": text}]}))
        }
    }

    #[tokio::test]
    async fn test_water_tube_record() {
        let text = "Add 5 mL water to tube.\nMix well.\n";
        let ann = "T1\tReagent 9 14\twater\n\
                   T2\tContainer 18 22\ttube\n\
                   R1\tUses Arg1:T1 Arg2:T2\n";
        let parsed = parse_protocol(text, ann, "12").unwrap();

        let record = build_record(
            &parsed.relations[0],
            &parsed.sentences,
            &parsed.entities,
            &parsed.aliases,
            &StubAnnotator,
        )
        .await
        .unwrap();

        assert_eq!(record.rel, "/reagent/container/uses");
        assert_eq!(record.sub, "water");
        assert_eq!(record.obj, "tube");
        assert_eq!(record.sub_id, "m.12_t1");
        assert_eq!(record.obj_id, "m.12_t2");
        assert_eq!(record.sent, "Add 5 mL water to tube.");
        assert_eq!(record.rsent, "add 5 ml water to tube.");
        assert_eq!(record.openie, record.corenlp);
    }

    #[tokio::test]
    async fn test_alias_argument_resolved_to_anchor_entity() {
        let text = "Add 5 mL water to tube.\n";
        let ann = "T1\tReagent 9 14\twater\n\
                   T3\tAction 0 3\tAdd\n\
                   E1\tAction:T3 Acts-on:T1\n";
        let parsed = parse_protocol(text, ann, "12").unwrap();

        let record = build_record(
            &parsed.relations[0],
            &parsed.sentences,
            &parsed.entities,
            &parsed.aliases,
            &StubAnnotator,
        )
        .await
        .unwrap();

        assert_eq!(record.rel, "/action/reagent/acts-on");
        assert_eq!(record.sub, "add");
        assert_eq!(record.sub_id, "m.12_t3");
    }

    #[test]
    fn test_record_field_order_matches_output_contract() {
        let record = TrainingRecord {
            rel: "/a/b/c".into(),
            sub_id: "m.1_t1".into(),
            sub: "a".into(),
            obj: "b".into(),
            sent: "S".into(),
            rsent: "s".into(),
            obj_id: "m.1_t2".into(),
            openie: json!({}),
            corenlp: json!({}),
        };

        let serialized = serde_json::to_string(&record).unwrap();
        let positions: Vec<usize> = ["\"rel\"", "\"sub_id\"", "\"sub\"", "\"obj\"", "\"sent\"", "\"rsent\"", "\"obj_id\"", "\"openie\"", "\"corenlp\""]
            .iter()
            .map(|f| serialized.find(f).unwrap())
            .collect();

        assert!(positions.windows(2).all(|p| p[0] < p[1]));
    }
}
