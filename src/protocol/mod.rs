//! Standoff-annotated protocol parsing.
//!
//! A protocol document is a raw `.txt` file (one sentence per line) plus a
//! brat-style `.ann` file whose records reference the text by character
//! offset. Parsing runs in three stages:
//!
//! 1. **Spans**: split the raw text into offset-indexed sentence spans
//! 2. **Entities**: build the `T` record table, each entity assigned to
//!    the sentence containing its span
//! 3. **Relations**: normalize `E`/`R` records into sentence-scoped
//!    relations, dropping cross-sentence ones
//!
//! Any other record prefix in the `.ann` file is ignored.

pub mod entities;
pub mod relations;
pub mod spans;

use std::collections::HashMap;

use anyhow::{Context, Result};

pub use entities::{Entity, EntityError};
pub use relations::{AliasTable, Relation, RelationError};
pub use spans::Sentence;

/// Fully parsed per-document state.
///
/// Built fresh for each document and discarded once its training records
/// are emitted.
#[derive(Debug)]
pub struct ParsedProtocol {
    /// Ordered sentence spans; index is the sentence number
    pub sentences: Vec<Sentence>,
    /// Entity table keyed by raw id
    pub entities: HashMap<String, Entity>,
    /// Group-id to anchor-entity indirection table
    pub aliases: AliasTable,
    /// Retained intra-sentence relations, grouped records first
    pub relations: Vec<Relation>,
}

/// Parse one protocol document pair.
pub fn parse_protocol(text: &str, ann: &str, protocol_num: &str) -> Result<ParsedProtocol> {
    let sentences = spans::sentence_spans(text);

    let entities = entities::entity_table(ann, protocol_num, &sentences)
        .with_context(|| format!("Failed to parse entities of protocol {}", protocol_num))?;

    let (relations, aliases) = relations::resolve_relations(ann, protocol_num, &entities)
        .with_context(|| format!("Failed to resolve relations of protocol {}", protocol_num))?;

    Ok(ParsedProtocol {
        sentences,
        entities,
        aliases,
        relations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_protocol_end_to_end() {
        let text = "Add 5 mL water to tube.\nMix well.\n";
        let ann = "T1\tReagent 9 14\twater\n\
                   T2\tLocation 18 22\ttube\n\
                   T3\tAction 0 3\tAdd\n\
                   E1\tAction:T3 Acts-on:T1 Site:T2\n\
                   R1\tUses Arg1:T1 Arg2:T2\n\
                   #1\tAnnotatorNotes T1\tsome note\n";

        let parsed = parse_protocol(text, ann, "0001").unwrap();

        assert_eq!(parsed.sentences.len(), 2);
        assert_eq!(parsed.entities.len(), 3);
        assert_eq!(parsed.aliases["E1"], "T3");
        // Two grouped + one direct, all intra-sentence
        assert_eq!(parsed.relations.len(), 3);
        assert_eq!(parsed.relations[2].canonical_id, "m.0001_r1");
    }

    #[test]
    fn test_unresolvable_entity_fails_the_document() {
        let text = "Mix well.\n";
        let ann = "T1\tReagent 40 45\tghost\n";

        assert!(parse_protocol(text, ann, "2").is_err());
    }
}
