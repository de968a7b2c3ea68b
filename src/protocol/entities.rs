//! Standoff entity (`T`) record parser.
//!
//! An entity record looks like:
//!
//! ```text
//! T1\tReagent 9 14\twater
//! T7\tAction 0 3;20 24\tadd mix
//! ```
//!
//! Fields are whitespace-delimited. A discontinuous span carries
//! semicolon-separated sub-spans; only the first start and last end offset
//! are kept, approximating the span by its convex hull. The remaining
//! fields form the surface token, rejoined with underscores.

use std::collections::HashMap;

use thiserror::Error;

use super::spans::{find_sentence, Sentence};

/// Errors raised while parsing and resolving entity records
#[derive(Debug, Error)]
pub enum EntityError {
    #[error("Malformed entity record: {0}")]
    Malformed(String),

    #[error("Invalid span offset in entity record: {0}")]
    BadOffset(String),

    #[error("Entity {raw_id} span [{start}, {end}) is not inside any sentence")]
    NoContainingSentence {
        raw_id: String,
        start: usize,
        end: usize,
    },
}

/// A resolved standoff entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// Identifier as written in the annotation file (e.g. "T1")
    pub raw_id: String,
    /// Corpus-wide identifier: "m.<protocol>_<raw_id lowercase>"
    pub canonical_id: String,
    /// Lower-cased entity type label
    pub entity_type: String,
    /// First start offset of the (possibly discontinuous) span
    pub start_offset: usize,
    /// Last end offset of the span
    pub end_offset: usize,
    /// Surface token, underscore-joined
    pub token: String,
    /// Index of the sentence whose span contains the entity
    pub sentence_index: usize,
}

/// Parse one `T` record and assign it to a sentence.
pub fn parse_entity(
    line: &str,
    protocol_num: &str,
    sentences: &[Sentence],
) -> Result<Entity, EntityError> {
    // Sub-span count decides which field holds the final end offset
    let semicolons = line.matches(';').count();
    let fields: Vec<&str> = line.split_whitespace().collect();

    if fields.len() < semicolons + 5 {
        return Err(EntityError::Malformed(line.to_string()));
    }

    let raw_id = fields[0].to_string();
    let entity_type = fields[1].to_lowercase();

    let start_offset: usize = fields[2]
        .parse()
        .map_err(|_| EntityError::BadOffset(line.to_string()))?;
    let end_offset: usize = fields[semicolons + 3]
        .parse()
        .map_err(|_| EntityError::BadOffset(line.to_string()))?;

    let token = fields[semicolons + 4..].join("_");

    let sentence_index = find_sentence(sentences, start_offset, end_offset).ok_or(
        EntityError::NoContainingSentence {
            raw_id: raw_id.clone(),
            start: start_offset,
            end: end_offset,
        },
    )?;

    Ok(Entity {
        canonical_id: format!("m.{}_{}", protocol_num, raw_id.to_lowercase()),
        raw_id,
        entity_type,
        start_offset,
        end_offset,
        token,
        sentence_index,
    })
}

/// Parse every `T` record in an annotation file into a table keyed by raw id.
pub fn entity_table(
    ann: &str,
    protocol_num: &str,
    sentences: &[Sentence],
) -> Result<HashMap<String, Entity>, EntityError> {
    let mut entities = HashMap::new();

    for line in ann.lines() {
        if line.starts_with('T') {
            let entity = parse_entity(line, protocol_num, sentences)?;
            entities.insert(entity.raw_id.clone(), entity);
        }
    }

    Ok(entities)
}
