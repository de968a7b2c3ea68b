//! Grouped (`E`) and direct (`R`) relation records.
//!
//! Two structurally different record kinds are normalized into one
//! [`Relation`] shape:
//!
//! ```text
//! E1\tAction:T3 Theme1:T4 Theme2:T5     (grouped: one relation per pair)
//! R1\tUses Arg1:T1 Arg2:T2              (direct: exactly one relation)
//! ```
//!
//! A grouped record also registers an alias `E1 -> T3` so later relations
//! can name the whole group as an argument. Resolution is an explicit
//! two-phase build: first every alias is registered and every relation
//! collected, then sentence indices are computed — a later record may
//! reference an earlier group's alias, so alias completeness must not
//! depend on record order.
//!
//! A relation whose two arguments resolve to entities in different
//! sentences is dropped. That is expected input, not an error: the corpus
//! is intra-sentence only.

use std::collections::HashMap;

use thiserror::Error;

use super::entities::Entity;

/// Alias table mapping a grouped-relation id (`E…`) to its anchor entity id (`T…`)
pub type AliasTable = HashMap<String, String>;

/// Errors raised while parsing and resolving relation records.
///
/// All of these indicate a broken annotation-format assumption and abort
/// the entire run; there is no partial corpus for format violations.
#[derive(Debug, Error)]
pub enum RelationError {
    #[error("Malformed relation record: {0}")]
    Malformed(String),

    #[error("{0} is not a valid argument for a relation")]
    InvalidArgument(String),

    #[error("Relation argument references unknown group: {0}")]
    UnknownAlias(String),

    #[error("Relation argument references unknown entity: {0}")]
    UnknownEntity(String),
}

/// A sentence-scoped relation with both arguments still in raw-id form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    /// Corpus-wide identifier derived from the protocol number and record id
    pub canonical_id: String,
    /// Lower-cased relation type, digits stripped for grouped records
    pub relation_type: String,
    /// Raw argument id: an entity (`T…`) or a group alias (`E…`)
    pub arg1: String,
    /// Raw argument id: an entity (`T…`) or a group alias (`E…`)
    pub arg2: String,
    /// Index of the sentence both arguments belong to
    pub sentence_index: usize,
}

/// A parsed relation record awaiting sentence resolution.
#[derive(Debug, Clone)]
struct PendingRelation {
    canonical_id: String,
    relation_type: String,
    arg1: String,
    arg2: String,
}

/// Remove every ASCII digit from a grouped-relation role.
///
/// Digits only disambiguate repeated roles in the source format
/// (Theme1, Theme2) and carry no semantic meaning.
fn strip_digits(role: &str) -> String {
    role.chars().filter(|c| !c.is_ascii_digit()).collect()
}

/// Parse one `E` record: register its alias and expand its pairs.
fn parse_grouped(
    line: &str,
    protocol_num: &str,
    aliases: &mut AliasTable,
    pending: &mut Vec<PendingRelation>,
) -> Result<(), RelationError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 2 {
        return Err(RelationError::Malformed(line.to_string()));
    }

    let group_id = fields[0];
    let anchor = fields[1]
        .split_once(':')
        .map(|(_, target)| target)
        .ok_or_else(|| RelationError::Malformed(line.to_string()))?;
    aliases.insert(group_id.to_string(), anchor.to_string());

    // Each type:target pair after the anchor becomes one relation with the
    // anchor entity as arg1
    for (i, pair) in fields[2..].iter().enumerate() {
        let (role, target) = pair
            .split_once(':')
            .ok_or_else(|| RelationError::Malformed(line.to_string()))?;
        pending.push(PendingRelation {
            canonical_id: format!("m.{}_{}_{}", protocol_num, group_id.to_lowercase(), i),
            relation_type: strip_digits(role).to_lowercase(),
            arg1: anchor.to_string(),
            arg2: target.to_string(),
        });
    }

    Ok(())
}

/// Parse one `R` record into a single pending relation.
fn parse_direct(
    line: &str,
    protocol_num: &str,
    pending: &mut Vec<PendingRelation>,
) -> Result<(), RelationError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 4 {
        return Err(RelationError::Malformed(line.to_string()));
    }

    let arg = |field: &str| {
        field
            .split_once(':')
            .map(|(_, target)| target.to_string())
            .ok_or_else(|| RelationError::Malformed(line.to_string()))
    };

    pending.push(PendingRelation {
        canonical_id: format!("m.{}_{}", protocol_num, fields[0].to_lowercase()),
        relation_type: fields[1].to_lowercase(),
        arg1: arg(fields[2])?,
        arg2: arg(fields[3])?,
    });

    Ok(())
}

/// Resolve a raw argument id to its entity, translating group aliases.
pub fn resolve_argument<'a>(
    arg: &str,
    entities: &'a HashMap<String, Entity>,
    aliases: &AliasTable,
) -> Result<&'a Entity, RelationError> {
    let entity_id = if arg.starts_with('E') {
        aliases
            .get(arg)
            .ok_or_else(|| RelationError::UnknownAlias(arg.to_string()))?
            .as_str()
    } else {
        arg
    };

    if entity_id.starts_with('T') {
        entities
            .get(entity_id)
            .ok_or_else(|| RelationError::UnknownEntity(entity_id.to_string()))
    } else {
        Err(RelationError::InvalidArgument(arg.to_string()))
    }
}

/// Parse every `E` and `R` record and resolve sentence scope.
///
/// Returns the retained relations — grouped records first in file order,
/// then direct records in file order — plus the alias table needed to
/// re-resolve arguments when building training records. Cross-sentence
/// relations are silently excluded.
pub fn resolve_relations(
    ann: &str,
    protocol_num: &str,
    entities: &HashMap<String, Entity>,
) -> Result<(Vec<Relation>, AliasTable), RelationError> {
    let mut aliases = AliasTable::new();
    let mut grouped = Vec::new();
    let mut direct = Vec::new();

    // Phase 1: collect. Aliases must all be registered before any sentence
    // index is computed.
    for line in ann.lines() {
        if line.starts_with('E') {
            parse_grouped(line, protocol_num, &mut aliases, &mut grouped)?;
        } else if line.starts_with('R') {
            parse_direct(line, protocol_num, &mut direct)?;
        }
    }

    // Phase 2: resolve sentence scope, dropping cross-sentence relations.
    let mut relations = Vec::new();
    for pending in grouped.into_iter().chain(direct) {
        let sent1 = resolve_argument(&pending.arg1, entities, &aliases)?.sentence_index;
        let sent2 = resolve_argument(&pending.arg2, entities, &aliases)?.sentence_index;
        if sent1 != sent2 {
            continue;
        }
        relations.push(Relation {
            canonical_id: pending.canonical_id,
            relation_type: pending.relation_type,
            arg1: pending.arg1,
            arg2: pending.arg2,
            sentence_index: sent1,
        });
    }

    Ok((relations, aliases))
}
