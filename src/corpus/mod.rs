//! Corpus-wide aggregation and output files.
//!
//! Per-document results are folded into one [`Corpus`] that lives for the
//! whole run and is serialized once at the end into three independent
//! files:
//!
//! 1. the training file — every record serialized back-to-back (a
//!    concatenated sequence of JSON objects, not an array)
//! 2. the predicate-frequency table, one JSON object
//! 3. the entity-type index, one JSON object

pub mod record;

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use tokio::fs;

pub use record::TrainingRecord;

use crate::protocol::Entity;

/// Per-document results handed to the fold.
#[derive(Debug, Default)]
pub struct DocumentOutput {
    /// Training records in relation order
    pub records: Vec<TrainingRecord>,
    /// canonical_id -> one-element type-label list
    pub entity_types: BTreeMap<String, Vec<String>>,
}

impl DocumentOutput {
    /// Build the entity-type index for one document's entity table
    pub fn entity_type_index<'a>(
        entities: impl IntoIterator<Item = &'a Entity>,
    ) -> BTreeMap<String, Vec<String>> {
        entities
            .into_iter()
            .map(|e| {
                (
                    e.canonical_id.clone(),
                    vec![format!("/{}", e.entity_type)],
                )
            })
            .collect()
    }
}

/// Accumulated training corpus across all documents.
#[derive(Debug, Default)]
pub struct Corpus {
    /// All retained training records in input order
    pub records: Vec<TrainingRecord>,
    /// Predicate -> occurrence count
    pub relation_counts: BTreeMap<String, u64>,
    /// canonical_id -> one-element type-label list
    pub entity_types: BTreeMap<String, Vec<String>>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one document's output into the corpus.
    ///
    /// Records append and predicate counts accumulate, but the entity-type
    /// index is *replaced*: the serialized index reflects only the last
    /// processed document. The reference corpus build rebuilt it from the
    /// final document's entity table, and fixtures depend on reproducing
    /// that exactly.
    pub fn fold(&mut self, output: DocumentOutput) {
        for record in &output.records {
            *self.relation_counts.entry(record.rel.clone()).or_insert(0) += 1;
        }
        self.records.extend(output.records);
        self.entity_types = output.entity_types;
    }

    /// Serialize the three output files.
    pub async fn write(
        &self,
        training_path: &Path,
        relations_path: &Path,
        entity_types_path: &Path,
    ) -> Result<()> {
        let mut training = String::new();
        for record in &self.records {
            training.push_str(&serde_json::to_string(record)?);
        }
        fs::write(training_path, training)
            .await
            .with_context(|| format!("Failed to write {}", training_path.display()))?;

        fs::write(relations_path, serde_json::to_string(&self.relation_counts)?)
            .await
            .with_context(|| format!("Failed to write {}", relations_path.display()))?;

        fs::write(entity_types_path, serde_json::to_string(&self.entity_types)?)
            .await
            .with_context(|| format!("Failed to write {}", entity_types_path.display()))?;

        Ok(())
    }
}
