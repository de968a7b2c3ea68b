//! Corpus build driver.
//!
//! Processes protocol documents strictly sequentially: each document is
//! parsed, its relations turned into training records (one annotator call
//! per record), and the result folded into the run-wide [`Corpus`]. All
//! per-document state is discarded before the next document starts.
//!
//! Error policy is fail-fast: a format violation, an unresolvable entity
//! span, or an annotator failure aborts the run rather than producing a
//! partially corrupt corpus.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info, instrument};

use crate::annotate::SentenceAnnotator;
use crate::config::Config;
use crate::corpus::record::build_record;
use crate::corpus::{Corpus, DocumentOutput};
use crate::ingest::{discover, ProtocolFile};
use crate::protocol::parse_protocol;

/// Drives one corpus build.
pub struct Converter<A: SentenceAnnotator> {
    config: Config,
    annotator: A,
}

impl<A: SentenceAnnotator> Converter<A> {
    pub fn new(config: Config, annotator: A) -> Self {
        Self { config, annotator }
    }

    /// Process one document pair into training records and type labels.
    ///
    /// Pure with respect to run state: the output depends only on the
    /// document's text, annotations, and protocol number. The caller
    /// folds it into the corpus.
    #[instrument(skip(self, text, ann))]
    pub async fn process_document(
        &self,
        text: &str,
        ann: &str,
        protocol_num: &str,
    ) -> Result<DocumentOutput> {
        let parsed = parse_protocol(text, ann, protocol_num)?;
        debug!(
            sentences = parsed.sentences.len(),
            entities = parsed.entities.len(),
            relations = parsed.relations.len(),
            "Parsed protocol"
        );

        let mut records = Vec::with_capacity(parsed.relations.len());
        for relation in &parsed.relations {
            let record = build_record(
                relation,
                &parsed.sentences,
                &parsed.entities,
                &parsed.aliases,
                &self.annotator,
            )
            .await?;
            records.push(record);
        }

        Ok(DocumentOutput {
            records,
            entity_types: DocumentOutput::entity_type_index(parsed.entities.values()),
        })
    }

    /// Convert every protocol under `input_dir`, writing the three corpus
    /// files into `out_dir`. `limit` caps the number of documents, for
    /// sampling a large dataset during debugging.
    #[instrument(skip(self), fields(input = %input_dir.display()))]
    pub async fn run(&self, input_dir: &Path, out_dir: &Path, limit: Option<usize>) -> Result<Corpus> {
        let protocols = discover(input_dir)?;
        info!(documents = protocols.len(), "Discovered protocol documents");

        let mut corpus = Corpus::new();
        for protocol in protocols.iter().take(limit.unwrap_or(usize::MAX)) {
            let output = self.process_protocol(protocol).await?;
            debug!(
                protocol = %protocol.protocol_num,
                records = output.records.len(),
                "Processed protocol"
            );
            corpus.fold(output);
        }

        tokio::fs::create_dir_all(out_dir)
            .await
            .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;
        let (training, relations, entity_types) = self.config.output_paths(out_dir);
        corpus.write(&training, &relations, &entity_types).await?;

        info!(
            records = corpus.records.len(),
            predicates = corpus.relation_counts.len(),
            "Corpus written"
        );
        Ok(corpus)
    }

    /// Read one discovered document pair and process it.
    pub async fn process_protocol(&self, protocol: &ProtocolFile) -> Result<DocumentOutput> {
        let text = tokio::fs::read_to_string(&protocol.txt_path)
            .await
            .with_context(|| format!("Failed to read {}", protocol.txt_path.display()))?;
        let ann = tokio::fs::read_to_string(&protocol.ann_path)
            .await
            .with_context(|| format!("Failed to read {}", protocol.ann_path.display()))?;

        self.process_document(&text, &ann, &protocol.protocol_num)
            .await
    }
}
