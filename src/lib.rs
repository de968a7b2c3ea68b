//! wlp-corpus - standoff-annotated protocols to relation-extraction corpus
//!
//! A batch offline converter: reads wet-lab protocol documents annotated
//! in brat standoff format (raw `.txt` plus `.ann` sibling) and emits a
//! flat JSON training corpus for a downstream relation-extraction model.
//!
//! # Architecture
//!
//! Per document: sentence spans → entity table → sentence-scoped
//! relations → training records (one enrichment call each). Per run:
//! records and statistics fold into a single [`Corpus`] serialized at the
//! end.
//!
//! # Modules
//!
//! - `protocol`: standoff parsing (spans, entities, relations)
//! - `annotate`: external sentence-annotation capability (CoreNLP)
//! - `corpus`: training records and corpus-wide aggregation
//! - `ingest`: dataset directory discovery
//! - `convert`: sequential build driver
//! - `cli`: command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Build the corpus from a dataset directory
//! wlp-corpus convert protocols/train -o protocols/wlp_raw
//!
//! # Debug how one document parses
//! wlp-corpus inspect protocols/train/protocol_0412.txt
//! ```

pub mod annotate;
pub mod cli;
pub mod config;
pub mod convert;
pub mod corpus;
pub mod ingest;
pub mod protocol;

// Re-export main types at crate root for convenience
pub use annotate::{CoreNlpClient, SentenceAnnotator};
pub use config::Config;
pub use convert::Converter;
pub use corpus::{Corpus, DocumentOutput, TrainingRecord};
pub use protocol::{Entity, ParsedProtocol, Relation, Sentence};
