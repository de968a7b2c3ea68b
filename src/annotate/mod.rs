//! Sentence annotation interfaces.
//!
//! Every training record carries a linguistic enrichment payload produced
//! by an external analyzer (Stanford CoreNLP in production). The analyzer
//! is injected as a capability so the conversion pipeline can be exercised
//! in tests with a stub, without touching parsing logic.

pub mod corenlp;

use anyhow::Result;
use async_trait::async_trait;

pub use corenlp::CoreNlpClient;

/// Capability interface for per-sentence linguistic annotation.
///
/// One call per training record, blocking with a bounded timeout. A
/// failure or timeout is fatal for the document being processed: there is
/// no retry and no partial record set.
#[async_trait]
pub trait SentenceAnnotator: Send + Sync {
    /// Human-readable annotator name
    fn name(&self) -> &str;

    /// Annotate one sentence, returning the analyzer's JSON payload
    async fn annotate(&self, text: &str) -> Result<serde_json::Value>;
}
