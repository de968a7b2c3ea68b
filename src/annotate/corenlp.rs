//! Stanford CoreNLP HTTP adapter.
//!
//! Speaks the CoreNLP server protocol: the annotation request is a POST
//! with the sentence text as the body and a `properties` query parameter
//! carrying the annotator configuration as a JSON object.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;

use super::SentenceAnnotator;

/// CoreNLP server client
pub struct CoreNlpClient {
    /// Server base URL (e.g. "http://localhost:9000/")
    base_url: String,
    /// Comma-separated annotator list passed to the server
    annotators: String,
    /// Server-side and client-side annotation timeout
    timeout_ms: u64,
    /// HTTP client
    client: reqwest::Client,
}

impl CoreNlpClient {
    /// Create a new client against the given server
    pub fn new(base_url: String, annotators: String, timeout_ms: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .context("Failed to build CoreNLP HTTP client")?;

        Ok(Self {
            base_url,
            annotators,
            timeout_ms,
            client,
        })
    }

    /// Build the request properties the server expects
    fn properties(&self) -> String {
        serde_json::json!({
            "annotators": self.annotators,
            "timeout": self.timeout_ms.to_string(),
            "outputFormat": "json",
        })
        .to_string()
    }
}

/// Remove the deep dependency views from the first analyzed sentence.
///
/// The enhanced dependency graphs dominate the payload size and are not
/// consumed downstream, so they are stripped before storage.
pub fn strip_dependency_views(payload: &mut Value) {
    if let Some(sentence) = payload
        .get_mut("sentences")
        .and_then(|s| s.get_mut(0))
        .and_then(|s| s.as_object_mut())
    {
        sentence.remove("enhancedDependencies");
        sentence.remove("enhancedPlusPlusDependencies");
    }
}

#[async_trait]
impl SentenceAnnotator for CoreNlpClient {
    fn name(&self) -> &str {
        "corenlp"
    }

    async fn annotate(&self, text: &str) -> Result<Value> {
        let response = self
            .client
            .post(&self.base_url)
            .query(&[("properties", self.properties())])
            .body(text.to_string())
            .send()
            .await
            .context("Failed to reach CoreNLP server")?;

        if !response.status().is_success() {
            anyhow::bail!("CoreNLP request failed: {}", response.status());
        }

        let mut payload: Value = response
            .json()
            .await
            .context("Failed to parse CoreNLP response")?;

        strip_dependency_views(&mut payload);
        Ok(payload)
    }
}
