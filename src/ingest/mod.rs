//! Protocol file discovery.
//!
//! A dataset directory holds `.txt`/`.ann` sibling pairs, one per
//! protocol (e.g. `protocol_0412.txt` + `protocol_0412.ann`). The
//! protocol number is the part of the file name between the first
//! underscore and the first dot, and seeds every canonical id in the
//! document.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

/// Errors raised during protocol discovery
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Missing annotation file for {0}")]
    MissingAnnotation(PathBuf),
}

/// One discovered protocol document pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolFile {
    /// Raw text file
    pub txt_path: PathBuf,
    /// Standoff annotation sibling
    pub ann_path: PathBuf,
    /// Number used to derive corpus-wide canonical ids
    pub protocol_num: String,
}

/// Derive the protocol number from a file name.
///
/// Everything between the first `_` and the first `.`; the whole stem if
/// there is no underscore.
pub fn protocol_number(file_name: &str) -> String {
    let start = file_name.find('_').map(|i| i + 1).unwrap_or(0);
    let end = file_name.find('.').unwrap_or(file_name.len());
    file_name[start..end.max(start)].to_string()
}

/// Find every `.txt`/`.ann` pair under a dataset directory, sorted by
/// file name for a deterministic processing order.
pub fn discover(dir: &Path) -> Result<Vec<ProtocolFile>> {
    let pattern = dir.join("*.txt");
    let pattern = pattern
        .to_str()
        .with_context(|| format!("Non-UTF-8 dataset path: {}", dir.display()))?;

    let mut protocols = Vec::new();
    for entry in glob::glob(pattern).context("Invalid dataset glob pattern")? {
        let txt_path = entry.context("Failed to read dataset directory entry")?;
        let ann_path = txt_path.with_extension("ann");
        if !ann_path.exists() {
            return Err(DiscoveryError::MissingAnnotation(txt_path).into());
        }

        let file_name = txt_path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("Non-UTF-8 file name: {}", txt_path.display()))?;

        protocols.push(ProtocolFile {
            protocol_num: protocol_number(file_name),
            txt_path,
            ann_path,
        });
    }

    protocols.sort_by(|a, b| a.txt_path.cmp(&b.txt_path));
    Ok(protocols)
}
