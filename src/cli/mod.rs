//! Command-line interface for wlp-corpus.
//!
//! Provides commands for converting a dataset directory into the three
//! corpus files and for inspecting how a single document parses.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::annotate::CoreNlpClient;
use crate::config::Config;
use crate::convert::Converter;
use crate::ingest::protocol_number;
use crate::protocol::parse_protocol;

/// wlp-corpus - standoff-annotated protocols to training corpus
#[derive(Parser, Debug)]
#[command(name = "wlp-corpus")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a dataset directory into corpus files
    Convert {
        /// Directory holding .txt/.ann protocol pairs
        input_dir: PathBuf,

        /// Directory the three corpus files are written into
        #[arg(short, long, default_value = "wlp_raw")]
        out_dir: PathBuf,

        /// Optional YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Process at most this many documents
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Parse one protocol pair and print the resolved structures
    Inspect {
        /// Raw text file (its .ann sibling is read alongside)
        txt_file: PathBuf,
    },
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Convert {
                input_dir,
                out_dir,
                config,
                limit,
            } => convert(&input_dir, &out_dir, config, limit).await,
            Commands::Inspect { txt_file } => inspect(&txt_file).await,
        }
    }
}

/// Run a full corpus build
async fn convert(
    input_dir: &PathBuf,
    out_dir: &PathBuf,
    config_path: Option<PathBuf>,
    limit: Option<usize>,
) -> Result<()> {
    let config = Config::load(config_path.as_deref())?;
    let annotator = CoreNlpClient::new(
        config.corenlp_url.clone(),
        config.annotators.clone(),
        config.timeout_ms,
    )?;

    let converter = Converter::new(config, annotator);
    let corpus = converter.run(input_dir, out_dir, limit).await?;

    eprintln!(
        "[{} records, {} predicates written to {}]",
        corpus.records.len(),
        corpus.relation_counts.len(),
        out_dir.display()
    );

    Ok(())
}

/// Parse one document pair and pretty-print the result
async fn inspect(txt_file: &PathBuf) -> Result<()> {
    let ann_file = txt_file.with_extension("ann");
    let file_name = txt_file
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Invalid file name: {}", txt_file.display()))?;
    let protocol_num = protocol_number(file_name);

    let text = std::fs::read_to_string(txt_file)
        .with_context(|| format!("Failed to read {}", txt_file.display()))?;
    let ann = std::fs::read_to_string(&ann_file)
        .with_context(|| format!("Failed to read {}", ann_file.display()))?;

    let parsed = parse_protocol(&text, &ann, &protocol_num)?;

    println!("Protocol: {}", protocol_num);
    println!("\nSentences:");
    for (i, sentence) in parsed.sentences.iter().enumerate() {
        println!(
            "  [{}] {}..{}  {}",
            i, sentence.start_offset, sentence.end_offset, sentence.text
        );
    }

    println!("\nEntities:");
    let mut entities: Vec<_> = parsed.entities.values().collect();
    entities.sort_by(|a, b| a.raw_id.cmp(&b.raw_id));
    for entity in entities {
        println!(
            "  {} ({})  sent {}  {}..{}  {}",
            entity.raw_id,
            entity.entity_type,
            entity.sentence_index,
            entity.start_offset,
            entity.end_offset,
            entity.token
        );
    }

    println!("\nRelations:");
    for relation in &parsed.relations {
        println!(
            "  {}  {}({}, {})  sent {}",
            relation.canonical_id,
            relation.relation_type,
            relation.arg1,
            relation.arg2,
            relation.sentence_index
        );
    }

    Ok(())
}
