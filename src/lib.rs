// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Shapeshifter: structural editing of from/to vector path pairs so they
//! can be morphed into each other

use anyhow::{Context, Result, bail};
use std::path::PathBuf;

pub mod editing;
pub mod error;
pub mod model;
pub mod morph;
pub mod path;
pub mod settings;

pub use editing::{ActionMode, Intent, MorphSession, Selection, SelectionKind, SelectionRegistry};
pub use error::{EditError, EditResult, PathError};
pub use model::{CanvasSource, LayerStyle, MorphBlock, MorphDocument, MorphReport};
pub use morph::{PathPair, Reconciled, auto_convert, auto_fix, auto_fix_all, reconcile};
pub use path::{Command, CommandKind, FillRule, Instruction, Path, PathMutator, SubPath};

/// Entry point for the command-line front end
pub fn run() -> Result<()> {
    // Initialize tracing subscriber (can be controlled via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("shapeshifter=info".parse().context("bad log directive")?),
        )
        .init();

    let document_path = handle_command_line_args()?;
    let report = process_file(&document_path)?;
    if !report.compatible {
        tracing::warn!(
            unreconciled = ?report.unreconciled,
            "some subpaths still differ in command count"
        );
    }
    let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
    println!("{json}");
    Ok(())
}

/// Pick the morph document path from the command line
fn handle_command_line_args() -> Result<PathBuf> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        bail!("Usage: shapeshifter <path/to/morph.json>");
    }
    let document_path = PathBuf::from(&args[1]);
    if !document_path.exists() {
        bail!("Path does not exist: {}", document_path.display());
    }
    Ok(document_path)
}

/// Read a morph document and run the compatibility engine over it
pub fn process_file(document_path: &std::path::Path) -> Result<MorphReport> {
    tracing::info!("Loading morph from: {}", document_path.display());
    let text = std::fs::read_to_string(document_path)
        .with_context(|| format!("failed to read {}", document_path.display()))?;
    let document: MorphDocument = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse {}", document_path.display()))?;
    let report = document
        .process()
        .with_context(|| format!("invalid path data in {}", document_path.display()))?;
    tracing::info!(
        sub_paths = report.from.sub_paths().len(),
        compatible = report.compatible,
        "processed morph"
    );
    Ok(report)
}
