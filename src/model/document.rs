// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! JSON documents read and written by the command-line front end.
//!
//! Input carries SVG path data for both keyframes; output carries the
//! reconciled SVG plus the structured paths.

use super::{LayerStyle, MorphBlock};
use crate::error::PathError;
use crate::morph::{self, Reconciled};
use crate::path::{FillRule, Path};
use serde::{Deserialize, Serialize};

/// A from/to pair as authored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MorphDocument {
    /// SVG path data of the from keyframe
    pub from: String,
    /// SVG path data of the to keyframe
    pub to: String,
    #[serde(default)]
    pub style: LayerStyle,
    #[serde(default)]
    pub fill_rule: FillRule,
    /// Also pick start points and add points where counts differ
    #[serde(default = "default_auto_fix")]
    pub auto_fix: bool,
}

fn default_auto_fix() -> bool {
    true
}

impl MorphDocument {
    /// Parse both sides into a block
    pub fn to_block(&self) -> Result<MorphBlock, PathError> {
        let from = Path::from_svg(&self.from)?.with_fill_rule(self.fill_rule);
        let to = Path::from_svg(&self.to)?.with_fill_rule(self.fill_rule);
        Ok(MorphBlock::new(from, to, self.style))
    }

    /// Run the compatibility engine (and optionally auto fix) over the
    /// document
    pub fn process(&self) -> Result<MorphReport, PathError> {
        let mut block = self.to_block()?;
        if self.auto_fix {
            let pair = morph::auto_fix_all(&block.from, &block.to);
            block.from = pair.from;
            block.to = pair.to;
        }
        Ok(MorphReport::new(block.reconcile()))
    }
}

/// Result of processing a document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MorphReport {
    pub from_svg: String,
    pub to_svg: String,
    pub compatible: bool,
    pub unreconciled: Vec<usize>,
    pub from: Path,
    pub to: Path,
}

impl MorphReport {
    fn new(reconciled: Reconciled) -> Self {
        Self {
            from_svg: reconciled.from.to_svg(),
            to_svg: reconciled.to.to_svg(),
            compatible: reconciled.is_compatible(),
            unreconciled: reconciled.unreconciled,
            from: reconciled.from,
            to: reconciled.to,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(json: &str) -> MorphDocument {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn defaults_fill_in() {
        let doc = document(r#"{"from": "M0 0 L1 0", "to": "M0 0 L2 0"}"#);
        assert!(doc.auto_fix);
        assert_eq!(doc.style, LayerStyle::default());
        assert_eq!(doc.fill_rule, FillRule::NonZero);
    }

    #[test]
    fn process_makes_triangle_and_square_compatible() {
        let doc = document(
            r#"{"from": "M0 0 L10 0 L10 10 L0 10 Z", "to": "M0 0 L10 0 L5 10 Z", "style": {"filled": true}}"#,
        );
        let report = doc.process().unwrap();
        assert!(report.compatible);
        assert_eq!(
            report.from.sub_paths()[0].len(),
            report.to.sub_paths()[0].len()
        );
    }

    #[test]
    fn process_without_auto_fix_reports_mismatch() {
        let doc = document(
            r#"{"from": "M0 0 L10 0 L10 10 L0 10 Z", "to": "M0 0 L10 0 L5 10 Z", "auto_fix": false}"#,
        );
        let report = doc.process().unwrap();
        assert!(!report.compatible);
        assert_eq!(report.unreconciled, vec![0]);
    }

    #[test]
    fn bad_path_data_is_an_error() {
        let doc = document(r#"{"from": "M0 0 K1 1", "to": "M0 0 L1 0"}"#);
        assert!(matches!(doc.process(), Err(PathError::Parse(_))));
    }
}
