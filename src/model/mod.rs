// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Morph data model: the from/to path pair of one animation block and the
//! layer paint that decides how subpaths are deleted.

pub mod document;

pub use document::{MorphDocument, MorphReport};

use crate::morph::{self, Reconciled};
use crate::path::Path;
use serde::{Deserialize, Serialize};

/// Which keyframe canvas an edit or selection targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanvasSource {
    From,
    To,
}

impl CanvasSource {
    /// The other canvas
    pub fn opposite(self) -> Self {
        match self {
            CanvasSource::From => CanvasSource::To,
            CanvasSource::To => CanvasSource::From,
        }
    }
}

/// Paint of the layer being morphed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerStyle {
    #[serde(default)]
    pub filled: bool,
    #[serde(default)]
    pub stroked: bool,
}

impl LayerStyle {
    pub fn filled() -> Self {
        Self {
            filled: true,
            stroked: false,
        }
    }

    pub fn stroked() -> Self {
        Self {
            filled: false,
            stroked: true,
        }
    }
}

/// The from/to path pair of one animation block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MorphBlock {
    pub from: Path,
    pub to: Path,
    #[serde(default)]
    pub style: LayerStyle,
}

impl MorphBlock {
    pub fn new(from: Path, to: Path, style: LayerStyle) -> Self {
        Self { from, to, style }
    }

    pub fn path(&self, source: CanvasSource) -> &Path {
        match source {
            CanvasSource::From => &self.from,
            CanvasSource::To => &self.to,
        }
    }

    /// Replace one side and bring the pair back into agreement. The
    /// opposite side may change too.
    pub fn update_path(&mut self, source: CanvasSource, path: Path) -> Reconciled {
        match source {
            CanvasSource::From => self.from = path,
            CanvasSource::To => self.to = path,
        }
        self.reconcile()
    }

    /// Re-run the compatibility pass on both sides
    pub fn reconcile(&mut self) -> Reconciled {
        let reconciled = morph::reconcile(&self.from, &self.to);
        self.from = reconciled.from.clone();
        self.to = reconciled.to.clone();
        reconciled
    }
}
