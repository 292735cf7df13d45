// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Morph session: applies edit intents to the from/to pair of one block

mod pairing;
mod sub_path_edits;

use super::intent::{ActionMode, Intent, UnpairedSubPath};
use super::selection::{Selection, SelectionRegistry};
use crate::error::{EditError, EditResult};
use crate::model::{CanvasSource, MorphBlock};
use crate::morph;
use crate::path::Path;
use std::collections::BTreeSet;

/// Editing state for one morph block
///
/// Holds the path pair, the selections across both canvases, and the
/// transient hover and pairing state. Every geometry edit goes through
/// `apply`, which re-runs the compatibility pass before returning.
#[derive(Debug, Clone)]
pub struct MorphSession {
    block: MorphBlock,

    /// Selections across both canvases
    selections: SelectionRegistry,

    /// Item under the pointer, if any
    hover: Option<Selection>,

    /// Current interaction mode
    mode: ActionMode,

    /// Pairing pick waiting for a click on the other canvas
    unpaired_sub_path: Option<UnpairedSubPath>,

    /// Subpath indices already paired; always a prefix `0..n`
    paired_sub_paths: BTreeSet<usize>,

    /// Subpath indices whose command counts still differ
    unreconciled: Vec<usize>,
}

impl MorphSession {
    /// Start a session; the block is reconciled immediately
    pub fn new(mut block: MorphBlock) -> Self {
        let unreconciled = block.reconcile().unreconciled;
        Self {
            block,
            selections: SelectionRegistry::new(),
            hover: None,
            mode: ActionMode::default(),
            unpaired_sub_path: None,
            paired_sub_paths: BTreeSet::new(),
            unreconciled,
        }
    }

    pub fn block(&self) -> &MorphBlock {
        &self.block
    }

    pub fn path(&self, source: CanvasSource) -> &Path {
        self.block.path(source)
    }

    pub fn selections(&self) -> &SelectionRegistry {
        &self.selections
    }

    /// Selections are toggled directly by pointer handling
    pub fn selections_mut(&mut self) -> &mut SelectionRegistry {
        &mut self.selections
    }

    pub fn hover(&self) -> Option<Selection> {
        self.hover
    }

    pub fn set_hover(&mut self, hover: Option<Selection>) {
        self.hover = hover;
    }

    pub fn mode(&self) -> ActionMode {
        self.mode
    }

    pub fn unpaired_sub_path(&self) -> Option<UnpairedSubPath> {
        self.unpaired_sub_path
    }

    pub fn paired_sub_paths(&self) -> &BTreeSet<usize> {
        &self.paired_sub_paths
    }

    pub fn unreconciled(&self) -> &[usize] {
        &self.unreconciled
    }

    /// Whether every subpath pair can be interpolated
    pub fn is_compatible(&self) -> bool {
        self.unreconciled.is_empty()
    }

    /// Apply one intent.
    ///
    /// Index errors reject the whole intent and leave the session as it
    /// was. Incompatible operations are no-ops. A missing selection is
    /// reported and changes nothing.
    pub fn apply(&mut self, intent: Intent) -> EditResult<()> {
        let snapshot = self.clone();
        tracing::debug!(?intent, "apply");
        match self.dispatch(intent) {
            Ok(()) => Ok(()),
            Err(EditError::Incompatible(reason)) => {
                tracing::debug!(%reason, "edit had no effect");
                *self = snapshot;
                Ok(())
            }
            Err(err) => {
                if err.is_invalid_index() {
                    tracing::warn!(%err, "edit rejected");
                } else {
                    tracing::debug!(%err, "edit rejected");
                }
                *self = snapshot;
                Err(err)
            }
        }
    }

    fn dispatch(&mut self, intent: Intent) -> EditResult<()> {
        match intent {
            Intent::ReverseSelectedSubPaths => self.reverse_selected_sub_paths(),
            Intent::ShiftBackSelectedSubPaths => self.shift_back_selected_sub_paths(),
            Intent::ShiftForwardSelectedSubPaths => self.shift_forward_selected_sub_paths(),
            Intent::DeleteSelections => self.delete_selections(),
            Intent::ShiftPointToFront => self.shift_point_to_front(),
            Intent::SplitPointInHalf => self.split_point_in_half(),
            Intent::SplitCommandInHalf {
                source,
                sub_idx,
                cmd_idx,
            } => self.split_command_in_half(source, sub_idx, cmd_idx),
            Intent::AutoFix => self.auto_fix(),
            Intent::UpdateActivePath { source, path } => {
                self.commit(source, path);
                Ok(())
            }
            Intent::PairSubPath { source, sub_idx } => self.pair_sub_path(source, sub_idx),
            Intent::SetUnpairedSubPath(unpaired) => {
                self.unpaired_sub_path = unpaired;
                Ok(())
            }
            Intent::SetActionMode(mode) => {
                self.set_mode(mode);
                Ok(())
            }
        }
    }

    /// Auto fix every subpath index both canvases have, then reconcile
    fn auto_fix(&mut self) -> EditResult<()> {
        let pair = morph::auto_fix_all(&self.block.from, &self.block.to);
        self.commit_pair(pair.from, pair.to);
        self.clear_selections_and_hover();
        Ok(())
    }

    // ===== PRIVATE HELPERS =====

    /// Replace one side and reconcile the pair
    fn commit(&mut self, source: CanvasSource, path: Path) {
        self.unreconciled = self.block.update_path(source, path).unreconciled;
    }

    /// Replace both sides and reconcile once
    fn commit_pair(&mut self, from: Path, to: Path) {
        self.block.from = from;
        self.block.to = to;
        self.unreconciled = self.block.reconcile().unreconciled;
    }

    fn clear_selections_and_hover(&mut self) {
        self.selections.reset();
        self.hover = None;
    }
}

/// The canvas a batch of selections acts on.
///
/// Batches are expected to come from one canvas. When they don't, the
/// first selection decides and the rest are applied to that canvas too.
fn batch_source(selections: &[Selection]) -> Option<CanvasSource> {
    let source = selections.first()?.source;
    if selections.iter().any(|s| s.source != source) {
        tracing::warn!(?source, "selection batch spans both canvases; using the first selection's");
    }
    Some(source)
}

/// Turn an incompatible-operation error into a logged no-op
fn skip_incompatible<T>(result: EditResult<T>) -> EditResult<()> {
    match result {
        Ok(_) => Ok(()),
        Err(EditError::Incompatible(reason)) => {
            tracing::debug!(%reason, "skipping");
            Ok(())
        }
        Err(err) => Err(err),
    }
}
