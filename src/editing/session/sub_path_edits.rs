// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Selection-driven path edits for MorphSession: reordering, splitting
//! and deletion

use super::{MorphSession, batch_source, skip_incompatible};
use crate::editing::selection::Selection;
use crate::error::{EditError, EditResult};
use crate::model::CanvasSource;
use crate::path::PathMutator;

impl MorphSession {
    pub(super) fn reverse_selected_sub_paths(&mut self) -> EditResult<()> {
        self.edit_selected_sub_paths(PathMutator::reverse_sub_path)
    }

    pub(super) fn shift_back_selected_sub_paths(&mut self) -> EditResult<()> {
        self.edit_selected_sub_paths(PathMutator::shift_sub_path_back)
    }

    pub(super) fn shift_forward_selected_sub_paths(&mut self) -> EditResult<()> {
        self.edit_selected_sub_paths(PathMutator::shift_sub_path_forward)
    }

    /// Delete selected subpaths, then selected segments, then selected
    /// split points. Each stage clears the selections, so a batch that
    /// mixes kinds only deletes the first kind present.
    pub(super) fn delete_selections(&mut self) -> EditResult<()> {
        if self.selections.is_empty() {
            return Err(EditError::NoSelection("subpath, segment or point"));
        }
        self.delete_selected_sub_paths()?;
        self.delete_selected_segments()?;
        self.delete_selected_points()
    }

    /// Rotate the subpath of the first selected point so that point starts it
    pub(super) fn shift_point_to_front(&mut self) -> EditResult<()> {
        let (source, sub_idx, cmd_idx) = self.first_point()?;
        let mut mutator = self.block.path(source).mutate();
        mutator.shift_point_to_front(sub_idx, cmd_idx)?;
        self.commit(source, mutator.build());
        self.clear_selections_and_hover();
        Ok(())
    }

    /// Split the segment that ends at the first selected point
    pub(super) fn split_point_in_half(&mut self) -> EditResult<()> {
        let (source, sub_idx, cmd_idx) = self.first_point()?;
        self.split_command_in_half(source, sub_idx, cmd_idx)
    }

    pub(super) fn split_command_in_half(
        &mut self,
        source: CanvasSource,
        sub_idx: usize,
        cmd_idx: usize,
    ) -> EditResult<()> {
        let mut mutator = self.block.path(source).mutate();
        mutator.split_command_in_half(sub_idx, cmd_idx)?;
        self.commit(source, mutator.build());
        self.clear_selections_and_hover();
        Ok(())
    }

    // ===== PRIVATE HELPERS =====

    /// Apply `op` to every selected subpath on one canvas. Subpath order is
    /// unchanged, so the selections stay valid.
    fn edit_selected_sub_paths(
        &mut self,
        op: impl Fn(&mut PathMutator, usize) -> EditResult<&mut PathMutator>,
    ) -> EditResult<()> {
        let selections = self.selections.sub_path_selections();
        let source = batch_source(&selections).ok_or(EditError::NoSelection("subpath"))?;

        let mut mutator = self.block.path(source).mutate();
        for sub_idx in unique_sub_indices(&selections) {
            skip_incompatible(op(&mut mutator, sub_idx))?;
        }
        self.commit(source, mutator.build());
        self.hover = None;
        Ok(())
    }

    fn delete_selected_sub_paths(&mut self) -> EditResult<()> {
        let selections = self.selections.sub_path_selections();
        let Some(source) = batch_source(&selections) else {
            return Ok(());
        };

        let style = self.block.style;
        let mut mutator = self.block.path(source).mutate();
        // Descending so earlier removals never shift later ones
        for sub_idx in unique_sub_indices(&selections).into_iter().rev() {
            if style.stroked {
                mutator.delete_stroked_sub_path(sub_idx)?;
            } else if style.filled {
                skip_incompatible(mutator.delete_filled_sub_path(sub_idx))?;
            } else {
                tracing::debug!(sub_idx, "layer is neither filled nor stroked; nothing to delete");
            }
        }
        self.commit(source, mutator.build());
        self.clear_selections_and_hover();
        Ok(())
    }

    fn delete_selected_segments(&mut self) -> EditResult<()> {
        let selections = self.selections.segment_selections();
        let Some(source) = batch_source(&selections) else {
            return Ok(());
        };

        let mut mutator = self.block.path(source).mutate();
        for (sub_idx, cmd_idx) in unique_command_indices(&selections).into_iter().rev() {
            skip_incompatible(mutator.delete_filled_sub_path_segment(sub_idx, cmd_idx))?;
        }
        self.commit(source, mutator.build());
        self.clear_selections_and_hover();
        Ok(())
    }

    /// Only split points can be deleted; other selected points are left
    /// alone but the selection still clears
    fn delete_selected_points(&mut self) -> EditResult<()> {
        let selections = self.selections.point_selections();
        let Some(source) = batch_source(&selections) else {
            return Ok(());
        };

        let path = self.block.path(source);
        let mut ops = Vec::new();
        for (sub_idx, cmd_idx) in unique_command_indices(&selections) {
            let cmd = path.command(sub_idx, cmd_idx).ok_or(EditError::InvalidCommand {
                sub_idx,
                cmd_idx,
                len: path.sub_path(sub_idx).map_or(0, |sp| sp.len()),
            })?;
            if cmd.is_split_point() {
                ops.push((sub_idx, cmd_idx));
            }
        }

        let mut mutator = path.mutate();
        mutator.unsplit_commands(&ops)?;
        self.commit(source, mutator.build());
        self.clear_selections_and_hover();
        Ok(())
    }

    fn first_point(&self) -> EditResult<(CanvasSource, usize, usize)> {
        self.selections
            .point_selections()
            .into_iter()
            .find_map(|s| s.cmd_idx.map(|cmd_idx| (s.source, s.sub_idx, cmd_idx)))
            .ok_or(EditError::NoSelection("point"))
    }
}

/// Subpath indices in ascending order without repeats
fn unique_sub_indices(selections: &[Selection]) -> Vec<usize> {
    let mut indices: Vec<usize> = selections.iter().map(|s| s.sub_idx).collect();
    indices.sort_unstable();
    indices.dedup();
    indices
}

/// (subpath, command) pairs in ascending order without repeats
fn unique_command_indices(selections: &[Selection]) -> Vec<(usize, usize)> {
    let mut indices: Vec<(usize, usize)> = selections
        .iter()
        .filter_map(|s| s.cmd_idx.map(|cmd_idx| (s.sub_idx, cmd_idx)))
        .collect();
    indices.sort_unstable();
    indices.dedup();
    indices
}
