// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Selection registry for the two morph canvases.
//!
//! `SelectionRegistry` wraps an `Arc<Vec<Selection>>` so snapshots are cheap
//! to clone and hand out to observers. Mutations build a new list and swap
//! it in. Order is insertion order; operations that act on "the first
//! selection" rely on it.

use crate::model::CanvasSource;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What a selection addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    /// A whole subpath
    SubPath,
    /// The segment drawn by one command
    Segment,
    /// The end point of one command
    Point,
}

/// One selected subpath, segment or point on one canvas
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Selection {
    pub kind: SelectionKind,
    pub source: CanvasSource,
    pub sub_idx: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmd_idx: Option<usize>,
}

impl Selection {
    pub fn sub_path(source: CanvasSource, sub_idx: usize) -> Self {
        Self {
            kind: SelectionKind::SubPath,
            source,
            sub_idx,
            cmd_idx: None,
        }
    }

    pub fn segment(source: CanvasSource, sub_idx: usize, cmd_idx: usize) -> Self {
        Self {
            kind: SelectionKind::Segment,
            source,
            sub_idx,
            cmd_idx: Some(cmd_idx),
        }
    }

    pub fn point(source: CanvasSource, sub_idx: usize, cmd_idx: usize) -> Self {
        Self {
            kind: SelectionKind::Point,
            source,
            sub_idx,
            cmd_idx: Some(cmd_idx),
        }
    }
}

// The command index only takes part when both sides carry one
impl PartialEq for Selection {
    fn eq(&self, other: &Self) -> bool {
        let cmd_matches = match (self.cmd_idx, other.cmd_idx) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        };
        self.kind == other.kind
            && self.source == other.source
            && self.sub_idx == other.sub_idx
            && cmd_matches
    }
}

/// The current list of selections across both canvases
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionRegistry {
    inner: Arc<Vec<Selection>>,
}

impl SelectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Selection> {
        self.inner.iter()
    }

    /// Snapshot of the current selections
    pub fn selections(&self) -> &[Selection] {
        &self.inner
    }

    /// Selections of one kind, in selection order
    pub fn of_kind(&self, kind: SelectionKind) -> Vec<Selection> {
        self.inner.iter().filter(|s| s.kind == kind).copied().collect()
    }

    pub fn sub_path_selections(&self) -> Vec<Selection> {
        self.of_kind(SelectionKind::SubPath)
    }

    pub fn segment_selections(&self) -> Vec<Selection> {
        self.of_kind(SelectionKind::Segment)
    }

    pub fn point_selections(&self) -> Vec<Selection> {
        self.of_kind(SelectionKind::Point)
    }

    /// Indices of selected subpaths, optionally restricted to one canvas
    pub fn selected_sub_path_indices(&self, source: Option<CanvasSource>) -> Vec<usize> {
        self.inner
            .iter()
            .filter(|s| s.kind == SelectionKind::SubPath && source.is_none_or(|src| s.source == src))
            .map(|s| s.sub_idx)
            .collect()
    }

    pub fn is_sub_path_selected(&self, sub_idx: usize, source: Option<CanvasSource>) -> bool {
        self.matches_any(source, |src| Selection::sub_path(src, sub_idx))
    }

    pub fn is_segment_selected(&self, sub_idx: usize, cmd_idx: usize, source: Option<CanvasSource>) -> bool {
        self.matches_any(source, |src| Selection::segment(src, sub_idx, cmd_idx))
    }

    pub fn is_point_selected(&self, sub_idx: usize, cmd_idx: usize, source: Option<CanvasSource>) -> bool {
        self.matches_any(source, |src| Selection::point(src, sub_idx, cmd_idx))
    }

    /// Toggle a whole subpath. Selections of other kinds on the other
    /// canvas are dropped first.
    pub fn toggle_sub_path(&mut self, source: CanvasSource, sub_idx: usize) {
        let current = self.retained(|s| s.kind == SelectionKind::SubPath || s.source == source);
        self.toggle_within(current, &[Selection::sub_path(source, sub_idx)], false);
    }

    /// Toggle a batch of segments on one canvas. Selections of any other
    /// kind are dropped first.
    pub fn toggle_segments(&mut self, source: CanvasSource, segments: &[(usize, usize)], append: bool) {
        let current = self.retained(|s| s.kind == SelectionKind::Segment);
        let batch: Vec<Selection> = segments
            .iter()
            .map(|&(sub_idx, cmd_idx)| Selection::segment(source, sub_idx, cmd_idx))
            .collect();
        self.toggle_within(current, &batch, append);
    }

    /// Toggle one point. Selections of other kinds on the other canvas are
    /// dropped first.
    pub fn toggle_point(&mut self, source: CanvasSource, sub_idx: usize, cmd_idx: usize, append: bool) {
        let current = self.retained(|s| s.kind == SelectionKind::Point || s.source == source);
        self.toggle_within(current, &[Selection::point(source, sub_idx, cmd_idx)], append);
    }

    /// Toggle a batch of selections.
    ///
    /// Current selections equal to any of `batch` are removed; if none
    /// were, the whole batch is added. Unless `append` is set, everything
    /// not in the batch is cleared as well.
    pub fn toggle(&mut self, batch: &[Selection], append: bool) {
        let current = self.inner.to_vec();
        self.toggle_within(current, batch, append);
    }

    /// Replace the whole list
    pub fn set(&mut self, selections: Vec<Selection>) {
        self.inner = Arc::new(selections);
    }

    /// Clear all selections
    pub fn reset(&mut self) {
        if !self.inner.is_empty() {
            self.inner = Arc::new(Vec::new());
        }
    }

    // ===== PRIVATE HELPERS =====

    fn retained(&self, keep: impl Fn(&Selection) -> bool) -> Vec<Selection> {
        self.inner.iter().filter(|s| keep(*s)).copied().collect()
    }

    fn toggle_within(&mut self, mut current: Vec<Selection>, batch: &[Selection], append: bool) {
        let before = current.len();
        current.retain(|cur| !batch.contains(cur));
        if current.len() == before {
            current.extend_from_slice(batch);
        }
        if !append {
            current.retain(|cur| batch.contains(cur));
        }
        self.inner = Arc::new(current);
    }

    fn matches_any(&self, source: Option<CanvasSource>, candidate: impl Fn(CanvasSource) -> Selection) -> bool {
        let sources: &[CanvasSource] = match source {
            Some(CanvasSource::From) => &[CanvasSource::From],
            Some(CanvasSource::To) => &[CanvasSource::To],
            None => &[CanvasSource::From, CanvasSource::To],
        };
        sources
            .iter()
            .any(|&src| self.inner.iter().any(|s| *s == candidate(src)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CanvasSource::{From, To};

    #[test]
    fn new_registry_is_empty() {
        let reg = SelectionRegistry::new();
        assert!(reg.is_empty());
        assert_eq!(reg.len(), 0);
    }

    #[test]
    fn toggle_twice_restores_prior_content() {
        let mut reg = SelectionRegistry::new();
        reg.toggle(&[Selection::sub_path(From, 0)], true);
        let before = reg.clone();

        let extra = [Selection::sub_path(From, 2)];
        reg.toggle(&extra, true);
        assert_eq!(reg.len(), 2);
        reg.toggle(&extra, true);
        assert_eq!(reg, before);
    }

    #[test]
    fn toggle_without_append_replaces() {
        let mut reg = SelectionRegistry::new();
        reg.toggle(&[Selection::point(From, 0, 1)], true);
        reg.toggle(&[Selection::point(From, 0, 2)], true);
        reg.toggle(&[Selection::point(From, 1, 3)], false);
        assert_eq!(reg.selections(), &[Selection::point(From, 1, 3)]);
    }

    #[test]
    fn toggle_selected_item_without_append_empties() {
        let mut reg = SelectionRegistry::new();
        reg.toggle_point(From, 0, 1, false);
        assert!(reg.is_point_selected(0, 1, Some(From)));
        reg.toggle_point(From, 0, 1, false);
        assert!(reg.is_empty());
    }

    #[test]
    fn batch_is_removed_only_when_a_member_is_present() {
        let mut reg = SelectionRegistry::new();
        reg.toggle_segments(To, &[(0, 1), (0, 2)], false);
        assert_eq!(reg.len(), 2);

        // One member already selected: matching ones go, nothing is added
        reg.toggle_segments(To, &[(0, 2), (0, 3)], true);
        assert_eq!(reg.selections(), &[Selection::segment(To, 0, 1)]);
    }

    #[test]
    fn equality_ignores_missing_command_index() {
        let whole = Selection {
            kind: SelectionKind::Point,
            source: From,
            sub_idx: 0,
            cmd_idx: None,
        };
        assert_eq!(whole, Selection::point(From, 0, 4));
        assert_ne!(Selection::point(From, 0, 3), Selection::point(From, 0, 4));
        assert_ne!(Selection::point(To, 0, 4), Selection::point(From, 0, 4));
    }

    #[test]
    fn source_scoped_queries() {
        let mut reg = SelectionRegistry::new();
        reg.toggle_sub_path(To, 1);
        assert!(reg.is_sub_path_selected(1, None));
        assert!(reg.is_sub_path_selected(1, Some(To)));
        assert!(!reg.is_sub_path_selected(1, Some(From)));
        assert_eq!(reg.selected_sub_path_indices(Some(To)), vec![1]);
        assert!(reg.selected_sub_path_indices(Some(From)).is_empty());
    }

    #[test]
    fn toggling_sub_path_drops_other_kinds_on_other_canvas() {
        let mut reg = SelectionRegistry::new();
        reg.toggle_point(From, 0, 1, false);
        reg.toggle_sub_path(To, 0);
        assert_eq!(reg.selections(), &[Selection::sub_path(To, 0)]);
    }

    #[test]
    fn toggling_segments_drops_points() {
        let mut reg = SelectionRegistry::new();
        reg.toggle_point(From, 0, 1, false);
        reg.toggle_segments(From, &[(0, 1)], true);
        assert_eq!(reg.point_selections(), vec![]);
        assert_eq!(reg.segment_selections(), vec![Selection::segment(From, 0, 1)]);
    }

    #[test]
    fn clone_is_independent() {
        let mut reg = SelectionRegistry::new();
        reg.toggle_sub_path(From, 0);
        let snapshot = reg.clone();
        reg.reset();
        assert!(reg.is_empty());
        assert_eq!(snapshot.len(), 1);
    }
}
