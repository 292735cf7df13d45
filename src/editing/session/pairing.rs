// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Subpath pairing for MorphSession.
//!
//! Pairing is a two-click interaction: a subpath picked on one canvas is
//! held as the unpaired marker until a subpath is picked on the other
//! canvas. Committing a pair moves both subpaths to index 0 so they
//! interpolate into each other.

use super::MorphSession;
use crate::editing::intent::{ActionMode, UnpairedSubPath};
use crate::editing::selection::Selection;
use crate::error::{EditError, EditResult};
use crate::model::CanvasSource;

impl MorphSession {
    /// Handle a subpath click in pairing mode. Outside that mode the click
    /// has no effect.
    pub(super) fn pair_sub_path(&mut self, source: CanvasSource, sub_idx: usize) -> EditResult<()> {
        if self.mode != ActionMode::PairSubPaths {
            return Err(EditError::incompatible(format!(
                "subpath pick while in {:?} mode",
                self.mode
            )));
        }
        let len = self.block.path(source).sub_paths().len();
        if sub_idx >= len {
            return Err(EditError::InvalidSubPath { sub_idx, len });
        }
        let pick = UnpairedSubPath { source, sub_idx };

        match self.unpaired_sub_path {
            Some(pending) if pending.source != source => self.commit_pairing(pending, pick),
            _ => {
                // First pick, or a second pick on the same canvas
                self.unpaired_sub_path = Some(pick);
                Ok(())
            }
        }
    }

    pub(super) fn set_mode(&mut self, mode: ActionMode) {
        if self.mode == ActionMode::PairSubPaths && mode != ActionMode::PairSubPaths {
            self.unpaired_sub_path = None;
        }
        if self.mode != mode {
            tracing::debug!(?mode, "action mode");
        }
        self.mode = mode;
        self.hover = None;
    }

    // ===== PRIVATE HELPERS =====

    fn commit_pairing(&mut self, first: UnpairedSubPath, second: UnpairedSubPath) -> EditResult<()> {
        let (from_pick, to_pick) = match first.source {
            CanvasSource::From => (first, second),
            CanvasSource::To => (second, first),
        };

        let mut from = self.block.from.mutate();
        from.move_sub_path(from_pick.sub_idx, 0)?;
        let mut to = self.block.to.mutate();
        to.move_sub_path(to_pick.sub_idx, 0)?;

        self.unpaired_sub_path = None;
        let remapped = self
            .selections
            .iter()
            .map(|s| {
                let moved = match s.source {
                    CanvasSource::From => from_pick.sub_idx,
                    CanvasSource::To => to_pick.sub_idx,
                };
                Selection {
                    sub_idx: index_after_move_to_front(s.sub_idx, moved),
                    ..*s
                }
            })
            .collect();
        self.selections.set(remapped);

        // Paired subpaths collect at the front, so the set stays 0..n
        self.paired_sub_paths.remove(&from_pick.sub_idx);
        self.paired_sub_paths.remove(&to_pick.sub_idx);
        let next = self.paired_sub_paths.len();
        self.paired_sub_paths.insert(next);

        self.hover = None;
        tracing::debug!(from = from_pick.sub_idx, to = to_pick.sub_idx, "paired subpaths");
        self.commit_pair(from.build(), to.build());
        Ok(())
    }
}

/// Where index `idx` ends up after the subpath at `moved` is moved to 0
fn index_after_move_to_front(idx: usize, moved: usize) -> usize {
    if idx == moved {
        0
    } else if idx < moved {
        idx + 1
    } else {
        idx
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::create_test_session;
    use super::*;
    use crate::editing::intent::Intent;
    use kurbo::Point;

    const TWO_SQUARES: &str = "M0 0 L10 0 L10 10 L0 10 Z M20 0 L30 0 L30 10 L20 10 Z";

    fn pairing_session(from: &str, to: &str) -> MorphSession {
        let mut session = create_test_session(from, to);
        session.apply(Intent::SetActionMode(ActionMode::PairSubPaths)).unwrap();
        session
    }

    #[test]
    fn test_first_pick_sets_marker() {
        let mut session = pairing_session(TWO_SQUARES, TWO_SQUARES);
        session
            .apply(Intent::PairSubPath {
                source: CanvasSource::From,
                sub_idx: 1,
            })
            .unwrap();
        assert_eq!(
            session.unpaired_sub_path(),
            Some(UnpairedSubPath {
                source: CanvasSource::From,
                sub_idx: 1
            })
        );
        assert!(session.paired_sub_paths().is_empty());
    }

    #[test]
    fn test_second_pick_on_same_canvas_replaces_marker() {
        let mut session = pairing_session(TWO_SQUARES, TWO_SQUARES);
        for sub_idx in [1, 0] {
            session
                .apply(Intent::PairSubPath {
                    source: CanvasSource::To,
                    sub_idx,
                })
                .unwrap();
        }
        assert_eq!(session.unpaired_sub_path().map(|u| u.sub_idx), Some(0));
        assert_eq!(session.path(CanvasSource::To).sub_paths()[0].start(), Point::ORIGIN);
    }

    #[test]
    fn test_pick_on_other_canvas_commits_pair() {
        let mut session = pairing_session(TWO_SQUARES, TWO_SQUARES);
        session.selections_mut().toggle_sub_path(CanvasSource::To, 0);
        session
            .apply(Intent::PairSubPath {
                source: CanvasSource::To,
                sub_idx: 1,
            })
            .unwrap();
        session
            .apply(Intent::PairSubPath {
                source: CanvasSource::From,
                sub_idx: 1,
            })
            .unwrap();

        assert_eq!(session.unpaired_sub_path(), None);
        assert_eq!(session.paired_sub_paths().iter().copied().collect::<Vec<_>>(), vec![0]);
        for source in [CanvasSource::From, CanvasSource::To] {
            assert_eq!(session.path(source).sub_paths()[0].start(), Point::new(20.0, 0.0));
        }
        // The selected subpath moved from 0 to 1
        assert!(session.selections().is_sub_path_selected(1, Some(CanvasSource::To)));
        assert!(session.is_compatible());
    }

    #[test]
    fn test_paired_set_grows_as_a_prefix() {
        let three = "M0 0 L1 0 L1 1 Z M5 0 L6 0 L6 1 Z M9 0 L10 0 L10 1 Z";
        let mut session = pairing_session(three, three);
        for (from, to) in [(2, 2), (2, 2)] {
            session
                .apply(Intent::PairSubPath {
                    source: CanvasSource::From,
                    sub_idx: from,
                })
                .unwrap();
            session
                .apply(Intent::PairSubPath {
                    source: CanvasSource::To,
                    sub_idx: to,
                })
                .unwrap();
        }
        assert_eq!(session.paired_sub_paths().iter().copied().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_invalid_pick_is_rejected() {
        let mut session = pairing_session(TWO_SQUARES, TWO_SQUARES);
        let err = session
            .apply(Intent::PairSubPath {
                source: CanvasSource::From,
                sub_idx: 5,
            })
            .unwrap_err();
        assert_eq!(err, EditError::InvalidSubPath { sub_idx: 5, len: 2 });
        assert_eq!(session.unpaired_sub_path(), None);
    }

    #[test]
    fn test_leaving_pair_mode_drops_marker() {
        let mut session = pairing_session(TWO_SQUARES, TWO_SQUARES);
        session
            .apply(Intent::PairSubPath {
                source: CanvasSource::From,
                sub_idx: 0,
            })
            .unwrap();
        session.apply(Intent::SetActionMode(ActionMode::Selection)).unwrap();
        assert_eq!(session.mode(), ActionMode::Selection);
        assert_eq!(session.unpaired_sub_path(), None);
    }

    #[test]
    fn test_pick_outside_pair_mode_is_ignored() {
        let mut session = create_test_session(TWO_SQUARES, TWO_SQUARES);
        session
            .apply(Intent::PairSubPath {
                source: CanvasSource::From,
                sub_idx: 1,
            })
            .unwrap();
        assert_eq!(session.mode(), ActionMode::Selection);
        assert_eq!(session.unpaired_sub_path(), None);

        session.apply(Intent::SetActionMode(ActionMode::SplitCommands)).unwrap();
        session
            .apply(Intent::PairSubPath {
                source: CanvasSource::To,
                sub_idx: 0,
            })
            .unwrap();
        assert_eq!(session.unpaired_sub_path(), None);
    }

    #[test]
    fn index_remap() {
        assert_eq!(index_after_move_to_front(3, 3), 0);
        assert_eq!(index_after_move_to_front(1, 3), 2);
        assert_eq!(index_after_move_to_front(4, 3), 4);
    }
}
