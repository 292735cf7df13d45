// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Edit intents accepted by a morph session

use crate::model::CanvasSource;
use crate::path::Path;

/// Interaction mode of the morph editor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActionMode {
    /// Click to select subpaths, segments and points
    #[default]
    Selection,

    /// Click a segment to split it
    SplitCommands,

    /// Click one subpath on each canvas to pair them
    PairSubPaths,
}

/// A subpath picked on one canvas that is waiting for its partner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnpairedSubPath {
    pub source: CanvasSource,
    pub sub_idx: usize,
}

/// A user-level edit
///
/// Each variant carries exactly what it needs; anything else is read from
/// the session's selections.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Reverse every selected subpath
    ReverseSelectedSubPaths,

    /// Start every selected closed subpath one point earlier
    ShiftBackSelectedSubPaths,

    /// Start every selected closed subpath one point later
    ShiftForwardSelectedSubPaths,

    /// Delete selected subpaths, then segments, then split points
    DeleteSelections,

    /// Make the first selected point the start of its subpath
    ShiftPointToFront,

    /// Split the segment ending at the first selected point
    SplitPointInHalf,

    /// Split one segment in half; used by split mode clicks
    SplitCommandInHalf {
        source: CanvasSource,
        sub_idx: usize,
        cmd_idx: usize,
    },

    /// Auto fix every subpath index present on both canvases
    AutoFix,

    /// Replace one side of the block
    UpdateActivePath { source: CanvasSource, path: Path },

    /// Click a subpath in pairing mode
    PairSubPath { source: CanvasSource, sub_idx: usize },

    /// Set or clear the outstanding pairing pick
    SetUnpairedSubPath(Option<UnpairedSubPath>),

    /// Switch interaction mode
    SetActionMode(ActionMode),
}
