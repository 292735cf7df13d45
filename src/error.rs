// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Error types for path construction and editing.
//!
//! Every failure here is local and recoverable: a rejected edit leaves the
//! path it was applied to unchanged.

pub type EditResult<T> = Result<T, EditError>;

/// Why an edit was rejected
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("subpath index {sub_idx} out of range (path has {len} subpaths)")]
    InvalidSubPath { sub_idx: usize, len: usize },

    #[error("command index {cmd_idx} out of range for subpath {sub_idx} ({len} commands)")]
    InvalidCommand {
        sub_idx: usize,
        cmd_idx: usize,
        len: usize,
    },

    #[error("incompatible operation: {0}")]
    Incompatible(String),

    #[error("no {0} selected")]
    NoSelection(&'static str),
}

impl EditError {
    pub fn incompatible(msg: impl Into<String>) -> Self {
        Self::Incompatible(msg.into())
    }

    /// Index errors reject a whole edit; everything else is a no-op
    pub fn is_invalid_index(&self) -> bool {
        matches!(
            self,
            Self::InvalidSubPath { .. } | Self::InvalidCommand { .. }
        )
    }
}

/// Why path data could not be turned into a `Path`
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("path data parse error: {0}")]
    Parse(String),

    #[error("malformed subpath: {0}")]
    Malformed(String),
}

impl PathError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}
