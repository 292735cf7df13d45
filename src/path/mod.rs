// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Path abstraction for morphable shapes.
//!
//! A `Path` is an immutable list of `SubPath`s, each an ordered list of
//! `Command`s. Edits never happen in place: `Path::mutate` hands out a
//! `PathMutator` working on its own copy, and `PathMutator::build` returns a
//! fresh `Path`. Old paths stay valid snapshots for as long as anything
//! holds on to them.

pub mod command;
pub mod mutator;
pub mod pole;
pub mod sub_path;
pub mod svg;

pub use command::{Command, CommandKind, Instruction};
pub use mutator::PathMutator;
pub use sub_path::SubPath;

use kurbo::{BezPath, Point};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Fill rule of the layer that draws the path
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

/// An immutable path made of subpaths
///
/// Uses `Arc<Vec<SubPath>>` so snapshots clone cheaply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    sub_paths: Arc<Vec<SubPath>>,
    #[serde(default)]
    fill_rule: FillRule,
}

impl Path {
    pub fn new(sub_paths: Vec<SubPath>) -> Self {
        Self {
            sub_paths: Arc::new(sub_paths),
            fill_rule: FillRule::default(),
        }
    }

    pub fn with_fill_rule(mut self, fill_rule: FillRule) -> Self {
        self.fill_rule = fill_rule;
        self
    }

    pub fn fill_rule(&self) -> FillRule {
        self.fill_rule
    }

    pub fn sub_paths(&self) -> &[SubPath] {
        &self.sub_paths
    }

    pub fn sub_path(&self, sub_idx: usize) -> Option<&SubPath> {
        self.sub_paths.get(sub_idx)
    }

    pub fn command(&self, sub_idx: usize, cmd_idx: usize) -> Option<&Command> {
        self.sub_path(sub_idx)?.command(cmd_idx)
    }

    /// Start editing. The mutator owns a private copy of the subpaths.
    pub fn mutate(&self) -> PathMutator {
        PathMutator::new(self)
    }

    /// Interior point of the subpath furthest from its outline
    pub fn pole_of_inaccessibility(&self, sub_idx: usize) -> Option<Point> {
        self.sub_path(sub_idx).map(pole::pole_of_inaccessibility)
    }

    /// Convert this path to a kurbo BezPath for rendering
    pub fn to_bezpath(&self) -> BezPath {
        let mut bez = BezPath::new();
        for sub_path in self.sub_paths.iter() {
            sub_path.append_to(&mut bez);
        }
        bez
    }
}
