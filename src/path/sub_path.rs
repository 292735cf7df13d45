// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! One contour of a path: a move followed by drawn commands, optionally
//! terminated by a close.
//!
//! Closed subpaths are normalized on construction so the close is a
//! zero-length marker whose end point equals the move point. The commands
//! strictly between the move and the close then form a ring, which is what
//! shifting, reversing and segment deletion operate on.

use super::command::{Command, CommandKind, Instruction};
use crate::error::PathError;
use crate::settings;
use kurbo::{BezPath, Point, Rect, Shape};
use serde::{Deserialize, Serialize};

/// A single contour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SubPathRecord", into = "SubPathRecord")]
pub struct SubPath {
    commands: Vec<Command>,
    collapsing: bool,
}

/// Serialized form; goes through `SubPath::new` on the way in
#[derive(Serialize, Deserialize)]
struct SubPathRecord {
    commands: Vec<Command>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    collapsing: bool,
}

impl TryFrom<SubPathRecord> for SubPath {
    type Error = PathError;

    fn try_from(record: SubPathRecord) -> Result<Self, Self::Error> {
        let mut sub_path = SubPath::new(record.commands)?;
        sub_path.collapsing = record.collapsing;
        Ok(sub_path)
    }
}

impl From<SubPath> for SubPathRecord {
    fn from(sub_path: SubPath) -> Self {
        SubPathRecord {
            commands: sub_path.commands,
            collapsing: sub_path.collapsing,
        }
    }
}

impl SubPath {
    /// Validate and normalize a command list.
    ///
    /// The first command must be a move and no other command may be one; a
    /// close may only appear last. A close that still has length gets an
    /// explicit line inserted before it.
    pub fn new(commands: Vec<Command>) -> Result<Self, PathError> {
        let Some(first) = commands.first() else {
            return Err(PathError::malformed("subpath has no commands"));
        };
        if first.kind() != CommandKind::Move {
            return Err(PathError::malformed("subpath must start with a move"));
        }
        if commands[1..].iter().any(|c| c.kind() == CommandKind::Move) {
            return Err(PathError::malformed("move inside a subpath"));
        }
        let last = commands.len() - 1;
        if commands
            .iter()
            .enumerate()
            .any(|(i, c)| c.authored_kind() == CommandKind::Close && i != last)
        {
            return Err(PathError::malformed("close before the end of a subpath"));
        }

        let mut sub_path = SubPath {
            commands,
            collapsing: false,
        };
        sub_path.normalize_close();
        Ok(sub_path)
    }

    /// Build from commands already known to be valid (mutator internals)
    pub(crate) fn from_parts(commands: Vec<Command>, collapsing: bool) -> Self {
        debug_assert!(commands.first().map(Command::kind) == Some(CommandKind::Move));
        let mut sub_path = SubPath {
            commands,
            collapsing,
        };
        sub_path.sync_close();
        sub_path
    }

    /// A synthetic subpath of `count` coincident commands at `point`
    pub fn collapsing(point: Point, count: usize) -> Self {
        let mut commands = vec![Command::move_to(point)];
        commands.extend((1..count.max(1)).map(|_| Command::line_to(point)));
        SubPath {
            commands,
            collapsing: true,
        }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn command(&self, cmd_idx: usize) -> Option<&Command> {
        self.commands.get(cmd_idx)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn is_collapsing(&self) -> bool {
        self.collapsing
    }

    /// Closed if the last command was authored as a close
    pub fn is_closed(&self) -> bool {
        self.commands
            .last()
            .is_some_and(|c| c.authored_kind() == CommandKind::Close)
    }

    pub fn start(&self) -> Point {
        self.commands[0].end()
    }

    /// Start point of the command at `cmd_idx` (the previous end point)
    pub fn start_of(&self, cmd_idx: usize) -> Point {
        let prev = cmd_idx.saturating_sub(1);
        self.commands[prev].end()
    }

    /// Iterate `(start, command)` pairs for every command after the move
    pub fn segments(&self) -> impl Iterator<Item = (Point, &Command)> {
        self.commands
            .windows(2)
            .map(|pair| (pair[0].end(), &pair[1]))
    }

    /// Append this contour to a kurbo path
    pub fn append_to(&self, bez: &mut BezPath) {
        for cmd in &self.commands {
            match *cmd.instruction() {
                Instruction::MoveTo(p) => bez.move_to(p),
                Instruction::LineTo(p) => bez.line_to(p),
                Instruction::CurveTo(c1, c2, p) => bez.curve_to(c1, c2, p),
                Instruction::ClosePath(_) => bez.close_path(),
            }
        }
        if self.is_closed() && self.commands.last().map(Command::kind) != Some(CommandKind::Close) {
            bez.close_path();
        }
    }

    pub fn to_bezpath(&self) -> BezPath {
        let mut bez = BezPath::new();
        self.append_to(&mut bez);
        bez
    }

    /// Tight bounds of the drawn contour
    pub fn bounding_box(&self) -> Rect {
        if self.commands.len() == 1 {
            return Rect::from_points(self.start(), self.start());
        }
        self.to_bezpath().bounding_box()
    }

    /// Insert an explicit line when the close segment has length, then
    /// pin the close to the move point
    fn normalize_close(&mut self) {
        let len = self.commands.len();
        if len >= 2 && self.commands[len - 1].kind() == CommandKind::Close {
            let start = self.start();
            let before = self.commands[len - 2].end();
            if before.distance(start) > settings::geometry::EPSILON {
                self.commands.insert(len - 1, Command::line_to(start));
            }
        }
        self.sync_close();
    }

    /// Keep the close marker's end equal to the move point
    fn sync_close(&mut self) {
        if self.is_closed() && self.commands.len() > 1 {
            let start = self.start();
            if let Some(last) = self.commands.last_mut() {
                *last = last.with_end(start);
            }
        }
    }
}
