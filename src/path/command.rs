// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! A single path instruction and the flags the morph editor attaches to it.
//!
//! The start point of a command is implicit: it is the end point of the
//! command before it in the subpath. Everything in here that needs a start
//! point (segments, reversal, splitting) takes it as an argument.

use kurbo::{CubicBez, Line, ParamCurve, PathSeg, Point};
use serde::{Deserialize, Serialize};

/// The kind of a command, without its points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    Move,
    Line,
    Curve,
    Close,
}

impl CommandKind {
    /// Richness of the kind; conversions only go from lower to higher.
    /// Move never converts.
    fn rank(self) -> Option<u8> {
        match self {
            CommandKind::Move => None,
            CommandKind::Close => Some(0),
            CommandKind::Line => Some(1),
            CommandKind::Curve => Some(2),
        }
    }

    /// Whether a command of this kind can be rewritten as `target` without
    /// changing its geometry
    pub fn can_convert_to(self, target: CommandKind) -> bool {
        match (self.rank(), target.rank()) {
            (Some(from), Some(to)) => from < to,
            _ => false,
        }
    }

    /// The richer of two kinds
    pub(crate) fn richest(self, other: CommandKind) -> CommandKind {
        if self.can_convert_to(other) { other } else { self }
    }
}

/// The geometry of a command. Each variant owns exactly the points its kind
/// needs: control points first, end point last.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Instruction {
    MoveTo(Point),
    LineTo(Point),
    CurveTo(Point, Point, Point),
    ClosePath(Point),
}

impl Instruction {
    pub fn kind(&self) -> CommandKind {
        match self {
            Instruction::MoveTo(_) => CommandKind::Move,
            Instruction::LineTo(_) => CommandKind::Line,
            Instruction::CurveTo(..) => CommandKind::Curve,
            Instruction::ClosePath(_) => CommandKind::Close,
        }
    }

    pub fn end(&self) -> Point {
        match *self {
            Instruction::MoveTo(p)
            | Instruction::LineTo(p)
            | Instruction::ClosePath(p)
            | Instruction::CurveTo(_, _, p) => p,
        }
    }
}

/// One path instruction plus editor bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Command {
    instruction: Instruction,

    /// Set on commands created by splitting a segment; only these can be
    /// removed again with unsplit
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    split_point: bool,

    /// Authored kind of a command promoted by the compatibility engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    converted_from: Option<CommandKind>,
}

impl Command {
    pub fn new(instruction: Instruction) -> Self {
        Self {
            instruction,
            split_point: false,
            converted_from: None,
        }
    }

    pub fn move_to(end: Point) -> Self {
        Self::new(Instruction::MoveTo(end))
    }

    pub fn line_to(end: Point) -> Self {
        Self::new(Instruction::LineTo(end))
    }

    pub fn curve_to(ctrl1: Point, ctrl2: Point, end: Point) -> Self {
        Self::new(Instruction::CurveTo(ctrl1, ctrl2, end))
    }

    pub fn close(end: Point) -> Self {
        Self::new(Instruction::ClosePath(end))
    }

    pub fn instruction(&self) -> &Instruction {
        &self.instruction
    }

    pub fn kind(&self) -> CommandKind {
        self.instruction.kind()
    }

    pub fn end(&self) -> Point {
        self.instruction.end()
    }

    /// Control points followed by the end point
    pub fn points(&self) -> Vec<Point> {
        match self.instruction {
            Instruction::CurveTo(c1, c2, end) => vec![c1, c2, end],
            other => vec![other.end()],
        }
    }

    pub fn is_split_point(&self) -> bool {
        self.split_point
    }

    pub fn converted_from(&self) -> Option<CommandKind> {
        self.converted_from
    }

    /// The kind this command had before any engine conversion
    pub fn authored_kind(&self) -> CommandKind {
        self.converted_from.unwrap_or_else(|| self.kind())
    }

    pub fn with_split_point(mut self, split_point: bool) -> Self {
        self.split_point = split_point;
        self
    }

    /// Move the end point, keeping control points. Used to keep move and
    /// close points in sync with the rest of a subpath.
    pub(crate) fn with_end(mut self, end: Point) -> Self {
        self.instruction = match self.instruction {
            Instruction::MoveTo(_) => Instruction::MoveTo(end),
            Instruction::LineTo(_) => Instruction::LineTo(end),
            Instruction::CurveTo(c1, c2, _) => Instruction::CurveTo(c1, c2, end),
            Instruction::ClosePath(_) => Instruction::ClosePath(end),
        };
        self
    }

    /// The drawn segment from `start`. Move commands draw nothing.
    pub fn segment(&self, start: Point) -> Option<PathSeg> {
        match self.instruction {
            Instruction::MoveTo(_) => None,
            Instruction::LineTo(end) | Instruction::ClosePath(end) => {
                Some(PathSeg::Line(Line::new(start, end)))
            }
            Instruction::CurveTo(c1, c2, end) => {
                Some(PathSeg::Cubic(CubicBez::new(start, c1, c2, end)))
            }
        }
    }

    /// The same segment traversed from its end back to `start`. The split
    /// flag is not carried over: it belongs to the end point, which changes.
    pub(crate) fn reversed(&self, start: Point) -> Command {
        let instruction = match self.instruction {
            Instruction::MoveTo(_) => Instruction::MoveTo(start),
            Instruction::LineTo(_) => Instruction::LineTo(start),
            Instruction::ClosePath(_) => Instruction::LineTo(start),
            Instruction::CurveTo(c1, c2, _) => Instruction::CurveTo(c2, c1, start),
        };
        Command {
            instruction,
            split_point: false,
            converted_from: self.converted_from,
        }
    }

    /// Rewrite this command as `target` with identical geometry. Returns
    /// `None` if the kinds don't allow it.
    pub(crate) fn converted_to(&self, start: Point, target: CommandKind) -> Option<Command> {
        if !self.kind().can_convert_to(target) {
            return None;
        }
        let end = self.end();
        let instruction = match target {
            CommandKind::Line => Instruction::LineTo(end),
            CommandKind::Curve => Instruction::CurveTo(
                start.lerp(end, 1.0 / 3.0),
                start.lerp(end, 2.0 / 3.0),
                end,
            ),
            CommandKind::Move | CommandKind::Close => return None,
        };
        Some(Command {
            instruction,
            split_point: self.split_point,
            converted_from: Some(self.authored_kind()),
        })
    }

    /// Undo any engine conversion, restoring the authored kind
    pub(crate) fn unconverted(&self) -> Command {
        let Some(authored) = self.converted_from else {
            return *self;
        };
        let end = self.end();
        let instruction = match authored {
            CommandKind::Move => Instruction::MoveTo(end),
            CommandKind::Line => Instruction::LineTo(end),
            CommandKind::Close => Instruction::ClosePath(end),
            // A curve is never converted, so there is nothing to restore
            CommandKind::Curve => self.instruction,
        };
        Command {
            instruction,
            split_point: self.split_point,
            converted_from: None,
        }
    }

    /// Split this segment at the parametric positions `ts` (ascending, all
    /// strictly inside (0, 1)). The new interior commands are flagged as
    /// split points; the last piece keeps this command's own flag.
    pub(crate) fn split_at(&self, start: Point, ts: &[f64]) -> Vec<Command> {
        let Some(seg) = self.segment(start) else {
            return vec![*self];
        };
        let mut bounds = Vec::with_capacity(ts.len() + 2);
        bounds.push(0.0);
        bounds.extend_from_slice(ts);
        bounds.push(1.0);

        let last = bounds.len() - 2;
        bounds
            .windows(2)
            .enumerate()
            .map(|(i, w)| {
                let instruction = match seg.subsegment(w[0]..w[1]) {
                    PathSeg::Cubic(c) => Instruction::CurveTo(c.p1, c.p2, c.p3),
                    other => Instruction::LineTo(other.end()),
                };
                Command {
                    instruction,
                    split_point: if i == last { self.split_point } else { true },
                    converted_from: self.converted_from,
                }
            })
            .collect()
    }

    /// Join two consecutive segments back into one, removing the point
    /// between them. Inverse of splitting in half.
    pub(crate) fn merged(start: Point, first: &Command, second: &Command) -> Command {
        let kind = first.kind().richest(second.kind());
        let authored = first.authored_kind().richest(second.authored_kind());
        let end = second.end();

        let instruction = if kind == CommandKind::Curve {
            let mid = first.end();
            let as_cubic = |cmd: &Command, from: Point| match cmd.segment(from) {
                Some(PathSeg::Cubic(c)) => c,
                _ => CubicBez::new(
                    from,
                    from.lerp(cmd.end(), 1.0 / 3.0),
                    from.lerp(cmd.end(), 2.0 / 3.0),
                    cmd.end(),
                ),
            };
            let left = as_cubic(first, start);
            let right = as_cubic(second, mid);
            // Invert de Casteljau at t = 0.5 for the outer control points
            let c1 = start + (left.p1 - start) * 2.0;
            let c2 = end + (right.p2 - end) * 2.0;
            Instruction::CurveTo(c1, c2, end)
        } else {
            Instruction::LineTo(end)
        };

        Command {
            instruction,
            split_point: second.split_point,
            converted_from: (authored != kind).then_some(authored),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_near(a: Point, b: Point) {
        assert!(a.distance(b) < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn conversion_ranks() {
        assert!(CommandKind::Line.can_convert_to(CommandKind::Curve));
        assert!(CommandKind::Close.can_convert_to(CommandKind::Line));
        assert!(!CommandKind::Curve.can_convert_to(CommandKind::Line));
        assert!(!CommandKind::Move.can_convert_to(CommandKind::Line));
        assert!(!CommandKind::Line.can_convert_to(CommandKind::Line));
    }

    #[test]
    fn line_to_curve_keeps_geometry() {
        let start = Point::new(0.0, 0.0);
        let line = Command::line_to(Point::new(9.0, 3.0));
        let curve = line.converted_to(start, CommandKind::Curve).unwrap();

        assert_eq!(curve.kind(), CommandKind::Curve);
        assert_eq!(curve.converted_from(), Some(CommandKind::Line));
        let seg = curve.segment(start).unwrap();
        assert_near(seg.eval(0.5), Point::new(4.5, 1.5));
        assert_eq!(curve.unconverted(), line);
    }

    #[test]
    fn reversed_curve_swaps_controls() {
        let start = Point::new(0.0, 0.0);
        let cmd = Command::curve_to(Point::new(1.0, 2.0), Point::new(3.0, 4.0), Point::new(5.0, 0.0));
        let rev = cmd.reversed(start);
        assert_eq!(
            *rev.instruction(),
            Instruction::CurveTo(Point::new(3.0, 4.0), Point::new(1.0, 2.0), start)
        );
    }

    #[test]
    fn split_then_merge_restores_curve() {
        let start = Point::new(0.0, 0.0);
        let cmd = Command::curve_to(Point::new(0.0, 10.0), Point::new(10.0, 10.0), Point::new(10.0, 0.0));
        let halves = cmd.split_at(start, &[0.5]);
        assert_eq!(halves.len(), 2);
        assert!(halves[0].is_split_point());
        assert!(!halves[1].is_split_point());
        assert_near(halves[0].end(), Point::new(5.0, 7.5));

        let merged = Command::merged(start, &halves[0], &halves[1]);
        let Instruction::CurveTo(c1, c2, end) = *merged.instruction() else {
            panic!("expected a curve");
        };
        assert_near(c1, Point::new(0.0, 10.0));
        assert_near(c2, Point::new(10.0, 10.0));
        assert_near(end, Point::new(10.0, 0.0));
        assert_eq!(merged.converted_from(), None);
    }

    #[test]
    fn split_line_in_thirds() {
        let start = Point::new(0.0, 0.0);
        let pieces = Command::line_to(Point::new(3.0, 0.0)).split_at(start, &[1.0 / 3.0, 2.0 / 3.0]);
        let ends: Vec<Point> = pieces.iter().map(Command::end).collect();
        assert_near(ends[0], Point::new(1.0, 0.0));
        assert_near(ends[1], Point::new(2.0, 0.0));
        assert_near(ends[2], Point::new(3.0, 0.0));
        assert!(pieces.iter().all(|c| c.kind() == CommandKind::Line));
    }

    #[test]
    fn serde_keeps_flags() {
        let cmd = Command::line_to(Point::new(1.0, 2.0)).with_split_point(true);
        let json = serde_json::to_string(&cmd).unwrap();
        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);
        assert!(back.is_split_point());
    }
}
