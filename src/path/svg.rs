// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Conversion between `Path` and SVG path data / kurbo paths.
//!
//! Parsing is delegated to kurbo. Quadratic segments are raised to cubics
//! since the morph model only knows lines and cubic curves. Editor flags
//! (split points, collapsing subpaths, conversions) have no SVG form; use the
//! serde representation when those must survive.

use super::command::Command;
use super::sub_path::SubPath;
use super::Path;
use crate::error::PathError;
use kurbo::{BezPath, PathEl, Point, QuadBez};

impl Path {
    /// Parse SVG path data (`d` attribute syntax)
    pub fn from_svg(data: &str) -> Result<Path, PathError> {
        let bez = BezPath::from_svg(data).map_err(|e| PathError::Parse(e.to_string()))?;
        Path::from_bezpath(&bez)
    }

    /// Build a path from kurbo path elements
    pub fn from_bezpath(bez: &BezPath) -> Result<Path, PathError> {
        let mut sub_paths = Vec::new();
        let mut current: Vec<Command> = Vec::new();
        let mut last = Point::ZERO;
        let mut start = Point::ZERO;

        for el in bez.elements() {
            if current.is_empty() && !matches!(el, PathEl::MoveTo(_)) {
                // Drawing after a close continues from the close point
                current.push(Command::move_to(start));
            }
            let cmd = match *el {
                PathEl::MoveTo(p) => {
                    if !current.is_empty() {
                        sub_paths.push(SubPath::new(std::mem::take(&mut current))?);
                    }
                    current.push(Command::move_to(p));
                    start = p;
                    last = p;
                    continue;
                }
                PathEl::LineTo(p) => Command::line_to(p),
                PathEl::QuadTo(c, p) => {
                    let cubic = QuadBez::new(last, c, p).raise();
                    Command::curve_to(cubic.p1, cubic.p2, cubic.p3)
                }
                PathEl::CurveTo(c1, c2, p) => Command::curve_to(c1, c2, p),
                PathEl::ClosePath => Command::close(start),
            };
            last = cmd.end();
            let closes = matches!(el, PathEl::ClosePath);
            current.push(cmd);
            if closes {
                sub_paths.push(SubPath::new(std::mem::take(&mut current))?);
            }
        }
        if !current.is_empty() {
            sub_paths.push(SubPath::new(current)?);
        }
        Ok(Path::new(sub_paths))
    }

    /// Serialize as SVG path data
    pub fn to_svg(&self) -> String {
        self.to_bezpath().to_svg()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::CommandKind;

    #[test]
    fn parses_subpaths_and_kinds() {
        let path = Path::from_svg("M0 0 L10 0 L10 10 Z M20 20 C25 20 30 25 30 30").unwrap();
        assert_eq!(path.sub_paths().len(), 2);

        let kinds: Vec<CommandKind> = path.sub_paths()[0].commands().iter().map(Command::kind).collect();
        assert_eq!(
            kinds,
            vec![
                CommandKind::Move,
                CommandKind::Line,
                CommandKind::Line,
                CommandKind::Line,
                CommandKind::Close
            ]
        );
        assert!(path.sub_paths()[0].is_closed());
        assert!(!path.sub_paths()[1].is_closed());
    }

    #[test]
    fn quadratic_is_raised() {
        let path = Path::from_svg("M0 0 Q5 10 10 0").unwrap();
        let cmd = path.command(0, 1).unwrap();
        assert_eq!(cmd.kind(), CommandKind::Curve);
        assert_eq!(cmd.end(), Point::new(10.0, 0.0));
    }

    #[test]
    fn svg_round_trip() {
        let path = Path::from_svg("M0 0 L10 0 L10 10 L0 10 Z").unwrap();
        let again = Path::from_svg(&path.to_svg()).unwrap();
        assert_eq!(again, path);
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(matches!(Path::from_svg("M0 0 K10 10"), Err(PathError::Parse(_))));
    }
}
