// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Builder that applies structural edits to a copy of a path.
//!
//! Every operation validates its indices against the in-progress state and
//! either applies completely or returns an error and leaves the working
//! copy untouched. `build` consumes the mutator and returns a new `Path`;
//! the path the mutator was created from is never modified.
//!
//! Closed subpaths are treated as rings: the commands between the move and
//! the zero-length close marker. Rotating or reversing a ring rewrites the
//! move point and keeps the close last.

use super::command::{Command, CommandKind};
use super::sub_path::SubPath;
use super::{FillRule, Path};
use crate::error::{EditError, EditResult};
use kurbo::Point;

/// Accumulates edits against a base path
#[derive(Debug, Clone)]
pub struct PathMutator {
    sub_paths: Vec<SubPath>,
    fill_rule: FillRule,
}

impl PathMutator {
    pub(crate) fn new(path: &Path) -> Self {
        Self {
            sub_paths: path.sub_paths().to_vec(),
            fill_rule: path.fill_rule(),
        }
    }

    /// The in-progress subpaths
    pub fn sub_paths(&self) -> &[SubPath] {
        &self.sub_paths
    }

    /// Finish editing and produce the new path
    pub fn build(self) -> Path {
        Path::new(self.sub_paths).with_fill_rule(self.fill_rule)
    }

    // ===== SUBPATH ORDERING =====

    /// Reverse the drawing direction of a subpath.
    ///
    /// An open subpath starts at its old end point afterwards. A closed
    /// subpath keeps its move point and traverses the ring the other way.
    /// Split flags stay with the points they mark.
    pub fn reverse_sub_path(&mut self, sub_idx: usize) -> EditResult<&mut Self> {
        let sub_path = self.sub_path(sub_idx)?;
        let cmds = sub_path.commands();
        let ends: Vec<Point> = cmds.iter().map(Command::end).collect();
        let closed = sub_path.is_closed();

        let reversed = if closed {
            let k = cmds.len() - 2;
            // The move point is the end of the last ring segment
            let flag_at = |i: usize| {
                if i == 0 {
                    cmds[k].is_split_point()
                } else {
                    cmds[i].is_split_point()
                }
            };
            let mut out = Vec::with_capacity(cmds.len());
            out.push(cmds[0]);
            out.extend(
                (1..=k)
                    .rev()
                    .map(|i| cmds[i].reversed(ends[i - 1]).with_split_point(flag_at(i - 1))),
            );
            out.push(cmds[cmds.len() - 1]);
            out
        } else {
            let n = cmds.len() - 1;
            let mut out = Vec::with_capacity(cmds.len());
            out.push(Command::move_to(ends[n]).with_split_point(cmds[n].is_split_point()));
            out.extend(
                (1..=n)
                    .rev()
                    .map(|i| cmds[i].reversed(ends[i - 1]).with_split_point(cmds[i - 1].is_split_point())),
            );
            out
        };

        self.replace(sub_idx, reversed);
        Ok(self)
    }

    /// Rotate a closed subpath so it starts one point later
    pub fn shift_sub_path_forward(&mut self, sub_idx: usize) -> EditResult<&mut Self> {
        let ring = self.ring_len(sub_idx)?;
        if ring < 2 {
            return Ok(self);
        }
        self.rotate_ring(sub_idx, 1);
        Ok(self)
    }

    /// Rotate a closed subpath so it starts one point earlier
    pub fn shift_sub_path_back(&mut self, sub_idx: usize) -> EditResult<&mut Self> {
        let ring = self.ring_len(sub_idx)?;
        if ring < 2 {
            return Ok(self);
        }
        self.rotate_ring(sub_idx, ring - 1);
        Ok(self)
    }

    /// Rotate a closed subpath so the end point of `cmd_idx` becomes its
    /// move point
    pub fn shift_point_to_front(&mut self, sub_idx: usize, cmd_idx: usize) -> EditResult<&mut Self> {
        self.command_at(sub_idx, cmd_idx)?;
        let ring = self.ring_len(sub_idx)?;
        // Index 0, the last ring segment and the close all end at the
        // current move point already
        if cmd_idx == 0 || cmd_idx >= ring {
            return Ok(self);
        }
        self.rotate_ring(sub_idx, cmd_idx);
        Ok(self)
    }

    /// Relocate a subpath within the ordering
    pub fn move_sub_path(&mut self, from_idx: usize, to_idx: usize) -> EditResult<&mut Self> {
        self.sub_path(from_idx)?;
        self.sub_path(to_idx)?;
        let sub_path = self.sub_paths.remove(from_idx);
        self.sub_paths.insert(to_idx, sub_path);
        Ok(self)
    }

    // ===== SPLITTING =====

    /// Insert a split point at the parametric middle of a segment
    pub fn split_command_in_half(&mut self, sub_idx: usize, cmd_idx: usize) -> EditResult<&mut Self> {
        self.split_command(sub_idx, cmd_idx, &[0.5])
    }

    /// Split a segment at each of `ts` (parametric positions in (0, 1)).
    /// Later command indices in the subpath shift by the number of new
    /// points.
    pub fn split_command(&mut self, sub_idx: usize, cmd_idx: usize, ts: &[f64]) -> EditResult<&mut Self> {
        let cmd = *self.command_at(sub_idx, cmd_idx)?;
        self.ensure_drawn(sub_idx, cmd_idx, "split")?;

        let mut ts: Vec<f64> = ts.iter().copied().filter(|t| *t > 0.0 && *t < 1.0).collect();
        ts.sort_by(f64::total_cmp);
        ts.dedup();
        if ts.is_empty() {
            return Err(EditError::incompatible("no split position inside the segment"));
        }

        let sub_path = &self.sub_paths[sub_idx];
        let pieces = cmd.split_at(sub_path.start_of(cmd_idx), &ts);
        let mut cmds = sub_path.commands().to_vec();
        cmds.splice(cmd_idx..=cmd_idx, pieces);
        self.replace(sub_idx, cmds);
        Ok(self)
    }

    /// Remove a point previously created by splitting, joining the two
    /// segments around it
    pub fn unsplit_command(&mut self, sub_idx: usize, cmd_idx: usize) -> EditResult<&mut Self> {
        let cmd = *self.command_at(sub_idx, cmd_idx)?;
        if !cmd.is_split_point() {
            return Err(EditError::incompatible(format!(
                "command {cmd_idx} of subpath {sub_idx} is not a split point"
            )));
        }
        self.ensure_drawn(sub_idx, cmd_idx, "unsplit")?;

        let sub_path = &self.sub_paths[sub_idx];
        let cmds = sub_path.commands();
        let closed = sub_path.is_closed();
        let last_drawn = if closed { cmds.len() - 2 } else { cmds.len() - 1 };

        let joined = if cmd_idx < last_drawn {
            let merged = Command::merged(sub_path.start_of(cmd_idx), &cmds[cmd_idx], &cmds[cmd_idx + 1]);
            let mut out = cmds.to_vec();
            out.splice(cmd_idx..=cmd_idx + 1, [merged]);
            out
        } else if closed && last_drawn >= 2 {
            // The split point is the move point: join across the seam and
            // start the ring at the next point instead
            let merged = Command::merged(cmds[last_drawn - 1].end(), &cmds[last_drawn], &cmds[1]);
            let mut out = vec![Command::move_to(cmds[1].end())];
            out.extend_from_slice(&cmds[2..last_drawn]);
            out.push(merged);
            out.push(cmds[cmds.len() - 1]);
            out
        } else {
            return Err(EditError::incompatible("split point has no following segment"));
        };

        self.replace(sub_idx, joined);
        Ok(self)
    }

    /// Unsplit several points at once. Operations are applied in
    /// descending index order so earlier removals never shift later ones;
    /// entries that are not split points are skipped.
    pub fn unsplit_commands(&mut self, ops: &[(usize, usize)]) -> EditResult<&mut Self> {
        let mut ops = ops.to_vec();
        ops.sort_unstable_by(|a, b| b.cmp(a));
        ops.dedup();
        for (sub_idx, cmd_idx) in ops {
            match self.unsplit_command(sub_idx, cmd_idx) {
                Ok(_) => {}
                Err(EditError::Incompatible(reason)) => {
                    tracing::debug!(sub_idx, cmd_idx, %reason, "skipping unsplit");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(self)
    }

    // ===== DELETION =====

    /// Remove a subpath of a stroked path; any subpath may go
    pub fn delete_stroked_sub_path(&mut self, sub_idx: usize) -> EditResult<&mut Self> {
        self.sub_path(sub_idx)?;
        self.sub_paths.remove(sub_idx);
        Ok(self)
    }

    /// Remove a subpath of a filled path. The last subpath is kept.
    pub fn delete_filled_sub_path(&mut self, sub_idx: usize) -> EditResult<&mut Self> {
        self.sub_path(sub_idx)?;
        if self.sub_paths.len() == 1 {
            return Err(EditError::incompatible("a filled path keeps at least one subpath"));
        }
        self.sub_paths.remove(sub_idx);
        Ok(self)
    }

    /// Remove one segment.
    ///
    /// On a closed subpath the neighbours are joined so the ring stays
    /// closed. On an open subpath the contour is cut in two at the gap.
    pub fn delete_filled_sub_path_segment(&mut self, sub_idx: usize, cmd_idx: usize) -> EditResult<&mut Self> {
        self.command_at(sub_idx, cmd_idx)?;
        self.ensure_drawn(sub_idx, cmd_idx, "delete")?;

        let sub_path = &self.sub_paths[sub_idx];
        let collapsing = sub_path.is_collapsing();
        let cmds = sub_path.commands();

        if sub_path.is_closed() {
            let ring = cmds.len() - 2;
            if ring <= 2 {
                return Err(EditError::incompatible("ring too small to lose a segment"));
            }
            let mut out = cmds.to_vec();
            out.remove(cmd_idx);
            if cmd_idx == ring {
                // The removed segment closed onto the move point
                let new_start = out[ring - 1].end();
                out[0] = Command::move_to(new_start);
            }
            self.replace(sub_idx, out);
            return Ok(self);
        }

        let head = cmds[..cmd_idx].to_vec();
        let mut tail = vec![Command::move_to(cmds[cmd_idx].end())];
        tail.extend_from_slice(&cmds[cmd_idx + 1..]);

        let pieces: Vec<SubPath> = [head, tail]
            .into_iter()
            .filter(|piece| piece.len() > 1)
            .map(|piece| SubPath::from_parts(piece, collapsing))
            .collect();
        self.sub_paths.splice(sub_idx..=sub_idx, pieces);
        Ok(self)
    }

    // ===== COMPATIBILITY SUPPORT =====

    /// Append a subpath of `count` coincident commands at `point`
    pub fn add_collapsing_sub_path(&mut self, point: Point, count: usize) -> &mut Self {
        self.sub_paths.push(SubPath::collapsing(point, count));
        self
    }

    /// Drop every synthetic collapsing subpath
    pub fn delete_collapsing_sub_paths(&mut self) -> &mut Self {
        self.sub_paths.retain(|sp| !sp.is_collapsing());
        self
    }

    /// Rewrite one command as a richer kind without changing its geometry
    pub fn convert_command(&mut self, sub_idx: usize, cmd_idx: usize, kind: CommandKind) -> EditResult<&mut Self> {
        let cmd = *self.command_at(sub_idx, cmd_idx)?;
        let start = self.sub_paths[sub_idx].start_of(cmd_idx);
        let Some(converted) = cmd.converted_to(start, kind) else {
            return Err(EditError::incompatible(format!(
                "cannot convert {:?} to {kind:?}",
                cmd.kind()
            )));
        };
        let mut cmds = self.sub_paths[sub_idx].commands().to_vec();
        cmds[cmd_idx] = converted;
        self.replace(sub_idx, cmds);
        Ok(self)
    }

    /// Restore the authored kind of every converted command in a subpath
    pub fn unconvert_sub_path(&mut self, sub_idx: usize) -> EditResult<&mut Self> {
        let sub_path = self.sub_path(sub_idx)?;
        if sub_path.commands().iter().all(|c| c.converted_from().is_none()) {
            return Ok(self);
        }
        let cmds = sub_path.commands().iter().map(Command::unconverted).collect();
        self.replace(sub_idx, cmds);
        Ok(self)
    }

    /// Unconvert every subpath
    pub fn unconvert_all(&mut self) -> &mut Self {
        for sub_idx in 0..self.sub_paths.len() {
            // Indices come from our own length, so this cannot fail
            let _ = self.unconvert_sub_path(sub_idx);
        }
        self
    }

    // ===== PRIVATE HELPERS =====

    fn sub_path(&self, sub_idx: usize) -> EditResult<&SubPath> {
        self.sub_paths.get(sub_idx).ok_or(EditError::InvalidSubPath {
            sub_idx,
            len: self.sub_paths.len(),
        })
    }

    fn command_at(&self, sub_idx: usize, cmd_idx: usize) -> EditResult<&Command> {
        let sub_path = self.sub_path(sub_idx)?;
        sub_path.command(cmd_idx).ok_or(EditError::InvalidCommand {
            sub_idx,
            cmd_idx,
            len: sub_path.len(),
        })
    }

    /// Number of ring segments of a closed subpath
    fn ring_len(&self, sub_idx: usize) -> EditResult<usize> {
        let sub_path = self.sub_path(sub_idx)?;
        if !sub_path.is_closed() {
            return Err(EditError::incompatible(format!("subpath {sub_idx} is not closed")));
        }
        Ok(sub_path.len().saturating_sub(2))
    }

    /// Reject the move and the close marker, which draw nothing
    fn ensure_drawn(&self, sub_idx: usize, cmd_idx: usize, what: &str) -> EditResult<()> {
        let sub_path = &self.sub_paths[sub_idx];
        let is_close = sub_path.is_closed() && cmd_idx == sub_path.len() - 1;
        if cmd_idx == 0 || is_close {
            return Err(EditError::incompatible(format!(
                "cannot {what} command {cmd_idx} of subpath {sub_idx}"
            )));
        }
        Ok(())
    }

    /// Rotate the ring so the end of ring segment `offset` becomes the
    /// move point. `offset` must be in `1..ring_len`.
    fn rotate_ring(&mut self, sub_idx: usize, offset: usize) {
        let cmds = self.sub_paths[sub_idx].commands();
        let close = cmds.len() - 1;
        let mut out = Vec::with_capacity(cmds.len());
        out.push(Command::move_to(cmds[offset].end()));
        out.extend_from_slice(&cmds[offset + 1..close]);
        out.extend_from_slice(&cmds[1..=offset]);
        out.push(cmds[close]);
        self.replace(sub_idx, out);
    }

    fn replace(&mut self, sub_idx: usize, commands: Vec<Command>) {
        let collapsing = self.sub_paths[sub_idx].is_collapsing();
        self.sub_paths[sub_idx] = SubPath::from_parts(commands, collapsing);
    }
}
