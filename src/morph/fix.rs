// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Auto fix: choose direction and start point for a subpath pair, add
//! points to the shorter side, then convert kinds.
//!
//! The side with more commands is the reference. Every candidate ordering
//! of the reference (identity and reversal, each at every ring rotation for
//! closed subpaths) is aligned against the other side's end points with a
//! monotone global alignment: every point of the shorter side is matched to
//! a reference point in order, and unmatched reference points become new
//! split points on the shorter side. The candidate with the smallest total
//! end point displacement wins. This is a nearest-mapping heuristic, not an
//! optimal assignment.

use super::{PathPair, auto_convert};
use crate::error::EditResult;
use crate::path::{Command, Path, PathMutator, SubPath};
use crate::settings;
use kurbo::Point;

/// One way of traversing the reference subpath
#[derive(Debug, Clone, Copy, PartialEq)]
struct Ordering {
    reversed: bool,
    /// Ring segment whose end point becomes the move point (0 = keep)
    rotation: usize,
}

/// Outcome of aligning a candidate against the shorter side
#[derive(Debug, Clone)]
struct Alignment {
    score: f64,
    /// `inserts[j]` reference points fall between the shorter side's drawn
    /// points `j - 1` and `j`
    inserts: Vec<usize>,
}

/// Fix subpath `sub_idx` of a pair. `from` should be the side with more
/// commands; if it isn't, the roles are swapped internally and the result
/// is returned in the caller's orientation.
pub fn auto_fix(sub_idx: usize, from: &Path, to: &Path) -> PathPair {
    let (Some(a), Some(b)) = (from.sub_path(sub_idx), to.sub_path(sub_idx)) else {
        return PathPair::new(from.clone(), to.clone());
    };
    if a.len() < b.len() {
        return auto_fix(sub_idx, to, from).flipped();
    }
    if a.is_closed() != b.is_closed() {
        tracing::debug!(sub_idx, "open/closed subpath pair; only converting kinds");
        return auto_convert(sub_idx, from, to);
    }
    if drawn(b).is_empty() {
        return PathPair::new(from.clone(), to.clone());
    }

    let Some((ordering, alignment)) = best_ordering(a, b) else {
        return PathPair::new(from.clone(), to.clone());
    };
    tracing::debug!(
        sub_idx,
        reversed = ordering.reversed,
        rotation = ordering.rotation,
        score = alignment.score,
        added = alignment.inserts.iter().sum::<usize>(),
        "auto fix"
    );

    match apply(sub_idx, from, to, ordering, &alignment) {
        Ok(pair) => auto_convert(sub_idx, &pair.from, &pair.to),
        Err(err) => {
            tracing::warn!(sub_idx, %err, "auto fix failed; leaving subpaths unchanged");
            PathPair::new(from.clone(), to.clone())
        }
    }
}

/// Auto fix every subpath index present on both sides
pub fn auto_fix_all(from: &Path, to: &Path) -> PathPair {
    let count = from.sub_paths().len().min(to.sub_paths().len());
    let mut pair = PathPair::new(from.clone(), to.clone());
    for sub_idx in 0..count {
        pair = auto_fix(sub_idx, &pair.from, &pair.to);
    }
    pair
}

fn best_ordering(a: &SubPath, b: &SubPath) -> Option<(Ordering, Alignment)> {
    let target = drawn(b);
    let ring = if a.is_closed() { a.len().saturating_sub(2) } else { 1 };

    let mut best: Option<(Ordering, Alignment)> = None;
    for reversed in [false, true] {
        for rotation in 0..ring.max(1) {
            let ordering = Ordering { reversed, rotation };
            let Some(candidate) = reorder(a, ordering) else {
                continue;
            };
            let Some(mut alignment) = align(&drawn(&candidate), &target) else {
                continue;
            };
            if !a.is_closed() {
                alignment.score -= candidate.start().distance(b.start());
            }
            if best.as_ref().is_none_or(|(_, cur)| alignment.score > cur.score) {
                best = Some((ordering, alignment));
            }
        }
    }
    best
}

/// Apply an ordering to a standalone copy of a subpath
fn reorder(sub_path: &SubPath, ordering: Ordering) -> Option<SubPath> {
    let path = Path::new(vec![sub_path.clone()]);
    let mut mutator = path.mutate();
    apply_ordering(&mut mutator, 0, ordering).ok()?;
    mutator.build().sub_paths().first().cloned()
}

fn apply_ordering(mutator: &mut PathMutator, sub_idx: usize, ordering: Ordering) -> EditResult<()> {
    if ordering.reversed {
        mutator.reverse_sub_path(sub_idx)?;
    }
    if ordering.rotation > 0 {
        mutator.shift_point_to_front(sub_idx, ordering.rotation)?;
    }
    Ok(())
}

fn apply(sub_idx: usize, from: &Path, to: &Path, ordering: Ordering, alignment: &Alignment) -> EditResult<PathPair> {
    let mut from_mutator = from.mutate();
    apply_ordering(&mut from_mutator, sub_idx, ordering)?;

    // Split from the back so earlier command indices stay valid
    let mut to_mutator = to.mutate();
    for (j, &count) in alignment.inserts.iter().enumerate().rev() {
        if count == 0 {
            continue;
        }
        let ts: Vec<f64> = (1..=count).map(|i| i as f64 / (count + 1) as f64).collect();
        to_mutator.split_command(sub_idx, j + 1, &ts)?;
    }

    Ok(PathPair::new(from_mutator.build(), to_mutator.build()))
}

/// End points of the drawn commands: everything after the move, minus the
/// close marker of a closed subpath
fn drawn(sub_path: &SubPath) -> Vec<Point> {
    let cmds = sub_path.commands();
    let end = if sub_path.is_closed() { cmds.len() - 1 } else { cmds.len() };
    cmds[1..end.max(1)].iter().map(Command::end).collect()
}

/// Monotone alignment of `reference` (longer) against `target` (shorter).
///
/// Every target point is matched to exactly one reference point, in order,
/// and the last points of both are always matched to each other. Reference
/// points left over are gaps.
fn align(reference: &[Point], target: &[Point]) -> Option<Alignment> {
    let (n, m) = (reference.len(), target.len());
    if m == 0 || n < m {
        return None;
    }
    let gap = settings::autofix::GAP_PENALTY;
    let score = |i: usize, j: usize| -reference[i].distance(target[j]);

    // dp[i][j]: best score for reference[..i] against target[..j]
    let mut dp = vec![vec![f64::NEG_INFINITY; m + 1]; n + 1];
    let mut matched = vec![vec![false; m + 1]; n + 1];
    dp[0][0] = 0.0;
    for i in 1..=n {
        dp[i][0] = dp[i - 1][0] - gap;
        for j in 1..=m.min(i) {
            let diag = dp[i - 1][j - 1] + score(i - 1, j - 1);
            let skip = dp[i - 1][j] - gap;
            if diag >= skip {
                dp[i][j] = diag;
                matched[i][j] = true;
            } else {
                dp[i][j] = skip;
            }
        }
    }

    let total = dp[n - 1][m - 1] + score(n - 1, m - 1);
    let mut inserts = vec![0; m];
    let (mut i, mut j) = (n - 1, m - 1);
    while i > 0 {
        if j > 0 && matched[i][j] {
            i -= 1;
            j -= 1;
        } else {
            inserts[j] += 1;
            i -= 1;
        }
    }

    Some(Alignment {
        score: total,
        inserts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::CommandKind;

    fn ends(path: &Path, sub_idx: usize) -> Vec<Point> {
        path.sub_paths()[sub_idx].commands().iter().map(Command::end).collect()
    }

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn align_inserts_where_reference_has_extra_points() {
        let reference = [p(5.0, 0.0), p(10.0, 0.0), p(10.0, 10.0), p(0.0, 0.0)];
        let target = [p(10.0, 0.0), p(10.0, 10.0), p(0.0, 0.0)];
        let alignment = align(&reference, &target).unwrap();
        assert_eq!(alignment.inserts, vec![1, 0, 0]);
        assert_eq!(alignment.score, 0.0);
    }

    #[test]
    fn align_equal_lengths_is_one_to_one() {
        let reference = [p(0.0, 0.0), p(3.0, 4.0)];
        let target = [p(0.0, 0.0), p(0.0, 0.0)];
        let alignment = align(&reference, &target).unwrap();
        assert_eq!(alignment.inserts, vec![0, 0]);
        assert_eq!(alignment.score, -5.0);
    }

    #[test]
    fn picks_rotation_with_least_displacement() {
        let from = Path::from_svg("M0 0 L10 0 L10 10 L0 10 Z").unwrap();
        // Same square, authored starting at the opposite corner
        let to = Path::from_svg("M10 10 L0 10 L0 0 L10 0 Z").unwrap();
        let pair = auto_fix(0, &from, &to);
        assert_eq!(ends(&pair.from, 0), ends(&pair.to, 0));
        assert_eq!(pair.to, to);
    }

    #[test]
    fn picks_reversal_when_directions_disagree() {
        let from = Path::from_svg("M0 0 L10 0 L10 10 L0 10 Z").unwrap();
        let to = Path::from_svg("M0 0 L0 10 L10 10 L10 0 Z").unwrap();
        let pair = auto_fix(0, &from, &to);
        assert_eq!(ends(&pair.from, 0), ends(&pair.to, 0));
    }

    #[test]
    fn shorter_side_gains_points() {
        let from = Path::from_svg("M0 0 L5 0 L10 0 L10 10 L0 10 Z").unwrap();
        let to = Path::from_svg("M0 0 L10 0 L10 10 L0 10 Z").unwrap();
        let pair = auto_fix(0, &from, &to);

        assert_eq!(pair.from.sub_paths()[0].len(), pair.to.sub_paths()[0].len());
        assert_eq!(pair.to.command(0, 1).unwrap().end(), p(5.0, 0.0));
        assert!(pair.to.command(0, 1).unwrap().is_split_point());
    }

    #[test]
    fn argument_order_does_not_matter() {
        let long = Path::from_svg("M0 0 L5 0 L10 0 L10 10 L0 10 Z").unwrap();
        let short = Path::from_svg("M0 0 C3 -3 7 -3 10 0 L10 10 L0 10 Z").unwrap();
        let pair = auto_fix(0, &short, &long);

        let a = &pair.from.sub_paths()[0];
        let b = &pair.to.sub_paths()[0];
        assert_eq!(a.len(), b.len());
        for (x, y) in a.commands().iter().zip(b.commands()) {
            assert_eq!(x.kind(), y.kind());
        }
        assert_eq!(pair.from.command(0, 1).unwrap().kind(), CommandKind::Curve);
    }

    #[test]
    fn fix_all_covers_shared_indices() {
        let from = Path::from_svg("M0 0 L10 0 L10 10 L0 10 Z M20 0 L30 0 L30 10 Z").unwrap();
        let to = Path::from_svg("M0 0 L10 0 L5 10 Z").unwrap();
        let pair = auto_fix_all(&from, &to);
        assert_eq!(pair.from.sub_paths()[0].len(), pair.to.sub_paths()[0].len());
        assert_eq!(pair.to.sub_paths().len(), 1);
        assert_eq!(pair.from.sub_paths()[1], from.sub_paths()[1]);
    }

    #[test]
    fn open_closed_mix_only_converts() {
        let from = Path::from_svg("M0 0 L10 0 L10 10 Z").unwrap();
        let to = Path::from_svg("M0 0 L10 0").unwrap();
        let pair = auto_fix(0, &from, &to);
        assert_eq!(pair.from, from);
        assert_eq!(pair.to, to);
    }
}
