// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Shape compatibility: making a from/to path pair structurally identical so
//! it can be interpolated index by index.
//!
//! `reconcile` is run after every edit. It strips old engine output,
//! pads the side with fewer subpaths with collapsing subpaths, and converts
//! command kinds wherever a subpath pair already has equal command counts.
//! `auto_fix` is the heavier, user-triggered pass that also picks a start
//! point and direction and adds points to the shorter subpath.

mod convert;
mod fix;

pub use convert::auto_convert;
pub use fix::{auto_fix, auto_fix_all};

use crate::path::{Path, pole};

/// A from/to pair of paths for one morph
#[derive(Debug, Clone, PartialEq)]
pub struct PathPair {
    pub from: Path,
    pub to: Path,
}

impl PathPair {
    pub fn new(from: Path, to: Path) -> Self {
        Self { from, to }
    }

    /// Swap the two sides
    pub(crate) fn flipped(self) -> Self {
        Self {
            from: self.to,
            to: self.from,
        }
    }
}

/// Result of a compatibility pass
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub from: Path,
    pub to: Path,
    /// Subpath indices whose command counts still differ. Interpolation of
    /// these is undefined until the user adds points.
    pub unreconciled: Vec<usize>,
}

impl Reconciled {
    pub fn is_compatible(&self) -> bool {
        self.unreconciled.is_empty()
    }
}

/// Bring a from/to pair into structural agreement.
///
/// Idempotent: prior collapsing subpaths and conversions are removed first,
/// so running it twice gives the same result as running it once.
pub fn reconcile(from: &Path, to: &Path) -> Reconciled {
    let mut from = strip(from);
    let mut to = strip(to);

    let n_from = from.sub_paths().len();
    let n_to = to.sub_paths().len();
    if n_from != n_to {
        let (short, long) = if n_from < n_to { (&from, &to) } else { (&to, &from) };
        let mut mutator = short.mutate();
        for sub_path in &long.sub_paths()[short.sub_paths().len()..] {
            let point = pole::pole_of_inaccessibility(sub_path);
            mutator.add_collapsing_sub_path(point, sub_path.len());
        }
        let padded = mutator.build();
        tracing::debug!(
            added = n_from.abs_diff(n_to),
            "padded path with collapsing subpaths"
        );
        if n_from < n_to {
            from = padded;
        } else {
            to = padded;
        }
    }

    let mut unreconciled = Vec::new();
    for sub_idx in 0..n_from.max(n_to) {
        let from_len = from.sub_paths()[sub_idx].len();
        let to_len = to.sub_paths()[sub_idx].len();
        if from_len == to_len {
            let pair = auto_convert(sub_idx, &from, &to);
            from = pair.from;
            to = pair.to;
        } else {
            // Counts differ: wait for the user to add points
            tracing::debug!(sub_idx, from_len, to_len, "subpath pair left unreconciled");
            unreconciled.push(sub_idx);
        }
    }

    Reconciled {
        from,
        to,
        unreconciled,
    }
}

/// Remove all engine output from a path
fn strip(path: &Path) -> Path {
    let mut mutator = path.mutate();
    mutator.unconvert_all().delete_collapsing_sub_paths();
    mutator.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{Command, CommandKind};
    use kurbo::Point;

    fn kinds(path: &Path, sub_idx: usize) -> Vec<CommandKind> {
        path.sub_paths()[sub_idx].commands().iter().map(Command::kind).collect()
    }

    fn assert_compatible(r: &Reconciled) {
        for (a, b) in r.from.sub_paths().iter().zip(r.to.sub_paths()) {
            assert_eq!(a.len(), b.len());
        }
        for i in 0..r.from.sub_paths().len().min(r.to.sub_paths().len()) {
            assert_eq!(kinds(&r.from, i), kinds(&r.to, i));
        }
    }

    #[test]
    fn pads_missing_subpath_at_pole() {
        let a = Path::from_svg("M0 0 L10 0 L10 10 L0 10 Z M20 0 L40 0 L40 20 L20 20 Z").unwrap();
        let b = Path::from_svg("M0 0 L10 0 L10 10 L0 10 Z").unwrap();
        let r = reconcile(&a, &b);

        assert_eq!(r.to.sub_paths().len(), 2);
        let added = &r.to.sub_paths()[1];
        assert!(added.is_collapsing());
        assert_eq!(added.len(), a.sub_paths()[1].len());
        let pole = a.pole_of_inaccessibility(1).unwrap();
        assert!(added.start().distance(pole) < 1e-9);
        assert!(added.start().distance(Point::new(30.0, 10.0)) < 0.1);
        assert!(r.is_compatible());
        assert_compatible(&r);
    }

    #[test]
    fn converts_lines_to_match_curves() {
        let a = Path::from_svg("M0 0 L10 0 L10 10 Z").unwrap();
        let b = Path::from_svg("M0 0 C3 -3 7 -3 10 0 L10 10 Z").unwrap();
        let r = reconcile(&a, &b);
        assert_eq!(r.from.command(0, 1).unwrap().kind(), CommandKind::Curve);
        assert_eq!(r.from.command(0, 1).unwrap().converted_from(), Some(CommandKind::Line));
        assert_compatible(&r);
    }

    #[test]
    fn unequal_counts_are_reported() {
        let a = Path::from_svg("M0 0 L10 0 L10 10 Z").unwrap();
        let b = Path::from_svg("M0 0 L10 0 L10 10 L0 10 Z").unwrap();
        let r = reconcile(&a, &b);
        assert_eq!(r.unreconciled, vec![0]);
        assert_eq!(r.from, a);
    }

    #[test]
    fn reconcile_is_idempotent() {
        let a = Path::from_svg("M0 0 L10 0 L10 10 Z M50 50 L60 50 L60 60 Z").unwrap();
        let b = Path::from_svg("M0 0 C3 -3 7 -3 10 0 L10 10 Z").unwrap();
        let once = reconcile(&a, &b);
        let twice = reconcile(&once.from, &once.to);
        assert_eq!(once, twice);
    }

    #[test]
    fn keeps_user_ordering() {
        let a = Path::from_svg("M0 0 L10 0 L10 10 L0 10 Z").unwrap();
        let mut m = a.mutate();
        m.reverse_sub_path(0).unwrap();
        let reversed = m.build();
        let mut m = a.mutate();
        m.shift_sub_path_forward(0).unwrap();
        let shifted = m.build();

        // Equal counts: only kinds are reconciled, never start or direction
        for edited in [reversed, shifted] {
            let r = reconcile(&a, &edited);
            assert_eq!(r.to, edited);
            assert_eq!(r.from, a);
            assert!(r.is_compatible());
        }
    }

    #[test]
    fn empty_side_gets_collapsing_subpaths() {
        let a = Path::from_svg("M0 0 L10 0 L10 10 Z").unwrap();
        let r = reconcile(&a, &Path::default());
        assert_eq!(r.to.sub_paths().len(), 1);
        assert!(r.to.sub_paths()[0].is_collapsing());
        assert_compatible(&r);
    }
}
