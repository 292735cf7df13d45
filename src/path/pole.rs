// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Pole of inaccessibility: the interior point of a contour that is furthest
//! from its outline.
//!
//! This is the grid-refinement search popularised by Mapbox's polylabel.
//! The contour is flattened to a polygon with kurbo, the bounding box is
//! covered with square cells, and cells are refined best-first until none
//! of them can beat the current best by more than the requested precision.

use super::sub_path::SubPath;
use crate::settings;
use kurbo::{BezPath, Line, ParamCurveNearest, PathEl, Point, Rect, Shape, Vec2};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Pole of inaccessibility of one subpath.
///
/// Degenerate contours (a point, a straight line) have no interior; for
/// those the center of the bounding box is returned.
pub fn pole_of_inaccessibility(sub_path: &SubPath) -> Point {
    let bbox = sub_path.bounding_box();
    let extent = bbox.width().max(bbox.height());
    let eps = settings::geometry::EPSILON;
    if bbox.width() <= eps || bbox.height() <= eps {
        return bbox.center();
    }

    let Some(polygon) = Polygon::flatten(sub_path, extent * settings::pole::FLATTEN_RATIO) else {
        return bbox.center();
    };
    polylabel(&polygon, bbox, extent * settings::pole::PRECISION_RATIO)
}

fn polylabel(polygon: &Polygon, bbox: Rect, precision: f64) -> Point {
    // Never finer than the precision, so thin contours stay a short row
    let cell_size = bbox.width().min(bbox.height()).max(precision);
    let half = cell_size / 2.0;

    let mut queue = BinaryHeap::new();
    let mut x = bbox.x0;
    while x < bbox.x1 {
        let mut y = bbox.y0;
        while y < bbox.y1 {
            queue.push(Cell::new(Point::new(x + half, y + half), half, polygon));
            y += cell_size;
        }
        x += cell_size;
    }

    let mut best = Cell::new(bbox.center(), 0.0, polygon);
    while let Some(cell) = queue.pop() {
        if cell.distance > best.distance {
            best = cell;
        }
        if cell.potential - best.distance <= precision {
            continue;
        }
        let h = cell.half / 2.0;
        for (dx, dy) in [(-h, -h), (h, -h), (-h, h), (h, h)] {
            queue.push(Cell::new(cell.center + Vec2::new(dx, dy), h, polygon));
        }
    }

    tracing::trace!(
        x = best.center.x,
        y = best.center.y,
        distance = best.distance,
        "pole of inaccessibility"
    );
    best.center
}

/// A contour flattened to straight edges
struct Polygon {
    outline: BezPath,
    edges: Vec<Line>,
}

impl Polygon {
    /// Flatten the subpath within `tolerance`. Returns `None` when fewer
    /// than three distinct vertices remain.
    fn flatten(sub_path: &SubPath, tolerance: f64) -> Option<Self> {
        let mut vertices = Vec::new();
        let bez = sub_path.to_bezpath();
        kurbo::flatten(bez.iter(), tolerance, |el| match el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => vertices.push(p),
            _ => {}
        });

        let eps = settings::geometry::EPSILON;
        vertices.dedup_by(|a, b| a.distance(*b) <= eps);
        if vertices.len() > 1 && vertices[0].distance(vertices[vertices.len() - 1]) <= eps {
            vertices.pop();
        }
        if vertices.len() < 3 {
            return None;
        }

        let mut outline = BezPath::new();
        outline.move_to(vertices[0]);
        for &p in &vertices[1..] {
            outline.line_to(p);
        }
        outline.close_path();

        let n = vertices.len();
        let edges = (0..n)
            .map(|i| Line::new(vertices[i], vertices[(i + 1) % n]))
            .collect();
        Some(Polygon { outline, edges })
    }

    /// Distance from `p` to the outline; positive inside, negative outside
    fn signed_distance(&self, p: Point) -> f64 {
        let dist = self
            .edges
            .iter()
            .map(|edge| edge.nearest(p, settings::geometry::EPSILON).distance_sq)
            .fold(f64::INFINITY, f64::min)
            .sqrt();
        if self.outline.winding(p) != 0 { dist } else { -dist }
    }
}

/// A square search cell, ordered by the best distance any point inside it
/// could reach
#[derive(Debug, Clone, Copy)]
struct Cell {
    center: Point,
    half: f64,
    distance: f64,
    potential: f64,
}

impl Cell {
    fn new(center: Point, half: f64, polygon: &Polygon) -> Self {
        let distance = polygon.signed_distance(center);
        Cell {
            center,
            half,
            distance,
            potential: distance + half * std::f64::consts::SQRT_2,
        }
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.potential.total_cmp(&other.potential) == Ordering::Equal
    }
}

impl Eq for Cell {}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> Ordering {
        self.potential.total_cmp(&other.potential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Path;

    fn first(svg: &str) -> SubPath {
        Path::from_svg(svg).unwrap().sub_paths()[0].clone()
    }

    #[test]
    fn square_pole_is_center() {
        let pole = pole_of_inaccessibility(&first("M0 0 L10 0 L10 10 L0 10 Z"));
        assert!(pole.distance(Point::new(5.0, 5.0)) < 0.05, "{pole:?}");
    }

    #[test]
    fn l_shape_pole_is_inside() {
        // An L shape: the bbox center (5, 5) lies outside the outline
        let sp = first("M0 0 L10 0 L10 3 L3 3 L3 10 L0 10 Z");
        let pole = pole_of_inaccessibility(&sp);
        let polygon = Polygon::flatten(&sp, 0.01).unwrap();
        assert!(polygon.signed_distance(pole) > 1.0, "{pole:?}");
    }

    #[test]
    fn curved_contour_pole_is_inside() {
        let sp = first("M0 5 C0 -2 10 -2 10 5 C10 12 0 12 0 5 Z");
        let pole = pole_of_inaccessibility(&sp);
        assert!(pole.distance(Point::new(5.0, 5.0)) < 0.5, "{pole:?}");
    }

    #[test]
    fn sliver_triangle_finishes() {
        let sp = first("M0 0 L1000 0 L500 0.00001 Z");
        let pole = pole_of_inaccessibility(&sp);
        let bbox = sp.bounding_box();
        assert!(bbox.inflate(1.0, 1.0).contains(pole), "{pole:?}");
    }

    #[test]
    fn degenerate_contour_uses_bbox_center() {
        let pole = pole_of_inaccessibility(&first("M0 0 L10 0"));
        assert_eq!(pole, Point::new(5.0, 0.0));
    }

    #[test]
    fn signed_distance_sign() {
        let polygon = Polygon::flatten(&first("M0 0 L4 0 L4 4 L0 4 Z"), 0.01).unwrap();
        assert_eq!(polygon.signed_distance(Point::new(2.0, 2.0)), 2.0);
        assert_eq!(polygon.signed_distance(Point::new(6.0, 2.0)), -2.0);
    }
}
